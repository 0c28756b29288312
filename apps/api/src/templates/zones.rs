//! Template zone definitions for the supported resume templates.
//!
//! Zones tell the editor which parts of a template are safe to edit:
//! `locked` structure must not be touched, `warning` zones (preamble) are
//! edit-at-your-own-risk, `safe` zones hold the user's actual content.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Locked,
    Warning,
    Safe,
}

/// One zone of a template. Which locator fields are set depends on the
/// template: pattern-delimited zones use `patterns`/`end_pattern`,
/// comment-marker templates (jake-resume) use `marker`.
#[derive(Debug, Clone, Serialize)]
pub struct Zone {
    #[serde(rename = "type")]
    pub kind: ZoneKind,
    #[serde(skip_serializing_if = "slice_is_empty")]
    pub patterns: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_pattern: Option<&'static str>,
    #[serde(skip_serializing_if = "slice_is_empty")]
    pub fields: &'static [&'static str],
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateSpec {
    pub template_id: &'static str,
    pub template_name: &'static str,
    pub source: &'static str,
    pub zones: &'static [Zone],
}

fn slice_is_empty(slice: &&[&str]) -> bool {
    slice.is_empty()
}

const NO_PATTERNS: &[&str] = &[];
const NO_FIELDS: &[&str] = &[];

const fn locked(patterns: &'static [&'static str], description: &'static str) -> Zone {
    Zone {
        kind: ZoneKind::Locked,
        patterns,
        marker: None,
        start_line: None,
        end_pattern: None,
        fields: NO_FIELDS,
        description,
    }
}

const fn safe_patterns(patterns: &'static [&'static str], description: &'static str) -> Zone {
    Zone {
        kind: ZoneKind::Safe,
        patterns,
        marker: None,
        start_line: None,
        end_pattern: None,
        fields: NO_FIELDS,
        description,
    }
}

const fn safe_marker(
    marker: &'static str,
    fields: &'static [&'static str],
    description: &'static str,
) -> Zone {
    Zone {
        kind: ZoneKind::Safe,
        patterns: NO_PATTERNS,
        marker: Some(marker),
        start_line: None,
        end_pattern: None,
        fields,
        description,
    }
}

const fn preamble_warning(end_pattern: &'static str, description: &'static str) -> Zone {
    Zone {
        kind: ZoneKind::Warning,
        patterns: NO_PATTERNS,
        marker: None,
        start_line: Some(1),
        end_pattern: Some(end_pattern),
        fields: NO_FIELDS,
        description,
    }
}

pub const TEMPLATES: &[TemplateSpec] = &[
    TemplateSpec {
        template_id: "jake-resume",
        template_name: "Jake's Resume",
        source: "https://www.overleaf.com/latex/templates/jakes-resume/syzfjbzwjncs",
        zones: &[
            locked(
                &[r"\documentclass", r"\begin{document}", r"\end{document}"],
                "Core document structure",
            ),
            preamble_warning(r"\begin{document}", "Preamble - formatting settings"),
            safe_marker(
                "%-----------HEADING-----------",
                &["name", "phone", "email", "linkedin", "github"],
                "Your contact information",
            ),
            safe_marker(
                "%-----------EDUCATION-----------",
                &["institution", "degree", "date", "gpa", "coursework"],
                "Education section",
            ),
            safe_marker(
                "%-----------EXPERIENCE-----------",
                &["company", "role", "dates", "bullets"],
                "Work experience",
            ),
            safe_marker(
                "%-----------PROJECTS-----------",
                &["name", "tech", "description", "bullets"],
                "Projects section",
            ),
            safe_marker(
                "%-----------SKILLS-----------",
                &["category", "skills"],
                "Technical skills",
            ),
        ],
    },
    TemplateSpec {
        template_id: "deedy-cv",
        template_name: "Deedy CV",
        source: "https://www.overleaf.com/latex/templates/deedy-cv/bjryvfsjdyxz",
        zones: &[
            locked(
                &[
                    r"\documentclass",
                    r"\begin{document}",
                    r"\end{document}",
                    r"\namesection",
                ],
                "Core document structure",
            ),
            safe_patterns(
                &[r"\runsubsection", r"\descript", r"\location"],
                "Content sections",
            ),
        ],
    },
    TemplateSpec {
        template_id: "altacv",
        template_name: "AltaCV",
        source: "https://www.overleaf.com/latex/templates/altacv-template/trgqjpwnmtgv",
        zones: &[
            locked(
                &[r"\documentclass", r"\makecvheader", r"\begin{document}"],
                "Core document and header",
            ),
            safe_patterns(&[r"\cvevent", r"\cvskill", r"\cvtag"], "Content entries"),
        ],
    },
    TemplateSpec {
        template_id: "moderncv",
        template_name: "ModernCV",
        source: "https://ctan.org/pkg/moderncv",
        zones: &[
            locked(
                &[r"\documentclass", r"\moderncvstyle", r"\moderncvcolor"],
                "CV style settings",
            ),
            safe_patterns(&[r"\cventry", r"\cvitem", r"\cvskill"], "Content entries"),
        ],
    },
    TemplateSpec {
        template_id: "simple",
        template_name: "Simple Overleaf",
        source: "https://www.overleaf.com/templates/simple-cv/kzwpwnfdtbmq",
        zones: &[
            locked(
                &[r"\documentclass", r"\begin{document}", r"\end{document}"],
                "Core structure",
            ),
            safe_patterns(
                &[r"\section", r"\subsection", r"\textbf"],
                "Content sections",
            ),
        ],
    },
];

pub fn find_template(template_id: &str) -> Option<&'static TemplateSpec> {
    TEMPLATES.iter().find(|t| t.template_id == template_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_five_templates_present() {
        let ids: Vec<_> = TEMPLATES.iter().map(|t| t.template_id).collect();
        assert_eq!(
            ids,
            vec!["jake-resume", "deedy-cv", "altacv", "moderncv", "simple"]
        );
    }

    #[test]
    fn test_find_template_hit_and_miss() {
        assert!(find_template("jake-resume").is_some());
        assert!(find_template("nonexistent").is_none());
    }

    #[test]
    fn test_every_template_has_a_locked_zone() {
        for template in TEMPLATES {
            assert!(
                template.zones.iter().any(|z| z.kind == ZoneKind::Locked),
                "{} must lock its core structure",
                template.template_id
            );
        }
    }

    #[test]
    fn test_jake_resume_has_marker_zones() {
        let jake = find_template("jake-resume").unwrap();
        let markers: Vec<_> = jake.zones.iter().filter_map(|z| z.marker).collect();
        assert!(markers.contains(&"%-----------EDUCATION-----------"));
        assert!(markers.contains(&"%-----------SKILLS-----------"));
    }

    #[test]
    fn test_zone_serialization_skips_unset_locators() {
        let zone = safe_patterns(&[r"\cventry"], "Content entries");
        let json = serde_json::to_value(&zone).unwrap();
        assert_eq!(json["type"], "safe");
        assert_eq!(json["patterns"][0], r"\cventry");
        assert!(json.get("marker").is_none());
        assert!(json.get("fields").is_none());
        assert!(json.get("start_line").is_none());
    }

    #[test]
    fn test_warning_zone_serializes_line_bounds() {
        let jake = find_template("jake-resume").unwrap();
        let preamble = jake
            .zones
            .iter()
            .find(|z| z.kind == ZoneKind::Warning)
            .unwrap();
        let json = serde_json::to_value(preamble).unwrap();
        assert_eq!(json["start_line"], 1);
        assert_eq!(json["end_pattern"], r"\begin{document}");
    }
}
