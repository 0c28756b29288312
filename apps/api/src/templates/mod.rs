// Template metadata: zone definitions for the supported resume templates
// and content-based template detection.

pub mod detect;
pub mod handlers;
pub mod zones;
