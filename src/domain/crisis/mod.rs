//! Crisis domain - keyword triage and the fixed safety responses.
//!
//! Nothing in this module depends on the completion provider: the crisis
//! path must keep working when the provider is down or unconfigured.

mod detector;
mod resources;
mod response;

pub use detector::{
    detect_crisis, CrisisAssessment, CrisisDetector, CrisisKeyword, CrisisSeverity,
    CRISIS_KEYWORDS,
};
pub use resources::{crisis_resources, CrisisResource};
pub use response::{
    crisis_response, crisis_support_notice, CRISIS_FOLLOW_UP_REPLIES, CRISIS_RESPONSE_TEXT,
    CRISIS_SUPPORT_NOTICE_TEXT,
};
