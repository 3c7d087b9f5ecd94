//! Fixed safety messages.

use crate::domain::chat::{ChatMessage, Priority};

/// Offered after any crisis message.
pub const CRISIS_FOLLOW_UP_REPLIES: &[&str] = &[
    "I want to talk to someone now",
    "Tell me more about these resources",
    "I'm feeling a bit better now",
];

/// Sent in place of a model reply when a crisis phrase is detected.
pub const CRISIS_RESPONSE_TEXT: &str = "I'm very concerned about what you're sharing. \
Please reach out for immediate help:\n\n\
**Crisis Resources:**\n\
- **Call 988** - Suicide & Crisis Lifeline (24/7)\n\
- **Call 911** - If you're in immediate danger\n\
- **Text HOME to 741741** - Crisis Text Line\n\n\
You're not alone, and there are people who want to help you. \
Please reach out to one of these resources right away.";

/// Added at session start when the user reports being in crisis.
pub const CRISIS_SUPPORT_NOTICE_TEXT: &str = "I notice you mentioned you're in crisis. \
Please know that you're not alone. If you're in immediate danger, please call 911 \
or go to your nearest emergency room. I'm here to support you through this.";

/// Assistant reply for a message that tripped the crisis detector.
pub fn crisis_response() -> ChatMessage {
    ChatMessage::assistant(CRISIS_RESPONSE_TEXT)
        .with_priority(Priority::Critical)
        .with_suggested_replies(CRISIS_FOLLOW_UP_REPLIES.iter().copied())
}

/// Safety notice for sessions opened with the crisis support type.
pub fn crisis_support_notice() -> ChatMessage {
    ChatMessage::notice(CRISIS_SUPPORT_NOTICE_TEXT)
        .with_priority(Priority::High)
        .with_suggested_replies(CRISIS_FOLLOW_UP_REPLIES.iter().copied())
}
