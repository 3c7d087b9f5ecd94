//! Optional details a user shares when opening a chat.

use serde::{Deserialize, Serialize};

/// Kind of help the user asked for on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SupportType {
    Chat,
    Resources,
    Exercises,
    Crisis,
    /// Anything the intake form sent that we do not recognize.
    #[default]
    #[serde(other)]
    Unspecified,
}

/// Profile captured at session start. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub mood: Option<String>,
    pub support_type: Option<SupportType>,
}

impl UserProfile {
    /// Builds a profile, treating blank strings as absent.
    pub fn new(
        name: Option<String>,
        mood: Option<String>,
        support_type: Option<SupportType>,
    ) -> Self {
        Self {
            name: non_blank(name),
            mood: non_blank(mood),
            support_type,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn mood(&self) -> Option<&str> {
        self.mood.as_deref()
    }

    /// True when the user said they are in crisis on the intake form.
    pub fn is_in_crisis(&self) -> bool {
        self.support_type == Some(SupportType::Crisis)
    }

    /// True when the stated mood is "struggling" (any casing).
    pub fn is_struggling(&self) -> bool {
        self.mood()
            .map(|m| m.eq_ignore_ascii_case("struggling"))
            .unwrap_or(false)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
