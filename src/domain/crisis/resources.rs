//! Static hotline directory.

use serde::Serialize;

use crate::domain::chat::Priority;

/// A hotline or service the user can contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrisisResource {
    pub id: &'static str,
    pub name: &'static str,
    pub phone: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub category: &'static str,
    pub priority: Priority,
}

const RESOURCES: &[CrisisResource] = &[
    CrisisResource {
        id: "suicide-lifeline",
        name: "Suicide & Crisis Lifeline",
        phone: "988",
        description: "24/7 crisis support",
        category: "crisis",
        priority: Priority::Critical,
    },
    CrisisResource {
        id: "emergency",
        name: "Emergency Services",
        phone: "911",
        description: "Immediate emergency help",
        category: "emergency",
        priority: Priority::Critical,
    },
    CrisisResource {
        id: "crisis-text",
        name: "Crisis Text Line",
        phone: "741741",
        description: "Text HOME to 741741",
        category: "text",
        priority: Priority::High,
    },
    CrisisResource {
        id: "nami",
        name: "NAMI Helpline",
        phone: "1-800-950-6264",
        description: "Mental health support and resources",
        category: "support",
        priority: Priority::Medium,
    },
];

/// Resources ordered from most to least urgent.
pub fn crisis_resources() -> &'static [CrisisResource] {
    RESOURCES
}
