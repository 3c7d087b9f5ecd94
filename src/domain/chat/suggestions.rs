//! Quick-reply suggestions.
//!
//! Categories are checked in table order and the first match wins. A
//! category matches when any of its keywords occurs in either the assistant
//! reply or the user's message.

use crate::domain::crisis::CRISIS_FOLLOW_UP_REPLIES;

/// A keyword rule mapped to the replies it offers.
#[derive(Debug, Clone, Copy)]
pub struct ReplyCategory {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub replies: &'static [&'static str],
}

pub const REPLY_CATEGORIES: &[ReplyCategory] = &[
    ReplyCategory {
        name: "breathing",
        keywords: &["breathing", "breath"],
        replies: &[
            "Let's try the breathing exercise",
            "I'm ready to practice breathing",
            "Can you guide me through it?",
            "What other techniques can help?",
        ],
    },
    ReplyCategory {
        name: "anxiety",
        keywords: &["anxiety", "anxious"],
        replies: &[
            "Tell me more about managing anxiety",
            "I want to try a grounding technique",
            "How can I calm down right now?",
            "This is really helpful",
        ],
    },
    ReplyCategory {
        name: "sleep",
        keywords: &["sleep"],
        replies: &[
            "I have trouble falling asleep",
            "My mind races at bedtime",
            "Tell me about sleep hygiene",
            "Can we try a relaxation technique?",
        ],
    },
    ReplyCategory {
        name: "professional",
        keywords: &["professional", "therapist"],
        replies: &[
            "How do I find a good therapist?",
            "I'm not sure if I need professional help",
            "What should I expect in therapy?",
            "I'm ready to seek help",
        ],
    },
    ReplyCategory {
        name: "crisis",
        keywords: &["crisis", "emergency"],
        replies: CRISIS_FOLLOW_UP_REPLIES,
    },
];

pub const GENERIC_REPLIES: &[&str] = &[
    "That makes sense",
    "Can you tell me more?",
    "I'd like to try that",
    "What else might help?",
];

const WELCOME_REPLIES: &[&str] = &[
    "I'm feeling anxious",
    "I need coping strategies",
    "I want to talk about my day",
    "I'm having trouble sleeping",
];

const IMMEDIATE_SUPPORT_REPLY: &str = "I need immediate support";

pub const FALLBACK_REPLIES: &[&str] = &[
    "I need someone to listen",
    "I'm feeling overwhelmed",
    "Can you help me calm down?",
    "Let's try again",
];

/// Picks replies for the next turn based on what was just said.
pub fn suggest_replies(assistant_text: &str, user_text: &str) -> Vec<String> {
    let assistant = assistant_text.to_lowercase();
    let user = user_text.to_lowercase();

    let replies = REPLY_CATEGORIES
        .iter()
        .find(|category| {
            category
                .keywords
                .iter()
                .any(|kw| assistant.contains(kw) || user.contains(kw))
        })
        .map(|category| category.replies)
        .unwrap_or(GENERIC_REPLIES);

    to_owned(replies)
}

/// Replies attached to the opening greeting.
pub fn welcome_replies(struggling: bool) -> Vec<String> {
    let mut replies = Vec::with_capacity(WELCOME_REPLIES.len() + 1);
    if struggling {
        replies.push(IMMEDIATE_SUPPORT_REPLY.to_string());
    }
    replies.extend(to_owned(WELCOME_REPLIES));
    replies
}

/// Replies attached to fallback messages.
pub fn fallback_replies() -> Vec<String> {
    to_owned(FALLBACK_REPLIES)
}

fn to_owned(replies: &[&str]) -> Vec<String> {
    replies.iter().map(|r| r.to_string()).collect()
}
