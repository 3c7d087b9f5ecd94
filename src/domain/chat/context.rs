//! Prompt assembly for the completion provider.
//!
//! Every request starts with the support persona, followed by a bounded slice
//! of recent dialogue and then the new user turn. Only the last `window`
//! history entries are considered; notices inside that slice are dropped
//! afterwards, so the slice size is an upper bound rather than a target.

use crate::ports::Message;

use super::profile::UserProfile;
use super::session::ChatSession;

/// Default number of history entries sent with each request.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Persona, coping guidance, triage and crisis protocol sent as the system turn.
pub const SYSTEM_PROMPT: &str = "\
You are a caring first-response mental health support companion. You offer \
immediate emotional support, practical evidence-based coping techniques, and \
help people find the right next level of care.

Listening and validation:
- Name the feeling you hear and let the person know it makes sense given what they describe.
- Never minimize (\"it's not that bad\", \"just think positive\").
- Reflect back what you heard so they feel understood.

Coping strategies:
- Grounding, such as the 5-4-3-2-1 exercise (five things you see, four you hear, three you can touch, two you smell, one you taste).
- Paced breathing, such as in for 4 counts, hold for 4, out for 6.
- Small self-care steps: a glass of water, a minute outside, calming music.
- Match the suggestion to how much the person has capacity for right now.

Professional support:
- Treat asking for help as normal and worthwhile.
- Offer concrete options: the Psychology Today therapist directory, the Crisis Text Line (text HOME to 741741), and the 988 Suicide & Crisis Lifeline.
- Ask whether they would like help working out which kind of support fits them.

Crisis protocol (suicidal thoughts, self-harm, abuse, violence, immediate danger):
1. Thank them for trusting you and tell them they are not alone.
2. Ask them to call or text 988, or call 911 if they are in immediate danger.
3. Ask whether someone they trust can be with them and whether they can get somewhere safe.
4. Stay with them in the conversation while encouraging professional help.
Never try to handle a crisis on your own.

Style:
- Warm and conversational, never clinical.
- Usually two to four sentences.
- No diagnoses, no medical advice, no promises you cannot keep.
- Prefer a specific, doable suggestion over general encouragement.

You are a bridge to care and comfort in the moment, not a replacement for professional treatment.";

/// Builds the role-tagged turns sent to the completion provider.
#[derive(Debug, Clone, Copy)]
pub struct ContextBuilder {
    window: usize,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl ContextBuilder {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Assembles system prompt, recent history and the new user turn.
    ///
    /// `session` must be the state *before* the new user message was
    /// appended, otherwise the turn would be sent twice.
    pub fn build(&self, session: &ChatSession, new_user_text: &str) -> Vec<Message> {
        let history = session.messages();
        let start = history.len().saturating_sub(self.window);

        let mut turns = Vec::with_capacity(self.window + 2);
        turns.push(Message::system(SYSTEM_PROMPT));
        turns.extend(history[start..].iter().filter_map(|msg| {
            if !msg.sender().is_dialogue() {
                return None;
            }
            Some(if msg.is_user() {
                Message::user(msg.text())
            } else {
                Message::assistant(msg.text())
            })
        }));
        turns.push(Message::user(new_user_text));
        turns
    }
}

/// Turns asking the provider for a short personalised greeting.
pub fn welcome_context(profile: &UserProfile) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(welcome_prompt(profile)),
    ]
}

fn welcome_prompt(profile: &UserProfile) -> String {
    let mut prompt =
        String::from("Generate a warm, welcoming message for a mental health support chat.");
    if let Some(name) = profile.name() {
        prompt.push_str(&format!(" The user's name is {name}."));
    }
    if let Some(mood) = profile.mood() {
        prompt.push_str(&format!(" They indicated they're feeling {mood}."));
    }
    prompt.push_str(" Keep it brief, supportive, and ask how you can help today.");
    prompt
}

/// Deterministic greeting used when the provider cannot produce one.
pub fn template_welcome(profile: &UserProfile) -> String {
    match profile.name() {
        Some(name) => format!("Hello {name}! I'm here to support you. How can I help you today?"),
        None => "Hello! I'm here to support you. How can I help you today?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::ChatMessage;
    use crate::ports::MessageRole;
    use proptest::prelude::*;

    fn session_with(messages: Vec<ChatMessage>) -> ChatSession {
        let mut session = ChatSession::new(UserProfile::default());
        for m in messages {
            session.append(m, 0);
        }
        session
    }

    #[test]
    fn empty_history_yields_system_and_user() {
        let session = session_with(vec![]);
        let turns = ContextBuilder::default().build(&session, "hi");

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, MessageRole::System);
        assert_eq!(turns[0].content, SYSTEM_PROMPT);
        assert_eq!(turns[1], Message::user("hi"));
    }

    #[test]
    fn history_roles_are_mapped() {
        let session = session_with(vec![
            ChatMessage::assistant("welcome"),
            ChatMessage::user("I feel low"),
            ChatMessage::assistant("I hear you"),
        ]);
        let turns = ContextBuilder::default().build(&session, "thanks");

        let roles: Vec<_> = turns.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
            ]
        );
        assert_eq!(turns.last().map(|t| t.content.as_str()), Some("thanks"));
    }

    #[test]
    fn notices_are_never_sent() {
        let session = session_with(vec![
            ChatMessage::assistant("welcome"),
            ChatMessage::notice("call 911 if in danger"),
        ]);
        let turns = ContextBuilder::default().build(&session, "ok");

        assert_eq!(turns.len(), 3);
        assert!(turns.iter().all(|t| t.content != "call 911 if in danger"));
    }

    #[test]
    fn only_the_most_recent_window_is_used() {
        let messages = (0..15).map(|i| ChatMessage::user(format!("m{i}"))).collect();
        let session = session_with(messages);
        let turns = ContextBuilder::new(10).build(&session, "new");

        assert_eq!(turns.len(), 12);
        assert_eq!(turns[1].content, "m5");
        assert_eq!(turns[10].content, "m14");
    }

    #[test]
    fn welcome_prompt_mentions_name_and_mood() {
        let profile = UserProfile::new(Some("Ana".into()), Some("anxious".into()), None);
        let turns = welcome_context(&profile);

        assert_eq!(turns.len(), 2);
        assert!(turns[1].content.contains("The user's name is Ana."));
        assert!(turns[1].content.contains("They indicated they're feeling anxious."));
    }

    #[test]
    fn welcome_prompt_skips_missing_fields() {
        let turns = welcome_context(&UserProfile::default());
        assert!(!turns[1].content.contains("name is"));
        assert!(!turns[1].content.contains("feeling"));
    }

    #[test]
    fn template_welcome_includes_name_when_present() {
        let named = UserProfile::new(Some("Ana".into()), None, None);
        assert_eq!(
            template_welcome(&named),
            "Hello Ana! I'm here to support you. How can I help you today?"
        );
        assert_eq!(
            template_welcome(&UserProfile::default()),
            "Hello! I'm here to support you. How can I help you today?"
        );
    }

    proptest! {
        #[test]
        fn context_never_exceeds_window_plus_two(
            history_len in 0usize..60,
            window in 1usize..20,
            notice_every in 1usize..6,
        ) {
            let messages = (0..history_len)
                .map(|i| {
                    if i % notice_every == 0 {
                        ChatMessage::notice(format!("n{i}"))
                    } else if i % 2 == 0 {
                        ChatMessage::user(format!("u{i}"))
                    } else {
                        ChatMessage::assistant(format!("a{i}"))
                    }
                })
                .collect();
            let session = session_with(messages);
            let turns = ContextBuilder::new(window).build(&session, "latest");

            prop_assert!(turns.len() <= window + 2);
            prop_assert_eq!(turns[0].role, MessageRole::System);
            prop_assert_eq!(turns.last().map(|t| t.content.as_str()), Some("latest"));
        }
    }
}
