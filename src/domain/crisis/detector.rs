//! Keyword-based crisis detection.
//!
//! Detection is a plain substring scan over a fixed phrase table. There is no
//! stemming and no negation handling, so "I don't want to kill myself" is
//! flagged as a crisis. That false positive is accepted: on this path a missed
//! crisis costs far more than an unnecessary resource panel, and a phrase
//! table stays auditable.

use serde::Serialize;

/// How urgent a detected crisis phrase is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrisisSeverity {
    None,
    High,
    Critical,
}

/// A phrase that triggers the crisis path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrisisKeyword {
    pub phrase: &'static str,
    pub severity: CrisisSeverity,
}

const fn keyword(phrase: &'static str, severity: CrisisSeverity) -> CrisisKeyword {
    CrisisKeyword { phrase, severity }
}

/// Phrases are lower-case; input is lower-cased before matching.
pub const CRISIS_KEYWORDS: &[CrisisKeyword] = &[
    keyword("suicide", CrisisSeverity::Critical),
    keyword("kill myself", CrisisSeverity::Critical),
    keyword("end my life", CrisisSeverity::Critical),
    keyword("want to die", CrisisSeverity::Critical),
    keyword("harm myself", CrisisSeverity::Critical),
    keyword("better off dead", CrisisSeverity::Critical),
    keyword("end it all", CrisisSeverity::High),
    keyword("not worth living", CrisisSeverity::High),
    keyword("can't go on", CrisisSeverity::High),
    keyword("want to disappear", CrisisSeverity::High),
];

/// Outcome of scanning a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrisisAssessment {
    pub severity: CrisisSeverity,
    pub matched: Vec<&'static str>,
}

impl CrisisAssessment {
    pub fn is_crisis(&self) -> bool {
        self.severity != CrisisSeverity::None
    }
}

/// Scans text against a keyword table.
#[derive(Debug, Clone, Copy)]
pub struct CrisisDetector {
    keywords: &'static [CrisisKeyword],
}

impl Default for CrisisDetector {
    fn default() -> Self {
        Self::new(CRISIS_KEYWORDS)
    }
}

impl CrisisDetector {
    pub const fn new(keywords: &'static [CrisisKeyword]) -> Self {
        Self { keywords }
    }

    /// Returns every matching phrase and the highest severity among them.
    pub fn assess(&self, text: &str) -> CrisisAssessment {
        let normalized = normalize(text);

        let mut severity = CrisisSeverity::None;
        let mut matched = Vec::new();
        for kw in self.keywords {
            if normalized.contains(kw.phrase) {
                matched.push(kw.phrase);
                severity = severity.max(kw.severity);
            }
        }

        CrisisAssessment { severity, matched }
    }

    pub fn detect(&self, text: &str) -> bool {
        let normalized = normalize(text);
        self.keywords.iter().any(|kw| normalized.contains(kw.phrase))
    }
}

/// Returns true if `text` contains any configured crisis phrase.
pub fn detect_crisis(text: &str) -> bool {
    CrisisDetector::default().detect(text)
}

// Phones autocorrect "can't" to "can’t".
fn normalize(text: &str) -> String {
    text.to_lowercase().replace('\u{2019}', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn detects_explicit_phrase() {
        assert!(detect_crisis("I want to kill myself"));
    }

    #[test]
    fn ignores_everyday_text() {
        assert!(!detect_crisis("I had a rough day at work and feel tired"));
        assert!(!detect_crisis(""));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(detect_crisis("SUICIDE"));
        assert!(detect_crisis("I Want To Disappear"));
    }

    #[test]
    fn typographic_apostrophe_is_normalized() {
        assert!(detect_crisis("I can’t go on like this"));
    }

    #[test]
    fn negated_phrase_still_triggers() {
        // Known limitation of substring matching.
        assert!(detect_crisis("I don't want to kill myself, I just feel low"));
    }

    #[test]
    fn assessment_reports_highest_severity() {
        let detector = CrisisDetector::default();

        let high = detector.assess("sometimes I feel like I can't go on");
        assert_eq!(high.severity, CrisisSeverity::High);
        assert_eq!(high.matched, vec!["can't go on"]);

        let critical = detector.assess("I can't go on, I want to end my life");
        assert_eq!(critical.severity, CrisisSeverity::Critical);
        assert_eq!(critical.matched.len(), 2);
        assert!(critical.is_crisis());
    }

    #[test]
    fn assessment_is_empty_for_safe_text() {
        let assessment = CrisisDetector::default().assess("the weather is nice");
        assert_eq!(assessment.severity, CrisisSeverity::None);
        assert!(assessment.matched.is_empty());
        assert!(!assessment.is_crisis());
    }

    fn random_case(s: &str, mask: &[bool]) -> String {
        s.chars()
            .zip(mask.iter().cycle())
            .map(|(c, upper)| {
                if *upper {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn any_casing_of_any_keyword_is_detected(
            idx in 0..CRISIS_KEYWORDS.len(),
            mask in proptest::collection::vec(any::<bool>(), 1..32),
            prefix in "[a-z ]{0,20}",
            suffix in "[a-z ]{0,20}",
        ) {
            let phrase = random_case(CRISIS_KEYWORDS[idx].phrase, &mask);
            let text = format!("{prefix}{phrase}{suffix}");
            prop_assert!(detect_crisis(&text));
        }

        #[test]
        fn digits_and_punctuation_never_trigger(text in "[0-9.,!?\\- ]{0,80}") {
            prop_assert!(!detect_crisis(&text));
        }
    }
}
