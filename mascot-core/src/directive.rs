//! Animation-directive extraction from chat replies.
//!
//! Chat replies may carry a tag of the form `[ANIMATION: <identifier>]`
//! telling the mascot how to react. Extraction is a pure string transform:
//! the first tag is removed from the visible message and its identifier is
//! lower-cased. A reply without a tag falls back to a default emotion.

use std::sync::OnceLock;

use regex::Regex;

use crate::emotion::Emotion;

/// Emotion used when a reply carries no tag.
pub const DEFAULT_DIRECTIVE_EMOTION: Emotion = Emotion::Hellow;

static DIRECTIVE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn directive_pattern() -> &'static Regex {
    DIRECTIVE_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\[ANIMATION:\s*([a-z0-9-]+)\]").expect("directive pattern is valid")
    })
}

/// A reply split into its visible text and the requested emotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Reply text with the tag removed.
    pub message: String,
    /// Lower-cased identifier from the tag, or the default identifier.
    pub emotion_id: String,
    /// Whether a tag was found.
    pub tagged: bool,
}

impl Directive {
    /// The requested emotion; identifiers outside the catalog become `idle`.
    #[must_use]
    pub fn emotion(&self) -> Emotion {
        Emotion::resolve(&self.emotion_id)
    }
}

/// Split `reply` into visible text and emotion, using `default` when untagged.
#[must_use]
pub fn extract(reply: &str, default: Emotion) -> Directive {
    match directive_pattern().captures(reply) {
        Some(captures) => {
            let tag = captures.get(0).map_or("", |m| m.as_str());
            let id = captures.get(1).map_or("", |m| m.as_str());
            Directive {
                message: reply.replacen(tag, "", 1).trim().to_string(),
                emotion_id: id.to_ascii_lowercase(),
                tagged: true,
            }
        }
        None => Directive {
            message: reply.to_string(),
            emotion_id: default.as_str().to_string(),
            tagged: false,
        },
    }
}

/// [`extract`] with the built-in default emotion.
#[must_use]
pub fn extract_directive(reply: &str) -> Directive {
    extract(reply, DEFAULT_DIRECTIVE_EMOTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_tag_is_stripped() {
        let d = extract_directive("[ANIMATION: love] Thanks, that means a lot!");
        assert!(d.tagged);
        assert_eq!(d.emotion_id, "love");
        assert_eq!(d.emotion(), Emotion::Love);
        assert_eq!(d.message, "Thanks, that means a lot!");
    }

    #[test]
    fn keyword_and_identifier_are_case_insensitive() {
        let d = extract_directive("[animation:OKAY-Done]\nAll set.");
        assert_eq!(d.emotion_id, "okay-done");
        assert_eq!(d.emotion(), Emotion::OkayDone);
        assert_eq!(d.message, "All set.");
    }

    #[test]
    fn only_first_tag_is_consumed() {
        let d = extract_directive("[ANIMATION: cry] sad [ANIMATION: star]");
        assert_eq!(d.emotion(), Emotion::Cry);
        assert_eq!(d.message, "sad [ANIMATION: star]");
    }

    #[test]
    fn missing_tag_uses_default() {
        let d = extract_directive("  Just text.  ");
        assert!(!d.tagged);
        assert_eq!(d.emotion(), Emotion::Hellow);
        assert_eq!(d.message, "  Just text.  ");

        let d = extract("Plain.", Emotion::Idle);
        assert_eq!(d.emotion_id, "idle");
    }

    #[test]
    fn unknown_identifier_is_kept_but_resolves_to_idle() {
        let d = extract_directive("[ANIMATION: moonwalk] Watch this");
        assert!(d.tagged);
        assert_eq!(d.emotion_id, "moonwalk");
        assert_eq!(d.emotion(), Emotion::Idle);
    }

    #[test]
    fn malformed_tags_are_ignored() {
        let d = extract_directive("[ANIMATION: heart eyes] hi");
        assert!(!d.tagged);
        let d = extract_directive("[ANIMATION:] hi");
        assert!(!d.tagged);
    }
}
