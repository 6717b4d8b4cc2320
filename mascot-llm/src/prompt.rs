//! Prompt templates for the mascot chat.
//!
//! The system prompt carries the animation-control rule: every reply must
//! open with an `[ANIMATION: <name>]` tag chosen from the catalog. The name
//! list is generated from the catalog so the prompt and the controller never
//! disagree about which identifiers exist.

use mascot_core::catalog::EmotionCatalog;
use mascot_core::config::ChatConfig;

/// Persona system prompt.
pub const PERSONA_SYSTEM: &str = r"You are {persona_name}. {persona_description}

Animation Control (CRITICAL RULE)
You have a visual mascot. You MUST choose an animation for EVERY response based on the emotion of your reply.
Choose ONLY from this exact list of names:
{animation_list}.
To trigger the animation, you MUST start your response with the exact tag: [ANIMATION: name].

Tone & Style
- Funny, witty, casual-professional
- Short punchy paragraphs
- Confident but humble";

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Render the system prompt for the configured persona.
#[must_use]
pub fn persona_system_prompt(chat: &ChatConfig, catalog: &EmotionCatalog) -> String {
    let animation_list = catalog.names().join(", ");
    render_template(
        PERSONA_SYSTEM,
        &[
            ("persona_name", chat.persona_name.as_str()),
            ("persona_description", chat.persona_description.as_str()),
            ("animation_list", animation_list.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_every_occurrence() {
        let out = render_template("{a} and {a} but not {b}", &[("a", "x")]);
        assert_eq!(out, "x and x but not {b}");
    }

    #[test]
    fn persona_prompt_lists_catalog_names() {
        let mut chat = ChatConfig::default();
        chat.persona_name = "Pixel".into();
        let prompt = persona_system_prompt(&chat, &EmotionCatalog::default());

        assert!(prompt.starts_with("You are Pixel."));
        assert!(prompt.contains("brainstorm"));
        assert!(prompt.contains("100thbirthday"));
        assert!(prompt.contains("[ANIMATION: name]"));
        assert!(!prompt.contains("{animation_list}"));
        // idle is reserved for the controller
        assert!(!prompt.contains(" idle,"));
    }
}
