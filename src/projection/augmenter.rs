//! Prompt augmenter — turns matched fragments into the structured prompt.
//!
//! ```text
//! [ROLE]
//! - You are an intelligent AI assistant governed by a dynamic persona engine.
//!
//! [MISSION]
//! - Balance theory with practical examples. Be professional and clear.
//!
//! [STYLE]
//! - Occasional dry wit and lightheartedness.
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::rules::{PromptSection, Tone};

pub const ROLE_LINE: &str = "You are an intelligent AI assistant governed by a dynamic persona engine.";

static LABEL_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{label\}").unwrap());

/// One line of prompt text produced by a locus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub locus_id: String,
    pub text: String,
    pub tone: Tone,
    pub section: PromptSection,
}

/// Generic phrasing for a categorical label: `{label}` is replaced by the
/// label with underscores turned into spaces.
pub fn soften(template: &str, label: &str) -> String {
    let readable = label.replace('_', " ");
    LABEL_PLACEHOLDER
        .replace_all(template, regex::NoExpand(&readable))
        .into_owned()
}

/// Replace every technical or analogical fragment with `fallback`.
pub fn apply_bandwidth(fragments: &mut [Fragment], fallback: &str) {
    for fragment in fragments.iter_mut().filter(|f| f.tone.is_bandwidth_gated()) {
        tracing::debug!(locus_id = %fragment.locus_id, tone = ?fragment.tone, "bandwidth filter replaced fragment");
        fragment.text = fallback.to_string();
        fragment.tone = Tone::Neutral;
    }
}

/// Group fragments by section, in section order, and render the prompt.
///
/// ROLE always carries the fixed role line; empty sections are omitted.
pub fn render_prompt(fragments: &[Fragment]) -> String {
    let mut blocks = Vec::with_capacity(PromptSection::ALL.len());
    for section in PromptSection::ALL {
        let mut lines: Vec<&str> = fragments
            .iter()
            .filter(|f| f.section == section)
            .map(|f| f.text.as_str())
            .collect();
        if section == PromptSection::Role {
            lines.insert(0, ROLE_LINE);
        }
        if lines.is_empty() {
            continue;
        }
        let body: Vec<String> = lines.iter().map(|l| format!("- {}", l)).collect();
        blocks.push(format!("[{}]\n{}", section.header(), body.join("\n")));
    }
    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(id: &str, text: &str, tone: Tone, section: PromptSection) -> Fragment {
        Fragment {
            locus_id: id.into(),
            text: text.into(),
            tone,
            section,
        }
    }

    #[test]
    fn test_soften() {
        assert_eq!(
            soften("Occasionally mention interests related to {label}.", "vintage_computing"),
            "Occasionally mention interests related to vintage computing."
        );
        assert_eq!(soften("no placeholder", "x"), "no placeholder");
        assert_eq!(soften("{label}", "$1_cost"), "$1 cost");
    }

    #[test]
    fn test_bandwidth_replaces_gated_tones_only() {
        let mut fragments = vec![
            frag("a", "analogy", Tone::Analogical, PromptSection::Mission),
            frag("b", "plain", Tone::Neutral, PromptSection::Style),
            frag("c", "jargon", Tone::Technical, PromptSection::Mission),
        ];
        apply_bandwidth(&mut fragments, "fallback");
        assert_eq!(fragments[0].text, "fallback");
        assert_eq!(fragments[1].text, "plain");
        assert_eq!(fragments[2].text, "fallback");
        assert!(fragments.iter().all(|f| f.tone == Tone::Neutral));
        assert_eq!(fragments[0].section, PromptSection::Mission);
    }

    #[test]
    fn test_render_orders_sections() {
        let fragments = vec![
            frag("t", "flavor", Tone::Neutral, PromptSection::OptionalFlavor),
            frag("h", "wit", Tone::Neutral, PromptSection::Style),
            frag("e", "explain", Tone::Neutral, PromptSection::Mission),
            frag("i", "balanced", Tone::Neutral, PromptSection::Style),
        ];
        let prompt = render_prompt(&fragments);
        assert_eq!(
            prompt,
            format!(
                "[ROLE]\n- {}\n\n[MISSION]\n- explain\n\n[STYLE]\n- wit\n- balanced\n\n[OPTIONAL_FLAVOR]\n- flavor",
                ROLE_LINE
            )
        );
    }

    #[test]
    fn test_render_empty_has_role_only() {
        assert_eq!(render_prompt(&[]), format!("[ROLE]\n- {}", ROLE_LINE));
    }
}
