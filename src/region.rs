use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// How the region code is read out of a chat message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionStrategy {
    /// The first word after a user mention: `<@U024BE7LH> JP`.
    #[default]
    Mention,
    /// The whole trimmed message: `JP`.
    WholeText,
}

fn mention_pattern() -> &'static Regex {
    static MENTION: OnceLock<Regex> = OnceLock::new();
    MENTION.get_or_init(|| Regex::new(r"<@\S+>\s*(\S*)").expect("mention pattern is valid"))
}

impl RegionStrategy {
    pub fn extract(&self, text: &str) -> Option<String> {
        let region = match self {
            Self::Mention => mention_pattern()
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())?,
            Self::WholeText => text.trim(),
        };

        if region.is_empty() {
            None
        } else {
            Some(region.to_string())
        }
    }
}
