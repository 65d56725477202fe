use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseSizeTagError;

/// Target thumbnail size understood by the resize service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTag {
    #[default]
    Small,
    Medium,
    Large,
}

impl SizeTag {
    pub const ALL: [SizeTag; 3] = [SizeTag::Small, SizeTag::Medium, SizeTag::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            SizeTag::Small => "small",
            SizeTag::Medium => "medium",
            SizeTag::Large => "large",
        }
    }

    /// Bounding box (width, height) the service fits the thumbnail into.
    pub fn bounding_box(self) -> (u32, u32) {
        match self {
            SizeTag::Small => (100, 100),
            SizeTag::Medium => (300, 300),
            SizeTag::Large => (600, 600),
        }
    }
}

impl fmt::Display for SizeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SizeTag {
    type Err = ParseSizeTagError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        SizeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| ParseSizeTagError {
                input: raw.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags_case_insensitively() {
        assert_eq!("small".parse::<SizeTag>().expect("small"), SizeTag::Small);
        assert_eq!(" Medium ".parse::<SizeTag>().expect("medium"), SizeTag::Medium);
        assert_eq!("LARGE".parse::<SizeTag>().expect("large"), SizeTag::Large);
    }

    #[test]
    fn rejects_tags_outside_the_set() {
        let err = "huge".parse::<SizeTag>().expect_err("huge is not a size");
        assert_eq!(err.input, "huge");
        assert!(err.to_string().contains("small, medium, large"));
    }

    #[test]
    fn default_size_is_small() {
        assert_eq!(SizeTag::default(), SizeTag::Small);
    }

    #[test]
    fn serializes_as_lowercase_wire_tag() {
        assert_eq!(
            serde_json::to_string(&SizeTag::Medium).expect("serialize"),
            "\"medium\""
        );
    }

    #[test]
    fn bounding_boxes_grow_with_size() {
        assert_eq!(SizeTag::Small.bounding_box(), (100, 100));
        assert_eq!(SizeTag::Medium.bounding_box(), (300, 300));
        assert_eq!(SizeTag::Large.bounding_box(), (600, 600));
    }
}
