use std::collections::BTreeSet;

use crate::model::ValidationError;

/// Validated tag name (trimmed, non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    /// Create a validated tag name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyTag` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTag);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a comma-separated tag list.
///
/// Each entry is trimmed; empty entries are dropped and duplicates collapse.
/// The returned set iterates in sorted order.
#[must_use]
pub fn parse_tags(input: &str) -> BTreeSet<TagName> {
    input
        .split(',')
        .filter_map(|raw| TagName::new(raw).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_name_trims() {
        let tag = TagName::new("  penale ").unwrap();
        assert_eq!(tag.as_str(), "penale");
    }

    #[test]
    fn tag_name_rejects_blank() {
        assert_eq!(TagName::new("   ").unwrap_err(), ValidationError::EmptyTag);
    }

    #[test]
    fn parse_tags_drops_empty_entries_and_sorts() {
        let tags = parse_tags(" prove, penale,, ,amministrativo,penale");
        let names: Vec<&str> = tags.iter().map(TagName::as_str).collect();
        assert_eq!(names, vec!["amministrativo", "penale", "prove"]);
    }

    #[test]
    fn parse_tags_of_empty_input_is_empty() {
        assert!(parse_tags("").is_empty());
    }
}
