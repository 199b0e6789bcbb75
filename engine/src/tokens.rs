//! Match classifications and morphology field selection

use crate::corpus::VerseMorphology;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a verse matched the query. Variants are listed in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Simple,
    Lemma,
    Root,
    Fuzzy,
    #[default]
    None,
}

impl MatchType {
    /// Score tier of the strategy; a higher tier always outranks a lower one.
    pub fn tier(self) -> u32 {
        match self {
            MatchType::Simple => 4,
            MatchType::Lemma => 3,
            MatchType::Root => 2,
            MatchType::Fuzzy => 1,
            MatchType::None => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Simple => "simple",
            MatchType::Lemma => "lemma",
            MatchType::Root => "root",
            MatchType::Fuzzy => "fuzzy",
            MatchType::None => "none",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which layer of a verse a token was matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenField {
    #[default]
    Text,
    Lemma,
    Root,
}

impl TokenField {
    /// Highlight mode for a verse that matched with `match_type`.
    pub fn for_match(match_type: MatchType) -> Self {
        match match_type {
            MatchType::Lemma => TokenField::Lemma,
            MatchType::Root => TokenField::Root,
            _ => TokenField::Text,
        }
    }

    pub fn match_type(self) -> MatchType {
        match self {
            TokenField::Text => MatchType::Simple,
            TokenField::Lemma => MatchType::Lemma,
            TokenField::Root => MatchType::Root,
        }
    }

    /// The aligned morphology column for this field, if it has one.
    pub fn get_values<'a>(&self, morphology: &'a VerseMorphology) -> Option<&'a [String]> {
        match self {
            TokenField::Text => None,
            TokenField::Lemma => Some(&morphology.lemmas),
            TokenField::Root => Some(&morphology.roots),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_follow_priority() {
        let order = [MatchType::Simple, MatchType::Lemma, MatchType::Root, MatchType::Fuzzy, MatchType::None];
        for pair in order.windows(2) {
            assert!(pair[0].tier() > pair[1].tier());
        }
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&MatchType::Lemma).unwrap(), "\"lemma\"");
        assert_eq!(MatchType::Fuzzy.to_string(), "fuzzy");
        let field: TokenField = serde_json::from_str("\"root\"").unwrap();
        assert_eq!(field, TokenField::Root);
    }

    #[test]
    fn test_field_for_match() {
        assert_eq!(TokenField::for_match(MatchType::Lemma), TokenField::Lemma);
        assert_eq!(TokenField::for_match(MatchType::Root), TokenField::Root);
        assert_eq!(TokenField::for_match(MatchType::Fuzzy), TokenField::Text);
        assert_eq!(TokenField::Text.match_type(), MatchType::Simple);
    }
}
