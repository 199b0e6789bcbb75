//! Query resolution against the word dictionary and per-verse aligned morphology

use crate::corpus::{VerseMorphology, WordEntry};
use crate::normalize::{morphology_key, normalize_arabic};
use crate::tokens::TokenField;
use std::collections::HashMap;

/// A query after normalization and dictionary lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub clean_query: String,
    pub lemma: Option<String>,
    pub root: Option<String>,
}

impl ResolvedQuery {
    pub fn is_empty(&self) -> bool {
        self.clean_query.is_empty()
    }

    pub fn words(&self) -> Vec<&str> {
        self.clean_query.split(' ').filter(|w| !w.is_empty()).collect()
    }

    pub fn lemma_key(&self) -> Option<String> {
        self.lemma.as_deref().map(morphology_key).filter(|k| !k.is_empty())
    }

    pub fn root_key(&self) -> Option<String> {
        self.root.as_deref().map(morphology_key).filter(|k| !k.is_empty())
    }

    /// Comparison key for the given morphology field.
    pub fn key_for(&self, field: TokenField) -> Option<String> {
        match field {
            TokenField::Text => None,
            TokenField::Lemma => self.lemma_key(),
            TokenField::Root => self.root_key(),
        }
    }
}

/// Normalize `query` and look up its lemma and root.
///
/// Only single recognized surface forms have dictionary entries, so phrases
/// resolve to a clean query with no morphology.
pub fn resolve_query(query: &str, dictionary: &HashMap<String, WordEntry>) -> ResolvedQuery {
    let clean_query = normalize_arabic(query);
    if clean_query.is_empty() {
        return ResolvedQuery::default();
    }

    let entry = dictionary.get(&clean_query);
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());

    ResolvedQuery {
        lemma: entry.and_then(|e| non_empty(&e.lemma)),
        root: entry.and_then(|e| non_empty(&e.root)),
        clean_query,
    }
}

/// Lemma and root comparison keys for one verse, kept only when the column
/// lines up with the verse's word count.
#[derive(Debug, Clone, Default)]
pub struct AlignedMorphology {
    lemmas: Option<Vec<String>>,
    roots: Option<Vec<String>>,
}

impl AlignedMorphology {
    pub fn build(morphology: Option<&VerseMorphology>, word_count: usize) -> Self {
        let column = |field: TokenField| -> Option<Vec<String>> {
            let values = field.get_values(morphology?)?;
            if values.len() != word_count {
                return None;
            }
            Some(values.iter().map(|v| morphology_key(v)).collect())
        };

        Self {
            lemmas: column(TokenField::Lemma),
            roots: column(TokenField::Root),
        }
    }

    pub fn is_aligned(&self, field: TokenField) -> bool {
        self.column(field).is_some()
    }

    /// Word positions whose lemma or root equals `key`. Misaligned or
    /// missing columns never match.
    pub fn positions(&self, field: TokenField, key: &str) -> Vec<usize> {
        if key.is_empty() {
            return Vec::new();
        }
        match self.column(field) {
            Some(values) => values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.as_str() == key)
                .map(|(i, _)| i)
                .collect(),
            None => Vec::new(),
        }
    }

    fn column(&self, field: TokenField) -> Option<&Vec<String>> {
        match field {
            TokenField::Text => None,
            TokenField::Lemma => self.lemmas.as_ref(),
            TokenField::Root => self.roots.as_ref(),
        }
    }
}
