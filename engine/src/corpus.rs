//! Corpus records and the read-only handle that owns the three datasets

use crate::error::SearchError;
use crate::morphology::AlignedMorphology;
use crate::normalize::normalize_arabic;
use crate::tokens::TokenField;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// One verse of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub gid: u32,
    pub uthmani: String,
    pub standard: String,
    #[serde(default)]
    pub standard_full: String,
    pub sura_id: u32,
    pub aya_id: u32,
    #[serde(default)]
    pub aya_id_display: String,
    pub juz_id: u32,
    #[serde(default)]
    pub page_id: u32,
    pub sura_name: String,
    #[serde(default)]
    pub sura_name_en: String,
    #[serde(default)]
    pub sura_name_romanization: String,
}

impl Verse {
    /// Whitespace-split words of the standard text; morphology is aligned to these.
    pub fn standard_words(&self) -> Vec<&str> {
        self.standard.split_whitespace().collect()
    }

    /// Original-script words lined up with [`Verse::standard_words`].
    ///
    /// Standalone pause marks are dropped from the uthmani text first. When
    /// the word counts still disagree the standard words are returned instead.
    pub fn display_words(&self) -> Vec<&str> {
        let standard = self.standard_words();
        let uthmani: Vec<&str> = self
            .uthmani
            .split_whitespace()
            .filter(|w| !normalize_arabic(w).is_empty())
            .collect();

        if uthmani.len() == standard.len() {
            uthmani
        } else {
            standard
        }
    }
}

/// Per-verse lemmas and roots, positionally aligned with the standard words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseMorphology {
    pub gid: u32,
    #[serde(default)]
    pub lemmas: Vec<String>,
    #[serde(default)]
    pub roots: Vec<String>,
}

/// Dictionary analysis of a surface form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    #[serde(default)]
    pub lemma: Option<String>,
    #[serde(default)]
    pub root: Option<String>,
}

/// Precomputed comparison data for one verse.
#[derive(Debug, Clone)]
pub(crate) struct VerseWords {
    pub standard: Vec<String>,
    pub standard_full: Vec<String>,
    pub display: Vec<String>,
    pub morphology: AlignedMorphology,
    pub sura_name_key: String,
}

impl VerseWords {
    fn build(verse: &Verse, morphology: Option<&VerseMorphology>) -> Self {
        let standard_words = verse.standard_words();
        Self {
            standard: standard_words.iter().map(|w| normalize_arabic(w)).collect(),
            standard_full: verse
                .standard_full
                .split_whitespace()
                .map(normalize_arabic)
                .collect(),
            display: verse.display_words().into_iter().map(str::to_string).collect(),
            morphology: AlignedMorphology::build(morphology, standard_words.len()),
            sura_name_key: normalize_arabic(&verse.sura_name),
        }
    }
}

/// Immutable corpus handle: verses, morphology and the word dictionary.
///
/// Built once at startup and shared read-only (`Arc<Corpus>`) by every search.
pub struct Corpus {
    verses: Vec<Verse>,
    words: Vec<VerseWords>,
    by_gid: HashMap<u32, usize>,
    morphology: HashMap<u32, VerseMorphology>,
    dictionary: HashMap<String, WordEntry>,
}

impl Corpus {
    /// Build the handle. An empty verse list is a missing dataset.
    ///
    /// Dictionary keys are re-keyed by their normalized form; an entry whose
    /// key is already normalized wins over a folded duplicate.
    pub fn new(
        verses: Vec<Verse>,
        morphology: HashMap<u32, VerseMorphology>,
        dictionary: HashMap<String, WordEntry>,
    ) -> Result<Self, SearchError> {
        if verses.is_empty() {
            return Err(SearchError::MissingDataset("verse corpus is empty".to_string()));
        }

        let mut normalized_dictionary: HashMap<String, WordEntry> =
            HashMap::with_capacity(dictionary.len());
        for (word, entry) in dictionary {
            let key = normalize_arabic(&word);
            if key.is_empty() {
                continue;
            }
            if key == word {
                normalized_dictionary.insert(key, entry);
            } else {
                normalized_dictionary.entry(key).or_insert(entry);
            }
        }

        let words: Vec<VerseWords> = verses
            .iter()
            .map(|v| VerseWords::build(v, morphology.get(&v.gid)))
            .collect();
        let by_gid = verses.iter().enumerate().map(|(i, v)| (v.gid, i)).collect();

        let corpus = Self {
            verses,
            words,
            by_gid,
            morphology,
            dictionary: normalized_dictionary,
        };

        let misaligned = corpus.alignment_issues().len();
        if misaligned > 0 {
            warn!(misaligned, "verses with morphology not aligned to their word count");
        }
        info!(
            verses = corpus.verses.len(),
            morphology = corpus.morphology.len(),
            dictionary = corpus.dictionary.len(),
            "corpus ready"
        );

        Ok(corpus)
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn verse(&self, gid: u32) -> Option<&Verse> {
        self.by_gid.get(&gid).map(|&i| &self.verses[i])
    }

    pub fn morphology(&self) -> &HashMap<u32, VerseMorphology> {
        &self.morphology
    }

    pub fn morphology_for(&self, gid: u32) -> Option<&VerseMorphology> {
        self.morphology.get(&gid)
    }

    pub fn dictionary(&self) -> &HashMap<String, WordEntry> {
        &self.dictionary
    }

    /// Dictionary entry for a surface form, normalized before lookup.
    pub fn lookup(&self, word: &str) -> Option<&WordEntry> {
        self.dictionary.get(&normalize_arabic(word))
    }

    /// Gids of verses whose morphology exists but does not line up with the
    /// verse's word count.
    pub fn alignment_issues(&self) -> Vec<u32> {
        self.verses
            .iter()
            .zip(&self.words)
            .filter(|(v, w)| {
                self.morphology.contains_key(&v.gid)
                    && !(w.morphology.is_aligned(TokenField::Lemma)
                        && w.morphology.is_aligned(TokenField::Root))
            })
            .map(|(v, _)| v.gid)
            .collect()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&Verse, &VerseWords)> {
        self.verses.iter().zip(&self.words)
    }
}
