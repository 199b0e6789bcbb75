//! JSON dataset loading

use crate::corpus::{Corpus, Verse, VerseMorphology, WordEntry};
use crate::error::SearchError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

pub const QURAN_FILE: &str = "quran.json";
pub const MORPHOLOGY_FILE: &str = "morphology.json";
pub const WORD_MAP_FILE: &str = "word-map.json";

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Verse records from a JSON array.
pub fn load_quran_data(path: &Path) -> Result<Vec<Verse>> {
    read_json(path)
}

/// Morphology records keyed by gid.
///
/// Entries without a numeric gid, or that fail to parse, are skipped.
pub fn load_morphology(path: &Path) -> Result<HashMap<u32, VerseMorphology>> {
    let raw: Vec<serde_json::Value> = read_json(path)?;
    let total = raw.len();

    let mut morphology = HashMap::with_capacity(total);
    for item in raw {
        if !item.get("gid").is_some_and(serde_json::Value::is_u64) {
            continue;
        }
        if let Ok(entry) = serde_json::from_value::<VerseMorphology>(item) {
            morphology.insert(entry.gid, entry);
        }
    }

    if morphology.len() < total {
        debug!(skipped = total - morphology.len(), "morphology entries without a usable gid");
    }
    Ok(morphology)
}

/// Surface form to lemma/root dictionary from a JSON object.
pub fn load_word_map(path: &Path) -> Result<HashMap<String, WordEntry>> {
    read_json(path)
}

impl Corpus {
    /// Load `quran.json`, `morphology.json` and `word-map.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Corpus, SearchError> {
        for name in [QURAN_FILE, MORPHOLOGY_FILE, WORD_MAP_FILE] {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(SearchError::MissingDataset(path.display().to_string()));
            }
        }

        info!(dir = %dir.display(), "loading corpus");
        let verses = load_quran_data(&dir.join(QURAN_FILE))?;
        let morphology = load_morphology(&dir.join(MORPHOLOGY_FILE))?;
        let dictionary = load_word_map(&dir.join(WORD_MAP_FILE))?;

        Corpus::new(verses, morphology, dictionary)
    }
}
