//! Process state: the loaded corpus, the engine and the response cache

use crate::cache::SearchCache;
use crate::corpus::Corpus;
use crate::error::SearchError;
use crate::search::SearchEngine;
use std::path::PathBuf;
use std::sync::Arc;

/// Default search cache capacity (number of responses)
pub const DEFAULT_CACHE_CAPACITY: usize = 500;

/// Environment variable overriding the dataset directory
pub const DATA_DIR_ENV: &str = "QURAN_SEARCH_DATA";

pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub cache: Arc<SearchCache>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load the corpus from `data_dir` and set up a default-sized cache.
    pub fn new(data_dir: PathBuf) -> Result<Self, SearchError> {
        Self::with_capacity(data_dir, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(data_dir: PathBuf, cache_capacity: usize) -> Result<Self, SearchError> {
        let corpus = Corpus::load(&data_dir)?;
        Self::from_corpus(corpus, data_dir, cache_capacity)
    }

    /// Wrap an already built corpus.
    pub fn from_corpus(
        corpus: Corpus,
        data_dir: PathBuf,
        cache_capacity: usize,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            engine: Arc::new(SearchEngine::new(Arc::new(corpus))),
            cache: Arc::new(SearchCache::new(cache_capacity)?),
            data_dir,
        })
    }
}

#[cfg(debug_assertions)]
fn has_dataset(dir: &std::path::Path) -> bool {
    dir.join(crate::loader::QURAN_FILE).is_file()
}

/// Resolve the dataset directory.
///
/// Order: `QURAN_SEARCH_DATA`, then `data/` near the working directory or
/// the executable (debug builds), then the platform data dir.
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    #[cfg(debug_assertions)]
    {
        let dev_paths = [PathBuf::from("data"), PathBuf::from("../data")];
        for path in &dev_paths {
            if has_dataset(path) {
                return path.canonicalize().unwrap_or_else(|_| path.clone());
            }
        }

        // walk up from target/debug to the workspace root
        if let Ok(exe_path) = std::env::current_exe() {
            let mut current = exe_path.parent();
            for _ in 0..5 {
                let Some(dir) = current else { break };
                let data_path = dir.join("data");
                if has_dataset(&data_path) {
                    return data_path;
                }
                current = dir.parent();
            }
        }
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("quran-search");
    }

    PathBuf::from("data")
}
