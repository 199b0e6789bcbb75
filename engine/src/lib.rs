//! Quran Search - morphology-aware verse search
//!
//! Matches a query against an in-memory verse corpus by exact text, lemma,
//! root and edit distance, ranks the merged hits, and computes the ranges of
//! the diacritized text to highlight.

// Normalization and shared vocabulary come first; everything else builds on them
pub mod normalize;
pub mod tokens;
pub mod error;
pub mod corpus;
pub mod morphology;
pub mod fuzzy;
pub mod search;
pub mod cache;
pub mod highlight;
pub mod conflict;
pub mod loader;
pub mod state;

pub use cache::{RecencyCache, SearchCache, SearchKey};
pub use conflict::{diagnose, ConflictReport};
pub use corpus::{Corpus, Verse, VerseMorphology, WordEntry};
pub use error::SearchError;
pub use highlight::{apply_highlights, get_highlight_ranges, get_positive_tokens, HighlightRange};
pub use loader::{load_morphology, load_quran_data, load_word_map};
pub use morphology::{resolve_query, ResolvedQuery};
pub use normalize::{is_arabic, normalize_arabic, remove_tashkeel};
pub use search::{
    paginate, search, MatchConfig, MatchCounts, Pagination, PaginationInfo, ScoredVerse,
    SearchEngine, SearchOptions, SearchResponse,
};
pub use state::{get_data_dir, AppState};
pub use tokens::{MatchType, TokenField};
