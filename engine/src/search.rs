//! Multi-strategy verse search: exact text, lemma, root and fuzzy matching,
//! merged into one ranked and paginated response.

use crate::cache::{SearchCache, SearchKey};
use crate::corpus::{Corpus, Verse, VerseWords};
use crate::fuzzy::bounded_distance;
use crate::morphology::{resolve_query, ResolvedQuery};
use crate::normalize::{is_arabic, letter_count, normalize_arabic};
use crate::tokens::{MatchType, TokenField};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Width of one score tier. Every score of a tier lies in
/// `[tier * TIER_SPAN, (tier + 1) * TIER_SPAN)`.
pub const TIER_SPAN: u32 = 1000;

/// Default number of results per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Tunable parameters of the fuzzy strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchConfig {
    /// Queries shorter than this many letters never match fuzzily.
    pub fuzzy_min_query_len: usize,
    /// One extra edit is allowed per this many letters of query.
    pub fuzzy_letters_per_edit: usize,
    /// Upper bound on allowed edits regardless of query length.
    pub fuzzy_max_edits: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            fuzzy_min_query_len: 3,
            fuzzy_letters_per_edit: 5,
            fuzzy_max_edits: 3,
        }
    }
}

impl MatchConfig {
    /// Edits allowed for a query of `query_len` letters: 1 up to five
    /// letters, 2 up to ten, then 3.
    pub fn max_edits(&self, query_len: usize) -> usize {
        let per_edit = self.fuzzy_letters_per_edit.max(1);
        (query_len.saturating_sub(1) / per_edit + 1).min(self.fuzzy_max_edits.max(1))
    }
}

/// Which strategies run and which structural filters apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SearchOptions {
    pub lemma: bool,
    pub root: bool,
    pub fuzzy: bool,
    pub sura_id: Option<u32>,
    pub juz_id: Option<u32>,
    pub sura_name: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            lemma: true,
            root: true,
            fuzzy: true,
            sura_id: None,
            juz_id: None,
            sura_name: None,
        }
    }
}

impl SearchOptions {
    /// Same strategy flags with every structural filter removed.
    pub fn without_filters(&self) -> Self {
        Self {
            lemma: self.lemma,
            root: self.root,
            fuzzy: self.fuzzy,
            ..Self::default()
        }
    }

    pub fn has_filters(&self) -> bool {
        self.sura_id.is_some() || self.juz_id.is_some() || self.sura_name_key().is_some()
    }

    pub(crate) fn sura_name_key(&self) -> Option<String> {
        self.sura_name.as_deref().and_then(canonical_sura_name)
    }
}

/// Canonical form of a sura name: normalized Arabic, or trimmed lowercase
/// for English and romanized names. Blank names are no filter at all.
pub(crate) fn canonical_sura_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    if is_arabic(name) {
        Some(normalize_arabic(name))
    } else {
        Some(name.to_lowercase())
    }
}

/// Requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: usize, limit: usize) -> Self {
        Self { page, limit }.normalized()
    }

    /// Zero page or limit is clamped to 1.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_results: usize,
}

/// Per-strategy tallies over the whole filtered match set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounts {
    pub simple: usize,
    pub lemma: usize,
    pub root: usize,
    pub fuzzy: usize,
    pub total: usize,
}

impl MatchCounts {
    pub fn record(&mut self, match_type: MatchType) {
        match match_type {
            MatchType::Simple => self.simple += 1,
            MatchType::Lemma => self.lemma += 1,
            MatchType::Root => self.root += 1,
            MatchType::Fuzzy => self.fuzzy += 1,
            MatchType::None => return,
        }
        self.total += 1;
    }

    pub fn tally(verses: &[ScoredVerse]) -> Self {
        let mut counts = Self::default();
        for verse in verses {
            counts.record(verse.match_type);
        }
        counts
    }
}

/// A matched verse with its classification, score and highlight tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredVerse {
    #[serde(flatten)]
    pub verse: Verse,
    pub match_type: MatchType,
    pub match_score: u32,
    pub matched_tokens: Vec<String>,
    pub token_types: Vec<MatchType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<ScoredVerse>,
    pub pagination: PaginationInfo,
    pub counts: MatchCounts,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.pagination.total_results == 0
    }
}

/// Search entry point over a corpus with the default [`MatchConfig`].
///
/// With a cache, identical `(query, options, pagination)` tuples return the
/// stored response without recomputation.
pub fn search(
    query: &str,
    corpus: &Corpus,
    options: &SearchOptions,
    pagination: Pagination,
    cache: Option<&SearchCache>,
) -> Arc<SearchResponse> {
    search_with_cache(corpus, &MatchConfig::default(), query, options, pagination, cache)
}

/// Owns the corpus handle and match configuration.
pub struct SearchEngine {
    corpus: Arc<Corpus>,
    config: MatchConfig,
}

impl SearchEngine {
    pub fn new(corpus: Arc<Corpus>) -> Self {
        Self::with_config(corpus, MatchConfig::default())
    }

    pub fn with_config(corpus: Arc<Corpus>, config: MatchConfig) -> Self {
        Self { corpus, config }
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Normalize a query and look up its lemma and root.
    pub fn resolve(&self, query: &str) -> ResolvedQuery {
        resolve_query(query, self.corpus.dictionary())
    }

    pub fn search(&self, query: &str, options: &SearchOptions, pagination: Pagination) -> SearchResponse {
        run_search(&self.corpus, &self.config, query, options, pagination)
    }

    pub fn search_cached(
        &self,
        query: &str,
        options: &SearchOptions,
        pagination: Pagination,
        cache: Option<&SearchCache>,
    ) -> Arc<SearchResponse> {
        search_with_cache(&self.corpus, &self.config, query, options, pagination, cache)
    }

    /// Every matching verse, ranked, before pagination.
    pub fn match_all(&self, query: &str, options: &SearchOptions) -> Vec<ScoredVerse> {
        rank_matches(&self.corpus, &self.config, query, options)
    }
}

fn search_with_cache(
    corpus: &Corpus,
    config: &MatchConfig,
    query: &str,
    options: &SearchOptions,
    pagination: Pagination,
    cache: Option<&SearchCache>,
) -> Arc<SearchResponse> {
    let Some(cache) = cache else {
        return Arc::new(run_search(corpus, config, query, options, pagination));
    };

    let key = SearchKey::new(query, options, pagination, config);
    if let Some(hit) = cache.get(&key) {
        trace!(query, "search cache hit");
        return hit;
    }

    let response = Arc::new(run_search(corpus, config, query, options, pagination));
    cache.set(key, Arc::clone(&response));
    response
}

fn run_search(
    corpus: &Corpus,
    config: &MatchConfig,
    query: &str,
    options: &SearchOptions,
    pagination: Pagination,
) -> SearchResponse {
    let start = Instant::now();

    let ranked = rank_matches(corpus, config, query, options);
    let counts = MatchCounts::tally(&ranked);
    let (results, pagination) = paginate(ranked, pagination);

    debug!(
        query,
        total = counts.total,
        simple = counts.simple,
        lemma = counts.lemma,
        root = counts.root,
        fuzzy = counts.fuzzy,
        elapsed_us = start.elapsed().as_micros() as u64,
        "search complete"
    );

    SearchResponse {
        results,
        pagination,
        counts,
    }
}

/// Classify every admitted verse and sort by score desc, gid asc.
fn rank_matches(
    corpus: &Corpus,
    config: &MatchConfig,
    query: &str,
    options: &SearchOptions,
) -> Vec<ScoredVerse> {
    let resolved = resolve_query(query, corpus.dictionary());
    if resolved.is_empty() {
        return Vec::new();
    }

    let filter = StructuralFilter::new(options);
    let matcher = Matcher::new(&resolved, options, config);

    let mut scored: Vec<ScoredVerse> = corpus
        .entries()
        .filter(|(verse, words)| filter.admits(verse, words))
        .filter_map(|(verse, words)| matcher.classify(words).map(|m| m.into_scored(verse)))
        .collect();

    scored.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| a.verse.gid.cmp(&b.verse.gid))
    });
    scored
}

/// Slice one page out of a ranked list.
///
/// `total_pages` is at least 1; a page past the end yields an empty slice
/// with the metadata still filled in.
pub fn paginate<T>(items: Vec<T>, pagination: Pagination) -> (Vec<T>, PaginationInfo) {
    let Pagination { page, limit } = pagination.normalized();
    let total_results = items.len();
    let total_pages = total_results.div_ceil(limit).max(1);
    let start = (page - 1).saturating_mul(limit);

    let results = if start >= total_results {
        Vec::new()
    } else {
        items.into_iter().skip(start).take(limit).collect()
    };

    (
        results,
        PaginationInfo {
            current_page: page,
            total_pages,
            total_results,
        },
    )
}

/// Start positions of `query` inside `words`, respecting word boundaries.
///
/// A single query word may sit anywhere inside one verse word. A phrase of
/// n words must cover n consecutive verse words: the first query word ends
/// the first verse word, inner words are equal and the last query word
/// starts the last verse word.
pub(crate) fn phrase_occurrences(words: &[String], query: &[&str]) -> Vec<usize> {
    let n = query.len();
    if n == 0 || words.len() < n {
        return Vec::new();
    }

    (0..=words.len() - n)
        .filter(|&start| {
            let window = &words[start..start + n];
            if n == 1 {
                return window[0].contains(query[0]);
            }
            window.iter().zip(query).enumerate().all(|(i, (word, q))| {
                if i == 0 {
                    word.ends_with(q)
                } else if i == n - 1 {
                    word.starts_with(q)
                } else {
                    word == q
                }
            })
        })
        .collect()
}

struct StructuralFilter {
    sura_id: Option<u32>,
    juz_id: Option<u32>,
    sura_name: Option<String>,
}

impl StructuralFilter {
    fn new(options: &SearchOptions) -> Self {
        Self {
            sura_id: options.sura_id,
            juz_id: options.juz_id,
            sura_name: options.sura_name_key(),
        }
    }

    fn admits(&self, verse: &Verse, words: &VerseWords) -> bool {
        if self.sura_id.is_some_and(|id| id != verse.sura_id) {
            return false;
        }
        if self.juz_id.is_some_and(|id| id != verse.juz_id) {
            return false;
        }
        match &self.sura_name {
            Some(name) => {
                *name == words.sura_name_key
                    || *name == verse.sura_name_en.to_lowercase()
                    || *name == verse.sura_name_romanization.to_lowercase()
            }
            None => true,
        }
    }
}

/// Outcome of classifying a single verse.
struct VerseMatch {
    match_type: MatchType,
    score: u32,
    tokens: Vec<(String, MatchType)>,
}

impl VerseMatch {
    fn new(match_type: MatchType, bonus: usize, tokens: Vec<(String, MatchType)>) -> Self {
        let bonus = u32::try_from(bonus).unwrap_or(u32::MAX).min(TIER_SPAN - 1);
        Self {
            match_type,
            score: match_type.tier() * TIER_SPAN + bonus,
            tokens: dedup_tokens(tokens),
        }
    }

    fn into_scored(self, verse: &Verse) -> ScoredVerse {
        let (matched_tokens, token_types) = self.tokens.into_iter().unzip();
        ScoredVerse {
            verse: verse.clone(),
            match_type: self.match_type,
            match_score: self.score,
            matched_tokens,
            token_types,
        }
    }
}

struct Matcher<'a> {
    resolved: &'a ResolvedQuery,
    words: Vec<&'a str>,
    lemma_key: Option<String>,
    root_key: Option<String>,
    fuzzy_budget: Option<usize>,
}

impl<'a> Matcher<'a> {
    fn new(resolved: &'a ResolvedQuery, options: &SearchOptions, config: &MatchConfig) -> Self {
        let query_len = letter_count(&resolved.clean_query);
        Self {
            resolved,
            words: resolved.words(),
            lemma_key: if options.lemma { resolved.lemma_key() } else { None },
            root_key: if options.root { resolved.root_key() } else { None },
            fuzzy_budget: (options.fuzzy && query_len >= config.fuzzy_min_query_len)
                .then(|| config.max_edits(query_len)),
        }
    }

    /// First satisfied strategy wins; later ones are not evaluated.
    fn classify(&self, words: &VerseWords) -> Option<VerseMatch> {
        self.simple(words)
            .or_else(|| self.morphological(words, TokenField::Lemma))
            .or_else(|| self.morphological(words, TokenField::Root))
            .or_else(|| self.fuzzy(words))
    }

    fn simple(&self, words: &VerseWords) -> Option<VerseMatch> {
        let mut hits = phrase_occurrences(&words.standard, &self.words);
        if hits.is_empty() {
            hits = phrase_occurrences(&words.standard_full, &self.words);
        }
        if hits.is_empty() {
            return None;
        }

        let token = (self.resolved.clean_query.clone(), MatchType::Simple);
        Some(VerseMatch::new(MatchType::Simple, hits.len(), vec![token]))
    }

    fn morphological(&self, words: &VerseWords, field: TokenField) -> Option<VerseMatch> {
        let key = match field {
            TokenField::Lemma => self.lemma_key.as_deref()?,
            TokenField::Root => self.root_key.as_deref()?,
            TokenField::Text => return None,
        };

        let positions = words.morphology.positions(field, key);
        if positions.is_empty() {
            return None;
        }

        let match_type = field.match_type();
        let mut tokens = display_tokens(words, &positions, match_type);

        // lemma hits also carry same-root words for mixed highlighting
        if field == TokenField::Lemma {
            if let Some(root_key) = self.root_key.as_deref() {
                let related: Vec<usize> = words
                    .morphology
                    .positions(TokenField::Root, root_key)
                    .into_iter()
                    .filter(|p| !positions.contains(p))
                    .collect();
                tokens.extend(display_tokens(words, &related, MatchType::Root));
            }
        }

        Some(VerseMatch::new(match_type, positions.len(), tokens))
    }

    fn fuzzy(&self, words: &VerseWords) -> Option<VerseMatch> {
        let budget = self.fuzzy_budget?;
        let n = self.words.len();
        if n == 0 || words.standard.len() < n {
            return None;
        }

        let mut best: Option<usize> = None;
        let mut positions = Vec::new();
        for start in 0..=words.standard.len() - n {
            let window = &words.standard[start..start + n];
            if window.iter().any(|w| w.is_empty()) {
                continue;
            }
            let candidate = window.join(" ");
            if let Some(distance) = bounded_distance(&candidate, &self.resolved.clean_query, budget) {
                best = Some(best.map_or(distance, |b| b.min(distance)));
                positions.extend(start..start + n);
            }
        }

        let distance = best?;
        positions.sort_unstable();
        positions.dedup();

        let tokens = display_tokens(words, &positions, MatchType::Fuzzy);
        let bonus = (TIER_SPAN as usize - 1).saturating_sub(distance);
        Some(VerseMatch::new(MatchType::Fuzzy, bonus, tokens))
    }
}

fn display_tokens(
    words: &VerseWords,
    positions: &[usize],
    match_type: MatchType,
) -> Vec<(String, MatchType)> {
    positions
        .iter()
        .filter_map(|&p| words.display.get(p))
        .map(|w| (w.clone(), match_type))
        .collect()
}

/// Keep the first occurrence of each token string.
fn dedup_tokens(tokens: Vec<(String, MatchType)>) -> Vec<(String, MatchType)> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|(token, _)| seen.insert(token.clone()))
        .collect()
}
