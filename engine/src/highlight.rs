//! Highlight token extraction and diacritic-tolerant range computation

use crate::corpus::{Verse, VerseMorphology};
use crate::morphology::AlignedMorphology;
use crate::normalize::{is_combining_mark, letter_class, morphology_key, normalize_arabic};
use crate::search::phrase_occurrences;
use crate::tokens::{MatchType, TokenField};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A span of the display text to highlight.
///
/// `start` and `end` are UTF-8 byte offsets that always fall on char
/// boundaries, so `&text[start..end]` is the highlighted substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRange {
    pub start: usize,
    pub end: usize,
    pub match_type: MatchType,
}

/// Literal tokens to highlight in a verse for the given mode.
///
/// Text mode yields the normalized query when it occurs in the verse. Lemma
/// and root modes yield the original-script words at the positions where the
/// aligned morphology equals `lemma` or `root`.
pub fn get_positive_tokens(
    verse: &Verse,
    mode: TokenField,
    lemma: Option<&str>,
    root: Option<&str>,
    query: &str,
    morphology: &HashMap<u32, VerseMorphology>,
) -> Vec<String> {
    match mode {
        TokenField::Text => {
            let clean_query = normalize_arabic(query);
            let query_words: Vec<&str> = clean_query.split(' ').filter(|w| !w.is_empty()).collect();
            if query_words.is_empty() {
                return Vec::new();
            }

            let occurs = [&verse.standard, &verse.standard_full].iter().any(|text| {
                let words: Vec<String> = text.split_whitespace().map(normalize_arabic).collect();
                !phrase_occurrences(&words, &query_words).is_empty()
            });
            if occurs {
                vec![clean_query]
            } else {
                Vec::new()
            }
        }
        TokenField::Lemma | TokenField::Root => {
            let value = if mode == TokenField::Lemma { lemma } else { root };
            let Some(key) = value.map(morphology_key).filter(|k| !k.is_empty()) else {
                return Vec::new();
            };

            let aligned = AlignedMorphology::build(
                morphology.get(&verse.gid),
                verse.standard_words().len(),
            );
            let display = verse.display_words();

            let mut tokens: Vec<String> = Vec::new();
            for position in aligned.positions(mode, &key) {
                if let Some(word) = display.get(position) {
                    if !tokens.iter().any(|t| t.as_str() == *word) {
                        tokens.push(word.to_string());
                    }
                }
            }
            tokens
        }
    }
}

/// One element of a compiled token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Letter(char),
    /// Word separator: one or more spaces, with stray marks in between.
    Gap,
}

/// Strip the token's own diacritics and reduce letters to their class.
fn compile(token: &str) -> Vec<Unit> {
    let mut units = Vec::new();
    for c in token.chars() {
        if c.is_whitespace() {
            if matches!(units.last(), Some(Unit::Letter(_))) {
                units.push(Unit::Gap);
            }
        } else if !is_combining_mark(c) {
            units.push(Unit::Letter(letter_class(c)));
        }
    }
    if units.last() == Some(&Unit::Gap) {
        units.pop();
    }
    units
}

/// Match `pattern[pi..]` against `text[ti..]`; returns the char index just
/// past the match.
///
/// Marks between letters are consumed lazily: a letter match is tried
/// first, and a mark is skipped only when that fails. Nothing is skipped
/// before the first letter.
fn match_from(text: &[char], ti: usize, pattern: &[Unit], pi: usize) -> Option<usize> {
    if pi == pattern.len() {
        return Some(ti);
    }
    let c = *text.get(ti)?;

    match pattern[pi] {
        Unit::Letter(class) => {
            if letter_class(c) == class {
                if let Some(end) = match_from(text, ti + 1, pattern, pi + 1) {
                    return Some(end);
                }
            }
            if pi > 0 && is_combining_mark(c) {
                return match_from(text, ti + 1, pattern, pi);
            }
            None
        }
        Unit::Gap => {
            if c.is_whitespace() {
                let mut next = ti + 1;
                while next < text.len() && (text[next].is_whitespace() || is_combining_mark(text[next])) {
                    next += 1;
                }
                return match_from(text, next, pattern, pi + 1);
            }
            if is_combining_mark(c) {
                return match_from(text, ti + 1, pattern, pi);
            }
            None
        }
    }
}

/// Non-overlapping spans of `text` matching the tokens, sorted by start.
///
/// Tokens are tried longest first so a short token cannot split a longer
/// one's span; a span already claimed is never claimed again. `token_types`
/// runs parallel to `tokens`; a missing entry defaults to `simple`.
pub fn get_highlight_ranges(
    text: &str,
    tokens: &[String],
    token_types: Option<&[MatchType]>,
) -> Vec<HighlightRange> {
    let chars: Vec<char> = text.chars().collect();
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    let compiled: Vec<Vec<Unit>> = tokens.iter().map(|t| compile(t)).collect();
    let mut order: Vec<usize> = (0..tokens.len()).collect();
    order.sort_by(|&a, &b| compiled[b].len().cmp(&compiled[a].len()));

    let mut claimed: Vec<(usize, usize)> = Vec::new();
    let mut ranges = Vec::new();

    for idx in order {
        let pattern = &compiled[idx];
        if pattern.is_empty() {
            continue;
        }
        let match_type = token_types
            .and_then(|types| types.get(idx).copied())
            .unwrap_or(MatchType::Simple);

        let mut pos = 0;
        while pos < chars.len() {
            let Some(mut end) = match_from(&chars, pos, pattern, 0) else {
                pos += 1;
                continue;
            };
            // keep the last letter's own diacritics with it
            while end < chars.len() && is_combining_mark(chars[end]) {
                end += 1;
            }

            if claimed.iter().any(|&(s, e)| pos < e && s < end) {
                pos += 1;
                continue;
            }
            claimed.push((pos, end));
            ranges.push(HighlightRange {
                start: offsets[pos],
                end: offsets[end],
                match_type,
            });
            pos = end;
        }
    }

    ranges.sort_by_key(|r| r.start);
    ranges
}

/// Rebuild `text` with every range passed through `render`.
pub fn apply_highlights<F>(text: &str, ranges: &[HighlightRange], mut render: F) -> String
where
    F: FnMut(&str, MatchType) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for range in ranges {
        if range.start < cursor || range.end > text.len() {
            continue;
        }
        out.push_str(&text[cursor..range.start]);
        out.push_str(&render(&text[range.start..range.end], range.match_type));
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}
