//! Explains an empty result set by re-running the search with relaxed filters

use crate::search::{Pagination, SearchEngine, SearchOptions};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Why a filtered search came back empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConflictReport {
    /// The named sura exists under a different number.
    SuraIdMismatch {
        sura_name: String,
        actual_sura_id: u32,
        actual_juz_id: u32,
    },
    /// The sura has matches, but in another juz.
    JuzMismatch {
        sura_label: String,
        actual_juz_id: u32,
    },
    /// Matches exist only outside the active filters.
    OutsideFilters,
    NoResults,
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReport::SuraIdMismatch {
                sura_name,
                actual_sura_id,
                actual_juz_id,
            } => write!(
                f,
                "سورة {} هي رقم {} في الجزء {}. يرجى تعديل الرقم أو ترك الحقل فارغ.",
                sura_name, actual_sura_id, actual_juz_id
            ),
            ConflictReport::JuzMismatch {
                sura_label,
                actual_juz_id,
            } => write!(
                f,
                "سورة {} موجودة في الجزء {}. يرجى تعديل رقم الجزء.",
                sura_label, actual_juz_id
            ),
            ConflictReport::OutsideFilters => f.write_str(
                "لا توجد نتائج ضمن الفلاتر الحالية، لكن توجد نتائج في أماكن أخرى من القرآن.",
            ),
            ConflictReport::NoResults => f.write_str("لا توجد نتائج مطلقًا."),
        }
    }
}

/// Diagnose why `query` returned nothing under `options`.
///
/// Probes run in order and each returns only when it finds a mismatch:
/// sura name against sura id, then sura against juz, then all filters
/// removed. Strategy flags are kept in every probe.
pub fn diagnose(engine: &SearchEngine, query: &str, options: &SearchOptions) -> ConflictReport {
    let probe = Pagination::new(1, 1);
    let sura_name = options
        .sura_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    if let (Some(name), Some(sura_id)) = (sura_name, options.sura_id) {
        let relaxed = SearchOptions {
            sura_id: None,
            juz_id: None,
            ..options.clone()
        };
        let response = engine.search(query, &relaxed, probe);
        if let Some(hit) = response.results.first() {
            if hit.verse.sura_id != sura_id {
                debug!(query, name, sura_id, actual = hit.verse.sura_id, "sura id conflict");
                return ConflictReport::SuraIdMismatch {
                    sura_name: name.to_string(),
                    actual_sura_id: hit.verse.sura_id,
                    actual_juz_id: hit.verse.juz_id,
                };
            }
        }
    }

    if let Some(juz_id) = options.juz_id {
        if options.sura_id.is_some() || sura_name.is_some() {
            let relaxed = SearchOptions {
                juz_id: None,
                ..options.clone()
            };
            let response = engine.search(query, &relaxed, probe);
            if let Some(hit) = response.results.first() {
                if hit.verse.juz_id != juz_id {
                    let sura_label = match (sura_name, options.sura_id) {
                        (Some(name), _) => name.to_string(),
                        (None, Some(id)) => format!("رقم {}", id),
                        (None, None) => hit.verse.sura_name.clone(),
                    };
                    debug!(query, juz_id, actual = hit.verse.juz_id, "juz conflict");
                    return ConflictReport::JuzMismatch {
                        sura_label,
                        actual_juz_id: hit.verse.juz_id,
                    };
                }
            }
        }
    }

    let unfiltered = engine.search(query, &options.without_filters(), probe);
    if unfiltered.is_empty() {
        ConflictReport::NoResults
    } else {
        ConflictReport::OutsideFilters
    }
}
