//! Arabic text normalization
//!
//! Everything that compares Arabic text goes through this module. Matching
//! uses [`normalize_arabic`] as the canonical key; the highlighter uses
//! [`letter_class`] and [`is_combining_mark`] to walk the diacritized
//! display text without normalizing it.

use unicode_normalization::UnicodeNormalization;

const ALEF: char = '\u{0627}';
const ALEF_WASLA: char = '\u{0671}';
const DAGGER_ALIF: char = '\u{0670}';
const TATWEEL: char = '\u{0640}';
const HAMZA: char = '\u{0621}';
const YA: char = '\u{064A}';
const HA: char = '\u{0647}';
const WAW: char = '\u{0648}';
const HAMZA_ABOVE: char = '\u{0654}';
const SMALL_WAW: char = '\u{06E5}';
const SMALL_HIGH_YEH: char = '\u{06E7}';

/// Tashkeel and Quranic annotation marks.
fn is_tashkeel(c: char) -> bool {
    matches!(
        c,
        '\u{064B}'..='\u{065F}'
            | '\u{0670}'
            | '\u{06D6}'..='\u{06DC}'
            | '\u{06DF}'..='\u{06E8}'
            | '\u{06EA}'..='\u{06FC}'
    )
}

/// Core Arabic letters (hamza through ya).
fn is_core_letter(c: char) -> bool {
    ('\u{0621}'..='\u{064A}').contains(&c)
}

/// Remove Tashkeel and Quranic marks. Wasl alef becomes a plain alef.
pub fn remove_tashkeel(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            ALEF_WASLA => Some(ALEF),
            c if is_tashkeel(c) => None,
            _ => Some(c),
        })
        .collect()
}

/// Canonical search key for Arabic text.
///
/// Strips diacritics, dagger alif and tatweel, folds alef, hamza and
/// alif-maqsura variants, and drops anything that is not a core Arabic
/// letter, a space or a hyphen. Whitespace runs collapse to one space and the
/// result is trimmed. The transform is lossy and idempotent.
pub fn normalize_arabic(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let composed: String = remove_tashkeel(text).nfc().collect();
    let mut out = String::with_capacity(composed.len());
    let mut pending_space = false;

    for c in composed.chars() {
        let folded = match c {
            DAGGER_ALIF | TATWEEL => continue,
            'إ' | 'أ' | 'آ' | ALEF_WASLA => ALEF,
            'ؤ' | 'ئ' => HAMZA,
            'ى' => YA,
            other => other,
        };

        if folded.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !is_core_letter(folded) && folded != '-' {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(folded);
    }

    out
}

/// Does the text contain any Arabic-script codepoint?
pub fn is_arabic(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(
            c,
            '\u{0600}'..='\u{06FF}'
                | '\u{0750}'..='\u{077F}'
                | '\u{08A0}'..='\u{08FF}'
                | '\u{FB50}'..='\u{FDFF}'
                | '\u{FE70}'..='\u{FEFF}'
        )
    })
}

/// Equivalence class of a letter for diacritic-tolerant matching.
///
/// Alef variants (including wasl and dagger alif), ya/alif-maqsura,
/// ta-marbuta/ha and the hamza carriers each collapse to one representative.
/// Uthmani marks that stand in for a letter (U+06E7, U+06E5 and a hamza
/// above a tatweel seat) join that letter's class.
pub fn letter_class(c: char) -> char {
    match c {
        'ا' | 'أ' | 'إ' | 'آ' | ALEF_WASLA | DAGGER_ALIF | HAMZA_ABOVE => ALEF,
        'ي' | 'ى' | SMALL_HIGH_YEH => YA,
        'و' | SMALL_WAW => WAW,
        'ه' | 'ة' => HA,
        'ء' | 'ؤ' | 'ئ' => HAMZA,
        other => other,
    }
}

/// Marks that may sit between two letters of the display text: Tashkeel,
/// dagger alif, Quranic annotation marks and tatweel.
pub fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{06D6}'..='\u{06ED}' | '\u{0640}'
    )
}

/// Comparison key for lemma and root strings.
///
/// Roots appear as `ا ل ه`, `ا-ل-ه` or `اله` depending on the source, so
/// separators are dropped after normalization.
pub fn morphology_key(value: &str) -> String {
    normalize_arabic(value)
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect()
}

/// Number of letters in a normalized string, ignoring separators.
pub(crate) fn letter_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace() && *c != '-').count()
}
