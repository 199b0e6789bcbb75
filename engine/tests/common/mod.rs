//! Small fixture corpus shared by the integration tests.

#![allow(dead_code)]

use quran_search::{Corpus, SearchEngine, Verse, VerseMorphology, WordEntry};
use std::collections::HashMap;
use std::sync::Arc;

struct Sura {
    id: u32,
    name: &'static str,
    name_en: &'static str,
    romanization: &'static str,
}

const FATIHA: Sura = Sura { id: 1, name: "الفاتحة", name_en: "The Opening", romanization: "Al-Fatihah" };
const BAQARA: Sura = Sura { id: 2, name: "البقرة", name_en: "The Cow", romanization: "Al-Baqarah" };
const NAS: Sura = Sura { id: 114, name: "الناس", name_en: "Mankind", romanization: "An-Nas" };

fn verse(gid: u32, sura: &Sura, aya: u32, juz: u32, uthmani: &str, standard: &str) -> Verse {
    Verse {
        gid,
        uthmani: uthmani.to_string(),
        standard: standard.to_string(),
        standard_full: standard.to_string(),
        sura_id: sura.id,
        aya_id: aya,
        aya_id_display: aya.to_string(),
        juz_id: juz,
        page_id: 1,
        sura_name: sura.name.to_string(),
        sura_name_en: sura.name_en.to_string(),
        sura_name_romanization: sura.romanization.to_string(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn morph(gid: u32, lemmas: &[&str], roots: &[&str]) -> (u32, VerseMorphology) {
    (
        gid,
        VerseMorphology {
            gid,
            lemmas: strings(lemmas),
            roots: strings(roots),
        },
    )
}

pub fn verses() -> Vec<Verse> {
    vec![
        verse(1, &FATIHA, 1, 1, "بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ", "بسم الله الرحمن الرحيم"),
        verse(2, &FATIHA, 2, 1, "ٱلْحَمْدُ لِلَّهِ رَبِّ ٱلْعَٰلَمِينَ", "الحمد لله رب العالمين"),
        verse(3, &FATIHA, 3, 1, "ٱلرَّحْمَٰنِ ٱلرَّحِيمِ", "الرحمن الرحيم"),
        verse(
            8,
            &BAQARA,
            2,
            1,
            "ذَٰلِكَ ٱلْكِتَٰبُ لَا رَيْبَ ۛ فِيهِ ۛ هُدًى لِّلْمُتَّقِينَ",
            "ذلك الكتاب لا ريب فيه هدى للمتقين",
        ),
        verse(289, &BAQARA, 282, 3, "وَلْيَكْتُب بَّيْنَكُمْ كَاتِبٌۢ بِٱلْعَدْلِ", "وليكتب بينكم كاتب بالعدل"),
        verse(6236, &NAS, 1, 30, "قُلْ أَعُوذُ بِرَبِّ ٱلنَّاسِ", "قل أعوذ برب الناس"),
        verse(6237, &NAS, 2, 30, "مَلِكِ ٱلنَّاسِ", "ملك الناس"),
        verse(6238, &NAS, 3, 30, "إِلَٰهِ ٱلنَّاسِ", "إله الناس"),
    ]
}

pub fn morphology() -> HashMap<u32, VerseMorphology> {
    HashMap::from([
        morph(1, &["اسم", "الله", "رحمن", "رحيم"], &["س م و", "ا ل ه", "ر ح م", "ر ح م"]),
        morph(2, &["حمد", "الله", "رب", "عالمين"], &["ح م د", "ا ل ه", "ر ب ب", "ع ل م"]),
        morph(3, &["رحمن", "رحيم"], &["ر ح م", "ر ح م"]),
        morph(
            8,
            &["ذلك", "كتاب", "لا", "ريب", "في", "هدى", "متقين"],
            &["", "ك ت ب", "", "ر ي ب", "", "ه د ي", "و ق ي"],
        ),
        morph(289, &["كتب", "بين", "كاتب", "عدل"], &["ك ت ب", "ب ي ن", "ك ت ب", "ع د ل"]),
        morph(6236, &["قال", "عاذ", "رب", "ناس"], &["ق و ل", "ع و ذ", "ر ب ب", "ن و س"]),
        morph(6237, &["ملك", "ناس"], &["م ل ك", "ن و س"]),
        // one entry for a two-word verse
        morph(6238, &["إله"], &["ا ل ه"]),
    ])
}

fn entry(lemma: &str, root: &str) -> WordEntry {
    WordEntry {
        lemma: Some(lemma.to_string()),
        root: Some(root.to_string()),
    }
}

pub fn dictionary() -> HashMap<String, WordEntry> {
    HashMap::from([
        ("الله".to_string(), entry("الله", "ا ل ه")),
        ("كتب".to_string(), entry("كتب", "ك ت ب")),
        ("الكتاب".to_string(), entry("كتاب", "ك-ت-ب")),
        ("الرحمن".to_string(), entry("رحمن", "ر ح م")),
        ("الرحمان".to_string(), entry("رحمن", "ر-ح-م")),
        ("ناس".to_string(), entry("ناس", "ن و س")),
        ("إله".to_string(), entry("إله", "ا ل ه")),
    ])
}

pub fn corpus() -> Corpus {
    Corpus::new(verses(), morphology(), dictionary()).unwrap()
}

pub fn engine() -> SearchEngine {
    SearchEngine::new(Arc::new(corpus()))
}
