//! Portuguese inflection tables

/// Irregular forms that suffix generation cannot reach
pub(super) const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("sigo", "seguir"),
    ("siga", "seguir"),
    ("sigas", "seguir"),
    ("sigam", "seguir"),
    ("é", "ser"),
    ("sou", "ser"),
    ("são", "ser"),
    ("foi", "ser"),
    ("fui", "ser"),
    ("está", "estar"),
    ("estou", "estar"),
    ("estão", "estar"),
    ("tenho", "ter"),
    ("tem", "ter"),
    ("têm", "ter"),
    ("tive", "ter"),
    ("posso", "poder"),
    ("pode", "poder"),
    ("pude", "poder"),
    ("quero", "querer"),
    ("quis", "querer"),
    ("fiz", "fazer"),
    ("faço", "fazer"),
    ("vou", "ir"),
    ("vai", "ir"),
    ("vamos", "ir"),
];

#[derive(Clone, Copy, PartialEq)]
enum Conjugation {
    Ar,
    Er,
    Ir,
}

const AR_ENDINGS: &[&str] = &[
    "o", "as", "a", "amos", "am", "ei", "aste", "ou", "aram", "ava", "avas", "ávamos", "avam",
    "e", "es", "emos", "em", "ando", "ado", "ada", "ados", "adas", "arei", "ará", "aremos",
    "arão", "aria", "ariam", "ares", "arem",
];

const ER_ENDINGS: &[&str] = &[
    "o", "es", "e", "emos", "em", "i", "este", "eu", "eram", "ia", "ias", "íamos", "iam", "a",
    "as", "amos", "am", "endo", "ido", "ida", "idos", "idas", "erei", "erá", "eremos", "erão",
    "eria", "eriam", "erem",
];

const IR_ENDINGS: &[&str] = &[
    "o", "es", "e", "imos", "em", "i", "iste", "iu", "iram", "ia", "ias", "íamos", "iam", "a",
    "as", "amos", "am", "indo", "ido", "ida", "idos", "idas", "irei", "irá", "iremos", "irão",
    "iria", "iriam", "irem",
];

/// Hiatus forms of -uir verbs (concluir -> concluí, concluído)
const UIR_ENDINGS: &[&str] = &["í", "ís", "ído", "ída", "ídos", "ídas", "ímos"];

/// Plural and feminine reductions, tried in order
const NOMINAL_RULES: &[(&str, &str)] = &[
    ("ões", "ão"),
    ("ães", "ão"),
    ("ãos", "ão"),
    ("ais", "al"),
    ("éis", "el"),
    ("óis", "ol"),
    ("ns", "m"),
    ("res", "r"),
    ("zes", "z"),
    ("ses", "s"),
    ("as", "o"),
    ("a", "o"),
    ("s", ""),
];

/// Every generated inflected form of an infinitive (empty for non-verbs)
pub(super) fn verb_forms(infinitive: &str) -> Vec<String> {
    let (stem, conjugation) = match split_infinitive(infinitive) {
        Some(split) => split,
        None => return Vec::new(),
    };

    let endings = match conjugation {
        Conjugation::Ar => AR_ENDINGS,
        Conjugation::Er => ER_ENDINGS,
        Conjugation::Ir => IR_ENDINGS,
    };

    let mut forms: Vec<String> = endings
        .iter()
        .map(|ending| join(stem, ending, conjugation))
        .collect();

    if conjugation == Conjugation::Ir && stem.ends_with('u') {
        forms.extend(UIR_ENDINGS.iter().map(|ending| format!("{}{}", stem, ending)));
    }

    forms
}

/// Candidate lemmas for a nominal form, most specific rule first
pub(super) fn nominal_candidates(word: &str) -> Vec<String> {
    NOMINAL_RULES
        .iter()
        .filter_map(|(suffix, replacement)| {
            word.strip_suffix(suffix)
                .filter(|base| !base.is_empty())
                .map(|base| format!("{}{}", base, replacement))
        })
        .collect()
}

fn split_infinitive(word: &str) -> Option<(&str, Conjugation)> {
    if word.chars().count() < 4 {
        return None;
    }
    if let Some(stem) = word.strip_suffix("ar") {
        return Some((stem, Conjugation::Ar));
    }
    if let Some(stem) = word.strip_suffix("er") {
        return Some((stem, Conjugation::Er));
    }
    word.strip_suffix("ir").map(|stem| (stem, Conjugation::Ir))
}

/// Attach an ending, applying the spelling changes that keep the stem's sound
fn join(stem: &str, ending: &str, conjugation: Conjugation) -> String {
    let front_vowel = ending.starts_with('e') || ending.starts_with('é');
    let back_vowel = ending.starts_with('o') || ending.starts_with('a');

    let adjusted = match conjugation {
        Conjugation::Ar if front_vowel => replace_last(stem, &[("c", "qu"), ("g", "gu"), ("ç", "c")]),
        Conjugation::Er | Conjugation::Ir if back_vowel => {
            replace_last(stem, &[("gu", "g"), ("c", "ç"), ("g", "j")])
        }
        _ => None,
    };

    format!("{}{}", adjusted.as_deref().unwrap_or(stem), ending)
}

fn replace_last(stem: &str, swaps: &[(&str, &str)]) -> Option<String> {
    swaps.iter().find_map(|(from, to)| {
        stem.strip_suffix(from)
            .map(|base| format!("{}{}", base, to))
    })
}
