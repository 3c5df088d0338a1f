//! Bundled word pools used when no generator is available

use rand::Rng;

use crate::types::{Language, SecretData};

const EN_POOL: &[(&str, &str)] = &[
    ("Lighthouse", "Places"),
    ("Hospital", "Places"),
    ("Airport", "Places"),
    ("Library", "Places"),
    ("Beach", "Places"),
    ("Cinema", "Places"),
    ("Toothbrush", "Household Items"),
    ("Umbrella", "Household Items"),
    ("Refrigerator", "Household Items"),
    ("Pillow", "Household Items"),
    ("Bicycle", "Transport"),
    ("Helicopter", "Transport"),
    ("Train", "Transport"),
    ("Elephant", "Animals"),
    ("Penguin", "Animals"),
    ("Giraffe", "Animals"),
    ("Pancake", "Food"),
    ("Banana", "Food"),
    ("Popcorn", "Food"),
    ("Volcano", "Nature"),
    ("Rainbow", "Nature"),
    ("Firefighter", "Jobs"),
    ("Dentist", "Jobs"),
    ("Guitar", "Music"),
    ("Birthday Party", "Events"),
];

const CS_POOL: &[(&str, &str)] = &[
    ("Maják", "Místa"),
    ("Nemocnice", "Místa"),
    ("Letiště", "Místa"),
    ("Knihovna", "Místa"),
    ("Pláž", "Místa"),
    ("Kino", "Místa"),
    ("Kartáček na zuby", "Domácnost"),
    ("Deštník", "Domácnost"),
    ("Lednice", "Domácnost"),
    ("Polštář", "Domácnost"),
    ("Kolo", "Doprava"),
    ("Vrtulník", "Doprava"),
    ("Vlak", "Doprava"),
    ("Slon", "Zvířata"),
    ("Tučňák", "Zvířata"),
    ("Žirafa", "Zvířata"),
    ("Palačinka", "Jídlo"),
    ("Banán", "Jídlo"),
    ("Svíčková", "Jídlo"),
    ("Sopka", "Příroda"),
    ("Duha", "Příroda"),
    ("Hasič", "Povolání"),
    ("Zubař", "Povolání"),
    ("Kytara", "Hudba"),
    ("Narozeninová oslava", "Události"),
];

fn raw_pool(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::En => EN_POOL,
        Language::Cs => CS_POOL,
    }
}

/// Every bundled secret for a language
pub fn fallback_pool(language: Language) -> Vec<SecretData> {
    raw_pool(language)
        .iter()
        .map(|(word, category)| SecretData::new(*word, *category))
        .collect()
}

/// Pick a bundled secret uniformly at random, preferring words not in `recent_words`.
/// When every word has been used recently, the whole pool is eligible again.
pub fn pick_fallback<R: Rng + ?Sized>(
    language: Language,
    recent_words: &[String],
    rng: &mut R,
) -> SecretData {
    let pool = raw_pool(language);
    let fresh: Vec<_> = pool
        .iter()
        .filter(|(word, _)| !recent_words.iter().any(|w| w.as_str() == *word))
        .collect();

    let (word, category) = if fresh.is_empty() {
        pool[rng.random_range(0..pool.len())]
    } else {
        *fresh[rng.random_range(0..fresh.len())]
    };

    SecretData::new(word, category)
}
