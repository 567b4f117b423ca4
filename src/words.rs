//! Word bank and random word selection
//!
//! The bank is a list of categories, each with its words. Selection is
//! uniform and with replacement: the same word can come up twice in a row.

use crate::random::RandomSource;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "animals",
        &[
            "elephant", "penguin", "giraffe", "octopus", "kangaroo", "dolphin", "owl",
            "crocodile", "hedgehog", "flamingo",
        ],
    ),
    (
        "food",
        &[
            "pizza", "sushi", "pancake", "lasagna", "taco", "croissant", "popcorn", "curry",
            "dumpling", "omelette",
        ],
    ),
    (
        "places",
        &[
            "beach", "library", "airport", "hospital", "museum", "supermarket", "castle",
            "stadium", "volcano", "submarine",
        ],
    ),
    (
        "objects",
        &[
            "umbrella", "toothbrush", "guitar", "lighthouse", "backpack", "telescope",
            "scissors", "candle", "hammock", "compass",
        ],
    ),
    (
        "jobs",
        &[
            "firefighter", "astronaut", "chef", "detective", "pilot", "dentist", "farmer",
            "magician", "lifeguard", "plumber",
        ],
    ),
];

#[derive(Debug, thiserror::Error)]
pub enum WordBankError {
    #[error("Failed to read word list: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid word list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Word list contains no words")]
    Empty,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct WordBank {
    categories: BTreeMap<String, Vec<String>>,
}

impl Default for WordBank {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WordBank {
    pub fn builtin() -> Self {
        let categories = BUILTIN
            .iter()
            .map(|(name, words)| {
                (
                    name.to_string(),
                    words.iter().map(|w| w.to_string()).collect(),
                )
            })
            .collect();
        Self { categories }
    }

    /// Load a bank from JSON shaped like `{"category": ["word", ...]}`
    pub fn from_json(json: &str) -> Result<Self, WordBankError> {
        let mut bank: WordBank = serde_json::from_str(json)?;
        for words in bank.categories.values_mut() {
            words.retain(|w| !w.trim().is_empty());
        }
        bank.categories.retain(|_, words| !words.is_empty());
        if bank.categories.is_empty() {
            return Err(WordBankError::Empty);
        }
        Ok(bank)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WordBankError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Uniform pick over every word in every category
    pub fn random_word(&self, rng: &mut dyn RandomSource) -> Option<String> {
        let total = self.len();
        if total == 0 {
            return None;
        }
        let mut index = rng.index(total);
        for words in self.categories.values() {
            if index < words.len() {
                return Some(words[index].clone());
            }
            index -= words.len();
        }
        None
    }

    /// Uniform pick within `category`, falling back to the whole bank when
    /// the category is unknown or empty
    pub fn random_word_in(&self, category: Option<&str>, rng: &mut dyn RandomSource) -> Option<String> {
        match category.and_then(|c| self.categories.get(c)) {
            Some(words) if !words.is_empty() => Some(words[rng.index(words.len())].clone()),
            _ => {
                tracing::debug!("Category {:?} unavailable, picking from all words", category);
                self.random_word(rng)
            }
        }
    }
}
