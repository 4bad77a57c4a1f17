// ============================================
// src/catalog.rs
// Word categories, definitions and load-time validation
// ============================================

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Difficulty;

/// A round always shows this many options, so a category needs at least this many words.
pub const MIN_WORDS: usize = 4;

/// Placeholder grey used when a category file carries no tint.
const DEFAULT_TINT: [u8; 3] = [200, 200, 200];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("category has an empty name")]
    EmptyName,
    #[error("category `{0}` is defined more than once")]
    DuplicateCategory(String),
    #[error("category `{category}` lists `{word}` more than once")]
    DuplicateWord { category: String, word: String },
    #[error("category `{category}` has no definition for `{word}`")]
    MissingDefinition { category: String, word: String },
    #[error("category `{category}` needs at least 4 distinct words, found {found}")]
    InsufficientWords { category: String, found: usize },
    #[error("cannot read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no playable category left after validation")]
    Empty,
}

// --------------------------------------------------
// Built-in content
// --------------------------------------------------

/// Static form of a category, compiled into the binary.
pub struct BuiltinCategory {
    pub name: &'static str,
    pub tint: [u8; 3],
    /// (word, definition) in display order
    pub entries: &'static [(&'static str, &'static str)],
}

pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        name: "Animals",
        tint: [200, 150, 100],
        entries: &[
            ("cat", "A small domesticated carnivorous mammal with soft fur."),
            ("dog", "A domesticated carnivorous mammal that typically has a long snout."),
            ("lion", "A large, powerful cat that lives in parts of Africa and India."),
            ("fish", "A limbless cold-blooded vertebrate animal with gills and fins."),
            ("bird", "A warm-blooded egg-laying vertebrate with feathers and wings."),
            ("elephant", "A very large plant-eating mammal with a prehensile trunk."),
            ("monkey", "A primate, often with a long tail, typically living in trees."),
        ],
    },
    BuiltinCategory {
        name: "Fruits",
        tint: [255, 200, 150],
        entries: &[
            ("apple", "A round fruit with red, green, or yellow skin and crisp flesh."),
            ("banana", "A long curved fruit with a yellow skin and soft sweet flesh."),
            ("orange", "A round juicy citrus fruit with a tough bright reddish-yellow rind."),
            ("grape", "A small round fruit that grows in clusters on a vine."),
            ("mango", "A tropical fruit with smooth yellow or red skin and sweet yellow flesh."),
            ("strawberry", "A sweet soft red fruit with a seed-studded surface."),
        ],
    },
    BuiltinCategory {
        name: "Colors",
        tint: [200, 200, 255],
        entries: &[
            ("red", "The color of blood, rubies, or strawberries."),
            ("blue", "The color of the sky or the sea on a sunny day."),
            ("green", "The color of grass, leaves, or emeralds."),
            ("yellow", "The color of lemons, butter, or ripe corn."),
            ("purple", "A color intermediate between red and blue."),
            ("pink", "A pale red color, named after the flower of the same name."),
        ],
    },
    BuiltinCategory {
        name: "Shapes",
        tint: [200, 255, 200],
        entries: &[
            ("circle", "A round plane figure whose boundary consists of points equidistant from the center."),
            ("square", "A plane figure with four equal straight sides and four right angles."),
            ("triangle", "A plane figure with three straight sides and three angles."),
            ("star", "A shape that represents a star, typically having five or more points."),
            ("heart", "A shape representing the human heart, often symbolizing love."),
            ("rectangle", "A plane figure with four straight sides and four right angles."),
        ],
    },
];

// --------------------------------------------------
// Unvalidated definitions (built-in or JSON file)
// --------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub words: Vec<String>,
    #[serde(default)]
    pub definitions: HashMap<String, String>,
    #[serde(default)]
    pub tint: Option<[u8; 3]>,
}

impl From<&BuiltinCategory> for CategoryDef {
    fn from(builtin: &BuiltinCategory) -> Self {
        Self {
            name: builtin.name.to_string(),
            words: builtin.entries.iter().map(|(w, _)| w.to_string()).collect(),
            definitions: builtin
                .entries
                .iter()
                .map(|(w, d)| (w.to_string(), d.to_string()))
                .collect(),
            tint: Some(builtin.tint),
        }
    }
}

/// Reads a JSON array of category definitions.
pub fn read_definitions(path: &Path) -> Result<Vec<CategoryDef>, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// --------------------------------------------------
// Validated catalog
// --------------------------------------------------

#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    words: Vec<String>,
    definitions: HashMap<String, String>,
    tint: [u8; 3],
}

impl Category {
    fn validate(def: CategoryDef) -> Result<Self, CatalogError> {
        let name = def.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }

        let mut seen = HashSet::new();
        for word in &def.words {
            if !seen.insert(word.as_str()) {
                return Err(CatalogError::DuplicateWord {
                    category: name,
                    word: word.clone(),
                });
            }
            if !def.definitions.contains_key(word) {
                return Err(CatalogError::MissingDefinition {
                    category: name,
                    word: word.clone(),
                });
            }
        }
        if def.words.len() < MIN_WORDS {
            return Err(CatalogError::InsufficientWords {
                category: name,
                found: def.words.len(),
            });
        }

        // Definitions for words that are not in the list are never shown.
        let definitions = def
            .definitions
            .into_iter()
            .filter(|(word, _)| seen.contains(word.as_str()))
            .collect();

        Ok(Self {
            name,
            words: def.words,
            definitions,
            tint: def.tint.unwrap_or(DEFAULT_TINT),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn definition(&self, word: &str) -> Option<&str> {
        self.definitions.get(word).map(String::as_str)
    }

    pub fn tint(&self) -> [u8; 3] {
        self.tint
    }

    /// The category tint shifted by up to 30 per channel, stable for each word.
    pub fn word_tint(&self, word: &str) -> [u8; 3] {
        // FNV-1a
        let hash = word
            .bytes()
            .fold(0x811c_9dc5_u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193));
        let mut tint = self.tint;
        for (i, channel) in tint.iter_mut().enumerate() {
            let offset = ((hash >> (i * 8)) % 61) as i32 - 30;
            *channel = (*channel as i32 + offset).clamp(0, 255) as u8;
        }
        tint
    }

    /// Words a round may draw from at the given difficulty.
    ///
    /// Easy keeps the shortest `max(4, ceil(n / 2))` words (ties keep catalog
    /// order); the other levels use the whole list. Returned in catalog order.
    pub fn pool(&self, difficulty: Difficulty) -> Vec<&str> {
        if difficulty != Difficulty::Easy {
            return self.words.iter().map(String::as_str).collect();
        }

        let keep = MIN_WORDS.max(self.words.len().div_ceil(2)).min(self.words.len());
        let mut by_length: Vec<usize> = (0..self.words.len()).collect();
        by_length.sort_by_key(|&i| (self.words[i].chars().count(), i));
        let mut kept = by_length[..keep].to_vec();
        kept.sort_unstable();
        kept.into_iter().map(|i| self.words[i].as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Validates every definition; invalid categories are left out and reported.
    pub fn load(defs: Vec<CategoryDef>) -> (Self, Vec<CatalogError>) {
        let mut categories: Vec<Category> = Vec::new();
        let mut errors = Vec::new();

        for def in defs {
            match Category::validate(def) {
                Ok(category) if categories.iter().any(|c| c.name == category.name) => {
                    errors.push(CatalogError::DuplicateCategory(category.name));
                }
                Ok(category) => categories.push(category),
                Err(e) => errors.push(e),
            }
        }

        (Self { categories }, errors)
    }

    pub fn builtin() -> (Self, Vec<CatalogError>) {
        Self::load(BUILTIN_CATEGORIES.iter().map(CategoryDef::from).collect())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str, words: &[&str]) -> CategoryDef {
        CategoryDef {
            name: name.to_string(),
            words: words.iter().map(|w| w.to_string()).collect(),
            definitions: words
                .iter()
                .map(|w| (w.to_string(), format!("about {w}")))
                .collect(),
            tint: None,
        }
    }

    #[test]
    fn builtin_catalog_is_fully_valid() {
        let (catalog, errors) = Catalog::builtin();
        assert!(errors.is_empty(), "{errors:?}");
        let names: Vec<&str> = catalog.categories().iter().map(Category::name).collect();
        assert_eq!(names, ["Animals", "Fruits", "Colors", "Shapes"]);
        for category in catalog.categories() {
            for word in category.words() {
                assert!(category.definition(word).is_some());
            }
        }
    }

    #[test]
    fn short_category_is_rejected_but_others_survive() {
        let (catalog, errors) = Catalog::load(vec![
            def("Tiny", &["a", "b", "c"]),
            def("Fine", &["a", "b", "c", "d"]),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.position("Fine"), Some(0));
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            CatalogError::InsufficientWords { category, found: 3 } if category == "Tiny"
        ));
    }

    #[test]
    fn duplicate_word_and_missing_definition_are_reported() {
        let mut missing = def("Missing", &["a", "b", "c", "d"]);
        missing.definitions.remove("c");
        let (catalog, errors) = Catalog::load(vec![
            def("Dup", &["a", "b", "a", "c", "d"]),
            missing,
            def("  ", &["a", "b", "c", "d"]),
        ]);
        assert!(catalog.is_empty());
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            [
                "category `Dup` lists `a` more than once",
                "category `Missing` has no definition for `c`",
                "category has an empty name",
            ]
        );
    }

    #[test]
    fn second_category_with_same_name_is_rejected() {
        let (catalog, errors) = Catalog::load(vec![
            def("Same", &["a", "b", "c", "d"]),
            def("Same", &["e", "f", "g", "h"]),
        ]);
        assert_eq!(catalog.len(), 1);
        assert!(matches!(&errors[..], [CatalogError::DuplicateCategory(name)] if name == "Same"));
    }

    #[test]
    fn easy_pool_keeps_shortest_words() {
        let (catalog, _) = Catalog::builtin();
        let animals = catalog.get(0).unwrap();
        // 7 words: keep max(4, 4) = 4 shortest, ties in catalog order
        assert_eq!(animals.pool(Difficulty::Easy), ["cat", "dog", "lion", "fish"]);
        assert_eq!(animals.pool(Difficulty::Normal).len(), 7);
        assert_eq!(animals.pool(Difficulty::Hard).len(), 7);

        let fruits = catalog.get(1).unwrap();
        // 6 words: keep max(4, 3) = 4, returned in catalog order
        assert_eq!(fruits.pool(Difficulty::Easy), ["apple", "banana", "grape", "mango"]);
    }

    #[test]
    fn definitions_file_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let text = r#"[{"name": "Weather", "words": ["rain", "snow", "sun", "wind"],
            "definitions": {"rain": "r", "snow": "s", "sun": "u", "wind": "w"},
            "tint": [10, 20, 30]}]"#;
        fs::write(&path, text).unwrap();

        let defs = read_definitions(&path).unwrap();
        let (catalog, errors) = Catalog::load(defs);
        assert!(errors.is_empty());
        assert_eq!(catalog.get(0).unwrap().tint(), [10, 20, 30]);
        assert_eq!(catalog.get(0).unwrap().definition("sun"), Some("u"));
    }

    #[test]
    fn unreadable_definitions_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(read_definitions(&path), Err(CatalogError::Io { .. })));

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_definitions(&path), Err(CatalogError::Parse { .. })));
    }

    #[test]
    fn word_tints_stay_near_the_category_tint() {
        let (catalog, _) = Catalog::builtin();
        let shapes = catalog.get(3).unwrap();
        let base = shapes.tint();
        let tints: Vec<[u8; 3]> = shapes.words().iter().map(|w| shapes.word_tint(w)).collect();
        for tint in &tints {
            for (c, b) in tint.iter().zip(base) {
                assert!((*c as i32 - b as i32).abs() <= 30, "{tint:?} vs {base:?}");
            }
        }
        assert_eq!(shapes.word_tint("circle"), shapes.word_tint("circle"));
        assert!(tints.iter().any(|t| *t != tints[0]));
    }
}
