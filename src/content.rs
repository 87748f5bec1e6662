//! The path/day content catalog.
//!
//! Immutable once built. Lookups return `Option` — an unknown id is the
//! host-visible "not found" state, never a crash. Structural problems
//! (duplicate ids, gapped day numbering, invalid flows) are content bugs and
//! fail loudly at construction.

use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::flow::config::FlowConfiguration;

/// A top-level content area (career, mindset, finance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub tagline: String,
    pub paths: Vec<Path>,
}

/// One multi-day program within a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub days: Vec<Day>,
}

/// One day of a path: a title and its exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    /// 1-based, contiguous within the path.
    pub number: u32,
    pub title: String,
    pub exercise: Exercise,
}

/// What the user does on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Exercise {
    /// An interactive screen flow (quiz, roleplay, card flip, ...).
    Flow(FlowConfiguration),
    /// A free-text journaling prompt; the answer becomes the day reflection.
    Journal { prompt: String },
}

/// Label for the kind of exercise a day carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Flow,
    Journal,
}

impl Exercise {
    pub fn kind(&self) -> ExerciseKind {
        match self {
            Self::Flow(_) => ExerciseKind::Flow,
            Self::Journal { .. } => ExerciseKind::Journal,
        }
    }
}

/// The full catalog of categories, paths, and days.
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    categories: Vec<Category>,
}

impl ContentCatalog {
    /// Build and validate a catalog.
    pub fn new(categories: Vec<Category>) -> Result<Self, ContentError> {
        validate(&categories)?;
        Ok(Self { categories })
    }

    /// Load a catalog from its JSON form.
    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let categories: Vec<Category> = serde_json::from_str(raw)?;
        Self::new(categories)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn path(&self, category: &str, path: &str) -> Option<&Path> {
        self.category(category)?
            .paths
            .iter()
            .find(|candidate| candidate.id == path)
    }

    pub fn day(&self, category: &str, path: &str, number: u32) -> Option<&Day> {
        self.path(category, path)?
            .days
            .iter()
            .find(|day| day.number == number)
    }
}

fn validate(categories: &[Category]) -> Result<(), ContentError> {
    let mut category_ids: Vec<&str> = Vec::new();
    for category in categories {
        if category_ids.contains(&category.id.as_str()) {
            return Err(ContentError::InvalidCatalog(format!(
                "duplicate category id '{}'",
                category.id
            )));
        }
        category_ids.push(&category.id);

        let mut path_ids: Vec<&str> = Vec::new();
        for path in &category.paths {
            if path_ids.contains(&path.id.as_str()) {
                return Err(ContentError::InvalidCatalog(format!(
                    "duplicate path id '{}' in category '{}'",
                    path.id, category.id
                )));
            }
            path_ids.push(&path.id);

            if path.days.is_empty() {
                return Err(ContentError::InvalidCatalog(format!(
                    "path '{}/{}' has no days",
                    category.id, path.id
                )));
            }
            for (index, day) in path.days.iter().enumerate() {
                let expected = index as u32 + 1;
                if day.number != expected {
                    return Err(ContentError::InvalidCatalog(format!(
                        "path '{}/{}': day {} out of order (expected {expected})",
                        category.id, path.id, day.number
                    )));
                }
                if let Exercise::Flow(config) = &day.exercise {
                    config.validate().map_err(|e| {
                        ContentError::InvalidCatalog(format!(
                            "path '{}/{}' day {}: {e}",
                            category.id, path.id, day.number
                        ))
                    })?;
                }
            }
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::small_catalog;
    use super::*;
    use crate::flow::config::test_support::simple_choice_flow;

    #[test]
    fn lookups_find_existing_content() {
        let catalog = small_catalog();
        assert!(catalog.category("career").is_some());
        assert!(catalog.path("career", "pivot").is_some());
        let day = catalog.day("career", "pivot", 2).unwrap();
        assert_eq!(day.exercise.kind(), ExerciseKind::Journal);
    }

    #[test]
    fn unknown_ids_are_not_found_not_a_crash() {
        let catalog = small_catalog();
        assert!(catalog.category("sports").is_none());
        assert!(catalog.path("career", "marathon").is_none());
        assert!(catalog.day("career", "pivot", 99).is_none());
    }

    #[test]
    fn duplicate_category_ids_rejected() {
        let category = Category {
            id: "career".into(),
            title: "Career".into(),
            tagline: String::new(),
            paths: vec![Path {
                id: "p".into(),
                title: String::new(),
                summary: String::new(),
                days: vec![Day {
                    number: 1,
                    title: String::new(),
                    exercise: Exercise::Journal {
                        prompt: "why?".into(),
                    },
                }],
            }],
        };
        assert!(ContentCatalog::new(vec![category.clone(), category]).is_err());
    }

    #[test]
    fn gapped_day_numbering_rejected() {
        let result = ContentCatalog::new(vec![Category {
            id: "c".into(),
            title: String::new(),
            tagline: String::new(),
            paths: vec![Path {
                id: "p".into(),
                title: String::new(),
                summary: String::new(),
                days: vec![Day {
                    number: 2,
                    title: String::new(),
                    exercise: Exercise::Journal {
                        prompt: "why?".into(),
                    },
                }],
            }],
        }]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_flow_in_catalog_rejected() {
        let result = ContentCatalog::new(vec![Category {
            id: "c".into(),
            title: String::new(),
            tagline: String::new(),
            paths: vec![Path {
                id: "p".into(),
                title: String::new(),
                summary: String::new(),
                days: vec![Day {
                    number: 1,
                    title: String::new(),
                    exercise: Exercise::Flow(simple_choice_flow("broken", 0)),
                }],
            }],
        }]);
        assert!(result.is_err());
    }

    #[test]
    fn catalog_json_roundtrip() {
        let catalog = small_catalog();
        let json = serde_json::to_string(catalog.categories()).unwrap();
        let reloaded = ContentCatalog::from_json(&json).unwrap();
        assert_eq!(reloaded.categories(), catalog.categories());
    }
}
