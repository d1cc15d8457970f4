//! Global category taxonomy.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Supercategory shared by every tracked entity.
pub const SUPERCATEGORY: &str = "person";

/// A category referenced by detections through `category_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// 1-based, assigned in lexical order of `name`
    pub id: u64,
    pub name: String,
    pub supercategory: String,
}

/// Sorted set of categories with deterministic ids.
///
/// Ids are assigned after every name is known: distinct names are sorted
/// lexically (byte order) and numbered from 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomy {
    categories: Vec<Category>,
    ids: HashMap<String, u64>,
}

impl Taxonomy {
    /// Build a taxonomy from category names. Duplicates collapse.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let distinct: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let categories: Vec<Category> = distinct
            .into_iter()
            .enumerate()
            .map(|(i, name)| Category {
                id: i as u64 + 1,
                name,
                supercategory: SUPERCATEGORY.to_string(),
            })
            .collect();
        let ids = categories.iter().map(|c| (c.name.clone(), c.id)).collect();
        Self { categories, ids }
    }

    /// Look up the id of a category name.
    pub fn id_of(&self, name: &str) -> Option<u64> {
        self.ids.get(name).copied()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
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

    #[test]
    fn test_ids_follow_lexical_order() {
        let taxonomy = Taxonomy::from_names(["referee_main", "ball_1", "player_left_10", "ball_1"]);
        let names: Vec<&str> = taxonomy.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ball_1", "player_left_10", "referee_main"]);
        assert_eq!(taxonomy.id_of("ball_1"), Some(1));
        assert_eq!(taxonomy.id_of("player_left_10"), Some(2));
        assert_eq!(taxonomy.id_of("referee_main"), Some(3));
        assert_eq!(taxonomy.id_of("other_x"), None);
    }

    #[test]
    fn test_lexical_not_numeric() {
        // "player_left_10" sorts before "player_left_9"
        let taxonomy = Taxonomy::from_names(["player_left_9", "player_left_10"]);
        assert_eq!(taxonomy.id_of("player_left_10"), Some(1));
        assert_eq!(taxonomy.id_of("player_left_9"), Some(2));
    }

    #[test]
    fn test_supercategory_and_empty() {
        let taxonomy = Taxonomy::from_names(["ball_1"]);
        assert_eq!(taxonomy.categories()[0].supercategory, "person");
        assert!(Taxonomy::from_names(Vec::<String>::new()).is_empty());
    }
}
