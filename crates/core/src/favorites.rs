//! Favorites: a deduplicated, breed-sorted set of dogs the user wants to be matched with.

use std::cmp::Ordering;

use tracing::debug;

use crate::types::Dog;

/// Records keyed by id, kept in breed-ascending order at all times.
///
/// Insertion re-sorts the whole collection (stable, so equal breeds keep
/// insertion order). Cardinality is small enough that this is not a concern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    dogs: Vec<Dog>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `dog` unless its id is already present. Returns whether it was added.
    pub fn add(&mut self, dog: Dog) -> bool {
        if self.contains(&dog.id) {
            return false;
        }
        debug!(id = %dog.id, breed = %dog.breed, "favorite added");
        self.dogs.push(dog);
        self.dogs.sort_by(|a, b| locale_cmp(&a.breed, &b.breed));
        true
    }

    /// Remove the dog with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.dogs.len();
        self.dogs.retain(|d| d.id != id);
        let removed = self.dogs.len() != before;
        if removed {
            debug!(id, "favorite removed");
        }
        removed
    }

    /// Card-button semantics: add when `add_mode`, remove otherwise.
    pub fn toggle(&mut self, dog: Dog, add_mode: bool) -> bool {
        if add_mode {
            self.add(dog)
        } else {
            self.remove(&dog.id)
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dogs.iter().any(|d| d.id == id)
    }

    /// Favorite ids in display order.
    pub fn ids(&self) -> Vec<String> {
        self.dogs.iter().map(|d| d.id.clone()).collect()
    }

    pub fn as_slice(&self) -> &[Dog] {
        &self.dogs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dog> {
        self.dogs.iter()
    }

    pub fn len(&self) -> usize {
        self.dogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    pub fn clear(&mut self) {
        self.dogs.clear();
    }
}

impl<'a> IntoIterator for &'a FavoritesSet {
    type Item = &'a Dog;
    type IntoIter = std::slice::Iter<'a, Dog>;

    fn into_iter(self) -> Self::IntoIter {
        self.dogs.iter()
    }
}

/// Human-order string comparison: case-insensitive first, exact bytes as tie-break,
/// so "beagle" and "Beagle" sit together ahead of "Boxer".
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a.chars().flat_map(char::to_lowercase).cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog(id: &str, breed: &str) -> Dog {
        Dog {
            id: id.into(),
            name: format!("dog-{id}"),
            breed: breed.into(),
            age: 3,
            zip_code: "10001".into(),
            img: String::new(),
        }
    }

    fn breeds(set: &FavoritesSet) -> Vec<&str> {
        set.iter().map(|d| d.breed.as_str()).collect()
    }

    #[test]
    fn add_sorts_by_breed() {
        let mut set = FavoritesSet::new();
        set.add(dog("1", "Pug"));
        set.add(dog("2", "Beagle"));
        set.add(dog("3", "Husky"));
        assert_eq!(breeds(&set), vec!["Beagle", "Husky", "Pug"]);
    }

    #[test]
    fn add_is_idempotent() {
        let mut set = FavoritesSet::new();
        assert!(set.add(dog("1", "Pug")));
        assert!(set.add(dog("2", "Akita")));
        let before = set.clone();
        assert!(!set.add(dog("1", "Pug")));
        assert_eq!(set, before);
    }

    #[test]
    fn equal_breeds_keep_insertion_order() {
        let mut set = FavoritesSet::new();
        set.add(dog("b", "Pug"));
        set.add(dog("a", "Pug"));
        set.add(dog("c", "Akita"));
        assert_eq!(set.ids(), vec!["c", "b", "a"]);
    }

    #[test]
    fn comparison_ignores_case_first() {
        let mut set = FavoritesSet::new();
        set.add(dog("1", "boxer"));
        set.add(dog("2", "Beagle"));
        set.add(dog("3", "akita"));
        assert_eq!(breeds(&set), vec!["akita", "Beagle", "boxer"]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut set = FavoritesSet::new();
        set.add(dog("1", "Pug"));
        assert!(!set.remove("zzz"));
        assert!(set.remove("1"));
        assert!(!set.remove("1"));
        assert!(set.is_empty());
    }

    #[test]
    fn toggle_follows_mode() {
        let mut set = FavoritesSet::new();
        assert!(set.toggle(dog("1", "Pug"), true));
        assert!(set.contains("1"));
        assert!(set.toggle(dog("1", "Pug"), false));
        assert!(!set.contains("1"));
    }
}
