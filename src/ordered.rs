use std::collections::HashMap;
use std::{slice, vec};

use crate::error::DuplicateName;

/// Anything stored in an [`OrderedMap`] is identified by its name.
pub trait Named {
    fn name(&self) -> &str;
}

/// An insertion-ordered collection of named items.
///
/// Items live in a `Vec` in the order they were inserted; a side table maps each name to its
/// physical index. Removal shifts the tail down, so every later index is renumbered to keep the
/// table consistent with the vector.
#[derive(Debug, Clone)]
pub struct OrderedMap<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Named> OrderedMap<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.position(name).map(|i| &self.items[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.position(name).map(|i| &mut self.items[i])
    }

    /// Append `item` unless an item with the same name is already present.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateName`] and leaves the collection untouched if the name is taken.
    pub fn insert(&mut self, item: T) -> Result<usize, DuplicateName> {
        if self.contains(item.name()) {
            return Err(DuplicateName::new(item.name()));
        }

        let position = self.items.len();
        self.index.insert(item.name().to_owned(), position);
        self.items.push(item);

        Ok(position)
    }

    /// Return the item called `name`, appending the one built by `make` if it is missing.
    pub fn get_or_insert_with<F>(&mut self, name: &str, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        let position = match self.position(name) {
            Some(i) => i,
            None => {
                let item = make();
                debug_assert_eq!(item.name(), name);
                self.index.insert(name.to_owned(), self.items.len());
                self.items.push(item);
                self.items.len() - 1
            }
        };

        &mut self.items[position]
    }

    /// Remove the item called `name`. Absent names are a no-op.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        let position = self.index.remove(name)?;
        let item = self.items.remove(position);

        for i in self.index.values_mut() {
            if *i > position {
                *i -= 1;
            }
        }

        Some(item)
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(Named::name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }
}

impl<T: PartialEq> PartialEq for OrderedMap<T> {
    fn eq(&self, other: &Self) -> bool {
        // The index is derived from `items`, so comparing the vectors is enough.
        self.items == other.items
    }
}

impl<T: Eq> Eq for OrderedMap<T> {}

impl<'a, T: Named> IntoIterator for &'a OrderedMap<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Named> IntoIterator for OrderedMap<T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
