use std::fmt;

use crate::error::DuplicateName;
use crate::ordered::{Named, OrderedMap};
use crate::value::{ToValue, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    comment: String,
    trailing_comment: String,
    keys: OrderedMap<Key>,
}

impl Section {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            trailing_comment: String::new(),
            keys: OrderedMap::new(),
        }
    }

    /// Set the comment lines written above the header, markers and newlines included.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn with_trailing_comment(mut self, comment: impl Into<String>) -> Self {
        self.trailing_comment = comment.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    #[must_use]
    pub fn trailing_comment(&self) -> &str {
        &self.trailing_comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn set_trailing_comment(&mut self, comment: impl Into<String>) {
        self.trailing_comment = comment.into();
    }

    /// Keys in the order they were inserted.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    #[must_use]
    pub fn key(&self, name: &str) -> Option<&Key> {
        self.keys.get(name)
    }

    pub fn key_mut(&mut self, name: &str) -> Option<&mut Key> {
        self.keys.get_mut(name)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.keys.contains(name)
    }

    /// Append `key` to the end of the section.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateName`] if the section already has a key with that name; the existing
    /// key is kept.
    pub fn insert_key(&mut self, key: Key) -> Result<(), DuplicateName> {
        self.keys.insert(key).map(drop)
    }

    pub fn remove_key(&mut self, name: &str) -> Option<Key> {
        self.keys.remove(name)
    }

    pub(crate) fn key_or_insert(&mut self, name: &str) -> &mut Key {
        self.keys.get_or_insert_with(name, || Key::new(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Named for Section {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.comment)?;
        write!(f, "[{}]", self.name)?;
        write_trailing_comment(f, &self.trailing_comment)?;
        writeln!(f)?;

        for key in &self.keys {
            writeln!(f, "{key}")?;
        }

        writeln!(f)
    }
}

/// A named value together with the comments attached to its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    name: String,
    comment: String,
    trailing_comment: String,
    value: Value,
}

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            trailing_comment: String::new(),
            value: Value::new(),
        }
    }

    #[must_use]
    pub fn with_value<T: ToValue>(mut self, value: T) -> Self {
        self.value.set(value);
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn with_trailing_comment(mut self, comment: impl Into<String>) -> Self {
        self.trailing_comment = comment.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    #[must_use]
    pub fn trailing_comment(&self) -> &str {
        &self.trailing_comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn set_trailing_comment(&mut self, comment: impl Into<String>) {
        self.trailing_comment = comment.into();
    }
}

impl Named for Key {
    fn name(&self) -> &str {
        &self.name
    }
}

// Writes the key's comment block and its `name = value` line, without the final newline.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.comment)?;
        write!(f, "{} = {}", self.name, self.value)?;
        write_trailing_comment(f, &self.trailing_comment)
    }
}

fn write_trailing_comment(f: &mut fmt::Formatter<'_>, comment: &str) -> fmt::Result {
    if comment.is_empty() {
        Ok(())
    } else {
        write!(f, " {comment}")
    }
}
