use indexmap::IndexMap;

use crate::hls::Tag;

/// Header tags keyed by name, iterated in first-insertion order.
///
/// Inserting a tag whose name is already present replaces it in place.
#[derive(Debug, Clone, Default)]
pub struct HeaderTags {
    tags: IndexMap<String, Tag>,
}

impl HeaderTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tag, returning the one it replaced.
    pub fn insert(&mut self, tag: Tag) -> Option<Tag> {
        self.tags.insert(tag.name.clone(), tag)
    }

    /// Remove a tag, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        self.tags.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
