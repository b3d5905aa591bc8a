// SPDX-License-Identifier: MPL-2.0
//! Ordered, duplicate-free list of feed items.

use crate::domain::video::{VideoId, VideoItem};
use std::collections::HashSet;

/// The shared ordered sequence of videos for the current query.
///
/// Items are unique by [`VideoId`] and only ever appended at the tail.
/// Every mutation that changes the content bumps [`revision`](Self::revision).
#[derive(Debug, Clone, Default)]
pub struct FeedList {
    items: Vec<VideoItem>,
    ids: HashSet<VideoId>,
    revision: u64,
}

impl FeedList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&VideoItem> {
        self.items.get(index)
    }

    #[must_use]
    pub fn items(&self) -> &[VideoItem] {
        &self.items
    }

    #[must_use]
    pub fn contains(&self, id: &VideoId) -> bool {
        self.ids.contains(id)
    }

    /// Returns the index of the item with the given id.
    #[must_use]
    pub fn position_of(&self, id: &VideoId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.items.iter().position(|item| &item.id == id)
    }

    /// Monotonic counter of content changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.ids.clear();
            self.revision += 1;
        }
    }

    /// Replaces the whole content, dropping duplicate ids. Returns the new length.
    pub fn replace(&mut self, items: impl IntoIterator<Item = VideoItem>) -> usize {
        self.items.clear();
        self.ids.clear();
        self.push_unique(items);
        self.revision += 1;
        self.items.len()
    }

    /// Appends the items whose id is not present yet. Returns how many were added.
    pub fn append(&mut self, items: impl IntoIterator<Item = VideoItem>) -> usize {
        let added = self.push_unique(items);
        if added > 0 {
            self.revision += 1;
        }
        added
    }

    fn push_unique(&mut self, items: impl IntoIterator<Item = VideoItem>) -> usize {
        let before = self.items.len();
        for item in items {
            if self.ids.insert(item.id.clone()) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> VideoItem {
        VideoItem::new(id, format!("cover/{id}"), format!("media/{id}"))
    }

    #[test]
    fn append_skips_known_ids() {
        let mut list = FeedList::new();
        list.replace([item("a"), item("b")]);

        let added = list.append([item("b"), item("c"), item("c")]);

        assert_eq!(added, 1);
        let ids: Vec<_> = list.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn merging_same_page_twice_is_idempotent() {
        let mut list = FeedList::new();
        list.replace([item("a")]);
        let page = vec![item("b"), item("c")];

        list.append(page.clone());
        let revision = list.revision();
        let added = list.append(page);

        assert_eq!(added, 0);
        assert_eq!(list.len(), 3);
        assert_eq!(list.revision(), revision);
    }

    #[test]
    fn replace_drops_duplicates_within_page() {
        let mut list = FeedList::new();
        assert_eq!(list.replace([item("a"), item("a"), item("b")]), 2);
        assert_eq!(list.position_of(&VideoId::from("b")), Some(1));
        assert_eq!(list.position_of(&VideoId::from("zz")), None);
    }

    #[test]
    fn clear_bumps_revision_only_when_non_empty() {
        let mut list = FeedList::new();
        list.clear();
        assert_eq!(list.revision(), 0);

        list.replace([item("a")]);
        let revision = list.revision();
        list.clear();
        assert!(list.is_empty());
        assert!(!list.contains(&VideoId::from("a")));
        assert_eq!(list.revision(), revision + 1);
    }
}
