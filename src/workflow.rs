//! Save and delete operations on the persisted list.
//!
//! Every mutation is a full read-modify-write of the list. Failures are
//! logged here and reported as outcomes; nothing propagates to key handlers.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Entry, Story};
use crate::selection::Selection;
use crate::state::ListStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
    Failed,
}

/// Prepend `story` unless its url is already saved.
pub fn save_story(store: &dyn ListStore, story: Story) -> SaveOutcome {
    if story.url.is_empty() || story.title.is_empty() {
        log::debug!("not saving story without url or title: {:?}", story);
        return SaveOutcome::Failed;
    }

    let mut entries = match store.get() {
        Ok(entries) => entries,
        Err(err) => {
            log::error!("Error saving entry: {err:#}");
            return SaveOutcome::Failed;
        }
    };

    if entries.iter().any(|saved| saved.url == story.url) {
        log::info!("already saved: {}", story.url);
        return SaveOutcome::AlreadySaved;
    }

    let saved_at = next_timestamp(&entries, Utc::now());
    entries.insert(0, story.into_entry(saved_at));

    match store.set(&entries) {
        Ok(()) => {
            log::info!("saved: {}", entries[0].url);
            SaveOutcome::Saved
        }
        Err(err) => {
            log::error!("Error saving entry: {err:#}");
            SaveOutcome::Failed
        }
    }
}

/// `now`, bumped when needed so the new entry sorts strictly after every
/// existing one.
fn next_timestamp(entries: &[Entry], now: DateTime<Utc>) -> DateTime<Utc> {
    match entries.iter().map(|e| e.saved_at).max() {
        Some(latest) if latest >= now => latest + Duration::milliseconds(1),
        _ => now,
    }
}

/// Remove the entry with `url` from the store.
pub fn remove_entry(store: &dyn ListStore, url: &str) -> eyre::Result<()> {
    let entries = store.get()?;
    let filtered: Vec<Entry> = entries.into_iter().filter(|e| e.url != url).collect();
    store.set(&filtered)
}

pub fn clear_entries(store: &dyn ListStore) -> eyre::Result<()> {
    store.set(&[])
}

/// The saved list, or an empty one when the store cannot be read.
pub fn load_entries(store: &dyn ListStore) -> Vec<Entry> {
    store.get().unwrap_or_else(|err| {
        log::error!("Error loading saved entries: {err:#}");
        Vec::new()
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    Confirming { url: String, title: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Ignored,
    Prompted,
    Deleted,
    Failed,
}

/// Cached saved list plus cursor and delete confirmation, one per front-end.
#[derive(Debug, Clone, Default)]
pub struct SavedEntries {
    selection: Selection<Entry>,
    delete: DeleteState,
}

impl SavedEntries {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            selection: Selection::new(entries),
            delete: DeleteState::Idle,
        }
    }

    pub fn load(store: &dyn ListStore) -> Self {
        Self::new(load_entries(store))
    }

    pub fn selection(&self) -> &Selection<Entry> {
        &self.selection
    }

    pub fn delete_state(&self) -> &DeleteState {
        &self.delete
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self.delete, DeleteState::Confirming { .. })
    }

    pub fn next(&mut self) {
        self.selection.next();
    }

    pub fn previous(&mut self) {
        self.selection.previous();
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.selection.current()
    }

    /// First press prompts for the selected entry; a press while prompting
    /// deletes the pending entry.
    pub fn request_delete(&mut self, store: &dyn ListStore) -> DeleteOutcome {
        match std::mem::take(&mut self.delete) {
            DeleteState::Idle => {
                let Some(entry) = self.selection.current() else {
                    return DeleteOutcome::Ignored;
                };
                self.delete = DeleteState::Confirming {
                    url: entry.url.clone(),
                    title: entry.title.clone(),
                };
                DeleteOutcome::Prompted
            }
            DeleteState::Confirming { url, .. } => match remove_entry(store, &url) {
                Ok(()) => {
                    self.selection.retain(|entry| entry.url != url);
                    log::info!("deleted saved entry: {url}");
                    DeleteOutcome::Deleted
                }
                Err(err) => {
                    log::error!("Error removing entry {url}: {err:#}");
                    DeleteOutcome::Failed
                }
            },
        }
    }

    pub fn cancel_delete(&mut self) {
        self.delete = DeleteState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct TestStore {
        entries: RefCell<Vec<Entry>>,
        fail_get: Cell<bool>,
        fail_set: Cell<bool>,
        sets: Cell<usize>,
    }

    impl ListStore for TestStore {
        fn get(&self) -> eyre::Result<Vec<Entry>> {
            if self.fail_get.get() {
                return Err(eyre::eyre!("get failed"));
            }
            Ok(self.entries.borrow().clone())
        }

        fn set(&self, entries: &[Entry]) -> eyre::Result<()> {
            if self.fail_set.get() {
                return Err(eyre::eyre!("set failed"));
            }
            self.sets.set(self.sets.get() + 1);
            *self.entries.borrow_mut() = entries.to_vec();
            Ok(())
        }
    }

    fn story(url: &str, title: &str) -> Story {
        Story {
            url: url.to_string(),
            title: title.to_string(),
            discussion_link: url.to_string(),
        }
    }

    fn store_with(urls: &[&str]) -> TestStore {
        let store = TestStore::default();
        for url in urls {
            assert_eq!(save_story(&store, story(url, url)), SaveOutcome::Saved);
        }
        store
    }

    #[test]
    fn test_save_prepends_newest_first() {
        let store = store_with(&["https://a.example/1", "https://a.example/2"]);
        let entries = store.get().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://a.example/2");
        assert!(entries[0].saved_at > entries[1].saved_at);
    }

    #[test]
    fn test_save_duplicate_leaves_store_untouched() {
        let store = store_with(&["https://a.example/1"]);
        let before = store.get().unwrap();
        let sets = store.sets.get();

        let outcome = save_story(&store, story("https://a.example/1", "again"));
        assert_eq!(outcome, SaveOutcome::AlreadySaved);
        assert_eq!(store.get().unwrap(), before);
        assert_eq!(store.sets.get(), sets);
    }

    #[test]
    fn test_saved_at_strictly_newer_than_future_entries() {
        let store = TestStore::default();
        let future = Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap();
        store
            .set(&[story("https://old.example/", "old").into_entry(future)])
            .unwrap();

        save_story(&store, story("https://new.example/", "new"));
        let entries = store.get().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].saved_at > future);
    }

    #[test]
    fn test_save_without_title_is_skipped() {
        let store = TestStore::default();
        assert_eq!(save_story(&store, story("https://a.example/", "")), SaveOutcome::Failed);
        assert_eq!(store.sets.get(), 0);
    }

    #[test]
    fn test_save_store_failures_are_reported() {
        let store = TestStore::default();
        store.fail_get.set(true);
        assert_eq!(save_story(&store, story("https://a.example/", "A")), SaveOutcome::Failed);

        store.fail_get.set(false);
        store.fail_set.set(true);
        assert_eq!(save_story(&store, story("https://a.example/", "A")), SaveOutcome::Failed);
        store.fail_set.set(false);
        assert!(store.get().unwrap().is_empty());
    }

    #[test]
    fn test_first_request_prompts_without_store_access() {
        let store = store_with(&["https://a.example/1"]);
        let mut saved = SavedEntries::load(&store);
        let sets = store.sets.get();

        assert_eq!(saved.request_delete(&store), DeleteOutcome::Prompted);
        assert_eq!(
            saved.delete_state(),
            &DeleteState::Confirming {
                url: "https://a.example/1".to_string(),
                title: "https://a.example/1".to_string(),
            }
        );
        assert_eq!(store.sets.get(), sets);
    }

    #[test]
    fn test_cancel_clears_pending_and_keeps_store() {
        let store = store_with(&["https://a.example/1"]);
        let mut saved = SavedEntries::load(&store);
        saved.request_delete(&store);
        saved.cancel_delete();
        assert!(!saved.is_confirming());
        assert_eq!(store.get().unwrap().len(), 1);
        assert_eq!(saved.selection().len(), 1);
    }

    #[test]
    fn test_second_request_deletes_only_pending_url() {
        let store = store_with(&["https://a.example/1", "https://a.example/2", "https://a.example/3"]);
        let mut saved = SavedEntries::load(&store);
        saved.next();
        let pending = saved.selected().unwrap().url.clone();

        assert_eq!(saved.request_delete(&store), DeleteOutcome::Prompted);
        assert_eq!(saved.request_delete(&store), DeleteOutcome::Deleted);

        let remaining = store.get().unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|e| e.url != pending));
        assert_eq!(saved.selection().len(), 2);
        assert!(!saved.is_confirming());
    }

    #[test]
    fn test_deleting_last_selected_entry_reclamps() {
        let store = store_with(&["https://a.example/1", "https://a.example/2"]);
        let mut saved = SavedEntries::load(&store);
        saved.previous();
        assert_eq!(saved.selection().index(), Some(1));

        saved.request_delete(&store);
        saved.request_delete(&store);
        assert_eq!(saved.selection().index(), Some(0));

        saved.request_delete(&store);
        saved.request_delete(&store);
        assert_eq!(saved.selection().index(), None);
        assert!(store.get().unwrap().is_empty());
    }

    #[test]
    fn test_failed_delete_dismisses_prompt_and_keeps_cache() {
        let store = store_with(&["https://a.example/1"]);
        let mut saved = SavedEntries::load(&store);
        saved.request_delete(&store);
        store.fail_set.set(true);

        assert_eq!(saved.request_delete(&store), DeleteOutcome::Failed);
        assert!(!saved.is_confirming());
        assert_eq!(saved.selection().len(), 1);
    }

    #[test]
    fn test_delete_on_empty_list_is_ignored() {
        let store = TestStore::default();
        let mut saved = SavedEntries::load(&store);
        assert_eq!(saved.request_delete(&store), DeleteOutcome::Ignored);
        assert!(!saved.is_confirming());
    }

    #[test]
    fn test_load_failure_yields_empty_list() {
        let store = TestStore::default();
        store.fail_get.set(true);
        assert!(SavedEntries::load(&store).selection().is_empty());
    }

    #[test]
    fn test_clear_entries() {
        let store = store_with(&["https://a.example/1", "https://a.example/2"]);
        clear_entries(&store).unwrap();
        assert!(store.get().unwrap().is_empty());
    }
}
