use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::locator::RowHandle;

/// A story as read off a listing row, before it is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub url: String,
    pub title: String,
    pub discussion_link: String,
}

impl Story {
    pub fn into_entry(self, saved_at: DateTime<Utc>) -> Entry {
        Entry {
            url: self.url,
            title: self.title,
            discussion_link: self.discussion_link,
            saved_at,
        }
    }
}

/// A saved story. `url` is the unique key within the saved list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub discussion_link: String,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    CurrentTab,
    NewTab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Saved,
    AlreadySaved,
}

impl FlashKind {
    pub fn label(self) -> &'static str {
        match self {
            FlashKind::Saved => "Saved!",
            FlashKind::AlreadySaved => "Already saved!",
        }
    }
}

/// Transient badge shown on a listing row after a save attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub row: RowHandle,
    pub kind: FlashKind,
    pub expires_at: Instant,
}

impl Flash {
    pub fn expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
