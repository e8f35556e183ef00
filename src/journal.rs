use crate::errors::AppError;
use crate::models::{JournalEntry, Mood};
use crate::storage::Storage;
use chrono::NaiveDate;
use tracing::{error, info};

pub const ENTRIES_KEY: &str = "journal-entries";

/// Journal entries backed by a [`Storage`] key. Every mutation rewrites the
/// whole collection.
#[derive(Debug)]
pub struct JournalStore<S> {
    storage: S,
    entries: Vec<JournalEntry>,
}

impl<S: Storage> JournalStore<S> {
    /// Reads the stored collection. A missing, unreadable or malformed blob
    /// all yield an empty journal.
    pub async fn load(storage: S) -> Self {
        let entries = match storage.read(ENTRIES_KEY).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    error!("failed to parse journal entries: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                error!("failed to read journal entries: {err}");
                Vec::new()
            }
        };

        Self { storage, entries }
    }

    /// Stores `text` as the entry for `date`, replacing any earlier entry for
    /// that day. Returns `Ok(false)` without touching anything when `text` is
    /// blank. If the write fails the in-memory journal is left as it was.
    pub async fn save(&mut self, date: NaiveDate, text: &str, mood: Mood) -> Result<bool, AppError> {
        if text.trim().is_empty() {
            return Ok(false);
        }

        let previous = self.entries.clone();
        self.entries.retain(|entry| entry.date != date);
        self.entries.push(JournalEntry {
            date,
            text: text.to_string(),
            mood,
        });
        if let Err(err) = self.persist().await {
            error!(%date, "failed to persist journal: {}", err.message);
            self.entries = previous;
            return Err(err);
        }

        info!(%date, mood = mood.symbol(), "journal entry saved");
        Ok(true)
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Newest first.
    pub fn sorted_entries(&self) -> Vec<JournalEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.iter().map(|entry| entry.date)
    }

    async fn persist(&self) -> Result<(), AppError> {
        let payload = serde_json::to_vec_pretty(&self.entries)?;
        self.storage.write(ENTRIES_KEY, &payload).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::io;

    /// Reads like an empty store; every write fails.
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        async fn read(&self, _key: &str) -> io::Result<Option<Vec<u8>>> {
            Ok(None)
        }

        async fn write(&self, _key: &str, _payload: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    fn entry_for<S>(store: &JournalStore<S>, date: NaiveDate) -> Option<&JournalEntry> {
        store.entries.iter().find(|entry| entry.date == date)
    }

    #[tokio::test]
    async fn save_creates_single_entry_and_persists() {
        let mut store = JournalStore::load(MemoryStorage::new()).await;
        assert!(store.save(day(1), "slept well", Mood::Happy).await.unwrap());

        assert_eq!(store.entries().len(), 1);
        let entry = entry_for(&store, day(1)).unwrap();
        assert_eq!(entry.text, "slept well");
        assert_eq!(entry.mood, Mood::Happy);

        let blob = store.storage.get(ENTRIES_KEY).expect("nothing persisted");
        let stored: Vec<JournalEntry> = serde_json::from_slice(&blob).unwrap();
        assert_eq!(stored, store.entries());
    }

    #[tokio::test]
    async fn save_replaces_entry_for_same_date() {
        let mut store = JournalStore::load(MemoryStorage::new()).await;
        store.save(day(1), "first", Mood::Sad).await.unwrap();
        store.save(day(2), "other day", Mood::Neutral).await.unwrap();
        store.save(day(1), "second", Mood::Angry).await.unwrap();

        assert_eq!(store.entries().len(), 2);
        assert_eq!(store.entries().iter().filter(|e| e.date == day(1)).count(), 1);
        let entry = entry_for(&store, day(1)).unwrap();
        assert_eq!(entry.text, "second");
        assert_eq!(entry.mood, Mood::Angry);
    }

    #[tokio::test]
    async fn blank_text_is_ignored() {
        let mut store = JournalStore::load(MemoryStorage::new()).await;
        store.save(day(1), "kept", Mood::Happy).await.unwrap();

        for blank in ["", "   ", "\n\t "] {
            assert!(!store.save(day(1), blank, Mood::Sad).await.unwrap());
        }

        assert_eq!(store.entries().len(), 1);
        assert_eq!(entry_for(&store, day(1)).unwrap().text, "kept");
    }

    #[tokio::test]
    async fn text_is_stored_untrimmed() {
        let mut store = JournalStore::load(MemoryStorage::new()).await;
        store.save(day(3), "  padded\n", Mood::Neutral).await.unwrap();
        assert_eq!(entry_for(&store, day(3)).unwrap().text, "  padded\n");
    }

    #[tokio::test]
    async fn load_reads_existing_entries() {
        let blob = r#"[{"date":"2026-04-02","text":"rain","mood":"😢"}]"#;
        let store = JournalStore::load(MemoryStorage::with_blob(ENTRIES_KEY, blob)).await;
        assert_eq!(store.entries().len(), 1);
        assert_eq!(entry_for(&store, day(2)).unwrap().mood, Mood::Sad);
    }

    #[tokio::test]
    async fn malformed_blob_loads_empty() {
        for blob in ["not json", r#"[{"date":"04/02/2026","text":"x","mood":"😢"}]"#] {
            let store = JournalStore::load(MemoryStorage::with_blob(ENTRIES_KEY, blob)).await;
            assert!(store.entries().is_empty());
        }
    }

    #[tokio::test]
    async fn sorted_entries_are_newest_first() {
        let mut store = JournalStore::load(MemoryStorage::new()).await;
        store.save(day(2), "b", Mood::Neutral).await.unwrap();
        store.save(day(9), "c", Mood::Neutral).await.unwrap();
        store.save(day(1), "a", Mood::Neutral).await.unwrap();

        let dates: Vec<_> = store.sorted_entries().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(9), day(2), day(1)]);
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_entries() {
        let mut store = JournalStore {
            storage: ReadOnlyStorage,
            entries: vec![JournalEntry {
                date: day(1),
                text: "before".into(),
                mood: Mood::Happy,
            }],
        };

        let err = store.save(day(1), "after", Mood::Sad).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(store.save(day(2), "new day", Mood::Neutral).await.is_err());

        assert_eq!(store.entries().len(), 1);
        let entry = entry_for(&store, day(1)).unwrap();
        assert_eq!(entry.text, "before");
        assert_eq!(entry.mood, Mood::Happy);
    }
}
