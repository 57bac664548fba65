use anyhow::Result;
use tracing::debug;

use crate::consts::{HISTORY_CAPACITY, RECENT_SEARCHES_CAPACITY};
use crate::storage::{Storage, StorageKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}

impl SaveOutcome {
    /// Toast shown after a save attempt
    pub fn message(&self) -> &'static str {
        match self {
            SaveOutcome::Saved => "Word saved to history!",
            SaveOutcome::AlreadySaved => "Word already in history!",
        }
    }
}

/// Add `word` (lowercased) to the front of a saved-words list unless it is
/// already there. The oldest entry falls off past `capacity`.
pub fn save_word(words: &mut Vec<String>, word: &str, capacity: usize) -> SaveOutcome {
    let word = word.to_lowercase();

    if words.contains(&word) {
        return SaveOutcome::AlreadySaved;
    }

    words.insert(0, word);
    words.truncate(capacity);
    SaveOutcome::Saved
}

/// Move `word` (lowercased) to the front of a recent-searches list,
/// dropping any earlier occurrence and anything past `capacity`.
pub fn record_search(words: &mut Vec<String>, word: &str, capacity: usize) {
    let word = word.to_lowercase();

    words.retain(|w| *w != word);
    words.insert(0, word);
    words.truncate(capacity);
}

/// Persist `word` in saved history
pub async fn save_to_history(store: &Storage, word: &str) -> Result<(SaveOutcome, Vec<String>)> {
    let mut history = store.history().await?;
    let outcome = save_word(&mut history, word, HISTORY_CAPACITY);

    if outcome == SaveOutcome::Saved {
        store.set(StorageKey::History, &history).await?;
    }

    debug!(word, ?outcome, "History save");
    Ok((outcome, history))
}

pub async fn clear_history(store: &Storage) -> Result<()> {
    store.remove(StorageKey::History).await
}

/// Persist `word` at the head of recent searches
pub async fn push_recent_search(store: &Storage, word: &str) -> Result<Vec<String>> {
    let mut recent = store.recent_searches().await?;
    record_search(&mut recent, word, RECENT_SEARCHES_CAPACITY);
    store.set(StorageKey::RecentSearches, &recent).await?;
    Ok(recent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_is_case_insensitive_and_unique() {
        let mut words = Vec::new();

        assert_eq!(save_word(&mut words, "Hello", 20), SaveOutcome::Saved);
        assert_eq!(save_word(&mut words, "HELLO", 20), SaveOutcome::AlreadySaved);
        assert_eq!(save_word(&mut words, "world", 20), SaveOutcome::Saved);

        assert_eq!(words, vec!["world", "hello"]);
    }

    #[test]
    fn test_save_evicts_oldest_past_capacity() {
        let mut words = Vec::new();
        for i in 0..21 {
            save_word(&mut words, &format!("word{}", i), HISTORY_CAPACITY);
        }

        assert_eq!(words.len(), HISTORY_CAPACITY);
        assert_eq!(words[0], "word20");
        assert_eq!(words[HISTORY_CAPACITY - 1], "word1");
        assert!(!words.contains(&"word0".to_string()));
    }

    #[test]
    fn test_recent_search_moves_to_front() {
        let mut words = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        record_search(&mut words, "C", RECENT_SEARCHES_CAPACITY);
        assert_eq!(words, vec!["c", "a", "b"]);

        for w in ["d", "e", "f", "g"] {
            record_search(&mut words, w, RECENT_SEARCHES_CAPACITY);
        }
        assert_eq!(words, vec!["g", "f", "e", "d", "c"]);
    }

    #[tokio::test]
    async fn test_history_persists_in_order() {
        let store = Storage::new("sqlite::memory:").await.unwrap();

        for word in ["alpha", "Beta", "gamma", "alpha"] {
            save_to_history(&store, word).await.unwrap();
        }

        let (outcome, history) = save_to_history(&store, "beta").await.unwrap();
        assert_eq!(outcome, SaveOutcome::AlreadySaved);
        assert_eq!(history, vec!["gamma", "beta", "alpha"]);
        assert_eq!(store.history().await.unwrap(), history);

        clear_history(&store).await.unwrap();
        assert!(store.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recent_searches_start_from_seed() {
        let store = Storage::new("sqlite::memory:").await.unwrap();

        let recent = push_recent_search(&store, "Lucid").await.unwrap();
        assert_eq!(recent, vec!["lucid", "serendipity", "ephemeral", "eloquent"]);

        for word in ["one", "two", "three"] {
            push_recent_search(&store, word).await.unwrap();
        }

        let recent = store.recent_searches().await.unwrap();
        assert_eq!(recent.len(), RECENT_SEARCHES_CAPACITY);
        assert_eq!(recent[0], "three");
    }
}
