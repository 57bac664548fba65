use anyhow::Result;
use chrono::Local;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::warn;

use crate::consts::DEFAULT_RECENT_SEARCHES;
use crate::theme::Theme;

/// The four independently persisted values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    Theme,
    History,
    RecentSearches,
    DailyWord,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Theme => "theme",
            StorageKey::History => "dictionaryHistory",
            StorageKey::RecentSearches => "recentSearches",
            StorageKey::DailyWord => "dailyWord",
        }
    }
}

/// Last daily-word notification shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyWordRecord {
    pub word: String,
    /// Calendar day in YYYY-MM-DD format
    pub date: String,
}

/// Local key-value store. Each value is a JSON document and every write
/// replaces the whole value; concurrent writers to one key race, last write wins.
#[derive(Debug, Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Open (or create) the store and initialize schema
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // An in-memory database lives and dies with its connection, so keep exactly one
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        sqlx::query(include_str!("../schema.sql"))
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }

    /// Raw JSON text stored under `key`
    pub async fn get_raw(&self, key: StorageKey) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM preferences WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Decoded value under `key`. A value that no longer decodes is treated as absent.
    pub async fn get<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>> {
        let Some(raw) = self.get_raw(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = key.as_str(), "Ignoring undecodable stored value: {}", e);
                Ok(None)
            }
        }
    }

    /// Overwrite the value under `key`
    pub async fn set<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;

        sqlx::query(
            r#"
            INSERT INTO preferences (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key.as_str())
        .bind(json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove(&self, key: StorageKey) -> Result<()> {
        sqlx::query("DELETE FROM preferences WHERE key = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Saved theme, light when unset
    pub async fn theme(&self) -> Result<Theme> {
        Ok(self.get(StorageKey::Theme).await?.unwrap_or_default())
    }

    /// Saved words, most recent first; empty when unset
    pub async fn history(&self) -> Result<Vec<String>> {
        Ok(self.get(StorageKey::History).await?.unwrap_or_default())
    }

    /// Recent searches, most recent first; seeded list when unset
    pub async fn recent_searches(&self) -> Result<Vec<String>> {
        Ok(self
            .get(StorageKey::RecentSearches)
            .await?
            .unwrap_or_else(|| DEFAULT_RECENT_SEARCHES.iter().map(|w| w.to_string()).collect()))
    }

    pub async fn daily_word(&self) -> Result<Option<DailyWordRecord>> {
        self.get(StorageKey::DailyWord).await
    }

    /// Get today's local calendar date in YYYY-MM-DD format
    pub fn today() -> String {
        Local::now().date_naive().format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory() -> Storage {
        Storage::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let store = memory().await;

        assert_eq!(store.theme().await.unwrap(), Theme::Light);
        assert!(store.history().await.unwrap().is_empty());
        assert_eq!(
            store.recent_searches().await.unwrap(),
            vec!["serendipity", "ephemeral", "eloquent"]
        );
        assert!(store.daily_word().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_and_round_trips() {
        let store = memory().await;
        let words = vec!["zebra".to_string(), "apple".to_string(), "mango".to_string()];

        store.set(StorageKey::History, &vec!["old".to_string()]).await.unwrap();
        store.set(StorageKey::History, &words).await.unwrap();

        assert_eq!(store.history().await.unwrap(), words);
        assert_eq!(
            store.get_raw(StorageKey::History).await.unwrap().as_deref(),
            Some(r#"["zebra","apple","mango"]"#)
        );
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = memory().await;

        store.set(StorageKey::Theme, &Theme::Dark).await.unwrap();
        store.set(StorageKey::RecentSearches, &["cat"]).await.unwrap();
        store.remove(StorageKey::RecentSearches).await.unwrap();

        assert_eq!(store.theme().await.unwrap(), Theme::Dark);
        assert_eq!(store.recent_searches().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_daily_word_record() {
        let store = memory().await;
        let record = DailyWordRecord {
            word: "halcyon".to_string(),
            date: "2026-10-19".to_string(),
        };

        store.set(StorageKey::DailyWord, &record).await.unwrap();
        assert_eq!(store.daily_word().await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_undecodable_value_falls_back() {
        let store = memory().await;

        store.set(StorageKey::History, "not a list").await.unwrap();
        assert!(store.history().await.unwrap().is_empty());
    }

    #[test]
    fn test_today_is_local_date() {
        let before = Local::now().date_naive();
        let today = Storage::today();
        let after = Local::now().date_naive();

        assert_eq!(today.len(), 10);
        let parsed = chrono::NaiveDate::parse_from_str(&today, "%Y-%m-%d").unwrap();
        assert!(parsed == before || parsed == after);
    }
}
