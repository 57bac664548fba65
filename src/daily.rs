use anyhow::Result;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::storage::{DailyWordRecord, Storage, StorageKey};
use crate::words::{WordCard, DAILY_WORDS};

/// Shows at most one word-of-the-day notification per calendar day
pub struct DailyWordNotifier {
    words: &'static [WordCard],
}

impl Default for DailyWordNotifier {
    fn default() -> Self {
        Self::new(DAILY_WORDS)
    }
}

impl DailyWordNotifier {
    pub fn new(words: &'static [WordCard]) -> Self {
        Self { words }
    }

    /// Pick today's word unless one was already shown on `today`
    /// (YYYY-MM-DD). The pick and the date are persisted together.
    pub async fn check<R: Rng + ?Sized>(
        &self,
        store: &Storage,
        today: &str,
        rng: &mut R,
    ) -> Result<Option<WordCard>> {
        if let Some(record) = store.daily_word().await? {
            if record.date == today {
                debug!(date = today, word = %record.word, "Daily word already shown");
                return Ok(None);
            }
        }

        let Some(card) = self.words.choose(rng).copied() else {
            return Ok(None);
        };

        store
            .set(
                StorageKey::DailyWord,
                &DailyWordRecord {
                    word: card.word.to_string(),
                    date: today.to_string(),
                },
            )
            .await?;

        info!(date = today, word = card.word, "Word of the day");
        Ok(Some(card))
    }

    /// Same as [`DailyWordNotifier::check`] for the current UTC day
    pub async fn check_today<R: Rng + ?Sized>(
        &self,
        store: &Storage,
        rng: &mut R,
    ) -> Result<Option<WordCard>> {
        self.check(store, &Storage::today(), rng).await
    }
}
