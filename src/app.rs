use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};

use crate::config::Config;
use crate::daily::DailyWordNotifier;
use crate::error::LookupError;
use crate::history::{self, SaveOutcome};
use crate::presentation::{AudioTransport, ResultView};
use crate::quiz::QuizGame;
use crate::session::{LookupSession, LookupState};
use crate::storage::{Storage, StorageKey};
use crate::theme::Theme;
use crate::words::WordCard;

/// Changes the presentation layer reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    ThemeChanged(Theme),
    DailyWord(WordCard),
    LookupStarted(String),
    LookupSucceeded(ResultView),
    LookupFailed(String),
    HistoryChanged(Vec<String>),
    RecentSearchesChanged(Vec<String>),
    Toast(String),
}

/// Take every event queued on `rx`. A lagging receiver skips what it missed
/// and keeps reading.
pub fn drain_events(rx: &mut broadcast::Receiver<AppEvent>) -> Vec<AppEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "Dropped app events");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    events
}

/// Application state: everything the UI shows, owned in one place
pub struct App {
    store: Storage,
    session: LookupSession,
    audio: AudioTransport,
    quiz: QuizGame<StdRng>,
    theme: Theme,
    rng: StdRng,
    events: broadcast::Sender<AppEvent>,
}

impl App {
    /// Open the store and restore the saved theme
    pub async fn new(config: &Config) -> Result<Self> {
        let store = Storage::new(&config.database_url).await?;
        Self::with_store(store, &config.proxy_url, StdRng::from_os_rng()).await
    }

    /// Build on an existing store with a chosen randomness source
    pub async fn with_store(store: Storage, proxy_url: &str, mut rng: StdRng) -> Result<Self> {
        let theme = store.theme().await?;
        let (events, _) = broadcast::channel(64);
        let quiz = QuizGame::new(StdRng::from_rng(&mut rng));

        Ok(Self {
            store,
            session: LookupSession::new(proxy_url),
            audio: AudioTransport::new(),
            quiz,
            theme,
            rng,
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: AppEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    pub fn store(&self) -> &Storage {
        &self.store
    }

    pub fn session(&self) -> &LookupSession {
        &self.session
    }

    pub fn audio(&self) -> &AudioTransport {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioTransport {
        &mut self.audio
    }

    pub fn quiz(&mut self) -> &mut QuizGame<StdRng> {
        &mut self.quiz
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Startup work: announce the theme and show the daily word for `today`
    /// if it has not been shown yet
    pub async fn load(&mut self, today: &str) -> Result<Option<WordCard>> {
        self.emit(AppEvent::ThemeChanged(self.theme));

        let daily = DailyWordNotifier::default()
            .check(&self.store, today, &mut self.rng)
            .await?;
        if let Some(card) = daily {
            self.emit(AppEvent::DailyWord(card));
        }

        Ok(daily)
    }

    pub async fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme.toggled();
        self.store.set(StorageKey::Theme, &theme).await?;
        self.theme = theme;

        info!(%theme, "Theme changed");
        self.emit(AppEvent::ThemeChanged(theme));
        Ok(theme)
    }

    /// Look up `input`, update the audio clip and recent searches on success
    pub async fn lookup(&mut self, input: &str) -> Result<&LookupState> {
        if let Ok(ticket) = self.session.begin(input) {
            self.emit(AppEvent::LookupStarted(ticket.word().to_string()));
            let outcome = self.session.request(&ticket).await;
            self.session.complete(&ticket, outcome);
        }

        match self.session.state().clone() {
            LookupState::Success(view) => {
                self.audio.load(view.audio.as_deref());

                let recent = history::push_recent_search(&self.store, &view.word).await?;
                self.emit(AppEvent::LookupSucceeded(view));
                self.emit(AppEvent::RecentSearchesChanged(recent));
            }
            LookupState::Failure(e) => {
                if !matches!(e, LookupError::Validation) {
                    warn!(input, "Lookup failed: {}", e);
                }
                self.emit(AppEvent::LookupFailed(e.to_string()));
            }
            LookupState::Idle | LookupState::Loading { .. } => {}
        }

        Ok(self.session.state())
    }

    /// Look up a word picked from history, recent searches or a
    /// synonym/antonym list
    pub async fn follow(&mut self, word: &str) -> Result<&LookupState> {
        self.lookup(word).await
    }

    /// Save the displayed word to history
    pub async fn save_current(&mut self) -> Result<SaveOutcome> {
        let Some(view) = self.session.current() else {
            bail!("No word to save");
        };
        let word = view.word.clone();

        let (outcome, saved) = history::save_to_history(&self.store, &word).await?;
        self.emit(AppEvent::Toast(outcome.message().to_string()));
        if outcome == SaveOutcome::Saved {
            self.emit(AppEvent::HistoryChanged(saved));
        }

        Ok(outcome)
    }

    pub async fn history(&self) -> Result<Vec<String>> {
        self.store.history().await
    }

    pub async fn recent_searches(&self) -> Result<Vec<String>> {
        self.store.recent_searches().await
    }

    pub async fn clear_history(&mut self) -> Result<()> {
        history::clear_history(&self.store).await?;
        self.emit(AppEvent::HistoryChanged(Vec::new()));
        self.emit(AppEvent::Toast("History cleared!".to_string()));
        Ok(())
    }

    /// Clear the search box and any displayed result
    pub fn clear_search(&mut self) {
        self.session.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::proxy_endpoint;

    async fn app() -> (App, crate::test_support::Requests) {
        let (endpoint, requests) = proxy_endpoint().await;
        let store = Storage::new("sqlite::memory:").await.unwrap();
        let app = App::with_store(store, &endpoint, StdRng::seed_from_u64(1))
            .await
            .unwrap();
        (app, requests)
    }

    #[tokio::test]
    async fn test_lookup_updates_recent_and_audio() {
        let (mut app, _) = app().await;
        let mut rx = app.subscribe();

        assert!(matches!(app.lookup("Hello").await.unwrap(), LookupState::Success(_)));
        assert_eq!(app.audio().source(), Some("https://example.test/hello.mp3"));
        assert_eq!(app.recent_searches().await.unwrap()[0], "hello");

        let events = drain_events(&mut rx);
        assert_eq!(events[0], AppEvent::LookupStarted("Hello".to_string()));
        assert!(matches!(events[1], AppEvent::LookupSucceeded(_)));
        assert!(matches!(events[2], AppEvent::RecentSearchesChanged(ref r) if r[0] == "hello"));
    }

    #[tokio::test]
    async fn test_failed_lookup_leaves_recent_alone() {
        let (mut app, requests) = app().await;
        let before = app.recent_searches().await.unwrap();
        let mut rx = app.subscribe();

        app.lookup("   ").await.unwrap();
        app.lookup("asdkjasd").await.unwrap();

        assert_eq!(app.recent_searches().await.unwrap(), before);
        assert_eq!(requests.lock().unwrap().len(), 1);
        assert_eq!(
            drain_events(&mut rx),
            vec![
                AppEvent::LookupFailed("Please enter a word to search".to_string()),
                AppEvent::LookupStarted("asdkjasd".to_string()),
                AppEvent::LookupFailed("No Definitions Found".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_save_current_word() {
        let (mut app, _) = app().await;
        assert!(app.save_current().await.is_err());

        app.lookup("hello").await.unwrap();
        assert_eq!(app.save_current().await.unwrap(), SaveOutcome::Saved);
        assert_eq!(app.save_current().await.unwrap(), SaveOutcome::AlreadySaved);
        assert_eq!(app.history().await.unwrap(), vec!["hello"]);

        let synonym = app.session().current().unwrap().synonyms[0].clone();
        app.follow(&synonym).await.unwrap();

        app.clear_history().await.unwrap();
        assert!(app.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_theme_persists() {
        let (endpoint, _) = proxy_endpoint().await;
        let store = Storage::new("sqlite::memory:").await.unwrap();

        let mut app = App::with_store(store.clone(), &endpoint, StdRng::seed_from_u64(2))
            .await
            .unwrap();
        assert_eq!(app.theme(), Theme::Light);
        assert_eq!(app.toggle_theme().await.unwrap(), Theme::Dark);

        let reloaded = App::with_store(store, &endpoint, StdRng::seed_from_u64(3))
            .await
            .unwrap();
        assert_eq!(reloaded.theme(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_daily_word_once_per_load_day() {
        let (mut app, _) = app().await;
        let mut rx = app.subscribe();

        assert!(app.load("2026-10-19").await.unwrap().is_some());
        assert!(app.load("2026-10-19").await.unwrap().is_none());

        let daily = drain_events(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, AppEvent::DailyWord(_)))
            .count();
        assert_eq!(daily, 1);
    }

    #[test]
    fn test_drain_continues_after_lag() {
        let (tx, mut rx) = broadcast::channel(2);
        for i in 0..5 {
            tx.send(AppEvent::Toast(i.to_string())).unwrap();
        }

        assert_eq!(
            drain_events(&mut rx),
            vec![
                AppEvent::Toast("3".to_string()),
                AppEvent::Toast("4".to_string()),
            ]
        );
        assert!(drain_events(&mut rx).is_empty());
    }
}
