use tracing::{debug, warn};

use crate::consts::WORD_NOT_FOUND;
use crate::entry::DictionaryEntry;
use crate::error::{ErrorResponse, LookupError};
use crate::presentation::ResultView;

/// Where the current lookup stands
#[derive(Debug, Clone, PartialEq)]
pub enum LookupState {
    Idle,
    Loading { word: String },
    Success(ResultView),
    Failure(LookupError),
}

/// Handle for one started lookup. Only the most recently issued ticket may
/// complete; answers to older tickets are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    id: u64,
    word: String,
}

impl LookupTicket {
    pub fn word(&self) -> &str {
        &self.word
    }
}

/// Drives lookups against the proxy endpoint
#[derive(Debug, Clone)]
pub struct LookupSession {
    client: reqwest::Client,
    endpoint: String,
    state: LookupState,
    latest: u64,
}

impl LookupSession {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            state: LookupState::Idle,
            latest: 0,
        }
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    /// Submission is disabled while a lookup is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self.state, LookupState::Loading { .. })
    }

    /// Result currently on display, if any
    pub fn current(&self) -> Option<&ResultView> {
        match &self.state {
            LookupState::Success(view) => Some(view),
            _ => None,
        }
    }

    /// Validate input and enter `Loading`. Blank input fails immediately.
    pub fn begin(&mut self, input: &str) -> Result<LookupTicket, LookupError> {
        let word = input.trim();
        if word.is_empty() {
            self.state = LookupState::Failure(LookupError::Validation);
            return Err(LookupError::Validation);
        }

        self.latest += 1;
        self.state = LookupState::Loading {
            word: word.to_string(),
        };

        Ok(LookupTicket {
            id: self.latest,
            word: word.to_string(),
        })
    }

    /// Settle `ticket` with `outcome`. Returns `None` when a newer lookup has
    /// started since, leaving state untouched.
    pub fn complete(
        &mut self,
        ticket: &LookupTicket,
        outcome: Result<DictionaryEntry, LookupError>,
    ) -> Option<&LookupState> {
        if ticket.id != self.latest {
            debug!(word = %ticket.word, "Discarding stale lookup response");
            return None;
        }

        self.state = match outcome {
            Ok(entry) => LookupState::Success(ResultView::from_entry(&entry)),
            Err(e) => LookupState::Failure(e),
        };

        Some(&self.state)
    }

    /// Issue the single request for `ticket`. Needs no `&mut self`, so several
    /// requests may be in flight at once.
    pub fn request(
        &self,
        ticket: &LookupTicket,
    ) -> impl std::future::Future<Output = Result<DictionaryEntry, LookupError>> + Send + 'static
    {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let word = ticket.word.clone();

        async move { fetch_entry(&client, &endpoint, &word).await }
    }

    /// Begin, request and complete in one go
    pub async fn lookup(&mut self, input: &str) -> &LookupState {
        let ticket = match self.begin(input) {
            Ok(ticket) => ticket,
            Err(_) => return &self.state,
        };

        let outcome = self.request(&ticket).await;
        self.complete(&ticket, outcome);
        &self.state
    }

    /// Forget the displayed result or error
    pub fn reset(&mut self) {
        self.state = LookupState::Idle;
    }
}

/// One GET to the proxy, parsed down to the first entry
pub async fn fetch_entry(
    client: &reqwest::Client,
    endpoint: &str,
    word: &str,
) -> Result<DictionaryEntry, LookupError> {
    let response = client
        .get(endpoint)
        .query(&[("word", word)])
        .send()
        .await
        .map_err(|e| {
            warn!(word, "Lookup transport error: {}", e);
            LookupError::Transport(e.to_string())
        })?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| LookupError::Transport(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| WORD_NOT_FOUND.to_string());
        debug!(word, status = status.as_u16(), %message, "Lookup failed");
        return Err(LookupError::NotFound(message));
    }

    match DictionaryEntry::first_from_slice(&body) {
        Ok(Some(entry)) => Ok(entry),
        Ok(None) => Err(LookupError::NotFound(WORD_NOT_FOUND.to_string())),
        Err(e) => {
            warn!(word, "Unparseable lookup response: {}", e);
            Err(LookupError::Parse(e.to_string()))
        }
    }
}
