/// Word Lens Constants

// =============================================================================
// UPSTREAM DICTIONARY
// =============================================================================

/// Free Dictionary API entries endpoint (English). The looked-up word is
/// appended as a single path segment.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

/// Message used whenever an upstream error body carries no usable message
pub const WORD_NOT_FOUND: &str = "Word not found";

// =============================================================================
// API SERVER
// =============================================================================

/// Default proxy listen port
pub const DEFAULT_API_PORT: u16 = 3000;

/// Route the lookup proxy is mounted on
pub const LOOKUP_ROUTE: &str = "/api/dictionary";

/// Endpoint the lookup session calls by default
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000/api/dictionary";

// =============================================================================
// DATABASE
// =============================================================================

/// Default SQLite database path
pub const DEFAULT_DATABASE_URL: &str = "sqlite:word_lens.db";

// =============================================================================
// WORD LISTS
// =============================================================================

/// Maximum number of saved words kept in history
pub const HISTORY_CAPACITY: usize = 20;

/// Maximum number of recent searches kept
pub const RECENT_SEARCHES_CAPACITY: usize = 5;

/// Recent searches shown before the user has looked anything up
pub const DEFAULT_RECENT_SEARCHES: [&str; 3] = ["serendipity", "ephemeral", "eloquent"];

// =============================================================================
// RESULT PRESENTATION
// =============================================================================

/// Synonyms and antonyms shown per result
pub const MAX_RELATED_WORDS: usize = 5;

pub const NO_PHONETIC: &str = "Pronunciation not available";
pub const NO_DEFINITION: &str = "No definition available";
pub const NO_SYNONYMS: &str = "No synonyms available";
pub const NO_ANTONYMS: &str = "No antonyms available";

/// Playback rates cycled through by the speed control, starting at 1x
pub const PLAYBACK_RATES: [f32; 4] = [1.0, 1.5, 2.0, 0.5];

/// Waveform refresh period in milliseconds
pub const WAVEFORM_FRAME_MS: u64 = 100;

/// Number of bars in the waveform animation
pub const WAVEFORM_BARS: usize = 5;

/// Height of a waveform bar at rest, in pixels
pub const WAVEFORM_REST_HEIGHT: f32 = 10.0;

// =============================================================================
// QUIZ
// =============================================================================

/// Questions per quiz session
pub const QUIZ_LENGTH: usize = 10;

/// Default pause between answering and the next round, in milliseconds
pub const DEFAULT_QUIZ_ROUND_DELAY_MS: u64 = 1500;
