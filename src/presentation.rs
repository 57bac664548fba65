use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info};

use crate::consts::{
    MAX_RELATED_WORDS, NO_ANTONYMS, NO_DEFINITION, NO_PHONETIC, NO_SYNONYMS, PLAYBACK_RATES,
    WAVEFORM_BARS, WAVEFORM_FRAME_MS, WAVEFORM_REST_HEIGHT,
};
use crate::entry::DictionaryEntry;

/// Display fields derived from the first dictionary entry of a lookup
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub word: String,
    pub phonetic: String,
    pub part_of_speech: Option<String>,
    pub definition: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    /// Pronunciation audio; controls are hidden when absent
    pub audio: Option<String>,
}

impl ResultView {
    pub fn from_entry(entry: &DictionaryEntry) -> Self {
        let phonetic = non_empty(entry.phonetic.as_deref())
            .or_else(|| {
                entry
                    .phonetics
                    .iter()
                    .find_map(|p| non_empty(p.text.as_deref()))
            })
            .unwrap_or(NO_PHONETIC)
            .to_string();

        let audio = entry
            .phonetics
            .iter()
            .find_map(|p| non_empty(p.audio.as_deref()))
            .map(str::to_string);

        let meaning = entry.meanings.first();

        let definition = meaning
            .and_then(|m| m.definitions.first())
            .map(|d| d.definition.clone())
            .unwrap_or_else(|| NO_DEFINITION.to_string());

        let related = |words: &[String]| -> Vec<String> {
            words.iter().take(MAX_RELATED_WORDS).cloned().collect()
        };

        Self {
            word: entry.word.clone(),
            phonetic,
            part_of_speech: meaning.map(|m| m.part_of_speech.clone()),
            definition,
            synonyms: meaning.map(|m| related(&m.synonyms)).unwrap_or_default(),
            antonyms: meaning.map(|m| related(&m.antonyms)).unwrap_or_default(),
            audio,
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    pub fn synonyms_text(&self) -> String {
        related_text(&self.synonyms, NO_SYNONYMS)
    }

    pub fn antonyms_text(&self) -> String {
        related_text(&self.antonyms, NO_ANTONYMS)
    }
}

impl From<&DictionaryEntry> for ResultView {
    fn from(entry: &DictionaryEntry) -> Self {
        Self::from_entry(entry)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn related_text(words: &[String], placeholder: &str) -> String {
    if words.is_empty() {
        placeholder.to_string()
    } else {
        words.join(", ")
    }
}

/// Format a playback position as `m:ss`
pub fn format_time(time: Duration) -> String {
    let secs = time.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

// =============================================================================
// AUDIO TRANSPORT
// =============================================================================

/// Playback state of the single pronunciation clip shared across lookups.
/// Position only moves through [`AudioTransport::advance`], which the audio
/// backend calls as it plays.
pub struct AudioTransport {
    source: Option<String>,
    playing: bool,
    position: Duration,
    duration: Option<Duration>,
    volume: f32,
    rate_index: usize,
    waveform: Option<Waveform>,
}

impl Default for AudioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioTransport {
    pub fn new() -> Self {
        Self {
            source: None,
            playing: false,
            position: Duration::ZERO,
            duration: None,
            volume: 1.0,
            rate_index: 0,
            waveform: None,
        }
    }

    /// Drive `waveform` while playing
    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = Some(waveform);
        self
    }

    /// Swap the clip. Playback stops and the position returns to zero;
    /// volume and speed carry over.
    pub fn load(&mut self, source: Option<&str>) {
        self.pause();
        self.source = source.map(str::to_string);
        self.position = Duration::ZERO;
        self.duration = None;
        debug!(source = ?self.source, "Audio source loaded");
    }

    /// Clip length, once the backend has read it
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = Some(duration);
        self.position = self.position.min(duration);
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.volume == 0.0
    }

    pub fn rate(&self) -> f32 {
        PLAYBACK_RATES[self.rate_index]
    }

    /// Play or pause; returns whether audio is now playing.
    /// Nothing happens without a source.
    pub fn toggle_play(&mut self) -> bool {
        if self.playing {
            self.pause();
        } else if self.source.is_some() {
            if let Some(end) = self.duration {
                if self.position >= end {
                    self.position = Duration::ZERO;
                }
            }
            self.playing = true;
            if let Some(waveform) = self.waveform.as_mut() {
                waveform.start();
            }
        }
        self.playing
    }

    pub fn pause(&mut self) {
        self.playing = false;
        if let Some(waveform) = self.waveform.as_mut() {
            waveform.stop();
        }
    }

    /// Move the playhead by `elapsed` wall time at the current rate.
    /// Reaching the end stops playback.
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.playing {
            return;
        }

        self.position += elapsed.mul_f32(self.rate());

        if let Some(end) = self.duration {
            if self.position >= end {
                self.position = end;
                self.pause();
            }
        }
    }

    /// Jump to `position`, clamped to the clip length when known
    pub fn seek(&mut self, position: Duration) {
        self.position = match self.duration {
            Some(end) => position.min(end),
            None => position,
        };
    }

    /// Set volume, clamped to `0.0..=1.0`
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
    }

    /// Step to the next speed in 1x → 1.5x → 2x → 0.5x → 1x
    pub fn cycle_speed(&mut self) -> f32 {
        self.rate_index = (self.rate_index + 1) % PLAYBACK_RATES.len();
        self.rate()
    }

    pub fn speed_label(&self) -> String {
        format!("Playback Speed: {}x", self.rate())
    }

    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.position),
            format_time(self.duration.unwrap_or_default())
        )
    }

    /// Save the current clip as `<word>.mp3` inside `dir`
    pub async fn download(
        &self,
        client: &reqwest::Client,
        dir: &Path,
        word: &str,
    ) -> Result<PathBuf> {
        let source = self.source.as_deref().context("No audio loaded")?;

        let response = client.get(source).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        let path = dir.join(format!("{}.mp3", word));
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(path = %path.display(), bytes = bytes.len(), "Pronunciation downloaded");
        Ok(path)
    }
}

// =============================================================================
// WAVEFORM
// =============================================================================

type FrameSink = Arc<dyn Fn(&[f32]) + Send + Sync>;

/// Cosmetic bar animation shown while audio plays.
/// Each frame hands random bar heights to the sink; stopping hands it the
/// rest heights.
pub struct Waveform {
    sink: FrameSink,
    seed: Option<u64>,
    task: Option<JoinHandle<()>>,
}

impl Waveform {
    pub fn new(sink: impl Fn(&[f32]) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
            seed: None,
            task: None,
        }
    }

    /// Same as [`Waveform::new`] but with reproducible frames
    pub fn seeded(sink: impl Fn(&[f32]) + Send + Sync + 'static, seed: u64) -> Self {
        let mut waveform = Self::new(sink);
        waveform.seed = Some(seed);
        waveform
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Start emitting frames. Must be called inside a Tokio runtime.
    pub fn start(&mut self) {
        if self.task.is_some() {
            return;
        }

        let sink = self.sink.clone();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_millis(WAVEFORM_FRAME_MS));
            loop {
                interval.tick().await;
                let heights: Vec<f32> = (0..WAVEFORM_BARS)
                    .map(|_| rng.random_range(5.0..25.0))
                    .collect();
                sink(&heights);
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        (self.sink)(&[WAVEFORM_REST_HEIGHT; WAVEFORM_BARS]);
    }
}

impl Drop for Waveform {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
