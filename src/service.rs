//! Meditation pipeline orchestration.
//!
//! Owns the script writer, voice synthesizer, and session store.
//! Constructed once at startup and shared with the HTTP handlers.

use std::time::Instant;

use tracing::{error, info};

use crate::config::Config;
use crate::error::MeditateError;
use crate::scriptwriter::ScriptWriter;
use crate::store::{SessionRecord, SessionStore};
use crate::synthesizer::VoiceSynthesizer;

/// Most records a history query returns.
pub const HISTORY_LIMIT: usize = 10;

pub struct MeditationService {
    scriptwriter: ScriptWriter,
    synthesizer: VoiceSynthesizer,
    store: SessionStore,
}

impl MeditationService {
    pub fn new(config: &Config, store: SessionStore) -> Self {
        Self {
            scriptwriter: ScriptWriter::new(&config.openai),
            synthesizer: VoiceSynthesizer::new(&config.elevenlabs),
            store,
        }
    }

    /// Run the full pipeline for one mood: script → audio → record.
    ///
    /// The record is written before the audio is released to the caller, so
    /// a store fault fails the whole request even though synthesis already
    /// succeeded.
    pub async fn meditate(&self, mood: &str) -> Result<Vec<u8>, MeditateError> {
        let t_start = Instant::now();

        let transcript = self.scriptwriter.write_script(mood).await?;
        let audio = self.synthesizer.synthesize(&transcript).await?;

        let store = self.store.clone();
        let mood_owned = mood.to_string();
        let insert =
            tokio::task::spawn_blocking(move || store.insert_session(&mood_owned, &transcript))
                .await
                .map_err(|e| MeditateError::Internal(format!("store task failed: {e}")))?;

        let session_id = match insert {
            Ok(id) => id,
            Err(e) => {
                error!("Session insert failed after successful synthesis: {e}");
                return Err(e.into());
            }
        };

        let total_ms = t_start.elapsed().as_secs_f64() * 1000.0;
        info!(
            "Meditation ready: mood \"{mood}\", session {session_id}, {} audio bytes ({total_ms:.0}ms)",
            audio.len()
        );
        Ok(audio)
    }

    /// The most recent sessions, newest first.
    pub async fn history(&self) -> Result<Vec<SessionRecord>, MeditateError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.recent_sessions(HISTORY_LIMIT))
            .await
            .map_err(|e| MeditateError::Internal(format!("store task failed: {e}")))?
            .map_err(MeditateError::from)
    }
}
