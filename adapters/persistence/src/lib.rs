#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Save-state record for Word Meadow sessions.
//!
//! The record stores the score, the learning ledger, the actor position and
//! the selected language as JSON. World content is never saved; it is
//! regenerated from region coordinates on load.

use serde::{Deserialize, Serialize};
use word_meadow_core::{Language, WorldPoint};
use word_meadow_session::{query, Session, SessionConfig};
use word_meadow_system_progress::{Ledger, ProgressTracker};

/// Conventional file name of the save record.
pub const SAVE_FILE_NAME: &str = "save_game.json";

/// Errors produced while encoding or decoding a save record.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The record could not be serialised.
    #[error("could not encode save state: {0}")]
    Encode(#[source] serde_json::Error),
    /// The text was not a well-formed save record.
    #[error("could not parse save state: {0}")]
    Decode(#[source] serde_json::Error),
    /// A ledger entry claimed it was never viewed.
    #[error("ledger entry '{word}' for {language} records zero views")]
    UnviewedEntry {
        /// Language of the offending entry.
        language: &'static str,
        /// Stored word of the offending entry.
        word: String,
    },
}

/// Persisted player progress.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    /// Accumulated score.
    pub score: u32,
    /// Ledger entries grouped by language and cell kind.
    pub words_learned: Ledger,
    /// Actor position; the origin when absent.
    #[serde(default)]
    pub position: SavedPosition,
    /// Player settings; defaults when absent.
    #[serde(default)]
    pub settings: SavedSettings,
}

/// Persisted top-left corner of the actor's body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedPosition {
    /// Horizontal coordinate in world units.
    #[serde(default)]
    pub x: f32,
    /// Vertical coordinate in world units.
    #[serde(default)]
    pub y: f32,
}

/// Persisted player settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedSettings {
    /// Language being learned.
    #[serde(default)]
    pub language: Language,
}

impl SaveState {
    /// Captures the persistent parts of a session.
    ///
    /// A position that cannot be written as JSON numbers is saved as the origin.
    #[must_use]
    pub fn capture(session: &Session) -> Self {
        let progress = query::progress(session);
        let mut position = query::actor_position(session);
        if !(position.x.is_finite() && position.y.is_finite()) {
            tracing::warn!(x = position.x, y = position.y, "saving non-finite position as origin");
            position = WorldPoint::ORIGIN;
        }
        Self {
            score: progress.score(),
            words_learned: progress.ledger().clone(),
            position: SavedPosition {
                x: position.x,
                y: position.y,
            },
            settings: SavedSettings {
                language: query::language(session),
            },
        }
    }

    /// Resumes a session from the record.
    #[must_use]
    pub fn restore(self, config: SessionConfig) -> Session {
        Session::resume(
            config,
            WorldPoint::new(self.position.x, self.position.y),
            self.settings.language,
            ProgressTracker::from_parts(self.score, self.words_learned),
        )
    }

    /// Encodes the record as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string_pretty(self).map_err(PersistenceError::Encode)
    }

    /// Decodes a record, rejecting anything malformed.
    pub fn from_json(text: &str) -> Result<Self, PersistenceError> {
        let state: Self = serde_json::from_str(text).map_err(PersistenceError::Decode)?;
        state.validate()?;
        Ok(state)
    }

    /// Decodes a record, falling back to a fresh one when the text is malformed.
    #[must_use]
    pub fn load_or_default(text: &str) -> Self {
        match Self::from_json(text) {
            Ok(state) => state,
            Err(error) => {
                tracing::warn!(%error, "discarding unreadable save state");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), PersistenceError> {
        for (language, entries) in &self.words_learned {
            if let Some(entry) = entries.values().find(|entry| entry.views == 0) {
                return Err(PersistenceError::UnviewedEntry {
                    language: language.name(),
                    word: entry.word.clone(),
                });
            }
        }
        Ok(())
    }
}
