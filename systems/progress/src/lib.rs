#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Vocabulary progress ledger and scoring.
//!
//! Every (language, cell kind) pair moves through
//! `Unseen -> Seen -> Mastered` and never regresses. The tracker is the single
//! source of truth for mastery; entities only project it.

use std::collections::BTreeMap;

use word_meadow_core::{CellKind, Language, LedgerEntry, MasteryLedger, MASTERY_THRESHOLD};

/// Score awarded the first time a word is revealed.
pub const FIRST_VIEW_BONUS: u32 = 10;

/// Score awarded for each further view before mastery.
pub const VIEW_BONUS: u32 = 2;

/// Score awarded when a word reaches the mastery threshold.
pub const MASTERY_BONUS: u32 = 50;

/// Learning records grouped by language and cell kind.
pub type Ledger = BTreeMap<Language, BTreeMap<CellKind, LedgerEntry>>;

/// Per-language word-learning ledger plus the running score.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressTracker {
    score: u32,
    ledger: Ledger,
}

impl ProgressTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a tracker from previously captured state.
    #[must_use]
    pub fn from_parts(score: u32, ledger: Ledger) -> Self {
        Self { score, ledger }
    }

    /// Records a reveal of `kind` in `language` and returns the updated entry.
    pub fn reveal(&mut self, kind: CellKind, language: Language) -> LedgerEntry {
        let entries = self.ledger.entry(language).or_default();

        let Some(entry) = entries.get_mut(&kind) else {
            let entry = LedgerEntry::first_view(kind, language);
            let _ = entries.insert(kind, entry.clone());
            self.score = self.score.saturating_add(FIRST_VIEW_BONUS);
            tracing::debug!(kind = kind.name(), language = language.name(), "first view");
            return entry;
        };

        entry.views = entry.views.saturating_add(1);
        if entry.mastered {
            return entry.clone();
        }

        if entry.views >= MASTERY_THRESHOLD {
            entry.mastered = true;
            self.score = self.score.saturating_add(MASTERY_BONUS);
            tracing::debug!(kind = kind.name(), language = language.name(), "word mastered");
        } else {
            self.score = self.score.saturating_add(VIEW_BONUS);
        }
        entry.clone()
    }

    /// Entry recorded for `kind` in `language`, if any.
    #[must_use]
    pub fn entry(&self, language: Language, kind: CellKind) -> Option<&LedgerEntry> {
        self.ledger.get(&language)?.get(&kind)
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Full ledger, for persistence.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Share of mastered words in `language`, in percent.
    ///
    /// Zero when nothing has been revealed in that language.
    #[must_use]
    pub fn mastery_percentage(&self, language: Language) -> f32 {
        let Some(entries) = self.ledger.get(&language) else {
            return 0.0;
        };
        if entries.is_empty() {
            return 0.0;
        }

        let mastered = entries.values().filter(|entry| entry.mastered).count();
        mastered as f32 / entries.len() as f32 * 100.0
    }

    /// Words learned in `language`, mastered ones first, then by word.
    #[must_use]
    pub fn vocabulary(&self, language: Language) -> Vec<(CellKind, &LedgerEntry)> {
        let mut words: Vec<_> = self
            .ledger
            .get(&language)
            .map(|entries| entries.iter().map(|(kind, entry)| (*kind, entry)).collect())
            .unwrap_or_default();
        words.sort_by(|(_, left), (_, right)| {
            right
                .mastered
                .cmp(&left.mastered)
                .then_with(|| left.word.cmp(&right.word))
        });
        words
    }
}

impl MasteryLedger for ProgressTracker {
    fn is_mastered(&self, language: Language, kind: CellKind) -> bool {
        self.entry(language, kind).map_or(false, |entry| entry.mastered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reveal_creates_entry_and_awards_bonus() {
        let mut tracker = ProgressTracker::new();
        let entry = tracker.reveal(CellKind::Water, Language::French);
        assert_eq!(entry.word, "eau");
        assert_eq!(entry.english, "water");
        assert_eq!(entry.views, 1);
        assert!(!entry.mastered);
        assert_eq!(tracker.score(), FIRST_VIEW_BONUS);
    }

    #[test]
    fn languages_are_tracked_independently() {
        let mut tracker = ProgressTracker::new();
        let _ = tracker.reveal(CellKind::Tree, Language::Spanish);
        let _ = tracker.reveal(CellKind::Tree, Language::French);
        assert_eq!(tracker.entry(Language::Spanish, CellKind::Tree).map(|e| e.views), Some(1));
        assert_eq!(tracker.entry(Language::French, CellKind::Tree).map(|e| e.views), Some(1));
        assert_eq!(tracker.score(), 2 * FIRST_VIEW_BONUS);
    }

    #[test]
    fn mastery_percentage_is_zero_without_entries() {
        let tracker = ProgressTracker::new();
        assert_eq!(tracker.mastery_percentage(Language::Spanish), 0.0);
    }

    #[test]
    fn mastery_percentage_is_zero_for_empty_language_map() {
        let mut ledger = Ledger::new();
        let _ = ledger.insert(Language::French, BTreeMap::new());
        let tracker = ProgressTracker::from_parts(0, ledger);
        assert_eq!(tracker.mastery_percentage(Language::French), 0.0);
    }

    #[test]
    fn vocabulary_lists_mastered_words_first() {
        let mut tracker = ProgressTracker::new();
        let _ = tracker.reveal(CellKind::Tree, Language::Spanish);
        let _ = tracker.reveal(CellKind::Water, Language::Spanish);
        for _ in 0..MASTERY_THRESHOLD {
            let _ = tracker.reveal(CellKind::House, Language::Spanish);
        }

        let words: Vec<_> = tracker
            .vocabulary(Language::Spanish)
            .into_iter()
            .map(|(_, entry)| entry.word.as_str())
            .collect();
        assert_eq!(words, vec!["casa", "agua", "árbol"]);
        assert!(tracker.vocabulary(Language::French).is_empty());
    }

    #[test]
    fn mastery_projection_follows_the_ledger() {
        let mut tracker = ProgressTracker::new();
        assert!(!tracker.is_mastered(Language::Spanish, CellKind::Bird));
        for _ in 0..MASTERY_THRESHOLD {
            let _ = tracker.reveal(CellKind::Bird, Language::Spanish);
        }
        assert!(tracker.is_mastered(Language::Spanish, CellKind::Bird));
        assert!(!tracker.is_mastered(Language::French, CellKind::Bird));
    }
}
