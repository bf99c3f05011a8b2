use word_meadow_core::{CellKind, Language, MasteryLedger, MASTERY_THRESHOLD};
use word_meadow_system_progress::{ProgressTracker, FIRST_VIEW_BONUS, MASTERY_BONUS, VIEW_BONUS};

#[test]
fn fifth_reveal_masters_the_word() {
    let mut tracker = ProgressTracker::new();

    for view in 1..MASTERY_THRESHOLD {
        let entry = tracker.reveal(CellKind::Tree, Language::Spanish);
        assert_eq!(entry.views, view);
        assert!(!entry.mastered, "mastered too early at view {view}");
        assert_eq!(tracker.mastery_percentage(Language::Spanish), 0.0);
    }

    let entry = tracker.reveal(CellKind::Tree, Language::Spanish);
    assert_eq!(entry.word, "árbol");
    assert_eq!(entry.views, MASTERY_THRESHOLD);
    assert!(entry.mastered);
    assert_eq!(tracker.mastery_percentage(Language::Spanish), 100.0);
    assert_eq!(
        tracker.score(),
        FIRST_VIEW_BONUS + 3 * VIEW_BONUS + MASTERY_BONUS
    );
}

#[test]
fn mastered_words_earn_nothing_further() {
    let mut tracker = ProgressTracker::new();
    for _ in 0..MASTERY_THRESHOLD {
        let _ = tracker.reveal(CellKind::Rabbit, Language::French);
    }
    let score = tracker.score();

    let entry = tracker.reveal(CellKind::Rabbit, Language::French);
    assert_eq!(entry.views, MASTERY_THRESHOLD + 1);
    assert!(entry.mastered);
    assert_eq!(tracker.score(), score);
}

#[test]
fn mastery_percentage_counts_only_the_requested_language() {
    let mut tracker = ProgressTracker::new();
    for _ in 0..MASTERY_THRESHOLD {
        let _ = tracker.reveal(CellKind::House, Language::Spanish);
    }
    let _ = tracker.reveal(CellKind::Water, Language::Spanish);
    let _ = tracker.reveal(CellKind::Bird, Language::French);

    assert_eq!(tracker.mastery_percentage(Language::Spanish), 50.0);
    assert_eq!(tracker.mastery_percentage(Language::French), 0.0);
}

#[test]
fn ledger_state_never_regresses() {
    let mut tracker = ProgressTracker::new();
    let sequence = [
        CellKind::Tree,
        CellKind::Water,
        CellKind::Tree,
        CellKind::Flower,
        CellKind::Tree,
        CellKind::Water,
        CellKind::Tree,
        CellKind::Tree,
        CellKind::Tree,
        CellKind::Water,
    ];

    let mut previous_score = 0;
    let mut previous: std::collections::BTreeMap<CellKind, (u32, bool)> = std::collections::BTreeMap::new();
    for kind in sequence {
        let _ = tracker.reveal(kind, Language::Spanish);
        assert!(tracker.score() >= previous_score);
        previous_score = tracker.score();

        for (kind, (views, mastered)) in &previous {
            let entry = tracker.entry(Language::Spanish, *kind).expect("entry kept");
            assert!(entry.views >= *views);
            assert!(entry.mastered || !*mastered);
        }
        previous = tracker
            .vocabulary(Language::Spanish)
            .into_iter()
            .map(|(kind, entry)| (kind, (entry.views, entry.mastered)))
            .collect();
    }

    assert!(tracker.is_mastered(Language::Spanish, CellKind::Tree));
    assert!(!tracker.is_mastered(Language::Spanish, CellKind::Water));
}

#[test]
fn restored_tracker_continues_counting() {
    let mut tracker = ProgressTracker::new();
    for _ in 0..3 {
        let _ = tracker.reveal(CellKind::Log, Language::Spanish);
    }

    let mut restored = ProgressTracker::from_parts(tracker.score(), tracker.ledger().clone());
    assert_eq!(restored, tracker);

    let _ = restored.reveal(CellKind::Log, Language::Spanish);
    let entry = restored.reveal(CellKind::Log, Language::Spanish);
    assert!(entry.mastered);
    assert_eq!(restored.score(), tracker.score() + VIEW_BONUS + MASTERY_BONUS);
}
