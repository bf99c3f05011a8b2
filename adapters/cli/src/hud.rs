use std::fmt::Write as _;

use word_meadow_session::{query, Session};

const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Nearest of the eight compass points for a heading in degrees.
pub(crate) fn compass_point(heading: f32) -> &'static str {
    let sector = ((heading + 22.5).rem_euclid(360.0) / 45.0) as usize;
    COMPASS_POINTS[sector.min(COMPASS_POINTS.len() - 1)]
}

/// Multi-line summary of the session.
pub(crate) fn render(session: &Session, with_vocabulary: bool) -> String {
    let position = query::actor_position(session);
    let actor = query::actor(session);
    let heading = query::heading_from_origin(session);
    let language = query::language(session);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "position: ({:.1}, {:.1}) tile ({}, {}) region ({}, {})",
        position.x,
        position.y,
        actor.tile().x(),
        actor.tile().y(),
        actor.region().x(),
        actor.region().y(),
    );
    let _ = writeln!(out, "heading: {heading:.0}° {}", compass_point(heading));
    let _ = writeln!(out, "language: {}", language.name());
    let _ = writeln!(out, "score: {}", query::score(session));
    let _ = writeln!(out, "mastery: {:.0}%", query::mastery_percentage(session));
    let _ = writeln!(
        out,
        "regions: {} active, {} cached",
        query::active_regions(session).len(),
        query::world(session).cached_count(),
    );

    if with_vocabulary {
        let vocabulary = query::vocabulary(session);
        if vocabulary.is_empty() {
            let _ = writeln!(out, "no words learned yet");
        }
        for (_, entry) in vocabulary {
            let marker = if entry.mastered { '*' } else { ' ' };
            let _ = writeln!(
                out,
                "{marker} {} = {} ({} views)",
                entry.word, entry.english, entry.views
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use word_meadow_session::SessionConfig;

    use super::*;

    #[test]
    fn compass_points_wrap_around_north() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(350.0), "N");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(200.0), "S");
        assert_eq!(compass_point(300.0), "NW");
    }

    #[test]
    fn fresh_session_summary() {
        let session = Session::new(SessionConfig::default());
        let hud = render(&session, true);
        assert!(hud.contains("position: (0.0, 0.0) tile (0, 0) region (0, 0)"));
        assert!(hud.contains("score: 0"));
        assert!(hud.contains("regions: 21 active, 21 cached"));
        assert!(hud.contains("no words learned yet"));
    }
}
