use anyhow::{bail, Result};
use word_meadow_core::{Command, Facing, Language, ViewPoint, TILE_LENGTH};
use word_meadow_session::{query, Session};

/// One instruction of a scripted walk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Step {
    /// Move one step in a direction.
    Move { dx: f32, dy: f32, sprinting: bool },
    /// Interact with the tile the actor faces.
    Interact,
    /// Switch the learned language.
    Select(Language),
}

/// Parses a walk script.
///
/// `w`, `a`, `s` and `d` walk up, left, down and right; the upper-case
/// letters sprint. `e` interacts with the faced tile, `1` selects Spanish and
/// `2` selects French. Whitespace is ignored.
pub(crate) fn parse_script(script: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::with_capacity(script.len());
    for (index, symbol) in script.chars().enumerate() {
        let step = match symbol {
            'w' | 'W' => move_step(0.0, -1.0, symbol.is_uppercase()),
            'a' | 'A' => move_step(-1.0, 0.0, symbol.is_uppercase()),
            's' | 'S' => move_step(0.0, 1.0, symbol.is_uppercase()),
            'd' | 'D' => move_step(1.0, 0.0, symbol.is_uppercase()),
            'e' => Step::Interact,
            '1' => Step::Select(Language::Spanish),
            '2' => Step::Select(Language::French),
            _ if symbol.is_whitespace() => continue,
            _ => bail!("unexpected symbol `{symbol}` at position {index} of the walk script"),
        };
        steps.push(step);
    }
    Ok(steps)
}

const fn move_step(dx: f32, dy: f32, sprinting: bool) -> Step {
    Step::Move { dx, dy, sprinting }
}

/// Translates a step into a session command using the current camera.
pub(crate) fn command_for(step: Step, session: &Session) -> Command {
    match step {
        Step::Move { dx, dy, sprinting } => Command::Move { dx, dy, sprinting },
        Step::Interact => Command::Interact {
            pointer: faced_pointer(session),
        },
        Step::Select(language) => Command::SelectLanguage { language },
    }
}

fn faced_pointer(session: &Session) -> ViewPoint {
    let center = query::actor(session).center();
    let (dx, dy) = match query::facing(session) {
        Facing::Up => (0.0, -TILE_LENGTH),
        Facing::Right => (TILE_LENGTH, 0.0),
        Facing::Down => (0.0, TILE_LENGTH),
        Facing::Left => (-TILE_LENGTH, 0.0),
    };
    let camera = query::camera(session);
    ViewPoint::new(center.x + dx - camera.x, center.y + dy - camera.y)
}

#[cfg(test)]
mod tests {
    use word_meadow_core::WorldPoint;
    use word_meadow_session::SessionConfig;

    use super::*;

    #[test]
    fn script_symbols_map_to_steps() {
        let steps = parse_script("wD e 12").expect("script should parse");
        assert_eq!(
            steps,
            vec![
                move_step(0.0, -1.0, false),
                move_step(1.0, 0.0, true),
                Step::Interact,
                Step::Select(Language::Spanish),
                Step::Select(Language::French),
            ]
        );
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        let error = parse_script("wwx").expect_err("x is not a step");
        assert!(error.to_string().contains("position 2"));
    }

    #[test]
    fn interaction_targets_the_faced_tile() {
        let session = Session::new(SessionConfig::default());
        let Command::Interact { pointer } = command_for(Step::Interact, &session) else {
            panic!("expected an interaction");
        };
        let world = WorldPoint::from_view(pointer, query::camera(&session));
        assert_eq!(world, WorldPoint::new(16.0, 48.0));
    }
}
