use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use word_meadow_core::Language;
use word_meadow_session::{SessionConfig, Viewport};
use word_meadow_system_actor::ActorConfig;
use word_meadow_world::WorldConfig;

const SUPPORTED_SETTINGS_VERSION: u32 = 1;
const MAX_RENDER_DISTANCE: u32 = 8;

/// Session parameters resolved from the optional settings file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Settings {
    /// Configuration used to start or resume the session.
    pub(crate) session: SessionConfig,
    /// Language to select after loading, if configured.
    pub(crate) language: Option<Language>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    version: u32,
    language: Option<String>,
    #[serde(default)]
    world: WorldSection,
    #[serde(default)]
    actor: ActorSection,
    #[serde(default)]
    view: ViewSection,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct WorldSection {
    render_distance: Option<u32>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ActorSection {
    normal_speed: Option<f32>,
    sprint_speed: Option<f32>,
    interaction_range: Option<f32>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewSection {
    width: Option<f32>,
    height: Option<f32>,
}

/// Loads settings from the TOML file at `path`.
pub(crate) fn load_settings(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file at {}", path.display()))?;
    parse_settings(&contents)
        .with_context(|| format!("invalid settings file at {}", path.display()))
}

fn parse_settings(contents: &str) -> Result<Settings> {
    let file: SettingsFile =
        toml::from_str(contents).context("failed to parse settings toml contents")?;
    if file.version != SUPPORTED_SETTINGS_VERSION {
        bail!(
            "unsupported settings version {}; expected {}",
            file.version,
            SUPPORTED_SETTINGS_VERSION
        );
    }

    let language = file
        .language
        .map(|name| {
            Language::from_name(&name).with_context(|| format!("unknown language `{name}`"))
        })
        .transpose()?;

    let defaults = SessionConfig::default();
    let world = WorldConfig::new(render_distance(
        file.world.render_distance,
        defaults.world().render_distance(),
    )?);

    let actor_defaults = defaults.actor();
    let actor = ActorConfig::new(
        positive("actor.normal_speed", file.actor.normal_speed, actor_defaults.normal_speed())?,
        positive("actor.sprint_speed", file.actor.sprint_speed, actor_defaults.sprint_speed())?,
        positive(
            "actor.interaction_range",
            file.actor.interaction_range,
            actor_defaults.interaction_range(),
        )?,
    );

    let view_defaults = defaults.viewport();
    let viewport = Viewport::new(
        positive("view.width", file.view.width, view_defaults.width())?,
        positive("view.height", file.view.height, view_defaults.height())?,
    );

    Ok(Settings {
        session: SessionConfig::new(world, actor, viewport),
        language,
    })
}

fn positive(key: &str, value: Option<f32>, default: f32) -> Result<f32> {
    match value {
        None => Ok(default),
        Some(value) if value.is_finite() && value > 0.0 => Ok(value),
        Some(value) => bail!("`{key}` must be a positive number, got {value}"),
    }
}

fn render_distance(value: Option<u32>, default: u32) -> Result<u32> {
    match value {
        None => Ok(default),
        Some(value) if (1..=MAX_RENDER_DISTANCE).contains(&value) => Ok(value),
        Some(value) => bail!(
            "`world.render_distance` must be between 1 and {MAX_RENDER_DISTANCE}, got {value}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file_keeps_defaults() {
        let settings = parse_settings("version = 1").expect("settings should parse");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn sections_override_defaults() {
        let contents = r#"
            version = 1
            language = "french"

            [world]
            render_distance = 1

            [actor]
            sprint_speed = 12.0

            [view]
            width = 1024.0
            height = 768.0
        "#;

        let settings = parse_settings(contents).expect("settings should parse");
        assert_eq!(settings.language, Some(Language::French));
        assert_eq!(settings.session.world().render_distance(), 1);
        assert_eq!(settings.session.actor().sprint_speed(), 12.0);
        assert_eq!(settings.session.actor().normal_speed(), 3.0);
        assert_eq!(settings.session.viewport(), Viewport::new(1024.0, 768.0));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        assert!(parse_settings("version = 2").is_err());
        assert!(parse_settings("language = \"french\"").is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let contents = r#"
            version = 1

            [world]
            seed = 7
        "#;
        assert!(parse_settings(contents).is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(parse_settings("version = 1\nlanguage = \"klingon\"").is_err());
        assert!(parse_settings("version = 1\n[actor]\nnormal_speed = -3.0").is_err());
        assert!(parse_settings("version = 1\n[view]\nwidth = 0.0").is_err());
    }

    #[test]
    fn render_distance_is_bounded() {
        assert!(parse_settings("version = 1\n[world]\nrender_distance = 0").is_err());
        assert!(parse_settings("version = 1\n[world]\nrender_distance = 9").is_err());
        assert!(parse_settings("version = 1\n[world]\nrender_distance = 4000000000").is_err());

        let settings =
            parse_settings("version = 1\n[world]\nrender_distance = 8").expect("upper bound");
        assert_eq!(settings.session.world().render_distance(), MAX_RENDER_DISTANCE);
    }
}
