#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative Word Meadow session.
//!
//! A [`Session`] owns the streamed world, the actor and the learning ledger.
//! Adapters mutate it exclusively through [`apply`] and read it through the
//! [`query`] module.

use word_meadow_core::{Command, Event, Language, WorldPoint};
use word_meadow_system_actor::{Actor, ActorConfig, Interaction, MoveOutcome};
use word_meadow_system_progress::ProgressTracker;
use word_meadow_world::{WorldConfig, WorldIndex};

/// Default view width in world units.
pub const DEFAULT_VIEW_WIDTH: f32 = 800.0;

/// Default view height in world units.
pub const DEFAULT_VIEW_HEIGHT: f32 = 600.0;

/// Size of the view the camera frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a viewport. Negative or non-finite extents collapse to zero.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    /// View width in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// View height in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT)
    }
}

fn sanitize_extent(extent: f32) -> f32 {
    if extent.is_finite() {
        extent.max(0.0)
    } else {
        0.0
    }
}

/// Parameters used to construct a session.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionConfig {
    world: WorldConfig,
    actor: ActorConfig,
    viewport: Viewport,
}

impl SessionConfig {
    /// Creates a session configuration from its parts.
    #[must_use]
    pub const fn new(world: WorldConfig, actor: ActorConfig, viewport: Viewport) -> Self {
        Self {
            world,
            actor,
            viewport,
        }
    }

    /// World streaming parameters.
    #[must_use]
    pub const fn world(&self) -> WorldConfig {
        self.world
    }

    /// Actor movement and interaction parameters.
    #[must_use]
    pub const fn actor(&self) -> ActorConfig {
        self.actor
    }

    /// Initial viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Streamed world, actor and ledger of one player.
#[derive(Debug)]
pub struct Session {
    world: WorldIndex,
    actor: Actor,
    progress: ProgressTracker,
    language: Language,
    viewport: Viewport,
    camera: WorldPoint,
}

impl Session {
    /// Starts a fresh session with the actor at the world origin.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::resume(
            config,
            WorldPoint::ORIGIN,
            Language::default(),
            ProgressTracker::new(),
        )
    }

    /// Resumes a session from previously captured player state.
    #[must_use]
    pub fn resume(
        config: SessionConfig,
        position: WorldPoint,
        language: Language,
        progress: ProgressTracker,
    ) -> Self {
        let mut session = Self {
            world: WorldIndex::with_config(config.world()),
            actor: Actor::new(config.actor(), position),
            progress,
            language,
            viewport: config.viewport(),
            camera: WorldPoint::ORIGIN,
        };
        session.follow_actor();
        let _ = session.stream_around_actor();
        session
    }

    fn follow_actor(&mut self) {
        let position = self.actor.position();
        self.camera = WorldPoint::new(
            position.x - self.viewport.width() / 2.0,
            position.y - self.viewport.height() / 2.0,
        );
    }

    fn stream_around_actor(&mut self) -> Option<Event> {
        let change = self.world.update_active_set(self.actor.region());
        // Entity lists of the active set are kept built for read-only queries.
        let _ = self.world.active_entities();
        if change.is_empty() {
            return None;
        }
        Some(Event::ActiveSetChanged {
            activated: change.activated,
            deactivated: change.deactivated,
        })
    }
}

/// Applies the provided command to the session, emitting resulting events.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureViewport { width, height } => {
            session.viewport = Viewport::new(width, height);
            session.follow_actor();
        }
        Command::Move { dx, dy, sprinting } => {
            let facing = session.actor.facing();
            match session.actor.move_by(dx, dy, &mut session.world, sprinting) {
                MoveOutcome::Idle => {}
                MoveOutcome::Moved { from, to } => {
                    out_events.push(Event::ActorMoved { from, to });
                }
                MoveOutcome::Blocked { tile } => {
                    out_events.push(Event::MoveBlocked { tile });
                }
            }
            if session.actor.facing() != facing {
                out_events.push(Event::FacingChanged {
                    facing: session.actor.facing(),
                });
            }

            session.follow_actor();
            if let Some(event) = session.stream_around_actor() {
                out_events.push(event);
            }
        }
        Command::PointAt { pointer } => {
            let facing = session.actor.facing();
            let _ = session.actor.resolve_facing_tile(pointer, session.camera);
            session.actor.refresh_target(&mut session.world);
            if session.actor.facing() != facing {
                out_events.push(Event::FacingChanged {
                    facing: session.actor.facing(),
                });
            }
        }
        Command::Interact { pointer } => {
            let pointer_world = WorldPoint::from_view(pointer, session.camera);
            let range = session.actor.config().interaction_range();
            let interaction = session.actor.interact(
                pointer_world,
                range,
                &mut session.world,
                &mut session.progress,
                session.language,
            );
            match interaction {
                Some(Interaction::Revealed { tile, kind, entry }) => {
                    out_events.push(Event::WordRevealed { tile, kind, entry });
                }
                Some(Interaction::TranslationToggled { tile, shown, entry }) => {
                    out_events.push(Event::TranslationToggled { tile, shown, entry });
                }
                None => {}
            }
        }
        Command::SelectLanguage { language } => {
            if session.language != language {
                session.language = language;
                tracing::info!(language = language.name(), "language selected");
                out_events.push(Event::LanguageChanged { language });
            }
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use word_meadow_core::{
        CellKind, Facing, Language, LedgerEntry, MasteryLedger, RegionCoord, TileCoord, WorldPoint,
    };
    use word_meadow_system_actor::Actor;
    use word_meadow_system_progress::ProgressTracker;
    use word_meadow_world::{query as world_query, Entity, WorldIndex};

    use super::{Session, Viewport};

    /// Entity together with its projected mastery state.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EntityView<'a> {
        /// Underlying entity.
        pub entity: &'a Entity,
        /// Whether the entity's kind is mastered in the active language.
        pub mastered: bool,
        /// Text the entity displays: nothing until revealed, then the word or
        /// its translation.
        pub caption: Option<&'static str>,
    }

    fn view<'a>(session: &Session, entity: &'a Entity) -> EntityView<'a> {
        let caption = entity.is_revealed().then(|| {
            if entity.is_translation_shown() {
                entity.kind().reference_label()
            } else {
                entity.kind().label(session.language)
            }
        });
        EntityView {
            entity,
            mastered: session.progress.is_mastered(session.language, entity.kind()),
            caption,
        }
    }

    /// Every entity of the active regions in ascending region order.
    #[must_use]
    pub fn active_entities(session: &Session) -> Vec<EntityView<'_>> {
        world_query::built_active_entities(&session.world)
            .into_iter()
            .map(|entity| view(session, entity))
            .collect()
    }

    /// Entity on the tile, if its region is materialized.
    #[must_use]
    pub fn entity_view(session: &Session, tile: TileCoord) -> Option<EntityView<'_>> {
        world_query::built_entity(&session.world, tile).map(|entity| view(session, entity))
    }

    /// Cell kind of a tile whose region is cached.
    #[must_use]
    pub fn loaded_tile(session: &Session, tile: TileCoord) -> Option<CellKind> {
        world_query::loaded_tile(&session.world, tile)
    }

    /// Coordinates of the active regions in ascending order.
    #[must_use]
    pub fn active_regions(session: &Session) -> Vec<RegionCoord> {
        world_query::active_regions(&session.world)
    }

    /// Read-only access to the streamed world.
    #[must_use]
    pub fn world(session: &Session) -> &WorldIndex {
        &session.world
    }

    /// Read-only access to the actor.
    #[must_use]
    pub fn actor(session: &Session) -> &Actor {
        &session.actor
    }

    /// Read-only access to the learning ledger.
    #[must_use]
    pub fn progress(session: &Session) -> &ProgressTracker {
        &session.progress
    }

    /// Top-left corner of the actor's body.
    #[must_use]
    pub fn actor_position(session: &Session) -> WorldPoint {
        session.actor.position()
    }

    /// Direction the actor faces.
    #[must_use]
    pub fn facing(session: &Session) -> Facing {
        session.actor.facing()
    }

    /// Tile of the object under the pointer, if any.
    #[must_use]
    pub fn target(session: &Session) -> Option<TileCoord> {
        session.actor.target()
    }

    /// Upper-left corner of the view in world space.
    #[must_use]
    pub fn camera(session: &Session) -> WorldPoint {
        session.camera
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(session: &Session) -> Viewport {
        session.viewport
    }

    /// Language being learned.
    #[must_use]
    pub fn language(session: &Session) -> Language {
        session.language
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(session: &Session) -> u32 {
        session.progress.score()
    }

    /// Share of mastered words in the active language, in percent.
    #[must_use]
    pub fn mastery_percentage(session: &Session) -> f32 {
        session.progress.mastery_percentage(session.language)
    }

    /// Words learned in the active language, mastered ones first.
    #[must_use]
    pub fn vocabulary(session: &Session) -> Vec<(CellKind, &LedgerEntry)> {
        session.progress.vocabulary(session.language)
    }

    /// Compass heading of the actor as seen from the world origin.
    ///
    /// Degrees clockwise from north in `[0, 360)`; zero at the origin.
    #[must_use]
    pub fn heading_from_origin(session: &Session) -> f32 {
        let position = session.actor.position();
        if position.x == 0.0 && position.y == 0.0 {
            return 0.0;
        }
        let angle = position.x.atan2(-position.y).to_degrees();
        if angle < 0.0 {
            angle + 360.0
        } else {
            angle
        }
    }
}

#[cfg(test)]
mod tests {
    use word_meadow_core::ViewPoint;

    use super::*;

    #[test]
    fn viewport_rejects_degenerate_extents() {
        let viewport = Viewport::new(-10.0, f32::NAN);
        assert_eq!(viewport.width(), 0.0);
        assert_eq!(viewport.height(), 0.0);
    }

    #[test]
    fn camera_centres_the_actor() {
        let session = Session::new(SessionConfig::default());
        assert_eq!(query::camera(&session), WorldPoint::new(-400.0, -300.0));
    }

    #[test]
    fn resizing_the_viewport_moves_the_camera() {
        let mut session = Session::new(SessionConfig::default());
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::ConfigureViewport {
                width: 320.0,
                height: 240.0,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::camera(&session), WorldPoint::new(-160.0, -120.0));
    }

    #[test]
    fn selecting_the_active_language_is_silent() {
        let mut session = Session::new(SessionConfig::default());
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::SelectLanguage {
                language: Language::Spanish,
            },
            &mut events,
        );
        assert!(events.is_empty());

        apply(
            &mut session,
            Command::SelectLanguage {
                language: Language::French,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::LanguageChanged {
                language: Language::French
            }]
        );
        assert_eq!(query::language(&session), Language::French);
    }

    #[test]
    fn pointing_turns_the_actor() {
        let mut session = Session::new(SessionConfig::default());
        let mut events = Vec::new();
        // The camera places the actor's corner at the view centre.
        apply(
            &mut session,
            Command::PointAt {
                pointer: ViewPoint::new(600.0, 316.0),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::FacingChanged {
                facing: word_meadow_core::Facing::Right
            }]
        );
    }
}
