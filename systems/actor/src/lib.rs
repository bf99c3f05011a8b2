#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player-controlled actor: movement with collision, pointer facing and
//! interaction with the objects of the world.

use glam::Vec2;
use word_meadow_core::{
    CellKind, Facing, Language, LedgerEntry, RegionCoord, TileCoord, ViewPoint, WorldPoint,
    TILE_LENGTH,
};
use word_meadow_system_progress::ProgressTracker;
use word_meadow_world::{TileQuery, WorldIndex};

/// Distance travelled per move step at walking pace.
pub const DEFAULT_NORMAL_SPEED: f32 = 3.0;

/// Distance travelled per move step while sprinting.
pub const DEFAULT_SPRINT_SPEED: f32 = 8.0;

/// Maximum distance between the actor centre and an interaction point.
pub const DEFAULT_INTERACTION_RANGE: f32 = 150.0;

/// Tunable movement and interaction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorConfig {
    normal_speed: f32,
    sprint_speed: f32,
    interaction_range: f32,
}

impl ActorConfig {
    /// Creates a configuration from explicit speeds and range.
    #[must_use]
    pub const fn new(normal_speed: f32, sprint_speed: f32, interaction_range: f32) -> Self {
        Self {
            normal_speed,
            sprint_speed,
            interaction_range,
        }
    }

    /// Walking speed in world units per step.
    #[must_use]
    pub const fn normal_speed(&self) -> f32 {
        self.normal_speed
    }

    /// Sprinting speed in world units per step.
    #[must_use]
    pub const fn sprint_speed(&self) -> f32 {
        self.sprint_speed
    }

    /// Maximum interaction distance in world units.
    #[must_use]
    pub const fn interaction_range(&self) -> f32 {
        self.interaction_range
    }
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_NORMAL_SPEED,
            DEFAULT_SPRINT_SPEED,
            DEFAULT_INTERACTION_RANGE,
        )
    }
}

/// Result of a movement request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    /// No movement was requested.
    Idle,
    /// The actor moved.
    Moved {
        /// Position before the move.
        from: WorldPoint,
        /// Position after the move.
        to: WorldPoint,
    },
    /// The destination tile was impassable; the position is unchanged.
    Blocked {
        /// Tile the actor attempted to enter.
        tile: TileCoord,
    },
}

/// Result of a successful interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    /// The object was revealed for the first time and its word recorded.
    Revealed {
        /// Tile of the object.
        tile: TileCoord,
        /// Kind of the object.
        kind: CellKind,
        /// Ledger entry after recording the view.
        entry: LedgerEntry,
    },
    /// An already revealed object flipped between word and translation.
    TranslationToggled {
        /// Tile of the object.
        tile: TileCoord,
        /// Whether the translation is now shown.
        shown: bool,
        /// Ledger entry for the active language, if one exists.
        entry: Option<LedgerEntry>,
    },
}

/// Player-controlled actor occupying a one-tile body.
#[derive(Clone, Debug)]
pub struct Actor {
    config: ActorConfig,
    position: Vec2,
    facing: Facing,
    sprinting: bool,
    pointer: Option<Vec2>,
    target: Option<TileCoord>,
}

impl Actor {
    /// Creates an actor whose body's top-left corner sits at `position`.
    #[must_use]
    pub fn new(config: ActorConfig, position: WorldPoint) -> Self {
        Self {
            config,
            position: to_vec(position),
            facing: Facing::default(),
            sprinting: false,
            pointer: None,
            target: None,
        }
    }

    /// Configuration the actor was created with.
    #[must_use]
    pub const fn config(&self) -> ActorConfig {
        self.config
    }

    /// Top-left corner of the actor's body.
    #[must_use]
    pub fn position(&self) -> WorldPoint {
        to_point(self.position)
    }

    /// Centre of the actor's body.
    #[must_use]
    pub fn center(&self) -> WorldPoint {
        to_point(self.center_vec())
    }

    /// Tile containing the actor's position.
    #[must_use]
    pub fn tile(&self) -> TileCoord {
        self.position().tile()
    }

    /// Region containing the actor's position.
    #[must_use]
    pub fn region(&self) -> RegionCoord {
        self.tile().region()
    }

    /// Direction the actor currently faces.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Speed of the tier selected by the last movement request.
    #[must_use]
    pub fn speed(&self) -> f32 {
        if self.sprinting {
            self.config.sprint_speed
        } else {
            self.config.normal_speed
        }
    }

    /// Tile of the object the pointer currently rests on, if any.
    #[must_use]
    pub const fn target(&self) -> Option<TileCoord> {
        self.target
    }

    /// Last pointer position in world space.
    #[must_use]
    pub fn pointer(&self) -> Option<WorldPoint> {
        self.pointer.map(to_point)
    }

    /// Moves by the requested direction scaled by the selected speed tier.
    ///
    /// Only the tile of the combined destination is tested, so a diagonal step
    /// may pass between two impassable tiles that touch at a corner. A zero
    /// request, or one whose destination is not finite, is idle. The target
    /// is refreshed either way.
    pub fn move_by<W>(&mut self, dx: f32, dy: f32, world: &mut W, sprinting: bool) -> MoveOutcome
    where
        W: TileQuery + ?Sized,
    {
        self.sprinting = sprinting;
        let step = Vec2::new(dx, dy);
        let from = self.position;
        let to = from + step * self.speed();
        if step == Vec2::ZERO || !to.is_finite() {
            self.refresh_target(world);
            return MoveOutcome::Idle;
        }

        if let Some(facing) = facing_from_step(dx, dy) {
            self.facing = facing;
        }

        let tile = to_point(to).tile();

        let outcome = if world.is_passable(tile) {
            self.position = to;
            MoveOutcome::Moved {
                from: to_point(from),
                to: to_point(to),
            }
        } else {
            tracing::trace!(x = tile.x(), y = tile.y(), "move blocked");
            MoveOutcome::Blocked { tile }
        };

        self.refresh_target(world);
        outcome
    }

    /// Turns toward the pointer and returns the tile beneath it.
    ///
    /// The axis with the larger offset from the actor centre decides the
    /// facing; equal offsets resolve vertically and a zero offset keeps the
    /// current facing.
    pub fn resolve_facing_tile(&mut self, pointer: ViewPoint, camera: WorldPoint) -> TileCoord {
        let world_pointer = WorldPoint::from_view(pointer, camera);
        let pointer_vec = to_vec(world_pointer);
        self.pointer = Some(pointer_vec);

        let offset = pointer_vec - self.center_vec();
        if offset != Vec2::ZERO {
            self.facing = if offset.x.abs() > offset.y.abs() {
                if offset.x > 0.0 {
                    Facing::Right
                } else {
                    Facing::Left
                }
            } else if offset.y > 0.0 {
                Facing::Down
            } else {
                Facing::Up
            };
        }

        world_pointer.tile()
    }

    /// Recomputes the interaction target from the last pointer position.
    pub fn refresh_target<W>(&mut self, world: &mut W)
    where
        W: TileQuery + ?Sized,
    {
        self.target = self.pointer.and_then(|pointer| {
            let tile = to_point(pointer).tile();
            world.entity_kind_at(tile).map(|_| tile)
        });
    }

    /// Whether `point` lies within `max_range` of the actor centre.
    #[must_use]
    pub fn within_reach(&self, point: WorldPoint, max_range: f32) -> bool {
        self.center_vec().distance(to_vec(point)) <= max_range
    }

    /// Interacts with the object at `pointer_world`.
    ///
    /// Returns `None` without touching the world or the ledger when the point
    /// is out of range or no object is materialized there.
    pub fn interact(
        &self,
        pointer_world: WorldPoint,
        max_range: f32,
        world: &mut WorldIndex,
        tracker: &mut ProgressTracker,
        language: Language,
    ) -> Option<Interaction> {
        if !self.within_reach(pointer_world, max_range) {
            return None;
        }

        let tile = pointer_world.tile();
        let entity = world.entity_at_mut(tile)?;
        let kind = entity.kind();

        if entity.reveal() {
            let entry = tracker.reveal(kind, language);
            tracing::debug!(x = tile.x(), y = tile.y(), word = %entry.word, "object revealed");
            return Some(Interaction::Revealed { tile, kind, entry });
        }

        let shown = entity.toggle_translation();
        Some(Interaction::TranslationToggled {
            tile,
            shown,
            entry: tracker.entry(language, kind).cloned(),
        })
    }

    fn center_vec(&self) -> Vec2 {
        self.position + Vec2::splat(TILE_LENGTH / 2.0)
    }
}

/// Facing for the dominant component of a step; ties keep the current one.
fn facing_from_step(dx: f32, dy: f32) -> Option<Facing> {
    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 { Facing::Right } else { Facing::Left })
    } else if dy.abs() > dx.abs() {
        Some(if dy > 0.0 { Facing::Down } else { Facing::Up })
    } else {
        None
    }
}

fn to_vec(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x, point.y)
}

fn to_point(vec: Vec2) -> WorldPoint {
    WorldPoint::new(vec.x, vec.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_component_decides_facing() {
        assert_eq!(facing_from_step(1.0, -0.5), Some(Facing::Right));
        assert_eq!(facing_from_step(-1.0, 0.0), Some(Facing::Left));
        assert_eq!(facing_from_step(0.2, -1.0), Some(Facing::Up));
        assert_eq!(facing_from_step(-0.5, 1.0), Some(Facing::Down));
        assert_eq!(facing_from_step(1.0, 1.0), None);
        assert_eq!(facing_from_step(-1.0, 1.0), None);
        assert_eq!(facing_from_step(0.0, 0.0), None);
    }

    #[test]
    fn centre_is_half_a_tile_from_the_corner() {
        let actor = Actor::new(ActorConfig::default(), WorldPoint::new(-32.0, 64.0));
        assert_eq!(actor.center(), WorldPoint::new(-16.0, 80.0));
        assert_eq!(actor.tile(), TileCoord::new(-1, 2));
        assert_eq!(actor.region(), RegionCoord::new(-1, 0));
    }

    #[test]
    fn pointer_facing_prefers_the_larger_offset() {
        let mut actor = Actor::new(ActorConfig::default(), WorldPoint::ORIGIN);
        let camera = WorldPoint::ORIGIN;

        let tile = actor.resolve_facing_tile(ViewPoint::new(100.0, 20.0), camera);
        assert_eq!(actor.facing(), Facing::Right);
        assert_eq!(tile, TileCoord::new(3, 0));

        let _ = actor.resolve_facing_tile(ViewPoint::new(-60.0, 10.0), camera);
        assert_eq!(actor.facing(), Facing::Left);

        let _ = actor.resolve_facing_tile(ViewPoint::new(16.0, -50.0), camera);
        assert_eq!(actor.facing(), Facing::Up);

        // Equal offsets resolve vertically.
        let _ = actor.resolve_facing_tile(ViewPoint::new(26.0, 26.0), camera);
        assert_eq!(actor.facing(), Facing::Down);

        let _ = actor.resolve_facing_tile(ViewPoint::new(-100.0, 0.0), camera);
        let _ = actor.resolve_facing_tile(ViewPoint::new(16.0, 16.0), camera);
        assert_eq!(actor.facing(), Facing::Left, "zero offset keeps facing");
    }

    #[test]
    fn pointer_is_translated_by_the_camera() {
        let mut actor = Actor::new(ActorConfig::default(), WorldPoint::new(320.0, 320.0));
        let tile = actor.resolve_facing_tile(ViewPoint::new(10.0, 10.0), WorldPoint::new(300.0, 300.0));
        assert_eq!(tile, TileCoord::new(9, 9));
        assert_eq!(actor.pointer(), Some(WorldPoint::new(310.0, 310.0)));
        assert_eq!(actor.facing(), Facing::Up);
    }

    #[test]
    fn speed_follows_the_last_tier() {
        struct Open;
        impl TileQuery for Open {
            fn is_passable(&mut self, _tile: TileCoord) -> bool {
                true
            }
            fn entity_kind_at(&mut self, _tile: TileCoord) -> Option<CellKind> {
                None
            }
        }

        let mut actor = Actor::new(ActorConfig::default(), WorldPoint::ORIGIN);
        let _ = actor.move_by(1.0, 0.0, &mut Open, true);
        assert_eq!(actor.speed(), DEFAULT_SPRINT_SPEED);
        assert_eq!(actor.position(), WorldPoint::new(8.0, 0.0));

        let _ = actor.move_by(0.0, 1.0, &mut Open, false);
        assert_eq!(actor.speed(), DEFAULT_NORMAL_SPEED);
        assert_eq!(actor.position(), WorldPoint::new(8.0, 3.0));
    }
}
