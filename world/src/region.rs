//! Regions and the entities derived from their grids.

use word_meadow_core::{
    CellKind, Language, LocalCoord, MasteryLedger, RegionCoord, TileCoord, REGION_AREA,
};
use word_meadow_system_generation::{generate, variations, RegionGrid};

/// A generated block of the world plus its lazily built entity list.
#[derive(Debug)]
pub struct Region {
    grid: RegionGrid,
    entities: Option<Vec<Entity>>,
}

impl Region {
    pub(crate) fn generate(coord: RegionCoord) -> Self {
        Self {
            grid: generate(coord),
            entities: None,
        }
    }

    /// Coordinate of the region.
    #[must_use]
    pub fn coord(&self) -> RegionCoord {
        self.grid.coord()
    }

    /// Immutable grid the region was generated with.
    #[must_use]
    pub fn grid(&self) -> &RegionGrid {
        &self.grid
    }

    /// Cell kind stored at the provided local coordinate.
    #[must_use]
    pub fn kind_at(&self, local: LocalCoord) -> Option<CellKind> {
        self.grid.get(local)
    }

    /// Entities of the region, if they were built already.
    #[must_use]
    pub fn built_entities(&self) -> Option<&[Entity]> {
        self.entities.as_deref()
    }

    /// Entities of the region in row-major order, building them on first use.
    pub fn entities(&mut self) -> &[Entity] {
        self.ensure_entities()
    }

    /// Entity occupying the provided local coordinate.
    pub fn entity_at(&mut self, local: LocalCoord) -> Option<&Entity> {
        let index = local.index()?;
        self.ensure_entities().get(index)
    }

    /// Mutable access to the entity occupying the provided local coordinate.
    pub fn entity_at_mut(&mut self, local: LocalCoord) -> Option<&mut Entity> {
        let index = local.index()?;
        self.ensure_entities().get_mut(index)
    }

    fn ensure_entities(&mut self) -> &mut Vec<Entity> {
        let grid = &self.grid;
        self.entities.get_or_insert_with(|| build_entities(grid))
    }
}

fn build_entities(grid: &RegionGrid) -> Vec<Entity> {
    let coord = grid.coord();
    let mut entities = Vec::with_capacity(REGION_AREA);
    for ((local, kind), variation) in grid.iter().zip(variations(coord)) {
        let Some(position) = TileCoord::from_region_local(coord, local) else {
            continue;
        };
        entities.push(Entity {
            position,
            kind,
            revealed: false,
            translation_shown: false,
            variation,
        });
    }
    entities
}

/// A single occupant of a world cell carrying interaction state.
///
/// Identity is the world position. Mastery is never stored on the entity; see
/// [`Entity::is_mastered`].
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    position: TileCoord,
    kind: CellKind,
    revealed: bool,
    translation_shown: bool,
    variation: f32,
}

impl Entity {
    /// Tile occupied by the entity.
    #[must_use]
    pub const fn position(&self) -> TileCoord {
        self.position
    }

    /// Kind of the entity. Fixed for the entity's lifetime.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Whether the player has revealed the entity's word.
    #[must_use]
    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Whether the reference translation is displayed instead of the word.
    #[must_use]
    pub const fn is_translation_shown(&self) -> bool {
        self.translation_shown
    }

    /// Stable value in `[0, 1)` used for visual variation.
    #[must_use]
    pub const fn variation(&self) -> f32 {
        self.variation
    }

    /// Projects the ledger's mastery state for this entity's kind.
    #[must_use]
    pub fn is_mastered(&self, ledger: &dyn MasteryLedger, language: Language) -> bool {
        ledger.is_mastered(language, self.kind)
    }

    /// Marks the entity as revealed. Returns `false` if it already was.
    pub fn reveal(&mut self) -> bool {
        let newly = !self.revealed;
        self.revealed = true;
        newly
    }

    /// Flips the translation flag and reports the new state.
    pub fn toggle_translation(&mut self) -> bool {
        self.translation_shown = !self.translation_shown;
        self.translation_shown
    }
}
