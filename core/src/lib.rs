#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Word Meadow engine.
//!
//! This crate defines the vocabulary every other crate speaks: the fixed
//! [`CellKind`] catalog, the coordinate spaces used to address the infinite
//! tile world, the learning ledger record, and the message surface that
//! connects adapters with the authoritative session. Adapters submit
//! [`Command`] values describing player intent, the session executes them via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! actually happened.

use serde::{Deserialize, Serialize};

/// Number of tiles along each edge of a square region.
pub const REGION_EDGE: i32 = 16;

/// Number of cells stored by a single region.
pub const REGION_AREA: usize = (REGION_EDGE * REGION_EDGE) as usize;

/// Side length of a single square tile expressed in world units.
pub const TILE_LENGTH: f32 = 32.0;

/// Number of views after which a ledger entry is promoted to mastered.
pub const MASTERY_THRESHOLD: u32 = 5;

/// Languages the player can learn vocabulary in.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Spanish vocabulary.
    #[default]
    Spanish,
    /// French vocabulary.
    French,
}

impl Language {
    /// Every supported language in declaration order.
    pub const ALL: [Language; 2] = [Language::Spanish, Language::French];

    /// Canonical lowercase identifier used in save files and settings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spanish => "spanish",
            Self::French => "french",
        }
    }

    /// Parses a canonical identifier produced by [`Language::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|language| language.name() == name)
    }
}

/// Kinds of occupant a world cell can hold.
///
/// The catalog is fixed: every attribute is a pure function of the variant so
/// cells share their type by value rather than carrying per-cell records.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Dense tree blocking movement.
    Tree,
    /// Open water blocking movement.
    Water,
    /// Boulder blocking movement.
    Stone,
    /// Dwelling blocking movement.
    House,
    /// Default ground cover.
    #[default]
    Grass,
    /// Trodden path crossing regions near the origin.
    Path,
    /// Flower bed, usually beside houses.
    Flower,
    /// Mushroom growing on the ground.
    Mushroom,
    /// Fallen log blocking movement.
    Log,
    /// Shrub blocking movement.
    Bush,
    /// Rabbit resting on grass.
    Rabbit,
    /// Bird perched in a tree or on the ground.
    Bird,
}

impl CellKind {
    /// Every cell kind in declaration order.
    pub const ALL: [CellKind; 12] = [
        CellKind::Tree,
        CellKind::Water,
        CellKind::Stone,
        CellKind::House,
        CellKind::Grass,
        CellKind::Path,
        CellKind::Flower,
        CellKind::Mushroom,
        CellKind::Log,
        CellKind::Bush,
        CellKind::Rabbit,
        CellKind::Bird,
    ];

    /// Reports whether an actor may stand on a cell of this kind.
    #[must_use]
    pub const fn passable(self) -> bool {
        match self {
            Self::Tree | Self::Water | Self::Stone | Self::House | Self::Log | Self::Bush => {
                false
            }
            Self::Grass | Self::Path | Self::Flower | Self::Mushroom | Self::Rabbit | Self::Bird => {
                true
            }
        }
    }

    /// Canonical lowercase key used to index the learning ledger.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Water => "water",
            Self::Stone => "stone",
            Self::House => "house",
            Self::Grass => "grass",
            Self::Path => "path",
            Self::Flower => "flower",
            Self::Mushroom => "mushroom",
            Self::Log => "log",
            Self::Bush => "bush",
            Self::Rabbit => "rabbit",
            Self::Bird => "bird",
        }
    }

    /// Parses a canonical key produced by [`CellKind::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// English label shown as the reference translation.
    #[must_use]
    pub const fn reference_label(self) -> &'static str {
        self.name()
    }

    /// Label of this kind in the requested language.
    #[must_use]
    pub const fn label(self, language: Language) -> &'static str {
        match language {
            Language::Spanish => match self {
                Self::Tree => "árbol",
                Self::Water => "agua",
                Self::Stone => "piedra",
                Self::House => "casa",
                Self::Grass => "hierba",
                Self::Path => "camino",
                Self::Flower => "flor",
                Self::Mushroom => "hongo",
                Self::Log => "tronco",
                Self::Bush => "arbusto",
                Self::Rabbit => "conejo",
                Self::Bird => "pájaro",
            },
            Language::French => match self {
                Self::Tree => "arbre",
                Self::Water => "eau",
                Self::Stone => "pierre",
                Self::House => "maison",
                Self::Grass => "herbe",
                Self::Path => "chemin",
                Self::Flower => "fleur",
                Self::Mushroom => "champignon",
                Self::Log => "bûche",
                Self::Bush => "buisson",
                Self::Rabbit => "lapin",
                Self::Bird => "oiseau",
            },
        }
    }
}

/// Identifies a square region of the world measured in whole regions.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RegionCoord {
    x: i32,
    y: i32,
}

impl RegionCoord {
    /// Smallest region index whose tiles fit in `i32` tile space.
    pub const MIN_TILED: i32 = i32::MIN.div_euclid(REGION_EDGE);

    /// Largest region index whose tiles fit in `i32` tile space.
    pub const MAX_TILED: i32 = i32::MAX.div_euclid(REGION_EDGE);

    /// Creates a new region coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal region index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical region index.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Manhattan distance between two region coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: RegionCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Tile occupying the region's upper-left corner.
    ///
    /// `None` when the region lies beyond the reach of tile coordinates.
    #[must_use]
    pub const fn origin_tile(self) -> Option<TileCoord> {
        match (
            self.x.checked_mul(REGION_EDGE),
            self.y.checked_mul(REGION_EDGE),
        ) {
            (Some(x), Some(y)) => Some(TileCoord::new(x, y)),
            _ => None,
        }
    }

    /// Whether every tile of the region is addressable by a [`TileCoord`].
    #[must_use]
    pub const fn has_tiles(self) -> bool {
        self.origin_tile().is_some()
    }
}

/// Location of a single tile in world tile space.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileCoord {
    x: i32,
    y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal tile index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical tile index.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Region that owns the tile.
    ///
    /// Uses floor division so negative tiles resolve to negative regions.
    #[must_use]
    pub const fn region(self) -> RegionCoord {
        RegionCoord::new(
            self.x.div_euclid(REGION_EDGE),
            self.y.div_euclid(REGION_EDGE),
        )
    }

    /// Position of the tile inside its owning region.
    #[must_use]
    pub const fn local(self) -> LocalCoord {
        LocalCoord::new(
            self.x.rem_euclid(REGION_EDGE) as u8,
            self.y.rem_euclid(REGION_EDGE) as u8,
        )
    }

    /// Recomposes a world tile from its region and local parts.
    ///
    /// `None` when the result falls outside tile space.
    #[must_use]
    pub const fn from_region_local(region: RegionCoord, local: LocalCoord) -> Option<Self> {
        let Some(origin) = region.origin_tile() else {
            return None;
        };
        match (
            origin.x.checked_add(local.column() as i32),
            origin.y.checked_add(local.row() as i32),
        ) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }

    /// World-space position of the tile's upper-left corner.
    #[must_use]
    pub fn origin_point(self) -> WorldPoint {
        WorldPoint::new(self.x as f32 * TILE_LENGTH, self.y as f32 * TILE_LENGTH)
    }
}

/// Position of a cell inside a region, both axes in `[0, REGION_EDGE)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalCoord {
    column: u8,
    row: u8,
}

impl LocalCoord {
    /// Creates a new local coordinate.
    #[must_use]
    pub const fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }

    /// Column inside the region.
    #[must_use]
    pub const fn column(&self) -> u8 {
        self.column
    }

    /// Row inside the region.
    #[must_use]
    pub const fn row(&self) -> u8 {
        self.row
    }

    /// Row-major index into a region's cell storage, if inside the region.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        let edge = REGION_EDGE as usize;
        let column = usize::from(self.column);
        let row = usize::from(self.row);
        if column < edge && row < edge {
            Some(row * edge + column)
        } else {
            None
        }
    }

    /// Inverse of [`LocalCoord::index`].
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        let edge = REGION_EDGE as usize;
        if index >= REGION_AREA {
            return None;
        }
        let column = u8::try_from(index % edge).ok()?;
        let row = u8::try_from(index / edge).ok()?;
        Some(Self::new(column, row))
    }
}

/// Continuous position in world space measured in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate, growing downward.
    pub y: f32,
}

impl WorldPoint {
    /// World origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Tile containing the point.
    #[must_use]
    pub fn tile(self) -> TileCoord {
        TileCoord::new(
            (self.x / TILE_LENGTH).floor() as i32,
            (self.y / TILE_LENGTH).floor() as i32,
        )
    }

    /// Translates a view-space point into world space using a camera offset.
    #[must_use]
    pub fn from_view(pointer: ViewPoint, camera: WorldPoint) -> Self {
        Self::new(pointer.x + camera.x, pointer.y + camera.y)
    }
}

/// Pointer position in view space, relative to the camera's upper-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl ViewPoint {
    /// Creates a new view-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Cardinal directions an actor can face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Toward decreasing y.
    Up,
    /// Toward increasing x.
    Right,
    /// Toward increasing y.
    #[default]
    Down,
    /// Toward decreasing x.
    Left,
}

/// Learning record for one cell kind in one language.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Word in the learned language.
    pub word: String,
    /// Reference translation.
    pub english: String,
    /// Number of times the word has been revealed. Never below one.
    pub views: u32,
    /// Whether the view count reached [`MASTERY_THRESHOLD`].
    pub mastered: bool,
}

impl LedgerEntry {
    /// Creates the entry recorded on the first reveal of `kind`.
    #[must_use]
    pub fn first_view(kind: CellKind, language: Language) -> Self {
        Self {
            word: kind.label(language).to_owned(),
            english: kind.reference_label().to_owned(),
            views: 1,
            mastered: false,
        }
    }
}

/// Read access to mastery state, used to project mastery onto entities.
pub trait MasteryLedger {
    /// Reports whether `kind` has been mastered in `language`.
    fn is_mastered(&self, language: Language, kind: CellKind) -> bool;
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Resizes the view used to position the camera.
    ConfigureViewport {
        /// View width in world units.
        width: f32,
        /// View height in world units.
        height: f32,
    },
    /// Requests that the actor move by the provided direction components.
    Move {
        /// Horizontal component, typically -1, 0 or 1.
        dx: f32,
        /// Vertical component, typically -1, 0 or 1.
        dy: f32,
        /// Selects the sprint speed tier.
        sprinting: bool,
    },
    /// Reports the pointer position so facing can follow it.
    PointAt {
        /// Pointer position in view space.
        pointer: ViewPoint,
    },
    /// Requests an interaction with the object under the pointer.
    Interact {
        /// Pointer position in view space.
        pointer: ViewPoint,
    },
    /// Switches the language being learned.
    SelectLanguage {
        /// Language to activate.
        language: Language,
    },
}

/// Events reported by the session after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the actor moved.
    ActorMoved {
        /// Position before the move.
        from: WorldPoint,
        /// Position after the move.
        to: WorldPoint,
    },
    /// Reports that a move was rejected by impassable terrain.
    MoveBlocked {
        /// Tile the actor attempted to enter.
        tile: TileCoord,
    },
    /// Announces that the actor now faces a new direction.
    FacingChanged {
        /// Direction after the change.
        facing: Facing,
    },
    /// Reports a change of the streamed region set.
    ActiveSetChanged {
        /// Regions that entered the active set.
        activated: Vec<RegionCoord>,
        /// Regions that left the active set. They remain cached.
        deactivated: Vec<RegionCoord>,
    },
    /// Confirms that an object was revealed and its word recorded.
    WordRevealed {
        /// Tile of the revealed object.
        tile: TileCoord,
        /// Kind of the revealed object.
        kind: CellKind,
        /// Ledger entry after recording the view.
        entry: LedgerEntry,
    },
    /// Confirms that an already revealed object toggled its translation.
    TranslationToggled {
        /// Tile of the object.
        tile: TileCoord,
        /// Whether the translation is now shown.
        shown: bool,
        /// Ledger entry for display, when one exists for the active language.
        entry: Option<LedgerEntry>,
    },
    /// Announces that the learned language changed.
    LanguageChanged {
        /// Language that became active.
        language: Language,
    },
}
