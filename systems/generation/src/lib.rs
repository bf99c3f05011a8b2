#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic region generator for the Word Meadow world.
//!
//! [`generate`] is a pure function of its [`RegionCoord`]: the seed is derived
//! from the coordinate alone and the pseudo-random stream lives only for the
//! duration of the call. Regions can therefore be generated in any order, on
//! any thread, and regenerated after eviction with identical results.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use word_meadow_core::{CellKind, LocalCoord, RegionCoord, REGION_AREA, REGION_EDGE};

const SEED_DOMAIN: &str = "word-meadow/region";
const VARIATION_STREAM: u64 = 1;

const PATH_REGION_REACH: u32 = 2;
const HOUSE_REGION_REACH: u32 = 3;

const TREE_CHANCE: f64 = 0.7;
const TREE_FILL: f64 = 0.6;
const WATER_CHANCE: f64 = 0.4;
const WATER_FILL: f64 = 0.7;
const REMOTE_HOUSE_CHANCE: f64 = 0.2;
const FLOWER_CHANCE: f64 = 0.4;
const FOREST_DECOR_CHANCE: f64 = 0.6;
const ANIMAL_CHANCE: f64 = 0.4;
const BIRD_IN_TREE_CHANCE: f64 = 0.5;

const HOUSE_ATTEMPTS: u32 = 10;
const HOUSE_FORCED_AFTER: u32 = 5;
const LOG_FORCED_AFTER: u32 = 3;
const PLACEMENT_ATTEMPTS: u32 = 5;

/// Immutable grid of cell kinds produced for a single region.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionGrid {
    coord: RegionCoord,
    cells: [CellKind; REGION_AREA],
}

impl RegionGrid {
    /// Region the grid was generated for.
    #[must_use]
    pub const fn coord(&self) -> RegionCoord {
        self.coord
    }

    /// Cell kind stored at the provided local coordinate.
    ///
    /// Returns `None` when the coordinate lies outside the region.
    #[must_use]
    pub fn get(&self, local: LocalCoord) -> Option<CellKind> {
        local.index().map(|index| self.cells[index])
    }

    /// Iterator over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (LocalCoord, CellKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, kind)| LocalCoord::from_index(index).map(|local| (local, *kind)))
    }

    /// Number of cells holding the provided kind.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }
}

/// Generates the grid for the provided region.
#[must_use]
pub fn generate(coord: RegionCoord) -> RegionGrid {
    let seed = region_seed(coord);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut canvas = Canvas::new();

    let reach_x = coord.x().unsigned_abs();
    let reach_y = coord.y().unsigned_abs();

    if reach_x <= PATH_REGION_REACH || reach_y <= PATH_REGION_REACH {
        stamp_path(&mut canvas, &mut rng);
    }

    if rng.gen_bool(TREE_CHANCE) {
        plant_tree_clusters(&mut canvas, &mut rng);
    }

    if rng.gen_bool(WATER_CHANCE) {
        pour_water(&mut canvas, &mut rng);
    }

    let near_origin = reach_x <= HOUSE_REGION_REACH && reach_y <= HOUSE_REGION_REACH;
    if near_origin || rng.gen_bool(REMOTE_HOUSE_CHANCE) {
        build_houses(&mut canvas, &mut rng);
    }

    if rng.gen_bool(FOREST_DECOR_CHANCE) {
        scatter_forest_decor(&mut canvas, &mut rng);
    }

    if rng.gen_bool(ANIMAL_CHANCE) {
        release_animals(&mut canvas, &mut rng);
    }

    tracing::trace!(x = coord.x(), y = coord.y(), seed, "generated region");

    RegionGrid {
        coord,
        cells: canvas.cells,
    }
}

/// Deterministic per-entity variation values for a region.
///
/// Yields one value in `[0, 1)` per draw, drawn from a stream that is
/// independent of the layout stream used by [`generate`].
#[must_use]
pub fn variations(coord: RegionCoord) -> Variations {
    let mut rng = ChaCha8Rng::seed_from_u64(region_seed(coord));
    rng.set_stream(VARIATION_STREAM);
    Variations { rng }
}

/// Infinite iterator of variation values returned by [`variations`].
#[derive(Debug)]
pub struct Variations {
    rng: ChaCha8Rng,
}

impl Iterator for Variations {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        Some(self.rng.gen::<f32>())
    }
}

/// Derives the generation seed for a region coordinate.
#[must_use]
pub fn region_seed(coord: RegionCoord) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(SEED_DOMAIN.as_bytes());
    hasher.update(coord.x().to_le_bytes());
    hasher.update(coord.y().to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

struct Canvas {
    cells: [CellKind; REGION_AREA],
}

impl Canvas {
    fn new() -> Self {
        Self {
            cells: [CellKind::Grass; REGION_AREA],
        }
    }

    fn index(x: i32, y: i32) -> Option<usize> {
        if (0..REGION_EDGE).contains(&x) && (0..REGION_EDGE).contains(&y) {
            usize::try_from(y * REGION_EDGE + x).ok()
        } else {
            None
        }
    }

    fn get(&self, x: i32, y: i32) -> Option<CellKind> {
        Self::index(x, y).map(|index| self.cells[index])
    }

    fn is(&self, x: i32, y: i32, kind: CellKind) -> bool {
        self.get(x, y) == Some(kind)
    }

    fn set(&mut self, x: i32, y: i32, kind: CellKind) {
        if let Some(index) = Self::index(x, y) {
            self.cells[index] = kind;
        }
    }

    fn neighbourhood_contains(&self, x: i32, y: i32, kind: CellKind) -> bool {
        (y - 1..=y + 1).any(|ny| (x - 1..=x + 1).any(|nx| self.is(nx, ny, kind)))
    }
}

fn random_cell(rng: &mut ChaCha8Rng, min: i32, max: i32) -> (i32, i32) {
    let x = rng.gen_range(min..=max);
    let y = rng.gen_range(min..=max);
    (x, y)
}

fn stamp_path(canvas: &mut Canvas, rng: &mut ChaCha8Rng) {
    let low = REGION_EDGE / 4;
    let high = 3 * REGION_EDGE / 4;
    let (horizontal, vertical) = match rng.gen_range(0..3) {
        0 => (true, false),
        1 => (false, true),
        _ => (true, true),
    };

    if horizontal {
        let row = rng.gen_range(low..=high);
        for column in 0..REGION_EDGE {
            canvas.set(column, row, CellKind::Path);
        }
    }

    if vertical {
        let column = rng.gen_range(low..=high);
        for row in 0..REGION_EDGE {
            canvas.set(column, row, CellKind::Path);
        }
    }
}

fn blob<F>(canvas: &mut Canvas, rng: &mut ChaCha8Rng, center: (i32, i32), radius: i32, mut fill: F)
where
    F: FnMut(&mut Canvas, &mut ChaCha8Rng, i32, i32),
{
    let (center_x, center_y) = center;
    for y in (center_y - radius).max(0)..(center_y + radius).min(REGION_EDGE) {
        for x in (center_x - radius).max(0)..(center_x + radius).min(REGION_EDGE) {
            fill(canvas, rng, x, y);
        }
    }
}

fn within_radius(x: i32, y: i32, center: (i32, i32), radius: i32) -> bool {
    let dx = x - center.0;
    let dy = y - center.1;
    dx * dx + dy * dy <= radius * radius
}

fn plant_tree_clusters(canvas: &mut Canvas, rng: &mut ChaCha8Rng) {
    let clusters = rng.gen_range(1..=3);
    for _ in 0..clusters {
        let center = random_cell(rng, 2, REGION_EDGE - 3);
        let radius = rng.gen_range(2..=4);
        blob(canvas, rng, center, radius, |canvas, rng, x, y| {
            if !canvas.is(x, y, CellKind::Grass) {
                return;
            }
            if rng.gen_bool(TREE_FILL) && within_radius(x, y, center, radius) {
                canvas.set(x, y, CellKind::Tree);
            }
        });
    }
}

fn pour_water(canvas: &mut Canvas, rng: &mut ChaCha8Rng) {
    let center = random_cell(rng, 3, REGION_EDGE - 4);
    let radius = rng.gen_range(2..=5);
    blob(canvas, rng, center, radius, |canvas, rng, x, y| {
        if rng.gen_bool(WATER_FILL) && within_radius(x, y, center, radius) {
            canvas.set(x, y, CellKind::Water);
        }
    });
}

fn build_houses(canvas: &mut Canvas, rng: &mut ChaCha8Rng) {
    let houses = rng.gen_range(0..=3);
    for _ in 0..houses {
        for attempt in 0..HOUSE_ATTEMPTS {
            let (x, y) = random_cell(rng, 1, REGION_EDGE - 2);
            let near_path = canvas.neighbourhood_contains(x, y, CellKind::Path);
            let buildable = !matches!(
                canvas.get(x, y),
                Some(CellKind::Water | CellKind::Path | CellKind::House)
            );

            if (near_path || attempt > HOUSE_FORCED_AFTER) && buildable {
                canvas.set(x, y, CellKind::House);
                plant_flowers_around(canvas, rng, x, y);
                break;
            }
        }
    }
}

fn plant_flowers_around(canvas: &mut Canvas, rng: &mut ChaCha8Rng, x: i32, y: i32) {
    for ny in y - 1..=y + 1 {
        for nx in x - 1..=x + 1 {
            if (nx, ny) == (x, y) || !canvas.is(nx, ny, CellKind::Grass) {
                continue;
            }
            if rng.gen_bool(FLOWER_CHANCE) {
                canvas.set(nx, ny, CellKind::Flower);
            }
        }
    }
}

fn scatter_forest_decor(canvas: &mut Canvas, rng: &mut ChaCha8Rng) {
    let logs = rng.gen_range(0..=3);
    for _ in 0..logs {
        for attempt in 0..PLACEMENT_ATTEMPTS {
            let (x, y) = random_cell(rng, 0, REGION_EDGE - 1);
            let near_tree = canvas.neighbourhood_contains(x, y, CellKind::Tree);
            if (near_tree || attempt > LOG_FORCED_AFTER) && canvas.is(x, y, CellKind::Grass) {
                canvas.set(x, y, CellKind::Log);
                break;
            }
        }
    }

    let bushes = rng.gen_range(1..=5);
    for _ in 0..bushes {
        place_on(canvas, rng, CellKind::Grass, CellKind::Bush);
    }
}

fn release_animals(canvas: &mut Canvas, rng: &mut ChaCha8Rng) {
    let rabbits = rng.gen_range(0..=2);
    for _ in 0..rabbits {
        place_on(canvas, rng, CellKind::Grass, CellKind::Rabbit);
    }

    let birds = rng.gen_range(0..=2);
    for _ in 0..birds {
        let perch = if rng.gen_bool(BIRD_IN_TREE_CHANCE) {
            CellKind::Tree
        } else {
            CellKind::Grass
        };
        place_on(canvas, rng, perch, CellKind::Bird);
    }
}

fn place_on(canvas: &mut Canvas, rng: &mut ChaCha8Rng, ground: CellKind, kind: CellKind) {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let (x, y) = random_cell(rng, 0, REGION_EDGE - 1);
        if canvas.is(x, y, ground) {
            canvas.set(x, y, kind);
            return;
        }
    }
}
