//! Arena layouts.
//!
//! A layout is four CSV grids of tile codes, one per layer. `-1` marks an
//! empty cell; any other code places something on that tile. Entity codes
//! pick the player or a monster.

use anyhow::{bail, Context, Result};
use glam::Vec2;
use mythica_gameplay::{GameCatalog, Level, Obstacle, ObstacleKind, SimTuning};
use std::path::Path;
use tracing::info;

/// Entity code of the player start.
pub const PLAYER_CODE: &str = "394";

/// Layer file names inside a map directory.
const BOUNDARY_FILE: &str = "map_FloorBlocks.csv";
const GRASS_FILE: &str = "map_Grass.csv";
const OBJECT_FILE: &str = "map_LargeObjects.csv";
const ENTITY_FILE: &str = "map_Entities.csv";

const DEMO_BOUNDARY: &str = "\
395,395,395,395,395,395,395,395,395,395,395,395
395,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,395
395,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,395
395,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,395
395,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,395
395,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,395
395,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,395
395,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,395
395,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,395
395,395,395,395,395,395,395,395,395,395,395,395";

const DEMO_GRASS: &str = "\
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,8,8,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,8,8,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1";

const DEMO_OBJECTS: &str = "\
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,3,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1";

const DEMO_ENTITIES: &str = "\
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,394,-1,-1,-1,-1,393,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,390,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,391,-1,-1,-1,-1,-1,392,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1";

/// Monster spawned by an entity code. Unlisted codes spawn a squid.
#[must_use]
pub fn monster_for_code(code: &str) -> &'static str {
    match code {
        "390" => "bamboo",
        "391" => "spirit",
        "392" => "raccoon",
        _ => "squid",
    }
}

/// One CSV layer as rows of cell codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileGrid {
    rows: Vec<Vec<String>>,
}

impl TileGrid {
    /// Parse a CSV grid. Blank lines are skipped.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let rows = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
            .collect();
        Self { rows }
    }

    /// Occupied cells as `(column, row, code)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &str)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, code)| code.as_str() != "-1")
                .map(move |(column, code)| (column, row, code.as_str()))
        })
    }
}

/// The four layers of an arena.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArenaLayout {
    /// Invisible walls
    pub boundary: TileGrid,
    /// Cuttable grass
    pub grass: TileGrid,
    /// Large static objects
    pub objects: TileGrid,
    /// Player start and monster spawns
    pub entities: TileGrid,
}

impl ArenaLayout {
    /// The built-in demo arena.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            boundary: TileGrid::parse(DEMO_BOUNDARY),
            grass: TileGrid::parse(DEMO_GRASS),
            objects: TileGrid::parse(DEMO_OBJECTS),
            entities: TileGrid::parse(DEMO_ENTITIES),
        }
    }

    /// Load the four layer files from a map directory.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let layer = |name: &str| -> Result<TileGrid> {
            let path = dir.join(name);
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read layer {}", path.display()))?;
            Ok(TileGrid::parse(&source))
        };
        Ok(Self {
            boundary: layer(BOUNDARY_FILE)?,
            grass: layer(GRASS_FILE)?,
            objects: layer(OBJECT_FILE)?,
            entities: layer(ENTITY_FILE)?,
        })
    }

    /// Build a level from this layout.
    pub fn build(&self, catalog: GameCatalog, tuning: SimTuning, seed: u64) -> Result<Level> {
        let tile = tuning.tile_size;
        let at = |column: usize, row: usize| Vec2::new(column as f32 * tile, row as f32 * tile);

        let mut starts = self.entities.cells().filter(|(_, _, code)| *code == PLAYER_CODE);
        let Some((column, row, _)) = starts.next() else {
            bail!("arena has no player start (code {PLAYER_CODE})");
        };
        if starts.next().is_some() {
            bail!("arena has more than one player start");
        }

        let mut level = Level::new(catalog, tuning, at(column, row), seed)?;
        let layers = [
            (ObstacleKind::Boundary, &self.boundary),
            (ObstacleKind::Grass, &self.grass),
            (ObstacleKind::Object, &self.objects),
        ];
        for (kind, grid) in layers {
            for (column, row, _) in grid.cells() {
                level.add_obstacle(Obstacle::with_size(kind, at(column, row), Vec2::splat(tile)));
            }
        }

        for (column, row, code) in self.entities.cells() {
            if code == PLAYER_CODE {
                continue;
            }
            level.spawn_enemy(monster_for_code(code), at(column, row))?;
        }

        info!(
            obstacles = level.obstacles().len(),
            enemies = level.enemies().count(),
            "Arena built"
        );
        Ok(level)
    }
}
