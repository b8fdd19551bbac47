use std::fmt;

use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::PathGraph;
use crate::reward::{RewardKind, RewardService};

pub const MIN_SIZE: usize = 6;
/// Tile the player starts on; the carving pass never touches it.
pub const SPAWN: Pos = Pos { row: 1, col: 2 };
const CARVE_ROLL: u32 = 9;
const CARVE_BELOW: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Path,
    Margin,
    Reward(RewardKind),
}

impl Tile {
    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Tile::Wall),
            '.' => Some(Tile::Path),
            '|' => Some(Tile::Margin),
            'r' => Some(Tile::Reward(RewardKind::General)),
            'b' => Some(Tile::Reward(RewardKind::Bonus)),
            'u' => Some(Tile::Reward(RewardKind::Punishment)),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Path => '.',
            Tile::Margin => '|',
            Tile::Reward(RewardKind::General) => 'r',
            Tile::Reward(RewardKind::Bonus) => 'b',
            Tile::Reward(RewardKind::Punishment) => 'u',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn vertex(self, size: usize) -> usize {
        self.row * size + self.col
    }

    pub fn from_vertex(vertex: usize, size: usize) -> Self {
        Self {
            row: vertex / size,
            col: vertex % size,
        }
    }

    /// Neighbouring position in `dir`, or `None` when it leaves a `size`-square map.
    pub fn step(self, dir: Dir, size: usize) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        if row >= size || col >= size {
            return None;
        }
        Some(Pos { row, col })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// `(row, col)` offset of one step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }
}

/// Square tile map. Row 0, the last row, column 1 and the last column are
/// walls; column 0 is margin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    tiles: Vec<Vec<Tile>>,
    reward_count: usize,
}

impl Grid {
    /// Builds a fresh level: border, carved walls, then rewards. The path
    /// graph is taken between carving and reward placement so reward tiles
    /// keep the vertices of the path they were placed on.
    pub fn generate<S>(size: usize, rewards: &S, rng: &mut impl Rng) -> Result<(Grid, PathGraph)>
    where
        S: RewardService + ?Sized,
    {
        if size < MIN_SIZE {
            return Err(Error::InvalidConfiguration { size });
        }
        let mut grid = Grid::bordered(size);
        grid.carve_walls(rng);
        let graph = PathGraph::build(&grid);
        grid.place_rewards(rewards);
        debug!(
            size,
            walls = grid.count(Tile::Wall),
            rewards = grid.reward_count,
            "generated grid"
        );
        Ok((grid, graph))
    }

    fn bordered(size: usize) -> Grid {
        let mut tiles = vec![vec![Tile::Path; size]; size];
        for (row, line) in tiles.iter_mut().enumerate() {
            for (col, tile) in line.iter_mut().enumerate() {
                if row == 0 || row == size - 1 || col == 1 || col == size - 1 {
                    *tile = Tile::Wall;
                }
                if col == 0 {
                    *tile = Tile::Margin;
                }
            }
        }
        Grid {
            size,
            tiles,
            reward_count: 0,
        }
    }

    /// Walls grow downward from existing walls, or start fresh where no
    /// diagonal-above neighbour is a wall.
    fn carve_walls(&mut self, rng: &mut impl Rng) {
        for row in 1..self.size - 2 {
            for col in 2..self.size - 1 {
                if row == SPAWN.row && col == SPAWN.col {
                    continue;
                }
                let above = &self.tiles[row - 1];
                let carve = if above[col] == Tile::Wall {
                    roll_carve(rng)
                } else if !(above[col - 1] == Tile::Wall || above[col + 1] == Tile::Wall) {
                    roll_carve(rng)
                } else {
                    false
                };
                if carve {
                    self.tiles[row][col] = Tile::Wall;
                }
            }
        }
    }

    fn place_rewards<S>(&mut self, rewards: &S)
    where
        S: RewardService + ?Sized,
    {
        for row in 0..self.size {
            for col in 0..self.size {
                if self.tiles[row][col] != Tile::Path {
                    continue;
                }
                if let Some(reward) = rewards.reward_at(Pos { row, col }) {
                    self.tiles[row][col] = Tile::Reward(reward.kind);
                    if reward.kind == RewardKind::General {
                        self.reward_count += 1;
                    }
                }
            }
        }
    }

    /// Parses a fixed layout, one line per row: `#` wall, `.` path, `|`
    /// margin, `r`/`b`/`u` general, bonus and punishment rewards. Blank lines
    /// and surrounding whitespace are ignored. The border must already hold.
    pub fn from_ascii(layout: &str) -> Result<Grid> {
        let mut tiles = Vec::new();
        for (row, line) in layout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .enumerate()
        {
            let parsed = line
                .chars()
                .enumerate()
                .map(|(col, glyph)| {
                    Tile::from_glyph(glyph).ok_or_else(|| {
                        Error::Layout(format!("unknown tile {glyph:?} at row {row}, col {col}"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            tiles.push(parsed);
        }

        let size = tiles.len();
        if let Some((row, _)) = tiles.iter().enumerate().find(|(_, l)| l.len() != size) {
            return Err(Error::Layout(format!(
                "row {row} is not {size} tiles wide"
            )));
        }
        if size < MIN_SIZE {
            return Err(Error::InvalidConfiguration { size });
        }

        let reward_count = tiles
            .iter()
            .flatten()
            .filter(|t| **t == Tile::Reward(RewardKind::General))
            .count();
        let grid = Grid {
            size,
            tiles,
            reward_count,
        };
        let border = Grid::bordered(size);
        for row in 0..size {
            for col in 0..size {
                let expected = border.tiles[row][col];
                if expected != Tile::Path && grid.tiles[row][col] != expected {
                    return Err(Error::Layout(format!(
                        "border tile at row {row}, col {col} must be {:?}",
                        expected
                    )));
                }
            }
        }
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tile(&self, pos: Pos) -> Tile {
        self.tiles[pos.row][pos.col]
    }

    pub fn set_tile(&mut self, pos: Pos, tile: Tile) {
        self.tiles[pos.row][pos.col] = tile;
    }

    /// General rewards placed when the level was built.
    pub fn reward_count(&self) -> usize {
        self.reward_count
    }

    /// Every tile with its position, row by row.
    pub fn positions(&self) -> impl Iterator<Item = (Pos, Tile)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(move |(col, tile)| (Pos { row, col }, *tile))
        })
    }

    pub fn count(&self, kind: Tile) -> usize {
        self.tiles.iter().flatten().filter(|t| **t == kind).count()
    }
}

fn roll_carve(rng: &mut impl Rng) -> bool {
    rng.gen_range(1..=CARVE_ROLL) <= CARVE_BELOW
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.tiles {
            let text: String = line.iter().map(|t| t.glyph()).collect();
            writeln!(f, "{text}")?;
        }
        Ok(())
    }
}
