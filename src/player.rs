use tracing::info;

use crate::grid::{Dir, Grid, Pos, Tile, SPAWN};
use crate::reward::{RewardKind, RewardService};

const MIN_TRAIL: usize = 2;

/// The player's head and the trail of positions it left behind.
///
/// The tail holds earlier positions, most recent first. A `None` slot has
/// not been walked over yet. The tail always keeps at least one slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    head: Pos,
    tail: Vec<Option<Pos>>,
    score: i32,
    rewards: usize,
    explosion: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self::at(SPAWN)
    }

    pub fn at(head: Pos) -> Self {
        Self {
            head,
            tail: vec![None],
            score: 0,
            rewards: 0,
            explosion: false,
        }
    }

    pub fn head(&self) -> Pos {
        self.head
    }

    /// Every slot, head first.
    pub fn trail(&self) -> Vec<Option<Pos>> {
        std::iter::once(Some(self.head))
            .chain(self.tail.iter().copied())
            .collect()
    }

    /// Slots behind the head.
    pub fn tail(&self) -> &[Option<Pos>] {
        &self.tail
    }

    pub fn trail_len(&self) -> usize {
        self.tail.len() + 1
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// General rewards picked up so far.
    pub fn rewards(&self) -> usize {
        self.rewards
    }

    pub fn explosion(&self) -> bool {
        self.explosion
    }

    /// Reads and clears the flag raised by a bonus pickup.
    pub fn take_explosion(&mut self) -> bool {
        std::mem::take(&mut self.explosion)
    }

    /// Moves one tile in `dir` unless a wall or the map edge is in the way.
    /// Returns whether the player moved.
    pub fn attempt_move<S>(&mut self, dir: Dir, grid: &mut Grid, rewards: &mut S) -> bool
    where
        S: RewardService + ?Sized,
    {
        let Some(next) = self.head.step(dir, grid.size()) else {
            return false;
        };
        if grid.tile(next) == Tile::Wall {
            return false;
        }
        self.tail.insert(0, Some(self.head));
        self.tail.pop();
        self.head = next;
        self.pick_up(grid, rewards);
        true
    }

    fn pick_up<S>(&mut self, grid: &mut Grid, rewards: &mut S)
    where
        S: RewardService + ?Sized,
    {
        let head = self.head;
        let Tile::Reward(kind) = grid.tile(head) else {
            return;
        };
        match kind {
            RewardKind::General => {
                self.rewards += 1;
                self.tail.push(None);
            }
            RewardKind::Punishment => {
                if self.trail_len() > MIN_TRAIL {
                    self.tail.pop();
                }
            }
            RewardKind::Bonus => self.explosion = true,
        }
        let delta = rewards.collect(head);
        self.score += delta;
        grid.set_tile(head, Tile::Path);
        info!(
            row = head.row,
            col = head.col,
            ?kind,
            delta,
            score = self.score,
            trail = self.trail_len(),
            "collected reward"
        );
    }
}
