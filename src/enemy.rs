use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::graph::PathGraph;
use crate::grid::{Grid, Pos, Tile};
use crate::player::Player;
use crate::pursuit::{next_step, Step};

pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(800);
/// Enemies spawn at least this many tiles from the top and left edges.
pub const SPAWN_INSET: usize = 6;
pub const SPAWN_ATTEMPTS: usize = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    health: i32,
    pos: Pos,
    cooldown: Duration,
    last_move: Instant,
}

impl Enemy {
    pub fn new(health: i32, pos: Pos, now: Instant) -> Self {
        Self {
            health,
            pos,
            cooldown: DEFAULT_COOLDOWN,
            last_move: now,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Places an enemy on a random tile of the inset region that is neither
    /// wall nor margin.
    pub fn spawn(health: i32, grid: &Grid, rng: &mut impl Rng, now: Instant) -> Result<Self> {
        let range = SPAWN_INSET..grid.size().saturating_sub(1);
        if range.is_empty() {
            warn!(size = grid.size(), "map too small for the enemy spawn region");
            return Err(Error::SpawnExhausted { attempts: 0 });
        }
        for _ in 0..SPAWN_ATTEMPTS {
            let pos = Pos {
                row: rng.gen_range(range.clone()),
                col: rng.gen_range(range.clone()),
            };
            if !matches!(grid.tile(pos), Tile::Wall | Tile::Margin) {
                debug!(row = pos.row, col = pos.col, health, "spawned enemy");
                return Ok(Self::new(health, pos, now));
            }
        }
        warn!(attempts = SPAWN_ATTEMPTS, "no free tile for enemy spawn");
        Err(Error::SpawnExhausted {
            attempts: SPAWN_ATTEMPTS,
        })
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Steps toward the player's head once the cooldown has run out, then
    /// takes one damage for every tail slot it ends up standing on.
    /// Returns `false` when the enemy is out of health after moving.
    pub fn tick(&mut self, now: Instant, player: &Player, graph: &PathGraph) -> bool {
        if now.saturating_duration_since(self.last_move) < self.cooldown {
            return true;
        }
        self.last_move = now;

        let size = graph.size();
        let source = self.pos.vertex(size);
        let destination = player.head().vertex(size);
        let next = next_step(graph, source, destination);
        self.pos = Step::between(source, next, size).apply(self.pos, size);

        let hits = player
            .tail()
            .iter()
            .filter(|slot| **slot == Some(self.pos))
            .count();
        if hits > 0 {
            let damage = i32::try_from(hits).unwrap_or(i32::MAX);
            self.health = self.health.saturating_sub(damage);
            debug!(hits, health = self.health, "enemy crossed the trail");
        }
        if self.health <= 0 {
            info!(row = self.pos.row, col = self.pos.col, "enemy destroyed");
            return false;
        }
        true
    }
}
