use std::time::Instant;

use rand::Rng;
use tracing::info;

use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::error::Result;
use crate::graph::PathGraph;
use crate::grid::{Dir, Grid};
use crate::player::Player;
use crate::reward::RewardService;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Cleared,
}

/// One level in play: the grid with its path graph, the player, the
/// enemies still alive and the reward service both sides talk to.
pub struct Game<R> {
    grid: Grid,
    graph: PathGraph,
    player: Player,
    enemies: Vec<Enemy>,
    rewards: R,
}

impl<R: RewardService> Game<R> {
    pub fn new(config: &GameConfig, rewards: R, rng: &mut impl Rng, now: Instant) -> Result<Self> {
        config.validate()?;
        let (grid, graph) = Grid::generate(config.size, &rewards, &mut *rng)?;
        let enemies = (0..config.enemy_count)
            .map(|_| {
                Enemy::spawn(config.enemy_health, &grid, &mut *rng, now)
                    .map(|enemy| enemy.with_cooldown(config.enemy_cooldown))
            })
            .collect::<Result<Vec<_>>>()?;
        info!(
            size = config.size,
            enemies = enemies.len(),
            rewards = grid.reward_count(),
            "level ready"
        );
        Ok(Self::from_parts(grid, graph, rewards, enemies))
    }

    /// Assembles a level from prepared pieces, with the player on the spawn tile.
    pub fn from_parts(grid: Grid, graph: PathGraph, rewards: R, enemies: Vec<Enemy>) -> Self {
        Self {
            grid,
            graph,
            player: Player::new(),
            enemies,
            rewards,
        }
    }

    pub fn press(&mut self, dir: Dir) -> bool {
        self.player
            .attempt_move(dir, &mut self.grid, &mut self.rewards)
    }

    /// Ticks every enemy against the current trail and drops the dead ones.
    /// Returns how many were destroyed.
    pub fn advance(&mut self, now: Instant) -> usize {
        let before = self.enemies.len();
        let player = &self.player;
        let graph = &self.graph;
        self.enemies.retain_mut(|enemy| enemy.tick(now, player, graph));
        before - self.enemies.len()
    }

    pub fn status(&self) -> Status {
        if self.enemies.is_empty() {
            Status::Cleared
        } else {
            Status::Running
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn graph(&self) -> &PathGraph {
        &self.graph
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Reads and clears the player's bonus flag.
    pub fn take_explosion(&mut self) -> bool {
        self.player.take_explosion()
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// General rewards still lying on the grid.
    pub fn rewards_left(&self) -> usize {
        self.grid.reward_count().saturating_sub(self.player.rewards())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::reward::ScatterRewards;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    #[test]
    fn new_spawns_configured_enemies() {
        let mut rng = StdRng::seed_from_u64(21);
        let rewards = ScatterRewards::generate(18, &mut rng);
        let config = GameConfig {
            size: 18,
            enemy_count: 3,
            ..GameConfig::default()
        };
        let game = Game::new(&config, rewards, &mut rng, Instant::now()).unwrap();
        assert_eq!(game.enemies().len(), 3);
        assert_eq!(game.status(), Status::Running);
        assert_eq!(game.rewards_left(), game.grid().reward_count());
        assert_eq!(game.graph().vertex_count(), 18 * 18);
        assert!(game
            .enemies()
            .iter()
            .all(|e| e.health() == config.enemy_health));
    }

    #[test]
    fn rejects_small_config() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = GameConfig {
            size: 4,
            ..GameConfig::default()
        };
        let err = Game::new(&config, ScatterRewards::default(), &mut rng, Instant::now())
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidConfiguration { size: 4 }));
    }

    #[test]
    fn advance_respects_configured_cooldown() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = GameConfig {
            size: 16,
            enemy_cooldown: Duration::from_millis(100),
            ..GameConfig::default()
        };
        let start = Instant::now();
        let mut game = Game::new(&config, ScatterRewards::default(), &mut rng, start).unwrap();
        let before: Vec<_> = game.enemies().iter().map(Enemy::pos).collect();
        assert_eq!(game.advance(start + Duration::from_millis(50)), 0);
        let after: Vec<_> = game.enemies().iter().map(Enemy::pos).collect();
        assert_eq!(before, after);
    }
}
