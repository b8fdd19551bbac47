//! Simulation core of a tile-based maze chase: grid generation, the path
//! graph enemies pursue the player over, and the player's trail.

pub mod config;
pub mod enemy;
pub mod error;
pub mod game;
pub mod graph;
pub mod grid;
pub mod player;
pub mod pursuit;
pub mod reward;

pub use config::GameConfig;
pub use enemy::Enemy;
pub use error::{Error, Result};
pub use game::{Game, Status};
pub use graph::PathGraph;
pub use grid::{Dir, Grid, Pos, Tile};
pub use player::Player;
pub use pursuit::{next_step, Step};
pub use reward::{Reward, RewardKind, RewardService, ScatterRewards};
