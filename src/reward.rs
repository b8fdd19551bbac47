use std::collections::HashMap;

use rand::Rng;

use crate::grid::Pos;

const GENERAL_CHANCE: f32 = 0.12;
const BONUS_CHANCE: f32 = 0.02;
const PUNISHMENT_CHANCE: f32 = 0.04;
const GENERAL_SCORE: i32 = 10;
const BONUS_SCORE: i32 = 50;
const PUNISHMENT_SCORE: i32 = -20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RewardKind {
    General,
    Bonus,
    Punishment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reward {
    pub kind: RewardKind,
    pub score: i32,
}

/// Source of rewards, keyed by grid position.
///
/// The generator asks `reward_at` once per path tile while placing rewards;
/// the player calls `collect` once per pickup, right before the tile is
/// turned back into a path.
pub trait RewardService {
    fn reward_at(&self, pos: Pos) -> Option<Reward>;
    fn collect(&mut self, pos: Pos) -> i32;
}

/// Rewards scattered at random over a square map.
#[derive(Clone, Debug, Default)]
pub struct ScatterRewards {
    placed: HashMap<Pos, Reward>,
}

impl ScatterRewards {
    pub fn generate(size: usize, rng: &mut impl Rng) -> Self {
        let mut placed = HashMap::new();
        for row in 0..size {
            for col in 0..size {
                let roll = rng.gen::<f32>();
                let reward = if roll < GENERAL_CHANCE {
                    Reward {
                        kind: RewardKind::General,
                        score: GENERAL_SCORE,
                    }
                } else if roll < GENERAL_CHANCE + BONUS_CHANCE {
                    Reward {
                        kind: RewardKind::Bonus,
                        score: BONUS_SCORE,
                    }
                } else if roll < GENERAL_CHANCE + BONUS_CHANCE + PUNISHMENT_CHANCE {
                    Reward {
                        kind: RewardKind::Punishment,
                        score: PUNISHMENT_SCORE,
                    }
                } else {
                    continue;
                };
                placed.insert(Pos { row, col }, reward);
            }
        }
        Self { placed }
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }
}

impl RewardService for ScatterRewards {
    fn reward_at(&self, pos: Pos) -> Option<Reward> {
        self.placed.get(&pos).copied()
    }

    fn collect(&mut self, pos: Pos) -> i32 {
        self.placed.remove(&pos).map_or(0, |reward| reward.score)
    }
}
