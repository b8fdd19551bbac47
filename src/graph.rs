use crate::grid::{Dir, Grid, Pos, Tile};

/// Neighbour order used when wiring a path tile.
const WIRING: [Dir; 4] = [Dir::Right, Dir::Left, Dir::Down, Dir::Up];

/// Dense adjacency list over every tile of a grid, indexed by vertex id.
/// Only tiles that were plain paths when the graph was built have edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathGraph {
    size: usize,
    adjacency: Vec<Vec<usize>>,
}

impl PathGraph {
    pub fn build(grid: &Grid) -> Self {
        let size = grid.size();
        let mut adjacency = vec![Vec::new(); size * size];
        for row in 0..size {
            for col in 0..size {
                let pos = Pos { row, col };
                if grid.tile(pos) != Tile::Path {
                    continue;
                }
                let edges = &mut adjacency[pos.vertex(size)];
                for dir in WIRING {
                    if let Some(next) = pos.step(dir, size) {
                        if grid.tile(next) == Tile::Path {
                            edges.push(next.vertex(size));
                        }
                    }
                }
            }
        }
        Self { size, adjacency }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn neighbours(&self, vertex: usize) -> &[usize] {
        self.adjacency.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::{Reward, RewardService};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct NoRewards;

    impl RewardService for NoRewards {
        fn reward_at(&self, _pos: Pos) -> Option<Reward> {
            None
        }

        fn collect(&mut self, _pos: Pos) -> i32 {
            0
        }
    }

    #[test]
    fn edges_join_adjacent_paths_only() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (grid, graph) = Grid::generate(14, &NoRewards, &mut rng).unwrap();
            assert_eq!(graph.vertex_count(), 14 * 14);
            for v in 0..graph.vertex_count() {
                let pos = Pos::from_vertex(v, 14);
                let expected: Vec<usize> = Dir::ALL
                    .iter()
                    .filter_map(|dir| pos.step(*dir, 14))
                    .filter(|n| grid.tile(pos) == Tile::Path && grid.tile(*n) == Tile::Path)
                    .map(|n| n.vertex(14))
                    .collect();
                let mut actual = graph.neighbours(v).to_vec();
                let mut expected = expected;
                actual.sort_unstable();
                expected.sort_unstable();
                assert_eq!(actual, expected, "vertex {v}");
            }
        }
    }

    #[test]
    fn edges_are_symmetric() {
        let mut rng = StdRng::seed_from_u64(42);
        let (_, graph) = Grid::generate(25, &NoRewards, &mut rng).unwrap();
        for u in 0..graph.vertex_count() {
            for &v in graph.neighbours(u) {
                assert!(graph.neighbours(v).contains(&u), "{u} -> {v} has no way back");
            }
        }
    }

    #[test]
    fn wiring_order_is_right_left_down_up() {
        let grid = Grid::from_ascii(
            "
            |#######
            |#.....#
            |#.....#
            |#.....#
            |#.....#
            |#.....#
            |#.....#
            |#######",
        )
        .unwrap();
        let graph = PathGraph::build(&grid);
        let centre = Pos::new(3, 4).vertex(8);
        assert_eq!(
            graph.neighbours(centre),
            &[centre + 1, centre - 1, centre + 8, centre - 8]
        );
    }

    #[test]
    fn reward_tiles_have_no_vertex_in_a_fixture_graph() {
        let grid = Grid::from_ascii(
            "
            |#####
            |#.r.#
            |#...#
            |#...#
            |#...#
            |#####",
        )
        .unwrap();
        let graph = PathGraph::build(&grid);
        assert!(graph.neighbours(Pos::new(1, 3).vertex(6)).is_empty());
        assert_eq!(graph.neighbours(Pos::new(1, 2).vertex(6)), &[Pos::new(2, 2).vertex(6)]);
        assert!(graph.neighbours(10_000).is_empty());
    }
}
