use std::collections::VecDeque;

use tracing::warn;

use crate::graph::PathGraph;
use crate::grid::{Dir, Pos};

/// Next vertex on a shortest path from `source` to `destination`.
///
/// Returns `source` when the two are equal, when the destination cannot be
/// reached, or when either id lies outside the graph.
pub fn next_step(graph: &PathGraph, source: usize, destination: usize) -> usize {
    let count = graph.vertex_count();
    if source == destination || source >= count || destination >= count {
        return source;
    }

    let mut prev: Vec<Option<usize>> = vec![None; count];
    let mut visited = vec![false; count];
    let mut queue = VecDeque::new();
    visited[source] = true;
    queue.push_back(source);

    'search: while let Some(u) = queue.pop_front() {
        for &v in graph.neighbours(u) {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            prev[v] = Some(u);
            if v == destination {
                break 'search;
            }
            queue.push_back(v);
        }
    }

    let mut step = destination;
    loop {
        match prev[step] {
            Some(p) if p == source => return step,
            Some(p) => step = p,
            None => return source,
        }
    }
}

/// Single-tile move derived from two vertex ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Stay,
    Move(Dir),
}

impl Step {
    pub fn between(source: usize, next: usize, size: usize) -> Self {
        let delta = next as isize - source as isize;
        let size = size as isize;
        if delta == 0 {
            Step::Stay
        } else if delta == -1 {
            Step::Move(Dir::Left)
        } else if delta == 1 {
            Step::Move(Dir::Right)
        } else if delta == -size {
            Step::Move(Dir::Up)
        } else if delta == size {
            Step::Move(Dir::Down)
        } else {
            // Not reachable with a graph built from a grid.
            warn!(source, next, "pursuit step is not adjacent, falling back to down");
            Step::Move(Dir::Down)
        }
    }

    /// Applies the step, clamped to the map.
    pub fn apply(self, pos: Pos, size: usize) -> Pos {
        match self {
            Step::Stay => pos,
            Step::Move(dir) => pos.step(dir, size).unwrap_or(pos),
        }
    }
}
