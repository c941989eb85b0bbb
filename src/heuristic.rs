use arrayvec::ArrayVec;

use crate::board::{Board, MAX_BOXES, Position};
use crate::deadlocks::{Deadlocks, UNREACHABLE};
use crate::hungarian::{ArrayMatrix, hungarian_algorithm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cost {
    Solvable(usize),
    Impossible,
}

/// Estimates the remaining cost from a state to a goal.
pub trait Heuristic<S> {
    fn estimate(&self, state: &S) -> Cost;
}

pub struct NullHeuristic;

impl<S> Heuristic<S> for NullHeuristic {
    fn estimate(&self, _state: &S) -> Cost {
        Cost::Solvable(0)
    }
}

enum Metric<'a> {
    Manhattan,
    PushDistance(&'a Deadlocks),
}

impl Metric<'_> {
    fn distance(&self, from: Position, to: Position) -> u32 {
        match self {
            Metric::Manhattan => manhattan(from, to),
            Metric::PushDistance(deadlocks) => deadlocks.distance(from, to),
        }
    }
}

/// Lower bound on the remaining moves: the cheapest matching of every box to
/// a distinct destination, plus the walk from the mover to the nearest box.
pub struct AssignmentHeuristic<'a> {
    metric: Metric<'a>,
}

impl<'a> AssignmentHeuristic<'a> {
    pub fn manhattan() -> Self {
        AssignmentHeuristic {
            metric: Metric::Manhattan,
        }
    }

    /// Match boxes using precomputed push distances. A box that cannot be
    /// pushed to any free destination makes the board [`Cost::Impossible`].
    pub fn push_distance(deadlocks: &'a Deadlocks) -> Self {
        AssignmentHeuristic {
            metric: Metric::PushDistance(deadlocks),
        }
    }
}

impl Heuristic<Board> for AssignmentHeuristic<'_> {
    fn estimate(&self, board: &Board) -> Cost {
        let boxes: ArrayVec<Position, MAX_BOXES> = board.boxes().collect();
        if boxes.is_empty() {
            return Cost::Solvable(0);
        }
        let destinations: ArrayVec<Position, MAX_BOXES> = board.destinations().collect();

        let mut matrix =
            ArrayMatrix::<u32, { MAX_BOXES * MAX_BOXES }>::new(boxes.len(), destinations.len());
        for &b in &boxes {
            for &d in &destinations {
                matrix.push(self.metric.distance(b, d));
            }
        }

        let assignment = hungarian_algorithm(&matrix);
        if assignment >= UNREACHABLE as u64 {
            return Cost::Impossible;
        }

        let mover = board.mover();
        let walk = boxes
            .iter()
            .map(|&b| manhattan(mover, b) as usize)
            .min()
            .unwrap_or(0)
            .saturating_sub(1);

        Cost::Solvable(assignment as usize + walk)
    }
}

fn manhattan(a: Position, b: Position) -> u32 {
    (a.0.abs_diff(b.0) + a.1.abs_diff(b.1)) as u32
}
