use std::collections::BTreeMap;

use log::debug;

use crate::board::{ALL_ACTIONS, Action, Board, Position};
use crate::search::{NoProgress, SearchProblem, breadth_first_search};

/// Push distance between cells that no sequence of pushes connects.
pub const UNREACHABLE: u32 = 10_000_000;

const DEADLOCK_AREA: usize = 0;

/// Cells sharing one set of reachable destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    reachable_dest_count: usize,
    /// Every cell whose reachable destinations are a subset of this area's.
    positions: Vec<Position>,
}

impl Area {
    fn new(reachable_dest_count: usize) -> Self {
        Area {
            reachable_dest_count,
            positions: Vec::new(),
        }
    }

    /// How many boxes this area can ever deliver to destinations.
    pub fn reachable_dest_count(&self) -> usize {
        self.reachable_dest_count
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// A box in this area can never reach any destination.
    pub fn is_deadlock(&self) -> bool {
        self.reachable_dest_count == 0
    }
}

/// Static per-level deadlock model: push distances between all open cells
/// and the partition of cells into areas. Built once from the start board and
/// only read afterwards.
pub struct Deadlocks {
    width: usize,
    height: usize,
    /// Dense id per grid cell, `None` for walls and out-of-bounds cells.
    space_ids: Vec<Option<usize>>,
    spaces: Vec<Position>,
    is_dest: Vec<bool>,
    /// `space_count * space_count` push distances, row = from, column = to.
    distances: Vec<u32>,
    areas: Vec<Area>,
    area_of: Vec<usize>,
}

impl Deadlocks {
    pub fn new(board: &Board) -> Self {
        let mut deadlocks = Self::assign_space_ids(board);
        deadlocks.compute_distances();
        deadlocks.build_areas();

        debug!(
            "deadlock model ready: spaces={}, areas={}, dead cells={}",
            deadlocks.spaces.len(),
            deadlocks.areas.len() - 1,
            deadlocks
                .area_of
                .iter()
                .filter(|&&area| area == DEADLOCK_AREA)
                .count()
        );

        deadlocks
    }

    /// Number every non-blocking cell in row-major order.
    fn assign_space_ids(board: &Board) -> Self {
        let mut space_ids = vec![None; board.width() * board.height()];
        let mut spaces = Vec::new();
        let mut is_dest = Vec::new();

        for pos in board.positions() {
            let cell = board.cell(pos);
            if !cell.is_static_block() {
                space_ids[pos.1 as usize * board.width() + pos.0 as usize] = Some(spaces.len());
                spaces.push(pos);
                is_dest.push(cell.is_dest());
            }
        }

        let count = spaces.len();
        Deadlocks {
            width: board.width(),
            height: board.height(),
            space_ids,
            spaces,
            is_dest,
            distances: vec![UNREACHABLE; count * count],
            areas: vec![Area::new(0)],
            area_of: vec![DEADLOCK_AREA; count],
        }
    }

    fn compute_distances(&mut self) {
        let count = self.spaces.len();
        let mut distances = vec![UNREACHABLE; count * count];

        for (from, &pos) in self.spaces.iter().enumerate() {
            let problem = PushProblem {
                deadlocks: &*self,
                start: (from, pos),
            };
            let exploration = breadth_first_search(&problem, NoProgress, None);
            for (&(to, _), pushes) in exploration.iter() {
                distances[from * count + to] = pushes as u32;
            }
        }

        self.distances = distances;
    }

    fn build_areas(&mut self) {
        let count = self.spaces.len();

        // Destinations reachable from each cell, ascending by id
        let reachable: Vec<Vec<usize>> = (0..count)
            .map(|from| {
                (0..count)
                    .filter(|&to| {
                        self.is_dest[to] && self.distances[from * count + to] < UNREACHABLE
                    })
                    .collect()
            })
            .collect();

        let mut signatures: BTreeMap<&[usize], usize> = BTreeMap::new();
        for dests in reachable.iter().filter(|dests| !dests.is_empty()) {
            signatures.entry(dests.as_slice()).or_insert_with(|| {
                self.areas.push(Area::new(dests.len()));
                self.areas.len() - 1
            });
        }

        for (&signature, &area) in signatures.iter() {
            for (from, dests) in reachable.iter().enumerate() {
                if !dests.is_empty() && dests.iter().all(|d| signature.binary_search(d).is_ok()) {
                    self.areas[area].positions.push(self.spaces[from]);
                }
            }
        }

        for (from, dests) in reachable.iter().enumerate() {
            self.area_of[from] = signatures
                .get(dests.as_slice())
                .copied()
                .unwrap_or(DEADLOCK_AREA);
        }
    }

    /// Dense id of a non-blocking cell.
    pub fn space_id(&self, pos: Position) -> Option<usize> {
        if pos.0 as usize >= self.width || pos.1 as usize >= self.height {
            return None;
        }
        self.space_ids[pos.1 as usize * self.width + pos.0 as usize]
    }

    pub fn space_count(&self) -> usize {
        self.spaces.len()
    }

    /// Minimum pushes to move a lone box from `from` to `to`, or
    /// [`UNREACHABLE`].
    pub fn distance(&self, from: Position, to: Position) -> u32 {
        match (self.space_id(from), self.space_id(to)) {
            (Some(from), Some(to)) => self.distances[from * self.spaces.len() + to],
            _ => UNREACHABLE,
        }
    }

    /// The area a box at `pos` belongs to. Blocked cells and cells that reach
    /// no destination share the zero-capacity deadlock area.
    pub fn area(&self, pos: Position) -> &Area {
        let area = self
            .space_id(pos)
            .map_or(DEADLOCK_AREA, |id| self.area_of[id]);
        &self.areas[area]
    }

    fn offset(&self, pos: Position, delta: (i8, i8)) -> Option<Position> {
        let x = pos.0 as i32 + delta.0 as i32;
        let y = pos.1 as i32 + delta.1 as i32;
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some((x as u8, y as u8))
        } else {
            None
        }
    }
}

/// A lone box pushed around the empty level. The state carries the box's
/// space id so explored states map straight onto distance-matrix columns.
struct PushProblem<'a> {
    deadlocks: &'a Deadlocks,
    start: (usize, Position),
}

impl SearchProblem for PushProblem<'_> {
    type State = (usize, Position);
    type Action = Action;

    fn start(&self) -> Self::State {
        self.start
    }

    fn is_goal(&self, _state: &Self::State) -> bool {
        // Explore everything reachable
        false
    }

    fn successors(&self, state: &Self::State) -> Vec<(Self::State, Action, usize)> {
        let (_, pos) = *state;
        let mut successors = Vec::new();

        for action in ALL_ACTIONS {
            let (dx, dy) = action.delta();
            let target = self.deadlocks.offset(pos, (dx, dy));
            let mover = self.deadlocks.offset(pos, (-dx, -dy));
            if let (Some(target), Some(mover)) = (target, mover) {
                if let (Some(id), Some(_)) = (
                    self.deadlocks.space_id(target),
                    self.deadlocks.space_id(mover),
                ) {
                    successors.push(((id, target), action, 1));
                }
            }
        }

        successors
    }
}
