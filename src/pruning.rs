//! Checks run on a box right after it has been pushed. Each returns `true`
//! when the resulting board can no longer be solved.

use crate::board::{Action, Board, Cell, Position};
use crate::deadlocks::Deadlocks;

/// The box's area cannot hold all the boxes now inside it.
pub fn is_area_overloaded(board: &Board, deadlocks: &Deadlocks, pos: Position) -> bool {
    let area = deadlocks.area(pos);
    if area.is_deadlock() {
        return true;
    }

    let boxes = area
        .positions()
        .iter()
        .filter(|&&p| board.has_box(p))
        .count();
    boxes > area.reachable_dest_count()
}

/// Some 2x2 block around the box is made only of walls and boxes, and at
/// least one of those boxes is off its destination. Nothing in such a block
/// can ever move again.
pub fn is_frozen_corner(board: &Board, pos: Position) -> bool {
    let (x, y) = (pos.0 as i32, pos.1 as i32);

    [(-1, -1), (1, 1), (-1, 1), (1, -1)].iter().any(|&(dx, dy)| {
        let quad = [
            board.cell_at(x, y),
            board.cell_at(x + dx, y),
            board.cell_at(x, y + dy),
            board.cell_at(x + dx, y + dy),
        ];
        quad.iter().all(|&c| c.is_static_block() || c.has_box())
            && quad.iter().any(|&c| c == Cell::Box)
    })
}

/// The box was pushed flat against a wall that it can never leave, and the
/// stretch of that wall bounded on both ends holds fewer destinations than
/// boxes.
pub fn is_wall_run_overloaded(board: &Board, pos: Position, action: Action) -> bool {
    let (dx, dy) = action.delta();
    let (x, y) = (pos.0 as i32, pos.1 as i32);
    let ahead = (x + dx as i32, y + dy as i32);
    // Direction along the wall
    let (px, py) = if dx == 0 { (1, 0) } else { (0, 1) };

    let mut dests = 0;
    let mut boxes = 0;

    for (first, step) in [(0, -1), (1, 1)] {
        let mut k = first;
        loop {
            let wall = board.cell_at(ahead.0 + k * px, ahead.1 + k * py);
            if !wall.is_static_block() {
                // The wall has a gap, so the box can escape this way
                return false;
            }

            let cell = board.cell_at(x + k * px, y + k * py);
            if cell.is_static_block() {
                break;
            }
            match cell {
                Cell::Dest | Cell::MoverOnDest => dests += 1,
                Cell::Box => boxes += 1,
                Cell::BoxOnDest => {
                    dests += 1;
                    boxes += 1;
                }
                _ => {}
            }
            k += step;
        }
    }

    dests < boxes
}
