use std::fmt;
use std::hash::{Hash, Hasher};

use crate::levels::LevelError;
use crate::zobrist::Zobrist;

pub const MAX_SIZE: usize = 64;
pub const MAX_BOXES: usize = 64;

/// Board coordinates as `(x, y)`, with `y` growing downwards.
pub type Position = (u8, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Space,
    OutOfBounds,
    Box,
    BoxOnDest,
    Dest,
    Mover,
    MoverOnDest,
}

impl Cell {
    /// Walls and out-of-bounds cells never change and can never be entered.
    pub fn is_static_block(self) -> bool {
        matches!(self, Cell::Wall | Cell::OutOfBounds)
    }

    pub fn is_dest(self) -> bool {
        matches!(self, Cell::Dest | Cell::MoverOnDest | Cell::BoxOnDest)
    }

    /// Free for the mover to step on or for a box to be pushed onto.
    pub fn is_open(self) -> bool {
        matches!(self, Cell::Space | Cell::Dest)
    }

    pub fn has_box(self) -> bool {
        matches!(self, Cell::Box | Cell::BoxOnDest)
    }

    fn with_box(self) -> Cell {
        if self.is_dest() { Cell::BoxOnDest } else { Cell::Box }
    }

    fn with_mover(self) -> Cell {
        if self.is_dest() {
            Cell::MoverOnDest
        } else {
            Cell::Mover
        }
    }

    fn vacated(self) -> Cell {
        match self {
            Cell::Box | Cell::Mover => Cell::Space,
            Cell::BoxOnDest | Cell::MoverOnDest => Cell::Dest,
            other => other,
        }
    }

    fn from_char(ch: char) -> Option<Cell> {
        match ch {
            '#' => Some(Cell::Wall),
            ' ' => Some(Cell::Space),
            '-' | '_' => Some(Cell::OutOfBounds),
            '$' => Some(Cell::Box),
            '*' => Some(Cell::BoxOnDest),
            '.' => Some(Cell::Dest),
            '@' => Some(Cell::Mover),
            '+' => Some(Cell::MoverOnDest),
            _ => None,
        }
    }

    fn to_char(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Space | Cell::OutOfBounds => ' ',
            Cell::Box => '$',
            Cell::BoxOnDest => '*',
            Cell::Dest => '.',
            Cell::Mover => '@',
            Cell::MoverOnDest => '+',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
}

pub const ALL_ACTIONS: [Action; 4] = [Action::Left, Action::Right, Action::Up, Action::Down];

impl Action {
    pub fn delta(self) -> (i8, i8) {
        match self {
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::Up => (0, -1),
            Action::Down => (0, 1),
        }
    }

    pub fn opposite(self) -> Action {
        match self {
            Action::Left => Action::Right,
            Action::Right => Action::Left,
            Action::Up => Action::Down,
            Action::Down => Action::Up,
        }
    }

    /// Single-letter form used in recorded solutions.
    pub fn to_char(self) -> char {
        match self {
            Action::Left => 'l',
            Action::Right => 'r',
            Action::Up => 'u',
            Action::Down => 'd',
        }
    }

    pub fn from_char(ch: char) -> Option<Action> {
        match ch {
            'l' => Some(Action::Left),
            'r' => Some(Action::Right),
            'u' => Some(Action::Up),
            'd' => Some(Action::Down),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Left => write!(f, "Left"),
            Action::Right => write!(f, "Right"),
            Action::Up => write!(f, "Up"),
            Action::Down => write!(f, "Down"),
        }
    }
}

/// An immutable Sokoban position: the full grid of cells plus the mover.
///
/// Every move produces a fresh `Board`. The Zobrist key over box squares and
/// the mover square is carried along so hashing a board is O(1).
#[derive(Debug, Clone)]
pub struct Board {
    cells: Vec<Cell>,
    width: u8,
    height: u8,
    mover: Position,
    hash: u64,
}

impl Board {
    /// Parse a Sokoban board from text format.
    ///
    /// Characters:
    /// - `#` = Wall
    /// - ` ` = Space
    /// - `-` or `_` = Out of bounds
    /// - `.` = Destination
    /// - `$` = Box
    /// - `*` = Box on destination
    /// - `@` = Mover
    /// - `+` = Mover on destination
    ///
    /// Cells that the mover cannot reach through non-wall cells are marked
    /// out of bounds.
    pub fn from_text(text: &str) -> Result<Self, LevelError> {
        let lines: Vec<&str> = text.lines().collect();

        if lines.is_empty() {
            return Err(LevelError::InvalidLevel("Empty board".to_string()));
        }

        let height = lines.len();
        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        if width > MAX_SIZE {
            return Err(LevelError::InvalidLevel(format!(
                "Board width {} exceeds maximum size {}",
                width, MAX_SIZE
            )));
        }
        if height > MAX_SIZE {
            return Err(LevelError::InvalidLevel(format!(
                "Board height {} exceeds maximum size {}",
                height, MAX_SIZE
            )));
        }

        let mut cells = vec![Cell::OutOfBounds; width * height];
        let mut mover = None;

        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let cell = Cell::from_char(ch).ok_or_else(|| {
                    LevelError::InvalidLevel(format!(
                        "Invalid character '{}' at position ({}, {})",
                        ch, x, y
                    ))
                })?;
                if matches!(cell, Cell::Mover | Cell::MoverOnDest) {
                    if mover.is_some() {
                        return Err(LevelError::InvalidLevel(
                            "Multiple movers found".to_string(),
                        ));
                    }
                    mover = Some((x as u8, y as u8));
                }
                cells[y * width + x] = cell;
            }
        }

        let mover = mover.ok_or_else(|| LevelError::InvalidLevel("No mover found".to_string()))?;
        Self::seal_unreachable(&mut cells, width, height, mover)?;

        let box_count = cells.iter().filter(|c| c.has_box()).count();
        let dest_count = cells.iter().filter(|c| c.is_dest()).count();
        if box_count > MAX_BOXES || dest_count > MAX_BOXES {
            return Err(LevelError::InvalidLevel(format!(
                "More than {} boxes or destinations",
                MAX_BOXES
            )));
        }
        if dest_count < box_count {
            return Err(LevelError::InvalidLevel(format!(
                "Destination count ({}) is less than box count ({})",
                dest_count, box_count
            )));
        }

        let mut board = Board {
            cells,
            width: width as u8,
            height: height as u8,
            mover,
            hash: 0,
        };
        board.hash = Zobrist::global().compute_hash(board.boxes(), mover);
        Ok(board)
    }

    /// Flood-fill from the mover through every non-wall cell. Whatever the
    /// fill does not touch can never be entered and becomes out of bounds.
    fn seal_unreachable(
        cells: &mut [Cell],
        width: usize,
        height: usize,
        mover: Position,
    ) -> Result<(), LevelError> {
        let mut reached = vec![false; width * height];
        let mut stack = vec![mover];
        reached[mover.1 as usize * width + mover.0 as usize] = true;

        let directions = [(0, -1), (1, 0), (0, 1), (-1, 0)];

        while let Some((x, y)) = stack.pop() {
            for (dx, dy) in directions.iter() {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;

                if nx >= 0 && ny >= 0 && nx < width as i32 && ny < height as i32 {
                    let idx = ny as usize * width + nx as usize;
                    if !reached[idx] && !cells[idx].is_static_block() {
                        reached[idx] = true;
                        stack.push((nx as u8, ny as u8));
                    }
                }
            }
        }

        for (idx, cell) in cells.iter_mut().enumerate() {
            if reached[idx] {
                continue;
            }
            match *cell {
                Cell::Space | Cell::BoxOnDest => *cell = Cell::OutOfBounds,
                Cell::Box | Cell::Dest => {
                    return Err(LevelError::InvalidLevel(format!(
                        "Unreachable {} at position ({}, {})",
                        if *cell == Cell::Box { "box" } else { "destination" },
                        idx % width,
                        idx / width
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn mover(&self) -> Position {
        self.mover
    }

    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[pos.1 as usize * self.width as usize + pos.0 as usize]
    }

    /// Cell lookup with signed coordinates; anything off the grid is out of
    /// bounds.
    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            Cell::OutOfBounds
        } else {
            self.cell((x as u8, y as u8))
        }
    }

    pub fn is_open(&self, pos: Position) -> bool {
        self.cell(pos).is_open()
    }

    pub fn has_box(&self, pos: Position) -> bool {
        self.cell(pos).has_box()
    }

    /// Move from a position in the given direction.
    /// Returns `None` if the step leaves the grid.
    pub fn move_position(&self, pos: Position, action: Action) -> Option<Position> {
        let (dx, dy) = action.delta();
        let new_x = pos.0 as i32 + dx as i32;
        let new_y = pos.1 as i32 + dy as i32;

        if new_x >= 0 && new_y >= 0 && new_x < self.width as i32 && new_y < self.height as i32 {
            Some((new_x as u8, new_y as u8))
        } else {
            None
        }
    }

    /// All grid positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y)))
    }

    pub fn boxes(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(|&pos| self.has_box(pos))
    }

    pub fn destinations(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(|&pos| self.cell(pos).is_dest())
    }

    /// Apply one move. Returns the resulting board and, when the move pushed a
    /// box, the box's new position. Returns `None` for illegal moves.
    pub fn apply_move(&self, action: Action) -> Option<(Board, Option<Position>)> {
        let target = self.move_position(self.mover, action)?;
        let target_cell = self.cell(target);

        if target_cell.is_open() {
            let mut next = self.clone();
            next.leave_mover();
            next.enter_mover(target);
            return Some((next, None));
        }

        if target_cell.has_box() {
            let beyond = self.move_position(target, action)?;
            if self.is_open(beyond) {
                let mut next = self.clone();
                next.leave_box(target);
                next.enter_box(beyond);
                next.leave_mover();
                next.enter_mover(target);
                return Some((next, Some(beyond)));
            }
        }

        None
    }

    /// Every destination is covered by a box.
    pub fn is_goal(&self) -> bool {
        !self
            .cells
            .iter()
            .any(|&c| matches!(c, Cell::Dest | Cell::MoverOnDest))
    }

    fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.1 as usize * self.width as usize + pos.0 as usize]
    }

    fn enter_mover(&mut self, pos: Position) {
        let cell = self.cell_mut(pos);
        *cell = cell.with_mover();
        self.mover = pos;
        self.hash ^= Zobrist::global().mover_hash(pos);
    }

    fn leave_mover(&mut self) {
        let pos = self.mover;
        let cell = self.cell_mut(pos);
        *cell = cell.vacated();
        self.hash ^= Zobrist::global().mover_hash(pos);
    }

    fn enter_box(&mut self, pos: Position) {
        let cell = self.cell_mut(pos);
        *cell = cell.with_box();
        self.hash ^= Zobrist::global().box_hash(pos);
    }

    fn leave_box(&mut self, pos: Position) {
        let cell = self.cell_mut(pos);
        *cell = cell.vacated();
        self.hash ^= Zobrist::global().box_hash(pos);
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.mover == other.mover
            && self.width == other.width
            && self.cells == other.cells
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            let line: String = (0..self.width)
                .map(|x| self.cell((x, y)).to_char())
                .collect();
            // Trim trailing spaces to match original input format
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
