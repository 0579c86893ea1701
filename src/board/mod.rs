//! 15x15 gomoku board: stone placement, undo, and terminal detection.
//!
//! Win detection only scans the four line directions through the last
//! placed stone, so it stays O(1) in board size. The search leans on this
//! at every leaf; the whole-board [`Board::scan_winner`] exists only for
//! validating caller-supplied positions at the engine boundary.

use std::fmt;

use crate::error::EngineError;

pub const BOARD_SIZE: usize = 15;
pub const WIN_LENGTH: usize = 5;
const CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// The four line directions (E, S, SE, NE); each is scanned both ways.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Stone color. Wire encoding: Black = 1 (first player), White = 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Player {
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        match self {
            Player::Black => 1,
            Player::White => 2,
        }
    }

    pub fn from_u8(v: u8) -> Option<Player> {
        match v {
            1 => Some(Player::Black),
            2 => Some(Player::White),
            _ => None,
        }
    }
}

/// Cell state. `repr` matches the 0/1/2 wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    #[inline]
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
        }
    }

    #[inline]
    fn of(player: Player) -> Cell {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// Classification of a position after the most recent move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Win(Player),
    Draw,
}

/// Overline handling. The common ruleset counts 6+ as a win; the
/// exact-five variant is kept for rule experiments and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WinRule {
    #[default]
    FiveOrMore,
    ExactlyFive,
}

/// A single stone placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    #[inline]
    pub fn new(row: usize, col: usize) -> Move {
        Move { row, col }
    }

    /// Flat cell index in row-major order.
    #[inline]
    pub fn index(self) -> usize {
        self.row * BOARD_SIZE + self.col
    }
}

/// The board itself. Cloning is cheap (a flat 225-cell array), but the
/// search mutates one instance in place via the place/remove pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; CELLS],
    stones: u16,
}

impl Board {
    pub fn new() -> Board {
        Board {
            cells: [Cell::Empty; CELLS],
            stones: 0,
        }
    }

    /// Build a board from a wire-encoded grid, rejecting wrong dimensions
    /// and illegal cell values.
    pub fn from_grid(grid: &[Vec<u8>]) -> Result<Board, EngineError> {
        if grid.len() != BOARD_SIZE {
            return Err(EngineError::InvalidBoard(format!(
                "expected {} rows, got {}",
                BOARD_SIZE,
                grid.len()
            )));
        }
        let mut board = Board::new();
        for (r, row) in grid.iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(EngineError::InvalidBoard(format!(
                    "row {} has {} columns, expected {}",
                    r,
                    row.len(),
                    BOARD_SIZE
                )));
            }
            for (c, &v) in row.iter().enumerate() {
                match v {
                    0 => {}
                    1 | 2 => {
                        board.cells[r * BOARD_SIZE + c] =
                            if v == 1 { Cell::Black } else { Cell::White };
                        board.stones += 1;
                    }
                    other => {
                        return Err(EngineError::InvalidBoard(format!(
                            "illegal cell value {} at ({}, {})",
                            other, r, c
                        )));
                    }
                }
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * BOARD_SIZE + col]
    }

    #[inline]
    fn at(&self, row: i32, col: i32) -> Cell {
        self.cells[row as usize * BOARD_SIZE + col as usize]
    }

    #[inline]
    pub fn in_range(row: usize, col: usize) -> bool {
        row < BOARD_SIZE && col < BOARD_SIZE
    }

    /// True iff the coordinates are on the board and the cell is empty.
    #[inline]
    pub fn is_valid_move(&self, row: usize, col: usize) -> bool {
        Self::in_range(row, col) && self.get(row, col) == Cell::Empty
    }

    /// Place a stone. The search pairs this with [`Board::remove`] along
    /// every branch, so the error path never allocates.
    pub fn place(&mut self, row: usize, col: usize, player: Player) -> Result<(), EngineError> {
        if !Self::in_range(row, col) {
            return Err(EngineError::OutOfRange { row, col });
        }
        let idx = row * BOARD_SIZE + col;
        if self.cells[idx] != Cell::Empty {
            return Err(EngineError::CellOccupied { row, col });
        }
        self.cells[idx] = Cell::of(player);
        self.stones += 1;
        Ok(())
    }

    /// Undo a placement made with [`Board::place`].
    #[inline]
    pub fn remove(&mut self, row: usize, col: usize) {
        let idx = row * BOARD_SIZE + col;
        debug_assert!(self.cells[idx] != Cell::Empty, "removing from empty cell");
        self.cells[idx] = Cell::Empty;
        self.stones -= 1;
    }

    #[inline]
    pub fn stone_count(&self) -> u32 {
        u32::from(self.stones)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stones == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stones as usize == CELLS
    }

    /// Length of the maximal contiguous same-color run through (row, col)
    /// along direction (dr, dc), counting both ways from the stone.
    fn run_through(&self, row: usize, col: usize, dr: i32, dc: i32, player: Player) -> usize {
        let cell = Cell::of(player);
        let mut count = 1;
        for sign in [1i32, -1] {
            let mut r = row as i32 + dr * sign;
            let mut c = col as i32 + dc * sign;
            while r >= 0
                && r < BOARD_SIZE as i32
                && c >= 0
                && c < BOARD_SIZE as i32
                && self.at(r, c) == cell
            {
                count += 1;
                r += dr * sign;
                c += dc * sign;
            }
        }
        count
    }

    /// Classify the position given that (row, col) holds the last-placed
    /// stone. Only the four lines through that stone are examined.
    pub fn terminal_after(&self, row: usize, col: usize, rule: WinRule) -> Outcome {
        if let Some(player) = self.get(row, col).player() {
            for (dr, dc) in DIRECTIONS {
                let run = self.run_through(row, col, dr, dc, player);
                let won = match rule {
                    WinRule::FiveOrMore => run >= WIN_LENGTH,
                    WinRule::ExactlyFive => run == WIN_LENGTH,
                };
                if won {
                    return Outcome::Win(player);
                }
            }
        }
        if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }

    /// Whole-board winner scan. O(cells); used only to validate caller
    /// positions before a search starts, never inside the search.
    pub fn scan_winner(&self, rule: WinRule) -> Option<Player> {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let player = match self.get(row, col).player() {
                    Some(p) => p,
                    None => continue,
                };
                for (dr, dc) in DIRECTIONS {
                    // Only measure runs from their first stone.
                    let pr = row as i32 - dr;
                    let pc = col as i32 - dc;
                    if pr >= 0
                        && pr < BOARD_SIZE as i32
                        && pc >= 0
                        && pc < BOARD_SIZE as i32
                        && self.at(pr, pc).player() == Some(player)
                    {
                        continue;
                    }
                    let mut run = 0;
                    let mut r = row as i32;
                    let mut c = col as i32;
                    while r >= 0
                        && r < BOARD_SIZE as i32
                        && c >= 0
                        && c < BOARD_SIZE as i32
                        && self.at(r, c).player() == Some(player)
                    {
                        run += 1;
                        r += dr;
                        c += dc;
                    }
                    let won = match rule {
                        WinRule::FiveOrMore => run >= WIN_LENGTH,
                        WinRule::ExactlyFive => run == WIN_LENGTH,
                    };
                    if won {
                        return Some(player);
                    }
                }
            }
        }
        None
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({} stones)\n{}", self.stones, self)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", col % 10)?;
        }
        writeln!(f)?;
        for row in 0..BOARD_SIZE {
            write!(f, "{:2}", row)?;
            for col in 0..BOARD_SIZE {
                let sym = match self.get(row, col) {
                    Cell::Empty => '.',
                    Cell::Black => 'X',
                    Cell::White => 'O',
                };
                write!(f, " {}", sym)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
