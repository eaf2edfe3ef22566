use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::ParseGridError;

use super::{GRID_HEIGHT, GRID_WIDTH, piece::Piece, shape::PieceKind};

/// Maximum number of rows a single lock can complete.
pub const MAX_CLEARED_ROWS: usize = 4;

/// A single cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// No settled block.
    #[default]
    Empty,
    /// Settled block left behind by a piece of the given kind.
    Block(PieceKind),
}

impl Cell {
    /// Returns `true` for a cell without a settled block.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Returns `.` for an empty cell, or the piece kind character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Block(kind) => kind.as_char(),
        }
    }

    /// Parses the form written by [`Self::as_char`].
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Cell::Empty);
        }
        match PieceKind::from_char(c) {
            Some(kind) => Some(Cell::Block(kind)),
            None => None,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_char(self.as_char())
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let c = char::deserialize(deserializer)?;
        Cell::from_char(c).ok_or_else(|| serde::de::Error::custom(format!("invalid cell: {c}")))
    }
}

type Row = [Cell; GRID_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; GRID_WIDTH];

/// The settled cells of the playing field.
///
/// The grid is `10` columns wide and `20` rows high. Coordinates are
/// `(column, row)` with row `0` at the bottom, so a piece falls toward
/// decreasing row numbers.
///
/// The text form (see [`Display`](fmt::Display) and [`FromStr`]) prints the top
/// row first, one line per row, using `.` for empty cells and the piece
/// character for blocks. Parsing accepts fewer than 20 lines; the given lines
/// then describe the bottom rows.
///
/// # Example
///
/// ```
/// use quadris_engine::{Cell, Grid, PieceKind};
///
/// let grid: Grid = "\
/// ....T.....
/// ...TTT....
/// "
/// .parse()
/// .unwrap();
///
/// assert_eq!(grid.get(4, 1), Some(Cell::Block(PieceKind::T)));
/// assert_eq!(grid.get(3, 1), Some(Cell::Empty));
/// assert_eq!(grid.occupied_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    // Stored bottom-up: `rows[0]` is the bottom row.
    rows: [Row; GRID_HEIGHT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Grid {
    pub const WIDTH: usize = GRID_WIDTH;
    pub const HEIGHT: usize = GRID_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; GRID_HEIGHT],
    };

    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|x| *x < GRID_WIDTH)?;
        let y = usize::try_from(y).ok().filter(|y| *y < GRID_HEIGHT)?;
        Some((x, y))
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        Self::index(x, y).map(|(x, y)| self.rows[y][x])
    }

    /// Returns `true` if `(x, y)` lies inside the grid and holds no block.
    #[must_use]
    pub fn is_empty_at(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(Cell::is_empty)
    }

    pub(crate) fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some((x, y)) = Self::index(x, y) {
            self.rows[y][x] = cell;
        }
    }

    /// Returns `true` if `piece` cannot rest at its current position.
    ///
    /// A placement is legal when every cell lies in a column `0..10`, in a row
    /// `>= 0`, and, for rows inside the grid, on an empty cell. Rows at or above
    /// the top are always free so pieces can enter from above.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        piece.cells().into_iter().any(|(x, y)| {
            let in_columns = usize::try_from(x).is_ok_and(|x| x < GRID_WIDTH);
            if !in_columns || y < 0 {
                return true;
            }
            usize::try_from(y).is_ok_and(|y| y < GRID_HEIGHT) && !self.is_empty_at(x, y)
        })
    }

    /// Returns `true` if every column of row `y` holds a block.
    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|cell| !cell.is_empty()))
    }

    /// Iterates the rows from the bottom (row 0) to the top.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Cell; GRID_WIDTH]> {
        self.rows.iter()
    }

    /// Number of cells holding a block.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// Row indices that are currently full, bottom-up.
    pub fn full_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (0..GRID_HEIGHT).filter(|y| self.is_row_full(*y))
    }

    /// Writes the cells of `piece` into the grid.
    ///
    /// Cells above the top row are dropped.
    pub(crate) fn lock_piece(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            debug_assert!(
                usize::try_from(x).is_ok_and(|x| x < GRID_WIDTH) && y >= 0,
                "locking cell ({x}, {y}) outside the grid"
            );
            self.set(x, y, Cell::Block(piece.kind()));
        }
    }

    /// Removes every row that is full and shifts the rows above it down.
    ///
    /// Fullness is judged against the grid as it was before any row moved, so
    /// every originally full row is removed exactly once and no shifted row is
    /// re-examined. Rows vacated at the top become empty.
    ///
    /// # Returns
    ///
    /// The indices (bottom-up, pre-clear numbering) of the cleared rows.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_CLEARED_ROWS`] rows are full, which a single
    /// four-cell piece cannot produce.
    pub(crate) fn clear_full_rows(&mut self) -> ArrayVec<usize, MAX_CLEARED_ROWS> {
        let mut cleared = ArrayVec::new();
        let mut write_y = 0;
        for read_y in 0..GRID_HEIGHT {
            if self.is_row_full(read_y) {
                assert!(
                    !cleared.is_full(),
                    "more than {MAX_CLEARED_ROWS} full rows after a single lock"
                );
                cleared.push(read_y);
                continue;
            }
            if write_y != read_y {
                self.rows[write_y] = self.rows[read_y];
            }
            write_y += 1;
        }
        self.rows[write_y..].fill(EMPTY_ROW);
        cleared
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows.iter().rev() {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = ParseGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() > GRID_HEIGHT {
            return Err(ParseGridError::TooManyRows(lines.len()));
        }

        let mut grid = Self::EMPTY;
        for (y, line) in lines.iter().rev().enumerate() {
            let width = line.chars().count();
            if width != GRID_WIDTH {
                return Err(ParseGridError::RowWidth { row: y, width });
            }
            for (x, c) in line.chars().enumerate() {
                let cell =
                    Cell::from_char(c).ok_or(ParseGridError::InvalidCell { row: y, column: x, c })?;
                grid.rows[y][x] = cell;
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_row(kind: PieceKind) -> Row {
        [Cell::Block(kind); GRID_WIDTH]
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::EMPTY;
        assert_eq!(grid.occupied_count(), 0);
        for y in 0..GRID_HEIGHT {
            assert!(!grid.is_row_full(y));
        }
        assert!(grid.is_empty_at(0, 0));
        assert!(grid.is_empty_at(9, 19));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let grid = Grid::EMPTY;
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(10, 0), None);
        assert_eq!(grid.get(0, -1), None);
        assert_eq!(grid.get(0, 20), None);
        assert!(!grid.is_empty_at(0, 20));
        assert!(!grid.is_row_full(20));
    }

    #[test]
    fn test_set_outside_is_ignored() {
        let mut grid = Grid::EMPTY;
        grid.set(3, 25, Cell::Block(PieceKind::I));
        grid.set(-1, 0, Cell::Block(PieceKind::I));
        assert_eq!(grid, Grid::EMPTY);
    }

    #[test]
    fn test_collision_rule() {
        let mut grid = Grid::EMPTY;
        grid.set(4, 0, Cell::Block(PieceKind::O));

        let piece = Piece::new(PieceKind::T);
        assert!(!grid.is_colliding(&piece.at(1, 1)));
        // Left wall, right wall and floor.
        assert!(grid.is_colliding(&piece.at(0, 1)));
        assert!(grid.is_colliding(&piece.at(9, 1)));
        assert!(grid.is_colliding(&piece.at(1, -1)));
        // Settled block.
        assert!(grid.is_colliding(&piece.at(4, 0)));
        // Above the top is free.
        assert!(!grid.is_colliding(&piece.at(4, 19)));
        assert!(!grid.is_colliding(&piece.at(4, 40)));
    }

    #[test]
    fn test_lock_piece_drops_cells_above_top() {
        let mut grid = Grid::EMPTY;
        // Vertical I with anchor on the top row: cells at rows 18..=21.
        let piece = Piece::new(PieceKind::I).at(4, 19);
        grid.lock_piece(&piece);
        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(grid.get(4, 18), Some(Cell::Block(PieceKind::I)));
        assert_eq!(grid.get(4, 19), Some(Cell::Block(PieceKind::I)));
    }

    #[test]
    fn test_clear_lines_bottom_row() {
        let mut grid: Grid = "\
            ..Z.......
            IIIIIIIIII
        "
        .parse()
        .unwrap();

        let cleared = grid.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[0]);
        assert_eq!(grid.get(2, 0), Some(Cell::Block(PieceKind::Z)));
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_clear_lines_with_partial_lines() {
        let mut grid: Grid = "IIIIIIIII.".parse().unwrap();
        let before = grid.clone();
        assert!(grid.clear_full_rows().is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_clear_lines_non_adjacent_rows() {
        let mut grid: Grid = "\
            ...O......
            LLLLLLLLLL
            J.........
            SSSSSSSSSS
            ........T.
        "
        .parse()
        .unwrap();

        let cleared = grid.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[1, 3]);

        let expected: Grid = "\
            ...O......
            J.........
            ........T.
        "
        .parse()
        .unwrap();
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_clear_lines_resets_top_rows() {
        let mut grid = Grid::EMPTY;
        grid.rows[GRID_HEIGHT - 1][0] = Cell::Block(PieceKind::T);
        grid.rows[0] = filled_row(PieceKind::I);

        assert_eq!(grid.clear_full_rows().len(), 1);
        assert_eq!(grid.get(0, 19), Some(Cell::Empty));
        assert_eq!(grid.get(0, 18), Some(Cell::Block(PieceKind::T)));
    }

    #[test]
    fn test_clear_lines_four_rows() {
        let mut grid = Grid::EMPTY;
        for y in 0..4 {
            grid.rows[y] = filled_row(PieceKind::I);
        }
        grid.rows[4][5] = Cell::Block(PieceKind::O);

        assert_eq!(grid.clear_full_rows().as_slice(), &[0, 1, 2, 3]);
        assert_eq!(grid.get(5, 0), Some(Cell::Block(PieceKind::O)));
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    #[should_panic(expected = "more than 4 full rows")]
    fn test_clear_more_than_four_rows_panics() {
        let mut grid = Grid::EMPTY;
        for y in 0..5 {
            grid.rows[y] = filled_row(PieceKind::L);
        }
        grid.clear_full_rows();
    }

    #[test]
    fn test_text_form_round_trip() {
        let text = "\
            ....T.....
            ...TTT...O
        ";
        let grid: Grid = text.parse().unwrap();
        let rendered = grid.to_string();
        assert_eq!(rendered.lines().count(), GRID_HEIGHT);
        assert_eq!(rendered.lines().last(), Some("...TTT...O"));
        assert_eq!(rendered.parse::<Grid>().unwrap(), grid);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "IIII".parse::<Grid>(),
            Err(ParseGridError::RowWidth { row: 0, width: 4 })
        );
        assert_eq!(
            "IIIIX.....".parse::<Grid>(),
            Err(ParseGridError::InvalidCell {
                row: 0,
                column: 4,
                c: 'X'
            })
        );
        let tall = "..........\n".repeat(21);
        assert_eq!(tall.parse::<Grid>(), Err(ParseGridError::TooManyRows(21)));
    }

    #[test]
    fn test_cell_serialization() {
        let cells = [Cell::Empty, Cell::Block(PieceKind::J)];
        let serialized = serde_json::to_string(&cells).unwrap();
        assert_eq!(serialized, r#"[".","J"]"#);
        let deserialized: [Cell; 2] = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, cells);
        assert!(serde_json::from_str::<Cell>(r#""X""#).is_err());
    }

    mod clear_props {
        use proptest::prelude::*;

        use super::*;

        fn row_strategy() -> impl Strategy<Value = Row> {
            prop_oneof![
                1 => Just(filled_row(PieceKind::I)),
                3 => prop::array::uniform10(prop::bool::ANY).prop_map(|mask| {
                    let mut row = EMPTY_ROW;
                    for (cell, filled) in row.iter_mut().zip(mask) {
                        if filled {
                            *cell = Cell::Block(PieceKind::T);
                        }
                    }
                    row
                }),
            ]
        }

        fn grid_strategy() -> impl Strategy<Value = Grid> {
            prop::collection::vec(row_strategy(), GRID_HEIGHT)
                .prop_filter("at most four full rows", |rows| {
                    rows.iter()
                        .filter(|row| row.iter().all(|cell| !cell.is_empty()))
                        .count()
                        <= MAX_CLEARED_ROWS
                })
                .prop_map(|rows| {
                    let mut grid = Grid::EMPTY;
                    grid.rows.copy_from_slice(&rows);
                    grid
                })
        }

        proptest! {
            #[test]
            fn clearing_compacts_surviving_rows(grid in grid_strategy()) {
                let full_before: Vec<usize> = grid.full_rows().collect();
                let survivors: Vec<Row> = grid
                    .rows
                    .iter()
                    .enumerate()
                    .filter(|(y, _)| !full_before.contains(y))
                    .map(|(_, row)| *row)
                    .collect();

                let mut cleared_grid = grid.clone();
                let cleared = cleared_grid.clear_full_rows();

                prop_assert_eq!(cleared.as_slice(), full_before.as_slice());
                prop_assert_eq!(&cleared_grid.rows[..survivors.len()], survivors.as_slice());
                for row in &cleared_grid.rows[survivors.len()..] {
                    prop_assert_eq!(row, &EMPTY_ROW);
                }
                prop_assert_eq!(cleared_grid.full_rows().count(), 0);
            }
        }
    }
}
