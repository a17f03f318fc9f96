//! Bounded 2D tile grid with tracked start and goal cells

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DungeonError, Result, TileKind};

/// Cell coordinate, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column index
    pub x: usize,
    /// Row index
    pub y: usize,
}

impl Position {
    /// Create a new position
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Shift by a signed delta, `None` if either coordinate would go negative
    #[must_use]
    pub fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A fixed-size grid of tiles
///
/// Tiles are stored row-major. The start and goal caches are only ever
/// written by [`Grid::set`], so the cell they point at always holds the
/// matching kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
    start: Option<usize>,
    goal: Option<usize>,
}

impl Grid {
    /// Create an all-empty grid
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileKind::Empty; width * height],
            start: None,
            goal: None,
        }
    }

    /// Create a grid whose outer ring is walls
    #[must_use]
    pub fn bordered(width: usize, height: usize) -> Self {
        let mut grid = Self::new(width, height);
        for (index, tile) in grid.tiles.iter_mut().enumerate() {
            let (x, y) = (index % width, index / width);
            if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                *tile = TileKind::Wall;
            }
        }
        grid
    }

    /// Parse a textual layout, leaving unknown characters as `Empty`
    #[must_use]
    pub fn from_layout(text: &str) -> Self {
        Self::parse_layout(text, |_, _| {})
    }

    /// Parse a textual layout and report every unknown character
    ///
    /// The grid is built exactly as [`Grid::from_layout`] builds it; each
    /// rejected character is also logged at warn level.
    #[must_use]
    pub fn from_layout_reporting(text: &str) -> (Self, Vec<(Position, DungeonError)>) {
        let mut issues = Vec::new();
        let grid = Self::parse_layout(text, |position, error| {
            tracing::warn!(%position, %error, "ignoring layout character");
            issues.push((position, error));
        });
        (grid, issues)
    }

    fn parse_layout<F>(text: &str, mut on_unknown: F) -> Self
    where
        F: FnMut(Position, DungeonError),
    {
        let lines: Vec<&str> = text
            .trim_matches(|c| c == '\n' || c == '\r')
            .lines()
            .filter(|line| !line.is_empty())
            .collect();
        let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(width, lines.len());

        for (y, line) in lines.iter().enumerate() {
            for (x, symbol) in line.chars().enumerate() {
                if symbol == ' ' {
                    continue;
                }
                match TileKind::from_symbol(symbol) {
                    Ok(kind) => {
                        let index = y * width + x;
                        grid.write(index, kind);
                    }
                    Err(err) => on_unknown(Position::new(x, y), err),
                }
            }
        }

        grid
    }

    /// Canonical layout text, one line per row
    #[must_use]
    pub fn to_layout(&self) -> String {
        self.to_string()
    }

    /// Number of columns
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    /// Tile at `(x, y)`
    pub fn get(&self, x: usize, y: usize) -> Result<TileKind> {
        let index = self.index_of(x, y)?;
        Ok(self.tiles[index])
    }

    /// Tile at `position`
    pub fn tile_at(&self, position: Position) -> Result<TileKind> {
        self.get(position.x, position.y)
    }

    /// Overwrite the tile at `(x, y)`
    ///
    /// Placing a `Start` or `Goal` moves the singleton: the previous holder
    /// reverts to `Empty`.
    pub fn set(&mut self, x: usize, y: usize, kind: TileKind) -> Result<()> {
        let index = self.index_of(x, y)?;
        self.write(index, kind);
        Ok(())
    }

    fn write(&mut self, index: usize, kind: TileKind) {
        match self.tiles[index] {
            TileKind::Start => self.start = None,
            TileKind::Goal => self.goal = None,
            _ => {}
        }

        let slot = match kind {
            TileKind::Start => Some(&mut self.start),
            TileKind::Goal => Some(&mut self.goal),
            _ => None,
        };
        if let Some(slot) = slot {
            if let Some(previous) = slot.replace(index) {
                self.tiles[previous] = TileKind::Empty;
            }
        }

        self.tiles[index] = kind;
    }

    /// Whether a signed coordinate lies inside the grid
    #[must_use]
    pub fn is_valid_position(&self, x: isize, y: isize) -> bool {
        usize::try_from(x).is_ok_and(|x| x < self.width)
            && usize::try_from(y).is_ok_and(|y| y < self.height)
    }

    /// Whether `position` lies inside the grid
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Location of the start tile, if any
    #[must_use]
    pub fn start_position(&self) -> Option<Position> {
        self.start.map(|index| self.position_of(index))
    }

    /// Location of the goal tile, if any
    #[must_use]
    pub fn goal_position(&self) -> Option<Position> {
        self.goal.map(|index| self.position_of(index))
    }

    /// Row-major cell index for a position inside the grid
    pub fn index_of(&self, x: usize, y: usize) -> Result<usize> {
        if x < self.width && y < self.height {
            Ok(y * self.width + x)
        } else {
            Err(DungeonError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Inverse of [`Grid::index_of`]
    #[must_use]
    pub fn position_of(&self, index: usize) -> Position {
        Position::new(index % self.width, index / self.width)
    }

    /// Row-major iterator over every cell
    pub fn cells(&self) -> impl Iterator<Item = (Position, TileKind)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, &kind)| (self.position_of(index), kind))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.tiles.chunks(self.width.max(1)).enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            for kind in row {
                write!(f, "{}", kind.symbol())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EASY: &str = "#####\n#S..#\n#...#\n#..G#\n#####";

    fn tile_kind() -> impl Strategy<Value = TileKind> {
        prop::sample::select(TileKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_set_then_get(
            width in 1usize..12,
            height in 1usize..12,
            x in 0usize..12,
            y in 0usize..12,
            kind in tile_kind(),
        ) {
            prop_assume!(x < width && y < height);
            let mut grid = Grid::bordered(width, height);
            grid.set(x, y, kind).unwrap();
            prop_assert_eq!(grid.get(x, y).unwrap(), kind);
        }

        #[test]
        fn prop_at_most_one_start_and_goal(
            writes in prop::collection::vec((0usize..6, 0usize..6, tile_kind()), 0..40),
        ) {
            let mut grid = Grid::new(6, 6);
            for (x, y, kind) in writes {
                grid.set(x, y, kind).unwrap();
            }
            let starts = grid.cells().filter(|(_, k)| *k == TileKind::Start).count();
            let goals = grid.cells().filter(|(_, k)| *k == TileKind::Goal).count();
            prop_assert!(starts <= 1 && goals <= 1);
            prop_assert_eq!(starts == 1, grid.start_position().is_some());
            prop_assert_eq!(goals == 1, grid.goal_position().is_some());
            if let Some(start) = grid.start_position() {
                prop_assert_eq!(grid.tile_at(start).unwrap(), TileKind::Start);
            }
            if let Some(goal) = grid.goal_position() {
                prop_assert_eq!(grid.tile_at(goal).unwrap(), TileKind::Goal);
            }
        }
    }

    #[test]
    fn test_second_start_clears_first() {
        let mut grid = Grid::new(4, 4);
        grid.set(1, 1, TileKind::Start).unwrap();
        grid.set(2, 3, TileKind::Start).unwrap();

        assert_eq!(grid.get(1, 1).unwrap(), TileKind::Empty);
        assert_eq!(grid.start_position(), Some(Position::new(2, 3)));
    }

    #[test]
    fn test_second_goal_clears_first() {
        let mut grid = Grid::new(4, 4);
        grid.set(0, 0, TileKind::Goal).unwrap();
        grid.set(3, 3, TileKind::Goal).unwrap();

        assert_eq!(grid.get(0, 0).unwrap(), TileKind::Empty);
        assert_eq!(grid.goal_position(), Some(Position::new(3, 3)));
    }

    #[test]
    fn test_overwriting_start_forgets_it() {
        let mut grid = Grid::new(3, 3);
        grid.set(1, 1, TileKind::Start).unwrap();
        grid.set(1, 1, TileKind::Wall).unwrap();
        assert_eq!(grid.start_position(), None);

        grid.set(1, 1, TileKind::Goal).unwrap();
        grid.set(1, 1, TileKind::Start).unwrap();
        assert_eq!(grid.goal_position(), None);
        assert_eq!(grid.start_position(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::new(3, 2);
        assert!(matches!(
            grid.get(3, 0),
            Err(DungeonError::OutOfBounds { x: 3, y: 0, width: 3, height: 2 })
        ));
        assert!(grid.set(0, 2, TileKind::Wall).is_err());
        assert!(!grid.is_valid_position(-1, 0));
        assert!(!grid.is_valid_position(0, 2));
        assert!(grid.is_valid_position(2, 1));
    }

    #[test]
    fn test_bordered() {
        let grid = Grid::bordered(5, 4);
        assert_eq!(grid.get(0, 2).unwrap(), TileKind::Wall);
        assert_eq!(grid.get(4, 0).unwrap(), TileKind::Wall);
        assert_eq!(grid.get(2, 3).unwrap(), TileKind::Wall);
        assert_eq!(grid.get(2, 2).unwrap(), TileKind::Empty);
    }

    #[test]
    fn test_layout_round_trip() {
        let grid = Grid::from_layout(EASY);
        assert_eq!((grid.width(), grid.height()), (5, 5));
        assert_eq!(grid.start_position(), Some(Position::new(1, 1)));
        assert_eq!(grid.goal_position(), Some(Position::new(3, 3)));
        assert_eq!(grid.to_layout(), EASY);
    }

    #[test]
    fn test_lenient_layout() {
        let (grid, issues) = Grid::from_layout_reporting("\n#x#\n# H\n#\n\n");
        assert_eq!((grid.width(), grid.height()), (3, 3));
        assert_eq!(grid.to_layout(), "#.#\n#.H\n#..");

        assert_eq!(issues.len(), 1);
        let (position, error) = &issues[0];
        assert_eq!(*position, Position::new(1, 0));
        assert!(matches!(error, DungeonError::UnknownTileCharacter('x')));

        assert_eq!(Grid::from_layout("\n#x#\n# H\n#\n\n"), grid);
    }

    #[test]
    fn test_cells_are_row_major() {
        let grid = Grid::from_layout("S.\n.G");
        let kinds: Vec<TileKind> = grid.cells().map(|(_, kind)| kind).collect();
        assert_eq!(
            kinds,
            vec![TileKind::Start, TileKind::Empty, TileKind::Empty, TileKind::Goal]
        );
        assert_eq!(grid.position_of(3), Position::new(1, 1));
        assert_eq!(grid.index_of(1, 1).unwrap(), 3);
    }

    #[test]
    fn test_position_offset() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.offset(-1, 0), None);
        assert_eq!(origin.offset(1, 1), Some(Position::new(1, 1)));
    }
}
