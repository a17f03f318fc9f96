//! Built-in dungeon levels

use dungeon_rl_core::Grid;

/// Open 5×5 room, start top-left, goal bottom-right
pub const EASY: &str = "\
#####
#S..#
#...#
#..G#
#####";

/// Room scattered with traps and one healing tile
pub const TRAP: &str = "\
#######
#S..T.#
#.T.#.#
#..H.T#
#.T...#
#...TG#
#######";

/// Winding corridors with a trap on the short way round
pub const MAZE: &str = "\
#########
#S#.....#
#.#.###.#
#...#...#
###.#.###
#...#..H#
#.###.#.#
#...T.#G#
#########";

/// Registered name and layout of every built-in level
pub const BUILTIN: [(&str, &str); 3] = [
    ("Dungeon-v0", EASY),
    ("Dungeon-Trap-v0", TRAP),
    ("Dungeon-Maze-v0", MAZE),
];

/// Parse a built-in layout
#[must_use]
pub fn load(layout: &str) -> Grid {
    Grid::from_layout(layout)
}
