//! A few well-known patterns in plaintext form, ready for
//! [`Pattern::from_plaintext`](crate::Pattern::from_plaintext).

/// Period-2 oscillator.
pub const BLINKER: &str = "OOO";

/// Still life.
pub const BLOCK: &str = "\
OO
OO";

/// Travels one cell south-east every 4 generations.
pub const GLIDER: &str = "\
.O.
..O
OOO";

/// Methuselah, stabilises after 1103 generations.
pub const R_PENTOMINO: &str = "\
.OO
OO.
.O.";

/// Methuselah, stabilises after 5206 generations.
pub const ACORN: &str = "\
.O.....
...O...
OO..OOO";

/// Emits a glider every 30 generations.
pub const GOSPER_GLIDER_GUN: &str = "\
........................O...........
......................O.O...........
............OO......OO............OO
...........O...O....OO............OO
OO........O.....O...OO..............
OO........O...O.OO....O.O...........
..........O.....O.......O...........
...........O...O....................
............OO......................";

pub const NAMES: &[&str] = &[
    "blinker",
    "block",
    "glider",
    "r-pentomino",
    "acorn",
    "gosper-gun",
];

/// Looks a pattern up by one of [`NAMES`], ignoring ASCII case.
pub fn by_name(name: &str) -> Option<&'static str> {
    let text = match name.to_ascii_lowercase().as_str() {
        "blinker" => BLINKER,
        "block" => BLOCK,
        "glider" => GLIDER,
        "r-pentomino" => R_PENTOMINO,
        "acorn" => ACORN,
        "gosper-gun" => GOSPER_GLIDER_GUN,
        _ => return None,
    };
    Some(text)
}
