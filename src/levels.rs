//! Built-in levels.

use anyhow::{Context, Result};

use crate::Game;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub name: &'static str,
    pub description: &'static str,
    pub map: &'static str,
}

impl Level {
    pub fn game(&self) -> Result<Game> {
        self.map
            .parse::<Game>()
            .with_context(|| format!("Invalid built-in level {:?}", self.name))
    }
}

pub static LEVELS: [Level; 3] = [
    Level {
        name: "Basic",
        description: "Two simple lights",
        map: "
            R.L
            .#.
            ..L
        ",
    },
    Level {
        name: "Intermediate",
        description: "Three lights with obstacles",
        map: "
            L..#
            R#..
            ..#L
            L...
        ",
    },
    Level {
        name: "Advanced",
        description: "Four lights in a maze",
        map: "
            R#L..
            ...#L
            #.#..
            L...#
            ..L..
        ",
    },
];

/// Level by its 1-based number.
pub fn level(number: usize) -> Option<&'static Level> {
    number.checked_sub(1).and_then(|idx| LEVELS.get(idx))
}
