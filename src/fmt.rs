use std::fmt;

use crate::{Action, Cell, Game, Model, Node};

/// A game rendered at a particular search node.
pub struct Snapshot<'a> {
    pub game: &'a Game,
    pub node: &'a Node,
}

impl Game {
    pub fn snapshot<'a>(&'a self, node: &'a Node) -> Snapshot<'a> {
        Snapshot { game: self, node }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.snapshot(&self.initial()).fmt(f)
    }
}

impl fmt::Display for Snapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Snapshot { game, node } = self;
        for (pos, cell) in game.board().cells() {
            if pos.1 == 0 && pos.0 != 0 {
                "\n".fmt(f)?;
            }
            let lit = game
                .light_index(pos)
                .map_or(false, |idx| node.lights().is_on(idx));
            let ch = match (pos == node.pos(), cell) {
                (true, Cell::Light) if lit => '@',
                (true, Cell::Light) => 'r',
                (true, _) => 'R',
                (false, Cell::Light) if lit => '*',
                (false, cell) => cell.symbol(),
            };
            ch.fmt(f)?;
        }
        "\n".fmt(f)
    }
}

impl Cell {
    fn symbol(self) -> char {
        match self {
            Cell::Floor => '.',
            Cell::Obstacle => '#',
            Cell::Light => 'L',
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbol().fmt(f)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Up => "UP".fmt(f),
            Action::Down => "DOWN".fmt(f),
            Action::Left => "LEFT".fmt(f),
            Action::Right => "RIGHT".fmt(f),
            Action::Toggle => "TOGGLE".fmt(f),
            Action::Start => "START".fmt(f),
        }
    }
}
