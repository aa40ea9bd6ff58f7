use std::str::FromStr;

use anyhow::{bail, ensure, Context, Result};

use crate::{Board, Cell, Game, Vec2};

impl FromStr for Game {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s.lines().map(|line| line.trim()).filter(|line| !line.is_empty());

        let mut grid = Vec::new();
        let mut width = None;
        let mut height = 0;
        let mut start = None;

        for (i, line) in lines.enumerate() {
            let line_width = line.chars().count();
            let width = *width.get_or_insert(line_width);
            ensure!(
                line_width == width,
                "Width mismatch on line {}, expecting width {width}",
                i + 1,
            );
            ensure!(
                i < u8::MAX as usize && width <= u8::MAX as usize,
                "Board exceeds {0}x{0} cells",
                u8::MAX,
            );

            for (j, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '.' => Cell::Floor,
                    '#' => Cell::Obstacle,
                    'L' => Cell::Light,
                    'R' | 'r' => {
                        ensure!(start.is_none(), "Multiple robots");
                        start = Some(Vec2(i as _, j as _));
                        if ch == 'r' {
                            Cell::Light
                        } else {
                            Cell::Floor
                        }
                    }
                    _ => bail!("Invalid cell: {ch:?}"),
                };
                grid.push(cell);
            }
            height += 1;
        }

        let width = width.context("Empty map")?;
        let board = Board {
            height,
            width: width as _,
            grid: grid.into(),
        };
        Ok(Game::new(board, start.context("Missing robot")?))
    }
}
