use std::ops::Index;
use std::sync::Arc;

use arrayvec::ArrayVec;

mod fmt;
mod frontier;
pub mod levels;
mod parse;
pub mod report;
pub mod solve;

pub use fmt::Snapshot;
pub use frontier::{EmptyFrontier, Frontier};

/// Grid position as `(row, column)`, `(0, 0)` being the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vec2(pub u8, pub u8);

impl Vec2 {
    pub fn manhattan(self, other: Self) -> u32 {
        u32::from(self.0.abs_diff(other.0)) + u32::from(self.1.abs_diff(other.1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Floor,
    Obstacle,
    Light,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    height: u8,
    width: u8,
    grid: Box<[Cell]>,
}

impl Index<Vec2> for Board {
    type Output = Cell;
    fn index(&self, pos: Vec2) -> &Self::Output {
        let idx = pos.0 as usize * self.width as usize + pos.1 as usize;
        &self.grid[idx]
    }
}

impl Board {
    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Vec2, Cell)> + '_ {
        let width = self.width as usize;
        self.grid
            .iter()
            .copied()
            .zip(0..)
            .map(move |(cell, idx): (Cell, usize)| {
                (Vec2((idx / width) as u8, (idx % width) as u8), cell)
            })
    }

    fn sibling_pos(&self, pos: Vec2, (dx, dy): (i8, i8)) -> Option<Vec2> {
        let x = pos.0.checked_add_signed(dx)?;
        let y = pos.1.checked_add_signed(dy)?;
        if self.height <= x || self.width <= y {
            return None;
        }
        Some(Vec2(x, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Toggle,
    /// Sentinel carried by the root node. Never applicable.
    Start,
}

impl Action {
    /// Every applicable action, in successor emission order.
    pub const ALL: [Self; 5] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Toggle,
    ];

    fn offset(self) -> Option<(i8, i8)> {
        match self {
            Action::Up => Some((-1, 0)),
            Action::Down => Some((1, 0)),
            Action::Left => Some((0, -1)),
            Action::Right => Some((0, 1)),
            Action::Toggle | Action::Start => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Action::Up => 'U',
            Action::Down => 'D',
            Action::Left => 'L',
            Action::Right => 'R',
            Action::Toggle => 'T',
            Action::Start => 'S',
        }
    }

    pub fn from_code(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.code() == ch)
    }
}

/// On/off state of every light, indexed by the board's row-major light order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lights(Box<[bool]>);

impl Lights {
    pub fn all_off(len: usize) -> Self {
        Self(vec![false; len].into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_on(&self, idx: usize) -> bool {
        self.0[idx]
    }

    pub fn all_on(&self) -> bool {
        self.0.iter().all(|&on| on)
    }

    pub fn count_on(&self) -> usize {
        self.0.iter().filter(|&&on| on).count()
    }

    pub fn unlit(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().zip(0..).filter(|&(&on, _)| !on).map(|(_, i)| i)
    }

    fn with_on(&self, idx: usize) -> Self {
        let mut bits = self.0.clone();
        bits[idx] = true;
        Self(bits)
    }
}

/// Identity of a puzzle configuration, independent of how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub pos: Vec2,
    pub lights: Lights,
}

/// A search node.
///
/// Nodes form a tree through `parent`. Everything but the visit order is fixed
/// once the node enters a frontier.
#[derive(Debug, Clone)]
pub struct Node {
    key: Key,
    parent: Option<Arc<Node>>,
    action: Action,
    cost: u32,
    heuristic: u32,
    visit_order: Option<u32>,
}

impl Node {
    pub fn root(pos: Vec2, lights: Lights) -> Self {
        Self {
            key: Key { pos, lights },
            parent: None,
            action: Action::Start,
            cost: 0,
            heuristic: 0,
            visit_order: None,
        }
    }

    fn child(parent: &Arc<Node>, action: Action, key: Key) -> Self {
        Self {
            key,
            parent: Some(parent.clone()),
            action,
            cost: parent.cost + 1,
            heuristic: 0,
            visit_order: None,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn pos(&self) -> Vec2 {
        self.key.pos
    }

    pub fn lights(&self) -> &Lights {
        &self.key.lights
    }

    pub fn parent(&self) -> Option<&Arc<Node>> {
        self.parent.as_ref()
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Accumulated cost `g`.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Heuristic estimate `h`.
    pub fn heuristic(&self) -> u32 {
        self.heuristic
    }

    /// Frontier priority `f = g + h`.
    pub fn priority(&self) -> u32 {
        self.cost + self.heuristic
    }

    /// 1-based expansion order, `None` until the node is expanded.
    pub fn visit_order(&self) -> Option<u32> {
        self.visit_order
    }

    pub(crate) fn set_heuristic(&mut self, heuristic: u32) {
        self.heuristic = heuristic;
    }

    pub(crate) fn set_visit_order(&mut self, order: u32) {
        self.visit_order = Some(order);
    }

    /// Actions leading from the root to this node.
    pub fn path(&self) -> Vec<Action> {
        let mut path = std::iter::successors(Some(self), |node| node.parent.as_deref())
            .filter(|node| node.parent.is_some())
            .map(|node| node.action)
            .collect::<Vec<_>>();
        path.reverse();
        path
    }
}

pub type Successors = ArrayVec<Node, 5>;

/// What a search strategy needs to know about a puzzle.
pub trait Model {
    fn initial(&self) -> Node;
    fn successors(&self, node: &Arc<Node>) -> Successors;
    fn is_goal(&self, node: &Node) -> bool;
    fn heuristic(&self, node: &Node) -> u32;
}

/// A board together with the robot's start position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    start: Vec2,
    light_positions: Box<[Vec2]>,
}

impl Game {
    pub fn new(board: Board, start: Vec2) -> Self {
        let light_positions = board
            .cells()
            .filter(|&(_, cell)| cell == Cell::Light)
            .map(|(pos, _)| pos)
            .collect();
        Self {
            board,
            start,
            light_positions,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn light_positions(&self) -> &[Vec2] {
        &self.light_positions
    }

    pub fn light_index(&self, pos: Vec2) -> Option<usize> {
        // Row-major enumeration keeps the table sorted.
        self.light_positions.binary_search(&pos).ok()
    }

    fn can_enter(&self, pos: Vec2) -> bool {
        self.board[pos] != Cell::Obstacle
    }

    /// The node reached by performing `action` at `node`, if it is legal.
    pub fn apply(&self, node: &Arc<Node>, action: Action) -> Option<Node> {
        let pos = node.pos();
        match action.offset() {
            Some(offset) => {
                let next = self.board.sibling_pos(pos, offset)?;
                if !self.can_enter(next) {
                    return None;
                }
                let key = Key {
                    pos: next,
                    lights: node.lights().clone(),
                };
                Some(Node::child(node, action, key))
            }
            None if action == Action::Toggle => {
                let idx = self.light_index(pos)?;
                if node.lights().is_on(idx) {
                    return None;
                }
                let key = Key {
                    pos,
                    lights: node.lights().with_on(idx),
                };
                Some(Node::child(node, action, key))
            }
            None => None,
        }
    }
}

impl Game {
    /// Nodes visited by following `path` from the start, the start included.
    /// `None` if some action is illegal where it is taken.
    pub fn replay(&self, path: &[Action]) -> Option<Vec<Arc<Node>>> {
        let mut nodes = vec![Arc::new(self.initial())];
        for &action in path {
            let last = nodes.last()?;
            let next = self.apply(last, action)?;
            nodes.push(Arc::new(next));
        }
        Some(nodes)
    }
}

impl Model for Game {
    fn initial(&self) -> Node {
        Node::root(self.start, Lights::all_off(self.light_positions.len()))
    }

    fn successors(&self, node: &Arc<Node>) -> Successors {
        Action::ALL
            .into_iter()
            .filter_map(|action| self.apply(node, action))
            .collect()
    }

    fn is_goal(&self, node: &Node) -> bool {
        node.lights().all_on()
    }

    /// Unlit lights plus the distance to the nearest one.
    ///
    /// Admissible, since each unlit light takes one toggle and the nearest
    /// one takes at least its Manhattan distance to reach. It is not
    /// consistent once obstacles make walking distances exceed Manhattan ones.
    fn heuristic(&self, node: &Node) -> u32 {
        let pos = node.pos();
        let mut unlit = 0;
        let mut nearest = u32::MAX;
        for idx in node.lights().unlit() {
            unlit += 1;
            nearest = nearest.min(pos.manhattan(self.light_positions[idx]));
        }
        if unlit == 0 {
            return 0;
        }
        unlit + nearest
    }
}
