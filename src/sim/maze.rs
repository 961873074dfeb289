//! Maze grid generation and wall queries
//!
//! Randomized depth-first carve from (0,0) with an explicit stack. The result
//! is a spanning tree over the grid, so every cell is reachable. The exit is
//! the bottom-right cell and its bottom wall is always open.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

/// Cell coordinates (column, row)
pub type CellPos = (usize, usize);

/// Side of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    fn index(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Right => 1,
            Side::Bottom => 2,
            Side::Left => 3,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    walls: [bool; 4],
}

impl Default for Cell {
    fn default() -> Self {
        Self { walls: [true; 4] }
    }
}

#[derive(Debug, Clone)]
pub struct Maze {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Maze {
    /// Carve a fresh maze; dimensions below 1 are raised to 1
    pub fn generate(cols: usize, rows: usize, rng: &mut impl Rng) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let mut maze = Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols * rows],
        };

        let mut visited = vec![false; cols * rows];
        let mut stack: Vec<CellPos> = Vec::with_capacity(cols * rows);
        let mut current = (0, 0);
        visited[0] = true;

        loop {
            let unvisited: Vec<(Side, CellPos)> = Side::ALL
                .iter()
                .filter_map(|&side| maze.neighbor(current, side).map(|n| (side, n)))
                .filter(|&(_, n)| !visited[maze.index(n)])
                .collect();

            if unvisited.is_empty() {
                match stack.pop() {
                    Some(prev) => current = prev,
                    None => break,
                }
                continue;
            }

            let (side, next) = unvisited[rng.random_range(0..unvisited.len())];
            maze.open(current, side);
            stack.push(current);
            visited[maze.index(next)] = true;
            current = next;
        }

        let exit = maze.exit();
        maze.set_wall(exit, Side::Bottom, false);
        maze
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn start(&self) -> CellPos {
        (0, 0)
    }

    pub fn exit(&self) -> CellPos {
        (self.cols - 1, self.rows - 1)
    }

    fn index(&self, (col, row): CellPos) -> usize {
        row * self.cols + col
    }

    fn contains(&self, (col, row): CellPos) -> bool {
        col < self.cols && row < self.rows
    }

    /// Adjacent cell inside the grid
    pub fn neighbor(&self, (col, row): CellPos, side: Side) -> Option<CellPos> {
        let next = match side {
            Side::Top => (col, row.checked_sub(1)?),
            Side::Right => (col + 1, row),
            Side::Bottom => (col, row + 1),
            Side::Left => (col.checked_sub(1)?, row),
        };
        self.contains(next).then_some(next)
    }

    fn set_wall(&mut self, pos: CellPos, side: Side, wall: bool) {
        let i = self.index(pos);
        self.cells[i].walls[side.index()] = wall;
    }

    /// Remove the wall between a cell and its neighbor on `side`
    fn open(&mut self, pos: CellPos, side: Side) {
        self.set_wall(pos, side, false);
        if let Some(next) = self.neighbor(pos, side) {
            self.set_wall(next, side.opposite(), false);
        }
    }

    pub fn has_wall(&self, pos: CellPos, side: Side) -> bool {
        if !self.contains(pos) {
            return false;
        }
        self.cells[self.index(pos)].walls[side.index()]
    }

    pub fn is_open(&self, pos: CellPos, side: Side) -> bool {
        self.contains(pos) && !self.has_wall(pos, side)
    }

    /// Number of carved passages between cells (the exit opening excluded)
    pub fn passage_count(&self) -> usize {
        let mut count = 0;
        for row in 0..self.rows {
            for col in 0..self.cols {
                for side in [Side::Right, Side::Bottom] {
                    if self.neighbor((col, row), side).is_some() && self.is_open((col, row), side) {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// Cell containing a maze-local point
    pub fn cell_at(&self, local: Vec2, cell_size: f32) -> Option<CellPos> {
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let pos = (
            (local.x / cell_size) as usize,
            (local.y / cell_size) as usize,
        );
        self.contains(pos).then_some(pos)
    }

    /// Wall segments of one cell in maze-local coordinates
    pub fn walls_of(&self, pos: CellPos, cell_size: f32) -> Vec<(Vec2, Vec2)> {
        let min = Vec2::new(pos.0 as f32, pos.1 as f32) * cell_size;
        let max = min + Vec2::splat(cell_size);
        Side::ALL
            .iter()
            .filter(|&&side| self.has_wall(pos, side))
            .map(|side| match side {
                Side::Top => (min, Vec2::new(max.x, min.y)),
                Side::Right => (Vec2::new(max.x, min.y), max),
                Side::Bottom => (Vec2::new(min.x, max.y), max),
                Side::Left => (min, Vec2::new(min.x, max.y)),
            })
            .collect()
    }

    /// Whether a circle touches any wall of the cell holding its center
    ///
    /// Everything outside the grid is solid.
    pub fn touches_wall(&self, center: Vec2, radius: f32, cell_size: f32) -> bool {
        let Some(pos) = self.cell_at(center, cell_size) else {
            return true;
        };
        self.walls_of(pos, cell_size)
            .into_iter()
            .any(|(a, b)| distance_to_segment(center, a, b) < radius)
    }

    /// Shortest route between two cells (inclusive), breadth-first
    pub fn path(&self, from: CellPos, to: CellPos) -> Option<Vec<CellPos>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }

        let mut prev: Vec<Option<CellPos>> = vec![None; self.cells.len()];
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([from]);
        seen[self.index(from)] = true;

        while let Some(pos) = queue.pop_front() {
            if pos == to {
                let mut route = vec![to];
                let mut cur = to;
                while let Some(p) = prev[self.index(cur)] {
                    route.push(p);
                    cur = p;
                }
                route.reverse();
                return Some(route);
            }
            for side in Side::ALL {
                if !self.is_open(pos, side) {
                    continue;
                }
                if let Some(next) = self.neighbor(pos, side) {
                    let i = self.index(next);
                    if !seen[i] {
                        seen[i] = true;
                        prev[i] = Some(pos);
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }
}

/// Distance from a point to a line segment
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
