use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::GoError;
use crate::group::{Group, GroupArena, GroupId};
use crate::ko::Ko;
use crate::stone::Stone;

/// Allocate a row-major `size` x `size` grid filled with `fill`.
///
/// Sizes below 2, or whose cell count overflows or cannot be allocated, are `InvalidSize`.
pub(crate) fn grid<T: Clone>(size: usize, fill: T) -> Result<Vec<T>, GoError> {
    if size < 2 {
        return Err(GoError::InvalidSize);
    }
    let len = size.checked_mul(size).ok_or(GoError::InvalidSize)?;

    let mut cells = Vec::new();
    cells
        .try_reserve_exact(len)
        .map_err(|_| GoError::InvalidSize)?;
    cells.resize(len, fill);
    Ok(cells)
}

/// Prisoners indexed by the capturing color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stone: Stone) -> u32 {
        match stone {
            Stone::Black => self.black,
            Stone::White => self.white,
        }
    }

    fn add(&mut self, stone: Stone, count: u32) {
        match stone {
            Stone::Black => self.black += count,
            Stone::White => self.white += count,
        }
    }
}

/// A validated move that has not touched the board yet.
struct Placement {
    group: Group,
    merged: Vec<GroupId>,
    captured: Vec<GroupId>,
}

/// A square Go board. Every occupied cell points at the group that owns it.
#[derive(Debug, Clone)]
pub struct Goban {
    size: usize,
    cells: Vec<Option<GroupId>>,
    groups: GroupArena,
    captures: Captures,
    ko: Option<Ko>,
}

impl Goban {
    /// Create an empty board. Boards smaller than 2x2 are rejected.
    pub fn with_size(size: usize) -> Result<Self, GoError> {
        Ok(Goban {
            size,
            cells: grid(size, None)?,
            groups: GroupArena::new(),
            captures: Captures::new(),
            ko: None,
        })
    }

    /// Set up a position from an ASCII layout. 'B' = Black, 'W' = White, anything else is empty.
    ///
    /// Stones are placed as given: nothing is captured and no suicide check is made.
    pub fn from_layout(layout: &[&str]) -> Result<Self, GoError> {
        let size = layout.len();
        if layout.iter().any(|row| row.chars().count() != size) {
            return Err(GoError::InvalidSize);
        }

        let mut goban = Goban::with_size(size)?;
        for (y, row) in layout.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if let Some(stone) = Stone::from_letter(c) {
                    goban.set_stone((x, y), stone);
                }
            }
        }

        Ok(goban)
    }

    // -- Accessors --

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn ko(&self) -> &Option<Ko> {
        &self.ko
    }

    pub fn on_board(&self, (x, y): Point) -> bool {
        x < self.size && y < self.size
    }

    pub fn group_at(&self, point: Point) -> Option<&Group> {
        if !self.on_board(point) {
            return None;
        }
        self.cells[self.idx(point)].and_then(|id| self.groups.get(id))
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        self.group_at(point).map(Group::color)
    }

    /// On the board and not occupied.
    pub fn is_vacant(&self, point: Point) -> bool {
        self.on_board(point) && self.cells[self.idx(point)].is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().map(|(_, g)| g)
    }

    /// Colors of all cells in row-major order.
    pub fn stones(&self) -> Vec<Option<Stone>> {
        self.cells
            .iter()
            .map(|cell| cell.map(|id| self.groups[id].color()))
            .collect()
    }

    /// Number of empty cells on the group's border right now.
    pub fn liberties(&self, group: &Group) -> usize {
        group.liberties(|p| self.is_vacant(p))
    }

    // -- Game actions --

    /// Place a stone, capturing any enemy groups left without liberties.
    ///
    /// Returns the captured points. On error the board is left untouched.
    pub fn play(&mut self, point: Point, stone: Stone) -> Result<Vec<Point>, GoError> {
        if !self.on_board(point) {
            return Err(GoError::NotOnBoard);
        }

        if self.stone_at(point).is_some() {
            return Err(GoError::Overwrite);
        }

        if self.is_ko(point, stone) {
            return Err(GoError::KoViolation);
        }

        let placement = self.plan(point, stone)?;
        Ok(self.commit(placement))
    }

    /// Pass: clears ko in place.
    pub fn pass(&mut self) {
        self.ko = None;
    }

    /// Whether `stone` could be played at `point` without changing anything.
    pub fn is_legal_move(&self, point: Point, stone: Stone) -> bool {
        self.is_vacant(point) && !self.is_ko(point, stone) && self.plan(point, stone).is_ok()
    }

    /// Work out merges and captures for a move against the current board.
    fn plan(&self, point: Point, stone: Stone) -> Result<Placement, GoError> {
        let mut group = Group::new(point, stone);
        let mut merged = Vec::new();
        let mut captured = Vec::new();
        let mut valid = false;

        for n in self.neighbors(point) {
            group.add_border(n);

            let Some(id) = self.cells[self.idx(n)] else {
                valid = true;
                continue;
            };
            let other = &self.groups[id];

            if other.color() == stone {
                if !merged.contains(&id) {
                    group = group.merge(other);
                    merged.push(id);
                }
            } else if self.liberties(other) == 1 {
                valid = true;
                if !captured.contains(&id) {
                    captured.push(id);
                }
            }
        }

        if self.liberties(&group) >= 1 {
            valid = true;
        }

        if !valid {
            return Err(GoError::Suicide);
        }

        Ok(Placement {
            group,
            merged,
            captured,
        })
    }

    fn commit(&mut self, placement: Placement) -> Vec<Point> {
        let Placement {
            group,
            merged,
            captured,
        } = placement;

        for id in merged {
            self.remove_group(id);
        }

        let mut dead_groups = Vec::with_capacity(captured.len());
        for id in captured {
            if let Some(dead) = self.remove_group(id) {
                self.captures.add(group.color(), dead.len() as u32);
                dead_groups.push(dead);
            }
        }

        self.ko = Self::detect_ko(&group, &dead_groups);
        self.install(group);

        let mut dead_stones: Vec<Point> = dead_groups
            .iter()
            .flat_map(|g| g.stones().iter().copied())
            .collect();
        dead_stones.sort_unstable();
        dead_stones
    }

    // -- Graph helpers --

    /// Get the 4-connected neighbors that are on the board.
    pub fn neighbors(&self, (x, y): Point) -> ArrayVec<Point, 4> {
        let mut result = ArrayVec::new();
        if x > 0 {
            result.push((x - 1, y));
        }
        if x + 1 < self.size {
            result.push((x + 1, y));
        }
        if y > 0 {
            result.push((x, y - 1));
        }
        if y + 1 < self.size {
            result.push((x, y + 1));
        }
        result
    }

    // -- Internal helpers --

    #[inline]
    pub(crate) fn idx(&self, (x, y): Point) -> usize {
        y * self.size + x
    }

    /// Drop a stone onto an empty cell, joining same-colored neighbors only.
    fn set_stone(&mut self, point: Point, stone: Stone) {
        let mut group = Group::new(point, stone);
        let mut merged = Vec::new();

        for n in self.neighbors(point) {
            group.add_border(n);
            if let Some(id) = self.cells[self.idx(n)] {
                let other = &self.groups[id];
                if other.color() == stone && !merged.contains(&id) {
                    group = group.merge(other);
                    merged.push(id);
                }
            }
        }

        for id in merged {
            self.remove_group(id);
        }
        self.install(group);
    }

    fn install(&mut self, group: Group) -> GroupId {
        let points: Vec<Point> = group.stones().iter().copied().collect();
        let id = self.groups.insert(group);
        for p in points {
            let i = self.idx(p);
            self.cells[i] = Some(id);
        }
        id
    }

    fn remove_group(&mut self, id: GroupId) -> Option<Group> {
        let group = self.groups.remove(id)?;
        for &p in group.stones() {
            let i = self.idx(p);
            self.cells[i] = None;
        }
        Some(group)
    }

    fn is_ko(&self, point: Point, stone: Stone) -> bool {
        self.ko
            .as_ref()
            .is_some_and(|ko| ko.pos == point && ko.illegal == stone)
    }

    /// A lone stone that captured exactly one lone stone blocks the immediate retake.
    fn detect_ko(placed: &Group, dead_groups: &[Group]) -> Option<Ko> {
        match dead_groups {
            [dead] if placed.len() == 1 && dead.len() == 1 => {
                dead.stones().iter().next().map(|&pos| Ko {
                    pos,
                    illegal: placed.color().opp(),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Goban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.size {
                let c = self.stone_at((x, y)).map_or('+', Stone::letter);
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
