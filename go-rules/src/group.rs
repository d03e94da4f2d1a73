use std::collections::HashSet;
use std::ops::Index;

use crate::Point;
use crate::stone::Stone;

/// Handle to a live group inside a [`GroupArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

/// A maximal connected set of same-colored stones together with the cells bordering it.
///
/// The border never contains one of the group's own stones. Whether a border cell is a
/// liberty depends on the board, so liberties are always counted against live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    stones: HashSet<Point>,
    border: HashSet<Point>,
    color: Stone,
}

impl Group {
    /// A single stone with an empty border; the board adds the neighbors it knows about.
    pub fn new(point: Point, color: Stone) -> Self {
        Group {
            stones: HashSet::from([point]),
            border: HashSet::new(),
            color,
        }
    }

    pub fn color(&self) -> Stone {
        self.color
    }

    pub fn stones(&self) -> &HashSet<Point> {
        &self.stones
    }

    pub fn border(&self) -> &HashSet<Point> {
        &self.border
    }

    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.stones.contains(&point)
    }

    pub(crate) fn add_border(&mut self, point: Point) {
        if !self.stones.contains(&point) {
            self.border.insert(point);
        }
    }

    /// Combine two groups of the same color into a new one.
    ///
    /// Cells that bordered one group but are stones of the other drop out of the border.
    pub fn merge(&self, other: &Group) -> Group {
        assert_eq!(
            self.color, other.color,
            "cannot merge groups of different colors"
        );

        let stones: HashSet<Point> = self.stones.union(&other.stones).copied().collect();
        let border = self
            .border
            .union(&other.border)
            .filter(|p| !stones.contains(*p))
            .copied()
            .collect();

        Group {
            stones,
            border,
            color: self.color,
        }
    }

    /// Count border cells for which `is_vacant` holds.
    pub fn liberties<F>(&self, is_vacant: F) -> usize
    where
        F: Fn(Point) -> bool,
    {
        self.border.iter().filter(|&&p| is_vacant(p)).count()
    }
}

/// Owns every live group on a board. Retired slots are reused by later inserts.
#[derive(Debug, Clone, Default)]
pub struct GroupArena {
    slots: Vec<Option<Group>>,
    free: Vec<usize>,
}

impl GroupArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: Group) -> GroupId {
        match self.free.pop() {
            Some(i) => {
                self.slots[i] = Some(group);
                GroupId(i)
            }
            None => {
                self.slots.push(Some(group));
                GroupId(self.slots.len() - 1)
            }
        }
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Retire a group, handing it back to the caller.
    pub fn remove(&mut self, id: GroupId) -> Option<Group> {
        let group = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        Some(group)
    }

    /// Number of live groups.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|g| (GroupId(i), g)))
    }
}

impl Index<GroupId> for GroupArena {
    type Output = Group;

    fn index(&self, id: GroupId) -> &Group {
        match self.get(id) {
            Some(group) => group,
            None => panic!("stale group id {id:?}"),
        }
    }
}
