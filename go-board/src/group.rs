use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::content::Content;
use crate::coordinate::Coordinate;

/// Index of a group inside a board's group cache. Only meaningful for the
/// cache generation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) usize);

/// A maximal 4-connected region of equal content plus the cells bordering it.
///
/// Built by the board's flood fill and immutable afterwards; scoring
/// annotations are kept apart in [`GroupMarks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    content: Content,
    points: HashSet<Coordinate>,
    neighbours: HashSet<Coordinate>,
}

impl Group {
    pub fn new(content: Content) -> Self {
        Group {
            content,
            points: HashSet::new(),
            neighbours: HashSet::new(),
        }
    }

    pub fn content(&self) -> Content {
        self.content
    }

    pub fn points(&self) -> &HashSet<Coordinate> {
        &self.points
    }

    pub fn neighbours(&self) -> &HashSet<Coordinate> {
        &self.neighbours
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns false if the point was already part of the group.
    pub fn add_point(&mut self, point: Coordinate) -> bool {
        self.points.insert(point)
    }

    pub fn contains_point(&self, point: Coordinate) -> bool {
        self.points.contains(&point)
    }

    pub fn add_neighbour(&mut self, point: Coordinate) -> bool {
        self.neighbours.insert(point)
    }

    /// Points in row-major order.
    pub fn sorted_points(&self) -> Vec<Coordinate> {
        let mut pts: Vec<Coordinate> = self.points.iter().copied().collect();
        pts.sort_by_key(|p| (p.y, p.x));
        pts
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.content)?;
        for (i, p) in self.sorted_points().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, "]")
    }
}

/// Scoring annotations for a cached group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GroupMarks {
    pub dead: bool,
    /// Owner of an empty group; `Empty` for dame or not yet assigned.
    pub territory: Content,
}
