use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

use arrayvec::ArrayVec;

use crate::content::Content;
use crate::coordinate::Coordinate;
use crate::error::BoardError;
use crate::group::{Group, GroupId, GroupMarks};

/// Flood-fill results for one generation of board content.
///
/// Either empty or consistent with the board it belongs to: every indexed
/// cell maps to the single cached group containing it.
#[derive(Debug, Clone, Default)]
pub(crate) struct GroupCache {
    pub(crate) groups: Vec<Group>,
    pub(crate) marks: Vec<GroupMarks>,
    pub(crate) index: Vec<Option<GroupId>>,
}

impl GroupCache {
    fn with_cells(cells: usize) -> Self {
        GroupCache {
            groups: Vec::new(),
            marks: Vec::new(),
            index: vec![None; cells],
        }
    }

    pub(crate) fn clear(&mut self) {
        self.groups.clear();
        self.marks.clear();
        self.index.fill(None);
    }

    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }

    fn insert(&mut self, group: Group, cols: u8) -> GroupId {
        let id = GroupId(self.groups.len());
        for p in group.points() {
            self.index[p.y as usize * cols as usize + p.x as usize] = Some(id);
        }
        self.groups.push(group);
        self.marks.push(GroupMarks::default());
        id
    }
}

/// A rectangular Go board with memoized group decomposition.
///
/// `content` is the only authoritative state. Every write discards the whole
/// group cache and the memoized hash; queries rebuild what they need.
#[derive(Debug)]
pub struct Board {
    pub(crate) content: Vec<Content>,
    pub(crate) cols: u8,
    pub(crate) rows: u8,
    pub(crate) groups: GroupCache,
    pub(crate) scoring: bool,
    pub(crate) hash: Cell<Option<u64>>,
}

impl Board {
    /// Create an empty board with the given dimensions.
    pub fn new(cols: u8, rows: u8) -> Result<Self, BoardError> {
        if cols == 0 || rows == 0 {
            return Err(BoardError::InvalidInput(format!(
                "board dimensions must be positive, got {cols}x{rows}"
            )));
        }
        Ok(Self::from_cells(vec![Content::Empty; cols as usize * rows as usize], cols, rows))
    }

    /// Copy dimensions and cells of another board. Caches and scoring mode
    /// start fresh.
    pub fn from_board(other: &Board) -> Self {
        Self::from_cells(other.content.clone(), other.cols, other.rows)
    }

    /// Build a square board from row-major content codes (sign decides the
    /// color, see [`Content::from_int`]).
    pub fn from_codes(codes: &[i8]) -> Result<Self, BoardError> {
        if codes.is_empty() {
            return Err(BoardError::InvalidInput("empty content list".to_string()));
        }
        let side = codes.len().isqrt();
        if side * side != codes.len() {
            return Err(BoardError::InvalidInput(format!(
                "{} cells do not form a square board",
                codes.len()
            )));
        }
        let side = u8::try_from(side)
            .map_err(|_| BoardError::InvalidInput(format!("board side {side} is too large")))?;
        let cells = codes.iter().map(|&c| Content::from_int(c)).collect();
        Ok(Self::from_cells(cells, side, side))
    }

    fn from_cells(content: Vec<Content>, cols: u8, rows: u8) -> Self {
        let cells = content.len();
        Board {
            content,
            cols,
            rows,
            groups: GroupCache::with_cells(cells),
            scoring: false,
            hash: Cell::new(None),
        }
    }

    // -- Accessors --

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Raw cell contents in row-major order, dead stones included.
    pub fn cells(&self) -> &[Content] {
        &self.content
    }

    pub fn on_board(&self, point: Coordinate) -> bool {
        point.x < self.cols && point.y < self.rows
    }

    /// Effective content: a dead stone reads as empty while scoring.
    pub fn get(&self, x: u8, y: u8) -> Result<Content, BoardError> {
        let i = self.checked_idx(x, y)?;
        Ok(self.effective(i))
    }

    /// Setup write. Not a move: no captures, no legality checks.
    pub fn set(&mut self, x: u8, y: u8, content: Content) -> Result<(), BoardError> {
        let i = self.checked_idx(x, y)?;
        self.content[i] = content;
        self.invalidate();
        Ok(())
    }

    // -- Groups --

    /// Get the 4-connected neighbors that are on the board.
    pub fn neighbors(&self, Coordinate { x, y }: Coordinate) -> ArrayVec<Coordinate, 4> {
        let mut result = ArrayVec::new();
        if x > 0 {
            result.push(Coordinate::new(x - 1, y));
        }
        if x + 1 < self.cols {
            result.push(Coordinate::new(x + 1, y));
        }
        if y > 0 {
            result.push(Coordinate::new(x, y - 1));
        }
        if y + 1 < self.rows {
            result.push(Coordinate::new(x, y + 1));
        }
        result
    }

    /// Id of the cached group containing `(x, y)`, flood-filling it first if
    /// needed.
    pub fn group_id_at(&mut self, x: u8, y: u8) -> Result<GroupId, BoardError> {
        self.checked_idx(x, y)?;
        Ok(self.discover(Coordinate::new(x, y)))
    }

    pub fn group_at(&mut self, x: u8, y: u8) -> Result<&Group, BoardError> {
        let id = self.group_id_at(x, y)?;
        Ok(&self.groups.groups[id.0])
    }

    /// A group from the current cache generation.
    ///
    /// Panics if `id` came from a generation discarded by a later write.
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups.groups[id.0]
    }

    pub fn marks(&self, id: GroupId) -> GroupMarks {
        self.groups.marks[id.0]
    }

    /// Number of groups discovered since the last write.
    pub fn cached_groups(&self) -> usize {
        self.groups.len()
    }

    /// Number of a group's neighbours that are effectively empty.
    pub fn group_liberties(&self, group: &Group) -> usize {
        group
            .neighbours()
            .iter()
            .filter(|&&n| self.on_board(n) && self.effective(self.idx(n)).is_empty())
            .count()
    }

    pub fn liberties(&mut self, x: u8, y: u8) -> Result<usize, BoardError> {
        let id = self.group_id_at(x, y)?;
        Ok(self.group_liberties(&self.groups.groups[id.0]))
    }

    /// Groups around `(x, y)` left without liberties, typically after a
    /// stone was just placed there. The board is not modified.
    pub fn captured_groups(&mut self, x: u8, y: u8) -> Result<Vec<Group>, BoardError> {
        self.checked_idx(x, y)?;
        let played = Coordinate::new(x, y);

        let mut captured: Vec<GroupId> = Vec::new();
        for n in self.neighbors(played) {
            if self.effective(self.idx(n)).is_empty() {
                continue;
            }
            let id = self.discover(n);
            if captured.contains(&id) {
                continue;
            }
            let group = &self.groups.groups[id.0];
            if group.contains_point(played) {
                continue;
            }
            if self.group_liberties(group) == 0 {
                captured.push(id);
            }
        }

        Ok(captured
            .into_iter()
            .map(|id| self.groups.groups[id.0].clone())
            .collect())
    }

    /// Empty every point of `group`. Returns the number of stones removed.
    pub fn capture(&mut self, group: &Group) -> usize {
        let mut removed = 0;
        for &p in group.points() {
            if !self.on_board(p) {
                continue;
            }
            let i = self.idx(p);
            if self.content[i].is_stone() {
                self.content[i] = Content::Empty;
                removed += 1;
            }
        }
        if removed > 0 {
            self.invalidate();
        }
        removed
    }

    pub fn capture_all(&mut self, groups: &[Group]) -> usize {
        groups.iter().map(|g| self.capture(g)).sum()
    }

    // -- Enumeration --

    /// Effectively occupied cells in row-major order.
    pub fn all_stones(&self) -> Vec<(Coordinate, Content)> {
        self.coordinates()
            .filter_map(|p| {
                let c = self.effective(self.idx(p));
                c.is_stone().then_some((p, c))
            })
            .collect()
    }

    /// Effectively empty cells in row-major order.
    pub fn empty_spaces(&self) -> Vec<Coordinate> {
        self.coordinates()
            .filter(|&p| self.effective(self.idx(p)).is_empty())
            .collect()
    }

    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + use<> {
        let (cols, rows) = (self.cols, self.rows);
        (0..rows).flat_map(move |y| (0..cols).map(move |x| Coordinate::new(x, y)))
    }

    // -- Internal helpers --

    #[inline]
    pub(crate) fn idx(&self, p: Coordinate) -> usize {
        p.y as usize * self.cols as usize + p.x as usize
    }

    fn checked_idx(&self, x: u8, y: u8) -> Result<usize, BoardError> {
        let p = Coordinate::new(x, y);
        if self.on_board(p) {
            Ok(self.idx(p))
        } else {
            Err(BoardError::OutOfRange {
                x,
                y,
                cols: self.cols,
                rows: self.rows,
            })
        }
    }

    pub(crate) fn effective(&self, i: usize) -> Content {
        let content = self.content[i];
        if self.scoring && content.is_stone() {
            if let Some(id) = self.groups.index[i] {
                if self.groups.marks[id.0].dead {
                    return Content::Empty;
                }
            }
        }
        content
    }

    pub(crate) fn invalidate(&mut self) {
        self.hash.set(None);
        self.groups.clear();
    }

    /// Flood-fill the group containing `start` unless it is cached already.
    pub(crate) fn discover(&mut self, start: Coordinate) -> GroupId {
        let si = self.idx(start);
        if let Some(id) = self.groups.index[si] {
            return id;
        }

        let seed = self.effective(si);
        let mut group = Group::new(seed);
        group.add_point(start);
        let mut stack = vec![start];

        while let Some(p) = stack.pop() {
            for n in self.neighbors(p) {
                let ni = self.idx(n);
                if self.groups.index[ni].is_none() && self.effective(ni) == seed {
                    if group.add_point(n) {
                        stack.push(n);
                    }
                } else {
                    group.add_neighbour(n);
                }
            }
        }

        self.groups.insert(group, self.cols)
    }

    /// Discover the group of every cell.
    pub(crate) fn populate_groups(&mut self) {
        for p in self.coordinates() {
            self.discover(p);
        }
        tracing::trace!(groups = self.groups.len(), "group cache populated");
    }
}

impl Clone for Board {
    fn clone(&self) -> Self {
        Board::from_board(self)
    }
}

impl fmt::Display for Board {
    /// One line per row: `B`/`W` stones, `.` empty. While scoring, dead
    /// stones are lowercase and territory shows as `+` (Black) or `-` (White).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.idx(Coordinate::new(x, y));
                let marks = self.groups.index[i].map(|id| self.groups.marks[id.0]);
                let ch = match (self.content[i], marks) {
                    (Content::Black, Some(m)) if self.scoring && m.dead => 'b',
                    (Content::White, Some(m)) if self.scoring && m.dead => 'w',
                    (Content::Black, _) => 'B',
                    (Content::White, _) => 'W',
                    (Content::Empty, Some(m)) if self.scoring => match m.territory {
                        Content::Black => '+',
                        Content::White => '-',
                        Content::Empty => '.',
                    },
                    (Content::Empty, _) => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parse an ASCII layout: one line per row, `B` and `W` are stones and
    /// any other character is empty. Blank lines are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let Some(first) = rows.first() else {
            return Err(BoardError::InvalidInput("empty layout".to_string()));
        };
        let width = first.chars().count();
        if let Some(bad) = rows.iter().position(|r| r.chars().count() != width) {
            return Err(BoardError::InvalidInput(format!(
                "row {bad} has {} cells, expected {width}",
                rows[bad].chars().count()
            )));
        }
        let cols = u8::try_from(width)
            .map_err(|_| BoardError::InvalidInput(format!("{width} columns is too many")))?;
        let row_count = u8::try_from(rows.len())
            .map_err(|_| BoardError::InvalidInput(format!("{} rows is too many", rows.len())))?;

        let cells = rows
            .iter()
            .flat_map(|r| r.chars().map(Content::from_char))
            .collect();
        Ok(Board::from_cells(cells, cols, row_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test helper: build a board from an ASCII layout. 'B' = Black, 'W' = White, '+' = Empty.
    fn board_from_layout(layout: &[&str]) -> Board {
        layout.join("\n").parse().unwrap()
    }

    #[test]
    fn creates_empty_board() {
        let board = Board::new(5, 3).unwrap();
        assert_eq!(board.cols(), 5);
        assert_eq!(board.rows(), 3);
        assert_eq!(board.cells().len(), 15);
        assert!(board.cells().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn rejects_zero_dimension() {
        assert!(matches!(Board::new(0, 4), Err(BoardError::InvalidInput(_))));
    }

    #[test]
    fn from_codes_requires_square_length() {
        assert!(matches!(Board::from_codes(&[]), Err(BoardError::InvalidInput(_))));
        assert!(matches!(
            Board::from_codes(&[0, 1, -1]),
            Err(BoardError::InvalidInput(_))
        ));
        let board = Board::from_codes(&[0, 1, -1, 0]).unwrap();
        assert_eq!(board.get(1, 0), Ok(Content::Black));
        assert_eq!(board.get(0, 1), Ok(Content::White));
    }

    #[test]
    fn get_and_set_reject_off_board() {
        let mut board = Board::new(4, 4).unwrap();
        let err = BoardError::OutOfRange {
            x: 4,
            y: 0,
            cols: 4,
            rows: 4,
        };
        assert_eq!(board.get(4, 0), Err(err.clone()));
        assert_eq!(board.set(4, 0, Content::Black), Err(err));
        assert!(board.cells().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn copy_starts_with_fresh_cache() {
        let mut board = board_from_layout(&["BB+", "+W+", "+++"]);
        board.group_at(0, 0).unwrap();
        assert!(board.cached_groups() > 0);

        let copy = Board::from_board(&board);
        assert_eq!(copy.cached_groups(), 0);
        assert_eq!(copy.cells(), board.cells());
    }

    #[test]
    fn group_contains_seed_and_matching_content() {
        let mut board = board_from_layout(&["+BB+", "+BW+", "++W+", "++++"]);
        let group = board.group_at(1, 0).unwrap();
        assert_eq!(group.content(), Content::Black);
        assert_eq!(group.len(), 3);
        assert!(group.contains_point(Coordinate::new(1, 0)));
        assert!(group.contains_point(Coordinate::new(2, 0)));
        assert!(group.contains_point(Coordinate::new(1, 1)));
    }

    #[test]
    fn neighbours_are_disjoint_and_adjacent() {
        let mut board = board_from_layout(&["+BB+", "+BW+", "++W+", "++++"]);
        let group = board.group_at(1, 1).unwrap().clone();
        for n in group.neighbours() {
            assert!(!group.contains_point(*n));
            assert!(group.points().iter().any(|p| p.x.abs_diff(n.x) + p.y.abs_diff(n.y) == 1));
        }
        // (0,0) (3,0) (0,1) (2,1) (1,2)
        assert_eq!(group.neighbours().len(), 5);
    }

    #[test]
    fn empty_group_borders_stones() {
        let mut board = board_from_layout(&["+B+", "B++", "+++"]);
        let corner = board.group_at(0, 0).unwrap();
        assert_eq!(corner.content(), Content::Empty);
        assert_eq!(corner.len(), 1);
        assert_eq!(corner.neighbours().len(), 2);
    }

    #[test]
    fn group_lookup_is_memoized() {
        let mut board = board_from_layout(&["BB+", "+W+", "+++"]);
        let a = board.group_id_at(0, 0).unwrap();
        let b = board.group_id_at(1, 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(board.cached_groups(), 1);
    }

    #[test]
    fn set_discards_cached_groups() {
        let mut board = board_from_layout(&["BB+", "+++", "+++"]);
        assert_eq!(board.group_at(0, 0).unwrap().len(), 2);
        board.set(2, 0, Content::Black).unwrap();
        assert_eq!(board.cached_groups(), 0);
        assert_eq!(board.group_at(0, 0).unwrap().len(), 3);
        board.set(1, 0, Content::Empty).unwrap();
        assert_eq!(board.group_at(0, 0).unwrap().len(), 1);
    }

    #[test]
    fn counts_liberties() {
        let mut board = board_from_layout(&["+B++", "BW++", "++++", "++++"]);
        assert_eq!(board.liberties(1, 1), Ok(2));
        assert_eq!(board.liberties(1, 0), Ok(2));
        let corner = board.group_at(0, 1).unwrap().clone();
        assert_eq!(board.group_liberties(&corner), 2);
    }

    #[test]
    fn finds_captured_single_stone() {
        let mut board = board_from_layout(&["+++++", "++W++", "+WBW+", "++W++", "+++++"]);
        let captured = board.captured_groups(2, 3).unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].content(), Content::Black);
        assert_eq!(board.group_liberties(&captured[0]), 0);
        // detection alone leaves the stone on the board
        assert_eq!(board.get(2, 2), Ok(Content::Black));
    }

    #[test]
    fn captured_groups_are_deduplicated() {
        // (1,1) touches the same Black group twice
        let mut board = board_from_layout(&["BBW", "BW+", "W++"]);
        let captured = board.captured_groups(1, 1).unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].len(), 3);
    }

    #[test]
    fn played_stone_group_is_not_captured() {
        let mut board = board_from_layout(&["BBW", "BW+", "W++"]);
        assert_eq!(board.liberties(0, 0), Ok(0));
        assert!(board.captured_groups(0, 0).unwrap().is_empty());
    }

    #[test]
    fn capture_removes_stones() {
        let mut board = board_from_layout(&["+B++", "BWB+", "+B++", "++++"]);
        let captured = board.captured_groups(1, 2).unwrap();
        assert_eq!(board.capture_all(&captured), 1);
        assert_eq!(board.get(1, 1), Ok(Content::Empty));
        assert_eq!(board.liberties(1, 0), Ok(3));
    }

    #[test]
    fn capture_counts_only_present_stones() {
        let mut board = board_from_layout(&["BB", "++"]);
        let group = board.group_at(0, 0).unwrap().clone();
        assert_eq!(board.capture(&group), 2);
        assert_eq!(board.capture(&group), 0);
    }

    #[test]
    fn enumerates_stones_and_empty_spaces() {
        let board = board_from_layout(&["B+", "+W"]);
        assert_eq!(
            board.all_stones(),
            vec![
                (Coordinate::new(0, 0), Content::Black),
                (Coordinate::new(1, 1), Content::White)
            ]
        );
        assert_eq!(
            board.empty_spaces(),
            vec![Coordinate::new(1, 0), Coordinate::new(0, 1)]
        );
    }

    #[test]
    fn parses_and_renders_layout() {
        let board: Board = "B+W\n+++\nWWB\n".parse().unwrap();
        assert_eq!(board.to_string(), "B.W\n...\nWWB\n");
    }

    #[test]
    fn rejects_ragged_layout() {
        assert!(matches!(
            "BB\nB\n".parse::<Board>(),
            Err(BoardError::InvalidInput(_))
        ));
        assert!(matches!("".parse::<Board>(), Err(BoardError::InvalidInput(_))));
    }

    #[test]
    fn deep_flood_fill_does_not_overflow() {
        let side = 200u8;
        let codes = vec![1i8; side as usize * side as usize];
        let mut board = Board::from_codes(&codes).unwrap();
        assert_eq!(board.group_at(0, 0).unwrap().len(), 40_000);
        assert_eq!(board.liberties(199, 199), Ok(0));
    }
}
