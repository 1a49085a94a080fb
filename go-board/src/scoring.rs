use serde::Serialize;
use tracing::debug;

use crate::board::Board;
use crate::content::Content;
use crate::coordinate::Coordinate;
use crate::group::{Group, GroupId};

/// Points per color: territory plus twice the size of each dead opponent
/// group (the vacated point and the prisoner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Territory {
    pub black: u32,
    pub white: u32,
}

impl Territory {
    pub fn get(&self, color: Content) -> u32 {
        match color {
            Content::Black => self.black,
            Content::White => self.white,
            Content::Empty => 0,
        }
    }

    fn add(&mut self, color: Content, points: u32) {
        match color {
            Content::Black => self.black += points,
            Content::White => self.white += points,
            Content::Empty => {}
        }
    }

    /// Result string with komi added to White, e.g. "W+3.5".
    pub fn result(&self, komi: f64) -> String {
        format_result(self.black as f64, self.white as f64 + komi)
    }
}

/// Format the game result string from final scores.
///
/// Returns "B+{diff}", "W+{diff}", or "Draw".
pub fn format_result(black_score: f64, white_score: f64) -> String {
    let diff = black_score - white_score;
    if diff > 0.0 {
        format!("B+{}", diff)
    } else if diff < 0.0 {
        format!("W+{}", -diff)
    } else {
        "Draw".to_string()
    }
}

/// Per-cell view of the board for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoringPoint {
    pub coord: Coordinate,
    /// Effective emptiness: dead stones count as empty while scoring.
    pub is_empty: bool,
    pub color: Content,
    pub scoring: bool,
    pub dead: bool,
    pub territory: Content,
}

impl Board {
    pub fn is_scoring(&self) -> bool {
        self.scoring
    }

    /// Switch scoring mode. Entering scoring rebuilds every group, assigns
    /// territory and infers dead groups; leaving drops the cache. Returns
    /// whether the mode changed.
    pub fn set_scoring(&mut self, scoring: bool) -> bool {
        if self.scoring == scoring {
            return false;
        }
        self.scoring = scoring;
        self.groups.clear();
        if scoring {
            self.calc_dead();
        }
        debug!(scoring, "scoring mode changed");
        true
    }

    /// Drop all dead marks and rerun territory and dead-group inference.
    /// No-op outside scoring mode.
    pub fn reset_scoring(&mut self) {
        if !self.scoring {
            return;
        }
        self.groups.clear();
        self.calc_dead();
    }

    /// Toggle the dead flag of the stone group at `(x, y)`.
    ///
    /// Silently ignored outside scoring mode, on empty cells and off the
    /// board. Territory is not recomputed; read [`Board::territory`] again.
    pub fn set_dead_group(&mut self, x: u8, y: u8) {
        if !self.scoring {
            return;
        }
        // Marks must land on a complete cache, or later fills read the
        // dead stone as empty and overlap it.
        self.populate_groups();
        let Ok(id) = self.group_id_at(x, y) else {
            return;
        };
        if self.groups.groups[id.0].content().is_empty() {
            return;
        }
        let marks = &mut self.groups.marks[id.0];
        marks.dead = !marks.dead;
        debug!(x, y, dead = marks.dead, "group toggled");
    }

    /// Assign every empty group to an owner and total the points.
    ///
    /// Recomputed on every call. An empty group with no Black stone around
    /// it is White's (an empty board included), one with Black but no White
    /// neighbours is Black's, and one touching both is neutral.
    pub fn territory(&mut self) -> Territory {
        self.populate_groups();

        let mut score = Territory::default();
        for i in 0..self.groups.len() {
            let group = &self.groups.groups[i];
            let size = group.len() as u32;
            match group.content() {
                Content::Empty => {
                    let owner = self.owner_of(group);
                    score.add(owner, size);
                    self.groups.marks[i].territory = owner;
                }
                stone if self.groups.marks[i].dead => score.add(stone.opp(), 2 * size),
                _ => {}
            }
        }
        score
    }

    fn owner_of(&self, group: &Group) -> Content {
        let touches = |color: Content| {
            group
                .neighbours()
                .iter()
                .any(|&n| self.effective(self.idx(n)) == color)
        };
        match (touches(Content::Black), touches(Content::White)) {
            (false, _) => Content::White,
            (true, false) => Content::Black,
            (true, true) => Content::Empty,
        }
    }

    /// Infer dead groups. No-op outside scoring mode.
    ///
    /// Groups that own territory, or touch a territory group, are taken as
    /// settled. Every other stone group, largest first, seeds a block: the
    /// closure of the seed under absorbing adjacent groups that are not of
    /// the opposing color. The seed color's groups in the block die when the
    /// block has no territory of its own, and both its stones and its empty
    /// points are outnumbered by the opposing stones enclosing it.
    /// Every group the block touched, members and enclosing groups alike, is
    /// then skipped as a seed.
    pub fn calc_dead(&mut self) {
        if !self.scoring {
            return;
        }
        self.territory();

        let count = self.groups.len();
        let adjacency: Vec<Vec<usize>> = (0..count).map(|i| self.adjacent_groups(i)).collect();

        let mut processed = vec![false; count];
        for i in 0..count {
            if self.groups.marks[i].territory.is_stone() {
                processed[i] = true;
                for &n in &adjacency[i] {
                    processed[n] = true;
                }
            }
        }

        let mut seeds: Vec<usize> = (0..count)
            .filter(|&i| self.groups.groups[i].content().is_stone())
            .collect();
        seeds.sort_by_key(|&i| std::cmp::Reverse(self.groups.groups[i].len()));

        for seed in seeds {
            if processed[seed] {
                continue;
            }
            let color = self.groups.groups[seed].content();
            let opp = color.opp();

            let mut in_block = vec![false; count];
            in_block[seed] = true;
            let mut block = vec![seed];
            let mut stack = vec![seed];
            while let Some(g) = stack.pop() {
                for &n in &adjacency[g] {
                    if !in_block[n] && self.groups.groups[n].content() != opp {
                        in_block[n] = true;
                        block.push(n);
                        stack.push(n);
                    }
                }
            }

            let mut on_boundary = vec![false; count];
            let mut enclosing = 0;
            for &g in &block {
                processed[g] = true;
                for &n in &adjacency[g] {
                    if !in_block[n] && !on_boundary[n] {
                        on_boundary[n] = true;
                        processed[n] = true;
                        enclosing += self.groups.groups[n].len();
                    }
                }
            }

            let mut own = 0;
            let mut space = 0;
            let mut has_territory = false;
            for &g in &block {
                let group = &self.groups.groups[g];
                if group.content() == color {
                    own += group.len();
                } else {
                    space += group.len();
                    has_territory |= self.groups.marks[g].territory.is_stone();
                }
            }

            if enclosing == 0 || has_territory || own >= enclosing || space >= enclosing {
                continue;
            }

            for &g in &block {
                if self.groups.groups[g].content() == color {
                    self.groups.marks[g].dead = true;
                    debug!(group = %self.groups.groups[g], "inferred dead");
                }
            }
        }
    }

    /// Distinct cached groups bordering group `i`. Requires a populated cache.
    fn adjacent_groups(&self, i: usize) -> Vec<usize> {
        let mut result: Vec<usize> = Vec::new();
        for &n in self.groups.groups[i].neighbours() {
            if let Some(GroupId(j)) = self.groups.index[self.idx(n)] {
                if !result.contains(&j) {
                    result.push(j);
                }
            }
        }
        result
    }

    /// Snapshot of every cell in row-major order. Refreshes territory first
    /// when scoring.
    pub fn scoring_points(&mut self) -> Vec<ScoringPoint> {
        if self.scoring {
            self.territory();
        }
        self.coordinates()
            .map(|p| {
                let i = self.idx(p);
                let color = self.effective(i);
                let marks = self.groups.index[i]
                    .map(|id| self.groups.marks[id.0])
                    .unwrap_or_default();
                ScoringPoint {
                    coord: p,
                    is_empty: color.is_empty(),
                    color,
                    scoring: self.scoring,
                    dead: self.scoring && marks.dead,
                    territory: if self.scoring {
                        marks.territory
                    } else {
                        Content::Empty
                    },
                }
            })
            .collect()
    }
}
