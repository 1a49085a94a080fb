use std::hash::{Hash, Hasher};

use crate::board::Board;
use crate::content::Content;

/// Rolling fingerprint over cell codes: rotate left by 2, then xor in the
/// next cell. Rotation folds the bits shifted out of the top back in.
pub fn fingerprint(cells: &[Content]) -> u64 {
    cells
        .iter()
        .fold(0u64, |acc, c| acc.rotate_left(2) ^ c.code())
}

impl Board {
    /// Structural fingerprint of the raw content, memoized until the next
    /// write. Equal boards hash equal; it is not collision-proof.
    pub fn content_hash(&self) -> u64 {
        if let Some(h) = self.hash.get() {
            return h;
        }
        let h = fingerprint(&self.content);
        self.hash.set(Some(h));
        h
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.cols == other.cols && self.rows == other.rows && self.content == other.content
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cols.hash(state);
        self.rows.hash(state);
        state.write_u64(self.content_hash());
    }
}
