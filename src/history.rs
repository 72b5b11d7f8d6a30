use tracing::debug;

use crate::board::Board;
use crate::fen;
use crate::r#move::MoveRecord;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    fen: String,
    board: Board,
    last_move: Option<MoveRecord>,
}

impl Snapshot {
    pub fn capture(board: &Board, last_move: Option<MoveRecord>) -> Self {
        Snapshot {
            fen: fen::encode(board),
            board: board.clone(),
            last_move,
        }
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.last_move.as_ref()
    }
}

/// Append-only list of snapshots with a replay cursor.
#[derive(Clone, Debug)]
pub struct SnapshotHistory {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl SnapshotHistory {
    pub fn new(initial: Snapshot) -> Self {
        SnapshotHistory {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
    }

    /// Moves the cursor by `delta`. Returns the snapshot landed on, or `None` (cursor unchanged)
    /// when that would leave the list.
    pub fn navigate(&mut self, delta: isize) -> Option<&Snapshot> {
        let target = self
            .cursor
            .checked_add_signed(delta)
            .filter(|&index| index < self.snapshots.len());

        match target {
            Some(index) => {
                self.cursor = index;
                debug!(cursor = index, total = self.snapshots.len(), "replay cursor moved");
                self.snapshots.get(index)
            }
            None => {
                debug!(cursor = self.cursor, delta, "replay cursor at bound");
                None
            }
        }
    }

    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    pub fn latest(&self) -> &Snapshot {
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_at_latest(&self) -> bool {
        self.cursor == self.snapshots.len() - 1
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }
}
