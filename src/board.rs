//! Circular board of pieces with automatic match resolution.
//!
//! The board is a ring stored in an arena: a piece table plus `next`/`prev`
//! index vectors addressed by slot. Removed slots go on a free list and are
//! reused by later insertions. The anchor is the slot traversal starts from;
//! it is a regular piece, and `None` only while the board is empty. The tail
//! is always the anchor's predecessor, so it never needs separate upkeep.
//!
//! `len` is the only loop bound used for traversal; the ring has no sentinel.

use std::fmt;

use log::debug;

use crate::constants::{MIN_RUN, MIN_SHIFT_SIZE, POINTS_PER_PIECE};
use crate::error::PieceError;
use crate::piece::{Color, Piece, Shape};

/// Index of a piece record in the board arena.
pub type Slot = usize;

/// Which end of the ring an insertion goes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum End {
    /// The new piece becomes the anchor.
    Head,
    /// The new piece goes just before the anchor.
    Tail,
}

/// Summary of one resolution (every run removed until none is left).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Number of runs removed
    pub runs: usize,
    /// Number of pieces removed across all runs
    pub removed: usize,
    /// Points awarded
    pub points: u32,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.runs == 0
    }

    fn absorb(&mut self, other: Resolution) {
        self.runs += other.runs;
        self.removed += other.removed;
        self.points = self.points.saturating_add(other.points);
    }
}

/// Board contents in persisted form: `(color_index, shape_index)` pairs,
/// anchor first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub pieces: Vec<(usize, usize)>,
    pub len: usize,
    pub score: u32,
}

/// The board engine.
#[derive(Clone, Debug, Default)]
pub struct Board {
    /// Piece records; only meaningful where `live` is set
    pieces: Vec<Piece>,
    /// Whether each slot currently holds a piece on the ring
    live: Vec<bool>,
    /// Successor slot of each live slot
    next: Vec<Slot>,
    /// Predecessor slot of each live slot
    prev: Vec<Slot>,
    /// Released slots, reused before the arena grows
    free: Vec<Slot>,
    anchor: Option<Slot>,
    len: usize,
    score: u32,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board holding `pieces` in order, anchor first, without
    /// resolving any matches among them.
    pub fn arranged<I: IntoIterator<Item = Piece>>(pieces: I) -> Self {
        let mut board = Self::new();
        for piece in pieces {
            board.splice(piece, End::Tail);
        }
        board
    }

    /// Number of live pieces.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn anchor(&self) -> Option<Slot> {
        self.anchor
    }

    /// The anchor's predecessor.
    pub fn tail(&self) -> Option<Slot> {
        self.anchor.map(|a| self.prev[a])
    }

    /// The piece held in `slot`, if the slot is live.
    pub fn piece(&self, slot: Slot) -> Option<Piece> {
        self.is_live(slot).then(|| self.pieces[slot])
    }

    pub fn successor(&self, slot: Slot) -> Option<Slot> {
        self.is_live(slot).then(|| self.next[slot])
    }

    pub fn predecessor(&self, slot: Slot) -> Option<Slot> {
        self.is_live(slot).then(|| self.prev[slot])
    }

    /// Live slots in ring order, starting at the anchor.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        let mut cur = self.anchor;
        (0..self.len).filter_map(move |_| {
            let slot = cur?;
            cur = Some(self.next[slot]);
            Some(slot)
        })
    }

    /// Pieces in ring order, starting at the anchor.
    pub fn iter(&self) -> impl Iterator<Item = Piece> + '_ {
        self.slots().map(|slot| self.pieces[slot])
    }

    #[inline]
    fn is_live(&self, slot: Slot) -> bool {
        self.live.get(slot).copied().unwrap_or(false)
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Insert a new piece at either end of the ring, then resolve matches.
    pub fn insert(&mut self, color: Color, shape: Shape, end: End) -> Resolution {
        self.splice(Piece::new(color, shape), end);
        self.resolve()
    }

    fn alloc(&mut self, piece: Piece) -> Slot {
        if let Some(slot) = self.free.pop() {
            self.pieces[slot] = piece;
            self.live[slot] = true;
            return slot;
        }
        self.pieces.push(piece);
        self.live.push(true);
        self.next.push(0);
        self.prev.push(0);
        self.pieces.len() - 1
    }

    /// Link a new piece in just before the anchor. Head insertion then moves
    /// the anchor onto it.
    fn splice(&mut self, piece: Piece, end: End) -> Slot {
        let slot = self.alloc(piece);
        match self.anchor {
            None => {
                self.next[slot] = slot;
                self.prev[slot] = slot;
                self.anchor = Some(slot);
            }
            Some(anchor) => {
                let tail = self.prev[anchor];
                self.next[tail] = slot;
                self.prev[slot] = tail;
                self.next[slot] = anchor;
                self.prev[anchor] = slot;
                if end == End::Head {
                    self.anchor = Some(slot);
                }
            }
        }
        self.len += 1;
        slot
    }

    // =========================================================================
    // Match Detection and Removal
    // =========================================================================

    /// Remove runs until a full circuit finds none. The score saturates at
    /// `u32::MAX` rather than wrapping.
    ///
    /// Each pass scans from the anchor and removes the first qualifying run,
    /// then starts over, since removal changes adjacency.
    pub fn resolve(&mut self) -> Resolution {
        let mut outcome = Resolution::default();
        while let Some((start, run)) = self.pending_run() {
            let points = POINTS_PER_PIECE.saturating_mul(run as u32);
            debug!(
                "removing run of {run} starting at {} (+{points})",
                self.pieces[start]
            );
            self.remove_run(start, run);
            self.score = self.score.saturating_add(points);
            outcome.absorb(Resolution {
                runs: 1,
                removed: run,
                points,
            });
        }
        outcome
    }

    /// The first run of at least `MIN_RUN` pieces found scanning from the
    /// anchor, as `(start_slot, length)`.
    pub fn pending_run(&self) -> Option<(Slot, usize)> {
        if self.len < MIN_RUN {
            return None;
        }
        let mut candidate = self.anchor?;
        for _ in 0..self.len {
            let run = self.run_length(candidate);
            if run >= MIN_RUN {
                return Some((candidate, run));
            }
            candidate = self.next[candidate];
        }
        None
    }

    /// Length of the run starting at `start`. Every piece is compared with
    /// the starting piece, not with its neighbor. A run ends at the tail: it
    /// never continues through the anchor, so every prefix of a board
    /// without runs is itself free of runs.
    fn run_length(&self, start: Slot) -> usize {
        let first = self.pieces[start];
        let mut count = 1;
        let mut cur = self.next[start];
        while Some(cur) != self.anchor && first.matches(self.pieces[cur]) {
            count += 1;
            cur = self.next[cur];
        }
        count
    }

    fn remove_run(&mut self, start: Slot, count: usize) {
        let mut cur = start;
        for _ in 0..count {
            let following = self.next[cur];
            self.unlink(cur);
            cur = following;
        }
    }

    /// Detach one slot, keeping the anchor (and so the tail) valid after
    /// every single removal.
    fn unlink(&mut self, slot: Slot) {
        let (before, after) = (self.prev[slot], self.next[slot]);
        self.live[slot] = false;
        self.free.push(slot);
        self.len -= 1;

        if self.len == 0 {
            self.anchor = None;
            return;
        }
        self.next[before] = after;
        self.prev[after] = before;
        if self.anchor == Some(slot) {
            self.anchor = Some(after);
        }
    }

    // =========================================================================
    // Shift Operations
    // =========================================================================

    /// Pull pieces of `color` together. Returns the number of labels moved.
    ///
    /// See [`Board::shift_by_shape`] for the walk. Shapes stay where they are.
    pub fn shift_by_color(&mut self, color: Color) -> usize {
        self.shift(
            |p| p.color == color,
            |a, b| std::mem::swap(&mut a.color, &mut b.color),
        )
    }

    /// Pull pieces of `shape` together. Returns the number of labels moved.
    ///
    /// Walks one circuit from the anchor. At each piece currently holding
    /// `shape`, the nearest following piece that also holds it (wrapping,
    /// never itself) is its partner. The partner's shape label moves onto the
    /// walked piece's successor, and the successor's old shape moves back to
    /// the partner's slot; the walked piece itself is left alone. The two
    /// matching labels then sit side by side. Values are re-read at every
    /// step, so a label moved earlier in the walk is seen again when the
    /// walk reaches it. Matches created this way are left for the next
    /// insertion.
    pub fn shift_by_shape(&mut self, shape: Shape) -> usize {
        self.shift(
            |p| p.shape == shape,
            |a, b| std::mem::swap(&mut a.shape, &mut b.shape),
        )
    }

    fn shift<H, X>(&mut self, holds: H, exchange: X) -> usize
    where
        H: Fn(Piece) -> bool,
        X: Fn(&mut Piece, &mut Piece),
    {
        if self.len < MIN_SHIFT_SIZE {
            return 0;
        }
        let Some(mut cur) = self.anchor else {
            return 0;
        };

        let mut moved = 0;
        for _ in 0..self.len {
            if holds(self.pieces[cur]) {
                let beside = self.next[cur];
                if let Some(partner) = self.nearest_following(cur, &holds) {
                    if partner != beside {
                        let mut a = self.pieces[beside];
                        let mut b = self.pieces[partner];
                        exchange(&mut a, &mut b);
                        self.pieces[beside] = a;
                        self.pieces[partner] = b;
                        moved += 1;
                    }
                }
            }
            cur = self.next[cur];
        }
        moved
    }

    fn nearest_following<H: Fn(Piece) -> bool>(&self, from: Slot, holds: &H) -> Option<Slot> {
        let mut cur = self.next[from];
        while cur != from {
            if holds(self.pieces[cur]) {
                return Some(cur);
            }
            cur = self.next[cur];
        }
        None
    }

    // =========================================================================
    // Teardown and Bulk Transfer
    // =========================================================================

    /// Release every piece. The score is kept.
    pub fn clear(&mut self) {
        if self.len > 0 {
            debug!("clearing {} pieces", self.len);
        }
        self.pieces.clear();
        self.live.clear();
        self.next.clear();
        self.prev.clear();
        self.free.clear();
        self.anchor = None;
        self.len = 0;
    }

    /// Clear the board and zero the score.
    pub fn reset(&mut self) {
        self.clear();
        self.score = 0;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pieces: self.iter().map(Piece::indices).collect(),
            len: self.len,
            score: self.score,
        }
    }

    /// Replace the board with `pairs` replayed through tail insertion, then
    /// set the score to `score`.
    ///
    /// Every pair is validated first; on error the board is left as it was.
    pub fn load(&mut self, score: u32, pairs: &[(usize, usize)]) -> Result<Resolution, PieceError> {
        let pieces = pairs
            .iter()
            .map(|&(color, shape)| Piece::from_indices(color, shape))
            .collect::<Result<Vec<_>, _>>()?;

        self.clear();
        let mut outcome = Resolution::default();
        for piece in pieces {
            outcome.absorb(self.insert(piece.color, piece.shape, End::Tail));
        }
        self.score = score;
        Ok(outcome)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board (size {}):", self.len)?;
        for (i, piece) in self.iter().enumerate() {
            let (color, shape) = piece.indices();
            writeln!(f, "Piece {i}: Color {color}, Shape {shape}")?;
        }
        Ok(())
    }
}
