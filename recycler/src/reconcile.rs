use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use crate::{Item, ItemStore, OpBatcher, ReplayError, StructuralOp};

/// Largest `(old + 1) * (new + 1)` window aligned exactly. Larger windows (after trimming the
/// common prefix and suffix) fall back to positional pairing.
const MAX_ALIGN_CELLS: usize = 1 << 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiffOptions {
    /// Report a removed row whose content reappears elsewhere as a single `Moved`.
    pub detect_moves: bool,
}

impl DiffOptions {
    pub fn with_detect_moves(mut self, detect_moves: bool) -> Self {
        self.detect_moves = detect_moves;
        self
    }
}

/// Host-side receiver of structural operations.
///
/// Every callback runs after the store was committed, so `store` already holds the new
/// sequence. An `Err` aborts the rest of the replay; the store is never rolled back.
pub trait ChangeSink<V> {
    fn notify_range_inserted(
        &mut self,
        store: &ItemStore<V>,
        at: usize,
        count: usize,
    ) -> Result<(), ReplayError>;

    fn notify_range_removed(
        &mut self,
        store: &ItemStore<V>,
        at: usize,
        count: usize,
    ) -> Result<(), ReplayError>;

    fn notify_range_changed(
        &mut self,
        store: &ItemStore<V>,
        at: usize,
        count: usize,
    ) -> Result<(), ReplayError>;

    fn notify_moved(
        &mut self,
        store: &ItemStore<V>,
        from: usize,
        to: usize,
    ) -> Result<(), ReplayError>;

    /// Everything may have changed; the host should rebind all rows.
    fn notify_all(&mut self, store: &ItemStore<V>) -> Result<(), ReplayError>;

    fn apply(&mut self, store: &ItemStore<V>, op: StructuralOp) -> Result<(), ReplayError> {
        match op {
            StructuralOp::RangeInserted { at, count } => {
                self.notify_range_inserted(store, at, count)
            }
            StructuralOp::RangeRemoved { at, count } => self.notify_range_removed(store, at, count),
            StructuralOp::RangeChanged { at, count } => self.notify_range_changed(store, at, count),
            StructuralOp::Moved { from, to } => self.notify_moved(store, from, to),
        }
    }
}

/// Record of a replay the host refused part-way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayFailure {
    /// Index into the replayed operation list.
    pub op_index: usize,
    /// `None` when a full refresh was refused.
    pub op: Option<StructuralOp>,
    pub error: ReplayError,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Keep(usize),
    Change(usize),
    Remove(usize),
    Insert(usize),
}

/// Computes the structural operations turning `old` into `new`.
///
/// Rows are the same logical row when they have the same concrete kind; they are unchanged
/// when they are fully equal (kind data and presentation). Rows of different kinds are never
/// reported as changed. The result is correct but not necessarily the shortest script.
pub fn diff<V: 'static>(old: &[Item<V>], new: &[Item<V>], options: DiffOptions) -> Vec<StructuralOp> {
    let steps = align(old, new);
    let moves = if options.detect_moves {
        pair_moves(old, new, &steps)
    } else {
        None
    };
    let ops = emit(old.len(), &steps, moves);
    rdebug!(
        old = old.len(),
        new = new.len(),
        ops = ops.len(),
        "diff"
    );
    ops
}

/// Replays `ops` into `sink`, stopping at the first operation the host rejects.
pub fn replay<V: 'static, S>(ops: &[StructuralOp], store: &ItemStore<V>, sink: &mut S) -> Option<ReplayFailure>
where
    S: ChangeSink<V> + ?Sized,
{
    for (op_index, &op) in ops.iter().enumerate() {
        if let Err(error) = sink.apply(store, op) {
            rwarn!(op_index, ?op, %error, "replay aborted by host");
            return Some(ReplayFailure {
                op_index,
                op: Some(op),
                error,
            });
        }
    }
    None
}

/// Asks `sink` to rebind everything, recording a refusal like [`replay`] does.
pub fn refresh_all<V: 'static, S>(store: &ItemStore<V>, sink: &mut S) -> Option<ReplayFailure>
where
    S: ChangeSink<V> + ?Sized,
{
    let error = sink.notify_all(store).err()?;
    rwarn!(%error, "full refresh refused by host");
    Some(ReplayFailure {
        op_index: 0,
        op: None,
        error,
    })
}

fn align<V: 'static>(old: &[Item<V>], new: &[Item<V>]) -> Vec<Step> {
    let mut steps = Vec::with_capacity(old.len().max(new.len()));

    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_end = old.len() - suffix;
    let new_end = new.len() - suffix;

    steps.extend((0..prefix).map(Step::Keep));

    let pairs = lcs(prefix..old_end, prefix..new_end, |o, n| old[o] == new[n]);
    let (mut o, mut n) = (prefix, prefix);
    for (po, pn) in pairs {
        align_gap(old, new, o..po, n..pn, &mut steps);
        steps.push(Step::Keep(po));
        o = po + 1;
        n = pn + 1;
    }
    align_gap(old, new, o..old_end, n..new_end, &mut steps);

    steps.extend((old_end..old.len()).map(Step::Keep));
    steps
}

/// Aligns an unmatched window by kind: same-kind rows become changes, the rest
/// removes (first) and inserts.
fn align_gap<V: 'static>(
    old: &[Item<V>],
    new: &[Item<V>],
    old_gap: Range<usize>,
    new_gap: Range<usize>,
    steps: &mut Vec<Step>,
) {
    let pairs = lcs(old_gap.clone(), new_gap.clone(), |o, n| {
        old[o].is_same_kind(&new[n])
    });
    let (mut o, mut n) = (old_gap.start, new_gap.start);
    for (po, pn) in pairs {
        steps.extend((o..po).map(Step::Remove));
        steps.extend((n..pn).map(Step::Insert));
        steps.push(Step::Change(po));
        o = po + 1;
        n = pn + 1;
    }
    steps.extend((o..old_gap.end).map(Step::Remove));
    steps.extend((n..new_gap.end).map(Step::Insert));
}

/// Longest common subsequence of two index windows under `eq`, as increasing index pairs.
fn lcs(a: Range<usize>, b: Range<usize>, eq: impl Fn(usize, usize) -> bool) -> Vec<(usize, usize)> {
    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 {
        return Vec::new();
    }
    if (n + 1).saturating_mul(m + 1) > MAX_ALIGN_CELLS {
        rdebug!(n, m, "lcs: window too large, pairing positionally");
        return a.zip(b).filter(|&(i, j)| eq(i, j)).collect();
    }

    // table[i * w + j] = LCS length of a[i..] and b[j..].
    let w = m + 1;
    let mut table = vec![0u32; (n + 1) * w];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * w + j] = if eq(a.start + i, b.start + j) {
                table[(i + 1) * w + j + 1] + 1
            } else {
                table[(i + 1) * w + j].max(table[i * w + j + 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(table[0] as usize);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if eq(a.start + i, b.start + j) {
            pairs.push((a.start + i, b.start + j));
            i += 1;
            j += 1;
        } else if table[(i + 1) * w + j] >= table[i * w + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}

struct Moves {
    /// `source[n]`: old index whose row moves to new index `n`.
    source: Vec<Option<usize>>,
    /// `is_source[o]`: old row `o` is moved rather than removed.
    is_source: Vec<bool>,
}

fn pair_moves<V: 'static>(old: &[Item<V>], new: &[Item<V>], steps: &[Step]) -> Option<Moves> {
    let mut removed: Vec<usize> = steps
        .iter()
        .filter_map(|s| match s {
            Step::Remove(o) => Some(*o),
            _ => None,
        })
        .collect();
    if removed.is_empty() {
        return None;
    }

    let mut moves = Moves {
        source: vec![None; new.len()],
        is_source: vec![false; old.len()],
    };
    let mut found = false;
    for step in steps {
        let Step::Insert(n) = *step else {
            continue;
        };
        if let Some(k) = removed.iter().position(|&o| old[o] == new[n]) {
            let o = removed.remove(k);
            moves.source[n] = Some(o);
            moves.is_source[o] = true;
            found = true;
        }
    }
    found.then_some(moves)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Old(usize),
    New,
}

fn emit(old_len: usize, steps: &[Step], moves: Option<Moves>) -> Vec<StructuralOp> {
    let mut batch = OpBatcher::new(old_len);
    let mut pos = 0usize;

    let Some(moves) = moves else {
        for step in steps {
            match *step {
                Step::Keep(_) => pos += 1,
                Step::Change(_) => {
                    batch.change(pos);
                    pos += 1;
                }
                Step::Remove(_) => batch.remove(pos),
                Step::Insert(_) => {
                    batch.insert(pos);
                    pos += 1;
                }
            }
        }
        return batch.finish();
    };

    // With moves, track which old row sits where so a move source can be located.
    let mut slots: Vec<Slot> = (0..old_len).map(Slot::Old).collect();
    let mut moved_out = vec![false; old_len];
    for step in steps {
        match *step {
            Step::Keep(o) => {
                debug_assert!(slots.get(pos) == Some(&Slot::Old(o)));
                pos += 1;
            }
            Step::Change(o) => {
                debug_assert!(slots.get(pos) == Some(&Slot::Old(o)));
                batch.change(pos);
                pos += 1;
            }
            Step::Remove(o) if moves.is_source[o] => {
                // Still in place until its target is reached; step over it.
                if !moved_out[o] {
                    pos += 1;
                }
            }
            Step::Remove(_) => {
                batch.remove(pos);
                slots.remove(pos);
            }
            Step::Insert(n) => {
                let source = moves.source[n]
                    .and_then(|o| slots.iter().position(|&s| s == Slot::Old(o)).map(|from| (o, from)));
                match source {
                    Some((o, from)) => {
                        slots.remove(from);
                        if from < pos {
                            pos -= 1;
                        }
                        slots.insert(pos, Slot::New);
                        batch.move_row(from, pos);
                        moved_out[o] = true;
                    }
                    None => {
                        slots.insert(pos, Slot::New);
                        batch.insert(pos);
                    }
                }
                pos += 1;
            }
        }
    }
    batch.finish()
}
