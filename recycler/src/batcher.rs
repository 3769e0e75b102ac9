use alloc::vec::Vec;

use crate::StructuralOp;

/// Builds a list of structural operations row by row, merging contiguous runs.
///
/// It tracks the length of the list being patched and enforces the operation contract:
/// - Inserts must target `at <= len`; removes, changes and moves must target existing rows.
/// - Out-of-bounds operations are ignored (and debug-asserted).
///
/// Runs are merged as they arrive: inserts at `a, a+1, ..`, removes repeated at the same
/// `a`, and changes at `a, a+1, ..` each collapse into one range operation.
#[derive(Clone, Debug, Default)]
pub struct OpBatcher {
    ops: Vec<StructuralOp>,
    len: usize,
}

impl OpBatcher {
    /// Starts a batch for a list currently holding `len` rows.
    pub fn new(len: usize) -> Self {
        Self {
            ops: Vec::new(),
            len,
        }
    }

    /// Length of the list after the operations emitted so far.
    pub fn list_len(&self) -> usize {
        self.len
    }

    pub fn ops(&self) -> &[StructuralOp] {
        &self.ops
    }

    pub fn insert(&mut self, at: usize) {
        if at > self.len {
            rwarn!(at, len = self.len, "OpBatcher: insert out of bounds");
            debug_assert!(at <= self.len, "OpBatcher: insert out of bounds (at={at}, len={})", self.len);
            return;
        }
        self.len += 1;
        if let Some(StructuralOp::RangeInserted { at: start, count }) = self.ops.last_mut() {
            if *start + *count == at {
                *count += 1;
                return;
            }
        }
        self.ops.push(StructuralOp::RangeInserted { at, count: 1 });
    }

    pub fn remove(&mut self, at: usize) {
        if at >= self.len {
            rwarn!(at, len = self.len, "OpBatcher: remove out of bounds");
            debug_assert!(at < self.len, "OpBatcher: remove out of bounds (at={at}, len={})", self.len);
            return;
        }
        self.len -= 1;
        if let Some(StructuralOp::RangeRemoved { at: start, count }) = self.ops.last_mut() {
            if *start == at {
                *count += 1;
                return;
            }
        }
        self.ops.push(StructuralOp::RangeRemoved { at, count: 1 });
    }

    pub fn change(&mut self, at: usize) {
        if at >= self.len {
            rwarn!(at, len = self.len, "OpBatcher: change out of bounds");
            debug_assert!(at < self.len, "OpBatcher: change out of bounds (at={at}, len={})", self.len);
            return;
        }
        if let Some(StructuralOp::RangeChanged { at: start, count }) = self.ops.last_mut() {
            if *start + *count == at {
                *count += 1;
                return;
            }
        }
        self.ops.push(StructuralOp::RangeChanged { at, count: 1 });
    }

    pub fn move_row(&mut self, from: usize, to: usize) {
        if from >= self.len || to >= self.len {
            rwarn!(from, to, len = self.len, "OpBatcher: move out of bounds");
            debug_assert!(
                from < self.len && to < self.len,
                "OpBatcher: move out of bounds (from={from}, to={to}, len={})",
                self.len
            );
            return;
        }
        self.ops.push(StructuralOp::Moved { from, to });
    }

    pub fn finish(self) -> Vec<StructuralOp> {
        self.ops
    }
}
