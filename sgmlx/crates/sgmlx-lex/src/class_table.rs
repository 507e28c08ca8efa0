//! Equivalence-class table.
//!
//! Maps every [`Xchar`] to the [`ClassCode`] of its equivalence class under
//! the active syntax. Lookup is on the per-character hot path, so the table
//! is split in two tiers:
//!
//! ```text
//!  index 0        index 1 ..= 0x10000            sorted disjoint ranges
//! ┌────────┬──────────────────────────────┐   ┌───────────────────────────┐
//! │  EOF   │  U+0000 ..= U+FFFF  (dense)  │   │ U+10000 ..= U+10FFFF      │
//! └────────┴──────────────────────────────┘   │ (sparse, binary searched) │
//!                                              └───────────────────────────┘
//! ```
//!
//! Writes are last-write-wins on overlap. The table is filled once by a
//! syntax compiler and then shared read-only (`Arc<ClassTable>`) by every
//! recognizer of that syntax.

use std::fmt;

use crate::xchar::{ClassCode, Xchar};

/// First code point stored in the sparse tier.
pub const DENSE_LIMIT: i32 = 0x10000;

/// Dense slots: one for the sentinel plus the whole BMP.
const DENSE_LEN: usize = DENSE_LIMIT as usize + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CodeRange {
    min: i32,
    max: i32,
    code: ClassCode,
}

/// Total mapping from extended characters to class codes.
///
/// # Examples
///
/// ```
/// use sgmlx_lex::{ClassTable, Xchar};
///
/// let mut table = ClassTable::new(0);
/// table.set_range(Xchar::from('a'), Xchar::from('z'), 1);
/// table.set_char(Xchar::from('q'), 2);
/// table.set_sentinel(3);
///
/// assert_eq!(table.lookup(Xchar::from('p')), 1);
/// assert_eq!(table.lookup(Xchar::from('q')), 2);
/// assert_eq!(table.lookup(Xchar::EOF), 3);
/// assert_eq!(table.lookup(Xchar::from('\u{1F600}')), 0);
/// ```
#[derive(Clone)]
pub struct ClassTable {
    dense: Box<[ClassCode]>,
    sparse: Vec<CodeRange>,
    max_code: ClassCode,
}

impl ClassTable {
    /// Creates a table mapping the whole domain, sentinel included, to
    /// `default`.
    pub fn new(default: ClassCode) -> Self {
        Self {
            dense: vec![default; DENSE_LEN].into_boxed_slice(),
            sparse: vec![CodeRange {
                min: DENSE_LIMIT,
                max: Xchar::MAX.code(),
                code: default,
            }],
            max_code: default,
        }
    }

    /// Returns the class code of `c`.
    #[inline]
    pub fn lookup(&self, c: Xchar) -> ClassCode {
        let code = c.code();
        if code < DENSE_LIMIT {
            self.dense[(code + 1) as usize]
        } else {
            self.lookup_sparse(code)
        }
    }

    fn lookup_sparse(&self, code: i32) -> ClassCode {
        let idx = self.sparse.partition_point(|r| r.max < code);
        match self.sparse.get(idx) {
            Some(range) if range.min <= code => range.code,
            _ => panic!("class table is not total at {code:#x}"),
        }
    }

    /// Assigns `code` to every character in `min..=max`.
    ///
    /// The write is split across the dense and sparse tiers as needed. An
    /// empty interval (`min > max`) is ignored.
    pub fn set_range(&mut self, min: Xchar, max: Xchar, code: ClassCode) {
        if min > max {
            return;
        }
        self.max_code = self.max_code.max(code);

        let lo = min.code();
        let hi = max.code();
        if lo < DENSE_LIMIT {
            let dense_hi = hi.min(DENSE_LIMIT - 1);
            self.dense[(lo + 1) as usize..=(dense_hi + 1) as usize].fill(code);
        }
        if hi >= DENSE_LIMIT {
            self.set_sparse(lo.max(DENSE_LIMIT), hi, code);
        }
    }

    /// Assigns `code` to a single character.
    #[inline]
    pub fn set_char(&mut self, c: Xchar, code: ClassCode) {
        self.set_range(c, c, code);
    }

    /// Assigns `code` to the end-of-input sentinel.
    #[inline]
    pub fn set_sentinel(&mut self, code: ClassCode) {
        self.set_char(Xchar::EOF, code);
    }

    fn set_sparse(&mut self, min: i32, max: i32, code: ClassCode) {
        // ranges[start..end] are exactly those overlapping min..=max
        let start = self.sparse.partition_point(|r| r.max < min);
        let end = self.sparse.partition_point(|r| r.min <= max);

        let mut replacement = Vec::with_capacity(3);
        if start < end {
            let first = self.sparse[start];
            if first.min < min {
                replacement.push(CodeRange {
                    max: min - 1,
                    ..first
                });
            }
        }
        replacement.push(CodeRange { min, max, code });
        if start < end {
            let last = self.sparse[end - 1];
            if last.max > max {
                replacement.push(CodeRange {
                    min: max + 1,
                    ..last
                });
            }
        }
        self.sparse.splice(start..end, replacement);

        self.sparse.dedup_by(|next, prev| {
            if prev.code == next.code && prev.max + 1 == next.min {
                prev.max = next.max;
                true
            } else {
                false
            }
        });
    }

    /// Number of distinct class codes the table can produce, assuming codes
    /// are allocated densely from zero.
    #[inline]
    pub fn alphabet_size(&self) -> usize {
        self.max_code as usize + 1
    }

    /// Number of ranges in the sparse tier.
    pub fn sparse_range_count(&self) -> usize {
        self.sparse.len()
    }
}

impl fmt::Debug for ClassTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassTable")
            .field("alphabet_size", &self.alphabet_size())
            .field("sentinel", &self.dense[0])
            .field("sparse_ranges", &self.sparse.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn x(code: i32) -> Xchar {
        Xchar::new(code).unwrap()
    }

    #[test]
    fn test_default_covers_everything() {
        let table = ClassTable::new(7);
        assert_eq!(table.lookup(Xchar::EOF), 7);
        assert_eq!(table.lookup(x(0)), 7);
        assert_eq!(table.lookup(x(0xFFFF)), 7);
        assert_eq!(table.lookup(x(0x10000)), 7);
        assert_eq!(table.lookup(Xchar::MAX), 7);
        assert_eq!(table.alphabet_size(), 8);
    }

    #[test]
    fn test_later_char_overrides_range() {
        let mut table = ClassTable::new(0);
        table.set_range(x(0), x(0xFFFF), 1);
        table.set_char(x(0x41), 2);
        assert_eq!(table.lookup(x(0x41)), 2);
        assert_eq!(table.lookup(x(0x42)), 1);
    }

    #[test]
    fn test_later_range_overrides_char() {
        let mut table = ClassTable::new(0);
        table.set_char(x(0x41), 2);
        table.set_range(x(0x40), x(0x50), 1);
        assert_eq!(table.lookup(x(0x41)), 1);
    }

    #[test]
    fn test_range_straddling_tiers() {
        let mut table = ClassTable::new(0);
        table.set_range(x(0xFFF0), x(0x10010), 4);
        assert_eq!(table.lookup(x(0xFFEF)), 0);
        assert_eq!(table.lookup(x(0xFFF0)), 4);
        assert_eq!(table.lookup(x(0xFFFF)), 4);
        assert_eq!(table.lookup(x(0x10000)), 4);
        assert_eq!(table.lookup(x(0x10010)), 4);
        assert_eq!(table.lookup(x(0x10011)), 0);
    }

    #[test]
    fn test_sparse_split_and_coalesce() {
        let mut table = ClassTable::new(0);
        table.set_range(x(0x20000), x(0x2FFFF), 3);
        assert_eq!(table.sparse_range_count(), 3);

        table.set_range(x(0x24000), x(0x24FFF), 5);
        assert_eq!(table.sparse_range_count(), 5);
        assert_eq!(table.lookup(x(0x23FFF)), 3);
        assert_eq!(table.lookup(x(0x24000)), 5);
        assert_eq!(table.lookup(x(0x25000)), 3);

        // writing the surrounding code back merges everything again
        table.set_range(x(0x24000), x(0x24FFF), 3);
        assert_eq!(table.sparse_range_count(), 3);
        table.set_range(x(0x20000), x(0x2FFFF), 0);
        assert_eq!(table.sparse_range_count(), 1);
    }

    #[test]
    fn test_sentinel_independent_of_nul() {
        let mut table = ClassTable::new(0);
        table.set_sentinel(9);
        assert_eq!(table.lookup(Xchar::EOF), 9);
        assert_eq!(table.lookup(x(0)), 0);
        table.set_range(Xchar::EOF, x(3), 1);
        assert_eq!(table.lookup(Xchar::EOF), 1);
        assert_eq!(table.lookup(x(3)), 1);
    }

    #[test]
    fn test_empty_range_ignored() {
        let mut table = ClassTable::new(0);
        table.set_range(x(10), x(5), 42);
        assert_eq!(table.lookup(x(7)), 0);
        assert_eq!(table.alphabet_size(), 1);
    }

    #[test]
    fn test_lookup_is_repeatable() {
        let mut table = ClassTable::new(1);
        table.set_range(x(0x30), x(0x39), 2);
        for _ in 0..3 {
            assert_eq!(table.lookup(x(0x35)), 2);
            assert_eq!(table.lookup(x(0x1F600)), 1);
        }
    }

    #[derive(Clone, Debug)]
    enum Op {
        Range(i32, i32, ClassCode),
        Char(i32, ClassCode),
        Sentinel(ClassCode),
    }

    fn point() -> impl Strategy<Value = i32> {
        prop_oneof![0..=40i32, 0xFFE0..=0x10020i32, 0x10FFE0..=0x10FFFFi32]
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (point(), point(), 0..6u16).prop_map(|(a, b, c)| Op::Range(a.min(b), a.max(b), c)),
            (point(), 0..6u16).prop_map(|(a, c)| Op::Char(a, c)),
            (0..6u16).prop_map(Op::Sentinel),
        ]
    }

    fn model(ops: &[Op], c: i32) -> ClassCode {
        for op in ops.iter().rev() {
            match *op {
                Op::Range(lo, hi, code) if lo <= c && c <= hi => return code,
                Op::Char(at, code) if at == c => return code,
                Op::Sentinel(code) if c == -1 => return code,
                _ => {}
            }
        }
        0
    }

    proptest! {
        #[test]
        fn prop_last_write_wins(ops in proptest::collection::vec(op(), 0..40), probes in proptest::collection::vec(prop_oneof![Just(-1i32), point()], 1..40)) {
            let mut table = ClassTable::new(0);
            for op in &ops {
                match *op {
                    Op::Range(lo, hi, code) => table.set_range(x(lo), x(hi), code),
                    Op::Char(at, code) => table.set_char(x(at), code),
                    Op::Sentinel(code) => table.set_sentinel(code),
                }
            }
            for c in probes {
                prop_assert_eq!(table.lookup(x(c)), model(&ops, c));
            }
        }
    }
}
