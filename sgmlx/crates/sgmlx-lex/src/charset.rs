//! Sets of extended characters stored as sorted, disjoint, coalesced ranges.

use crate::xchar::Xchar;

/// A set of [`Xchar`] values.
///
/// # Examples
///
/// ```
/// use sgmlx_lex::{CharSet, Xchar};
///
/// let mut letters = CharSet::new();
/// letters.add_range(Xchar::from('a'), Xchar::from('z'));
/// letters.add_range(Xchar::from('A'), Xchar::from('Z'));
///
/// let vowels = CharSet::from_chars("aeiou".chars());
/// let consonants = letters.difference(&vowels);
/// assert!(consonants.contains(Xchar::from('b')));
/// assert!(!consonants.contains(Xchar::from('e')));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharSet {
    ranges: Vec<(Xchar, Xchar)>,
}

impl CharSet {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The whole domain, sentinel included.
    pub fn full() -> Self {
        Self {
            ranges: vec![(Xchar::MIN, Xchar::MAX)],
        }
    }

    /// A set holding one value.
    pub fn single(c: Xchar) -> Self {
        Self {
            ranges: vec![(c, c)],
        }
    }

    /// A set holding the given characters.
    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        let mut set = Self::new();
        for c in chars {
            set.add_char(Xchar::from(c));
        }
        set
    }

    /// Adds one value.
    pub fn add_char(&mut self, c: Xchar) {
        self.add_range(c, c);
    }

    /// Adds `lo..=hi`; an empty interval is ignored.
    pub fn add_range(&mut self, lo: Xchar, hi: Xchar) {
        if lo > hi {
            return;
        }
        self.ranges.push((lo, hi));
        self.normalize();
    }

    fn normalize(&mut self) {
        self.ranges.sort_unstable();
        let mut merged: Vec<(Xchar, Xchar)> = Vec::with_capacity(self.ranges.len());
        for &(lo, hi) in &self.ranges {
            match merged.last_mut() {
                Some(last) if lo <= last.1.succ() => last.1 = last.1.max(hi),
                _ => merged.push((lo, hi)),
            }
        }
        self.ranges = merged;
    }

    /// Whether `c` is in the set.
    pub fn contains(&self, c: Xchar) -> bool {
        let idx = self.ranges.partition_point(|&(_, hi)| hi < c);
        self.ranges.get(idx).is_some_and(|&(lo, _)| lo <= c)
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of values in the set.
    pub fn len(&self) -> u64 {
        self.ranges
            .iter()
            .map(|&(lo, hi)| (hi.code() - lo.code()) as u64 + 1)
            .sum()
    }

    /// The ranges making up the set, in ascending order.
    pub fn ranges(&self) -> &[(Xchar, Xchar)] {
        &self.ranges
    }

    /// Values in either set.
    pub fn union(&self, other: &CharSet) -> CharSet {
        let mut ranges = self.ranges.clone();
        ranges.extend_from_slice(&other.ranges);
        let mut set = CharSet { ranges };
        set.normalize();
        set
    }

    /// Values in both sets.
    pub fn intersection(&self, other: &CharSet) -> CharSet {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (a_lo, a_hi) = self.ranges[i];
            let (b_lo, b_hi) = other.ranges[j];
            let lo = a_lo.max(b_lo);
            let hi = a_hi.min(b_hi);
            if lo <= hi {
                out.push((lo, hi));
            }
            if a_hi < b_hi {
                i += 1;
            } else {
                j += 1;
            }
        }
        CharSet { ranges: out }
    }

    /// Values of the domain not in the set.
    pub fn complement(&self) -> CharSet {
        let mut out = Vec::new();
        let mut next = Some(Xchar::MIN);
        for &(lo, hi) in &self.ranges {
            if let Some(start) = next {
                if start < lo {
                    out.push((start, lo.pred()));
                }
            }
            next = (hi < Xchar::MAX).then(|| hi.succ());
        }
        if let Some(start) = next {
            out.push((start, Xchar::MAX));
        }
        CharSet { ranges: out }
    }

    /// Values in `self` but not in `other`.
    pub fn difference(&self, other: &CharSet) -> CharSet {
        self.intersection(&other.complement())
    }
}
