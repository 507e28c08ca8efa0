//! Build-time partition of the character domain into equivalence classes.
//!
//! A syntax names character categories (blanks, name characters, each
//! delimiter character, ...). Two characters are equivalent when exactly the
//! same categories contain them. [`ClassPartition`] maintains that partition
//! incrementally: each new category splits every class it cuts through.
//!
//! ```text
//!   start:         [ ---------------- everything ---------------- ]
//!   + "blank":     [ rest ][ blank ]
//!   + "letter":    [ rest ][ blank ][ letter ]
//!   + "'a'":       [ rest ][ blank ][ letter - a ][ a ]
//! ```
//!
//! Class indices become class codes when the partition is turned into a
//! [`ClassTable`].

use tracing::{debug, trace};

use crate::charset::CharSet;
use crate::class_table::ClassTable;
use crate::error::PartitionError;
use crate::xchar::{ClassCode, Xchar};

/// Index of a category inside a [`ClassPartition`].
pub type CategoryId = u8;

/// Number of categories the membership mask can record.
pub const MAX_CATEGORIES: usize = u128::BITS as usize;

/// A set of characters that every category either fully contains or fully
/// excludes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquivalenceClass {
    chars: CharSet,
    categories: u128,
}

impl EquivalenceClass {
    /// The member characters.
    pub fn chars(&self) -> &CharSet {
        &self.chars
    }

    /// Bitmask of the categories containing this class.
    pub fn categories(&self) -> u128 {
        self.categories
    }

    /// Whether category `id` contains this class.
    pub fn in_category(&self, id: CategoryId) -> bool {
        self.categories & (1u128 << id) != 0
    }
}

/// Incrementally refined partition of the [`Xchar`] domain.
#[derive(Clone, Debug)]
pub struct ClassPartition {
    classes: Vec<EquivalenceClass>,
    names: Vec<String>,
}

impl Default for ClassPartition {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassPartition {
    /// A partition with a single class covering the whole domain.
    pub fn new() -> Self {
        Self {
            classes: vec![EquivalenceClass {
                chars: CharSet::full(),
                categories: 0,
            }],
            names: Vec::new(),
        }
    }

    /// Declares a category and refines every class it cuts.
    ///
    /// A class split in two keeps its code for the part outside `set`; the
    /// inside part gets a new code. Class 0 therefore always holds the
    /// characters outside every category, if any remain.
    pub fn add_category(
        &mut self,
        name: impl Into<String>,
        set: &CharSet,
    ) -> Result<CategoryId, PartitionError> {
        let name = name.into();
        if self.names.len() >= MAX_CATEGORIES {
            return Err(PartitionError::TooManyCategories {
                limit: MAX_CATEGORIES,
            });
        }
        if self.names.contains(&name) {
            return Err(PartitionError::DuplicateCategory(name));
        }

        let id = self.names.len() as CategoryId;
        let bit = 1u128 << id;
        let mut split_off = Vec::new();
        for class in &mut self.classes {
            let inside = class.chars.intersection(set);
            if inside.is_empty() {
                continue;
            }
            let outside = class.chars.difference(set);
            if outside.is_empty() {
                class.categories |= bit;
            } else {
                class.chars = outside;
                split_off.push(EquivalenceClass {
                    chars: inside,
                    categories: class.categories | bit,
                });
            }
        }

        let limit = ClassCode::MAX as usize + 1;
        if self.classes.len() + split_off.len() > limit {
            return Err(PartitionError::TooManyClasses { limit });
        }
        trace!(category = %name, id, new_classes = split_off.len(), "category added");
        self.classes.extend(split_off);
        self.names.push(name);
        Ok(id)
    }

    /// The classes, indexed by class code.
    pub fn classes(&self) -> &[EquivalenceClass] {
        &self.classes
    }

    /// Number of classes, i.e. the alphabet size of the resulting table.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Looks a category up by name.
    pub fn category_id(&self, name: &str) -> Option<CategoryId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| i as CategoryId)
    }

    /// Name of a category.
    pub fn category_name(&self, id: CategoryId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// Names of every category in `mask`, in declaration order.
    pub fn category_names(&self, mask: u128) -> Vec<&str> {
        self.names
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1u128 << i) != 0)
            .map(|(_, n)| n.as_str())
            .collect()
    }

    /// Class codes whose characters belong to category `id`.
    pub fn codes_for(&self, id: CategoryId) -> Vec<ClassCode> {
        self.classes
            .iter()
            .enumerate()
            .filter(|(_, class)| class.in_category(id))
            .map(|(code, _)| code as ClassCode)
            .collect()
    }

    /// Class code of one character.
    pub fn class_of(&self, c: Xchar) -> ClassCode {
        self.classes
            .iter()
            .position(|class| class.chars.contains(c))
            .map_or(0, |code| code as ClassCode)
    }

    /// Classes belonging to more than one category of `mask`.
    pub fn collisions(&self, mask: u128) -> Vec<(ClassCode, &EquivalenceClass)> {
        self.classes
            .iter()
            .enumerate()
            .filter(|(_, class)| (class.categories & mask).count_ones() > 1)
            .map(|(code, class)| (code as ClassCode, class))
            .collect()
    }

    /// Writes the partition into a class table, class index as class code.
    pub fn into_table(&self) -> ClassTable {
        let mut table = ClassTable::new(0);
        for (code, class) in self.classes.iter().enumerate() {
            if code == 0 {
                continue;
            }
            for &(lo, hi) in class.chars.ranges() {
                table.set_range(lo, hi, code as ClassCode);
            }
        }
        debug!(
            classes = self.classes.len(),
            categories = self.names.len(),
            sparse_ranges = table.sparse_range_count(),
            "class table built"
        );
        table
    }
}
