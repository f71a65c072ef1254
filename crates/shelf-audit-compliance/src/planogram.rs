use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanogramError {
    #[error("duplicate planogram position (row {row}, column {column})")]
    DuplicatePosition { row: usize, column: usize },
    #[error("planogram '{name}' has no shelves")]
    NoShelves { name: String },
    #[error("inverted quantity range at (row {row}, column {column}): min {min} > max {max}")]
    QuantityRange {
        row: usize,
        column: usize,
        min: u32,
        max: u32,
    },
}

fn default_quantity() -> u32 {
    1
}

/// One expected slot on a shelf.
///
/// An empty `expected_product` declares the slot intentionally unstocked; it
/// is rendered but never scored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanogramSection {
    pub column: usize,
    #[serde(default)]
    pub expected_product: String,
    #[serde(default)]
    pub allowed_variants: Vec<String>,
    #[serde(default = "default_quantity")]
    pub min_quantity: u32,
    #[serde(default = "default_quantity")]
    pub max_quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanogramShelf {
    pub row: usize,
    pub sections: Vec<PlanogramSection>,
}

/// Declared expected layout, a read-only snapshot from the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Planogram {
    pub id: String,
    pub name: String,
    pub shelves: Vec<PlanogramShelf>,
}

impl Planogram {
    /// Boundary validation: loose JSON becomes a trusted record here, or not
    /// at all.
    pub fn validate(&self) -> Result<(), PlanogramError> {
        if self.shelves.is_empty() {
            return Err(PlanogramError::NoShelves {
                name: self.name.clone(),
            });
        }
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        for shelf in &self.shelves {
            for section in &shelf.sections {
                if !seen.insert((shelf.row, section.column)) {
                    return Err(PlanogramError::DuplicatePosition {
                        row: shelf.row,
                        column: section.column,
                    });
                }
                if section.min_quantity > section.max_quantity {
                    return Err(PlanogramError::QuantityRange {
                        row: shelf.row,
                        column: section.column,
                        min: section.min_quantity,
                        max: section.max_quantity,
                    });
                }
            }
        }
        Ok(())
    }

    /// Declared grid extent: `(rows, columns)` implied by the largest row and
    /// column indices.
    pub fn extent(&self) -> (usize, usize) {
        let mut rows = 0;
        let mut columns = 0;
        for shelf in &self.shelves {
            rows = rows.max(shelf.row + 1);
            for section in &shelf.sections {
                columns = columns.max(section.column + 1);
            }
        }
        (rows, columns)
    }
}
