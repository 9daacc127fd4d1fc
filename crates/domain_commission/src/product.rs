//! Product master data as seen by the commission domain

use serde::{Deserialize, Serialize};

use core_kernel::codes::blank_as_none;
use core_kernel::{FamilyCode, ProductId};

/// The subset of a product the resolver needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,
    /// Product reference (SKU)
    pub reference: String,
    /// Product family
    #[serde(default, deserialize_with = "blank_as_none")]
    pub family: Option<FamilyCode>,
}

impl Product {
    /// Creates an unclassified product
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            id: ProductId::new_v7(),
            reference: reference.into(),
            family: None,
        }
    }

    /// Sets the product family
    pub fn with_family(mut self, family: FamilyCode) -> Self {
        self.family = Some(family);
        self
    }
}
