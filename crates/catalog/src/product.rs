use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ProductId};

/// Catalog product.
///
/// Prices are in the smallest currency unit (e.g., cents). Stock quantities
/// live in the ledger, not here; the catalog only carries identity and
/// pricing/threshold metadata the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub supplier_ref: Option<String>,
    pub cost_price: u64,
    pub selling_price: u64,
    pub barcode: String,
    /// Per-product low-stock threshold; `None` means the caller's default
    /// governs.
    pub low_stock_threshold: Option<i64>,
}

impl Product {
    /// Create a product; the barcode falls back to the SKU when not supplied.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        sku: impl Into<String>,
        cost_price: u64,
        selling_price: u64,
    ) -> DomainResult<Self> {
        let name = name.into();
        let sku = sku.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if sku.trim().is_empty() {
            return Err(DomainError::validation("product sku cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            barcode: sku.clone(),
            sku,
            category: None,
            supplier_ref: None,
            cost_price,
            selling_price,
            low_stock_threshold: None,
        })
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_supplier_ref(mut self, supplier_ref: impl Into<String>) -> Self {
        self.supplier_ref = Some(supplier_ref.into());
        self
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = barcode.into();
        self
    }

    pub fn with_low_stock_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = Some(threshold);
        self
    }
}
