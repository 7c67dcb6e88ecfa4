use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use stockroom_core::{ProductId, WarehouseId};

use crate::{Product, Warehouse};

/// Read access to reference data.
///
/// The engine only reads through this trait; ownership of products and
/// warehouses stays with the catalog-maintenance side of the system.
pub trait Catalog: Send + Sync {
    fn product(&self, id: &ProductId) -> Option<Product>;
    fn warehouse(&self, id: &WarehouseId) -> Option<Warehouse>;
    fn products(&self) -> Vec<Product>;
    fn warehouses(&self) -> Vec<Warehouse>;
}

impl<C> Catalog for Arc<C>
where
    C: Catalog + ?Sized,
{
    fn product(&self, id: &ProductId) -> Option<Product> {
        (**self).product(id)
    }

    fn warehouse(&self, id: &WarehouseId) -> Option<Warehouse> {
        (**self).warehouse(id)
    }

    fn products(&self) -> Vec<Product> {
        (**self).products()
    }

    fn warehouses(&self) -> Vec<Warehouse> {
        (**self).warehouses()
    }
}

/// In-memory catalog.
///
/// Intended for tests/dev and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
    warehouses: RwLock<HashMap<WarehouseId, Warehouse>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_product(&self, product: Product) {
        if let Ok(mut products) = self.products.write() {
            products.insert(product.id, product);
        }
    }

    pub fn upsert_warehouse(&self, warehouse: Warehouse) {
        if let Ok(mut warehouses) = self.warehouses.write() {
            warehouses.insert(warehouse.id, warehouse);
        }
    }
}

impl Catalog for InMemoryCatalog {
    fn product(&self, id: &ProductId) -> Option<Product> {
        self.products.read().ok()?.get(id).cloned()
    }

    fn warehouse(&self, id: &WarehouseId) -> Option<Warehouse> {
        self.warehouses.read().ok()?.get(id).cloned()
    }

    fn products(&self) -> Vec<Product> {
        self.products
            .read()
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default()
    }

    fn warehouses(&self) -> Vec<Warehouse> {
        self.warehouses
            .read()
            .map(|w| w.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_existing_product() {
        let catalog = InMemoryCatalog::new();
        let id = ProductId::new();
        catalog.upsert_product(Product::new(id, "Beans", "SKU-1", 100, 150).unwrap());
        catalog.upsert_product(Product::new(id, "Beans (large)", "SKU-1", 120, 180).unwrap());

        let stored = catalog.product(&id).unwrap();
        assert_eq!(stored.name, "Beans (large)");
        assert_eq!(catalog.products().len(), 1);
    }
}
