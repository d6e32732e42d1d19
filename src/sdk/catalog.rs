use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub type ProductId = u64;

/// One row of the restaurant-to-product menu relation. Only rows with
/// `availability == true` count as offered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub product_id: ProductId,
    pub availability: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: u64,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

impl Restaurant {
    /// Product ids this restaurant currently offers. Derived from the menu
    /// on every call; the data volume does not justify a maintained index.
    pub fn available_products(&self) -> HashSet<ProductId> {
        self.menu
            .iter()
            .filter(|item| item.availability)
            .map(|item| item.product_id)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub address: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Distinct product ids this order needs. Quantities do not affect
    /// restaurant eligibility.
    pub fn required_products(&self) -> HashSet<ProductId> {
        self.items.iter().map(|item| item.product_id).collect()
    }
}

/// Restaurants whose available menu covers the whole order. An order with
/// no items matches nothing, and there is no partial fulfillment.
///
/// Catalog order is preserved so downstream ranking stays deterministic.
pub fn matching_restaurants<'a>(order: &Order, catalog: &'a [Restaurant]) -> Vec<&'a Restaurant> {
    let required = order.required_products();
    if required.is_empty() {
        return Vec::new();
    }
    catalog
        .iter()
        .filter(|restaurant| required.is_subset(&restaurant.available_products()))
        .collect()
}
