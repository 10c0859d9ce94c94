//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// One line of the shopping cart.
///
/// The cart is an ordered sequence of these; ordering is insertion order
/// and matters for display. Wholesale unit prices use decimal arithmetic,
/// never floats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product title snapshot at the time of adding.
    pub title: String,
    /// Number of units.
    pub quantity: u32,
    /// Wholesale price per unit.
    pub unit_price: Decimal,
}

impl CartLine {
    /// Create a new line with a single unit.
    #[must_use]
    pub fn new(product_id: ProductId, title: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            product_id,
            title: title.into(),
            quantity: 1,
            unit_price,
        }
    }

    /// Total price for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
