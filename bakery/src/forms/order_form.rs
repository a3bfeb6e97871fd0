use serde::Serialize;

use super::{ValidationContext, ValidationErrors, Validate, check_non_negative, optional_text};
use crate::model::order::{default_currency, line_total};
use crate::model::{ModelId, Order, OrderStatus, Product};
use crate::order_number::generate_order_number;

/// One line of a new order. The unit price comes from the chosen product
/// and cannot be typed in.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemDraft {
    pub product_id: ModelId,
    pub product_name: String,
    pub quantity: u32,
    unit_price: f64,
}

impl OrderItemDraft {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
        }
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn line_total(&self) -> f64 {
        line_total(self.quantity, self.unit_price)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewOrderItem {
    pub product_id: ModelId,
    pub quantity: u32,
    pub unit_price: f64,
    pub total: f64,
}

/// Create body; the server stores the order and its items atomically.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: ModelId,
    pub status: OrderStatus,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub shipping_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderForm {
    order_number: String,
    pub customer_id: Option<ModelId>,
    pub status: OrderStatus,
    pub currency: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub shipping_cost: f64,
    pub notes: String,
    pub items: Vec<OrderItemDraft>,
}

impl Default for OrderForm {
    fn default() -> Self {
        Self {
            order_number: generate_order_number(),
            customer_id: None,
            status: OrderStatus::New,
            currency: default_currency(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: String::new(),
            shipping_cost: 0.0,
            notes: String::new(),
            items: Vec::new(),
        }
    }
}

impl OrderForm {
    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    /// Adds `quantity` of `product`, merging with an existing line for it.
    pub fn add_product(&mut self, product: &Product, quantity: u32) {
        match self.items.iter_mut().find(|i| i.product_id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(OrderItemDraft::from_product(product, quantity)),
        }
    }

    pub fn remove_product(&mut self, product_id: ModelId) {
        self.items.retain(|i| i.product_id != product_id);
    }

    pub fn subtotal(&self) -> f64 {
        let cents: f64 = self.items.iter().map(|i| i.line_total() * 100.0).sum();
        cents.round() / 100.0
    }

    pub fn grand_total(&self) -> f64 {
        ((self.subtotal() + self.shipping_cost) * 100.0).round() / 100.0
    }

    pub fn to_payload(&self) -> Result<NewOrder, ValidationErrors> {
        self.validate(&ValidationContext::create())?;
        let mut errors = ValidationErrors::new();
        let Some(customer_id) = self.customer_id else {
            errors.add("customerId", "Select a customer");
            return Err(errors);
        };
        Ok(NewOrder {
            order_number: self.order_number.clone(),
            customer_id,
            status: self.status,
            currency: self.currency.trim().to_uppercase(),
            address: optional_text(&self.address),
            city: optional_text(&self.city),
            state: optional_text(&self.state),
            postal_code: optional_text(&self.postal_code),
            country: optional_text(&self.country),
            shipping_cost: self.shipping_cost,
            notes: optional_text(&self.notes),
            items: self
                .items
                .iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    total: item.line_total(),
                })
                .collect(),
        })
    }
}

impl Validate for OrderForm {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.customer_id.is_none() {
            errors.add("customerId", "Select a customer");
        }
        if self.items.is_empty() {
            errors.add("items", "Add at least one item");
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.quantity < 1 {
                errors.add(&format!("items.{index}.quantity"), "Quantity must be at least 1");
            }
        }
        check_non_negative(&mut errors, "shippingCost", self.shipping_cost);
        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.add("currency", "Use a 3-letter currency code");
        }
        errors.into_result()
    }
}

/// PATCH body for an existing order. Only these fields may change once an
/// order exists; everything else is read-only.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl OrderUpdate {
    /// Allow-listed fields that differ between `original` and `edited`.
    /// Changes to any other field of `edited` are ignored.
    pub fn diff(original: &Order, edited: &Order) -> Self {
        fn changed<T: PartialEq + Clone>(before: &T, after: &T) -> Option<T> {
            (before != after).then(|| after.clone())
        }
        fn changed_text(before: &Option<String>, after: &Option<String>) -> Option<String> {
            (before != after).then(|| after.clone().unwrap_or_default())
        }

        Self {
            status: changed(&original.status, &edited.status),
            notes: changed_text(&original.notes, &edited.notes),
            shipping_cost: changed(&original.shipping_cost, &edited.shipping_cost)
                .map(|cost| cost.unwrap_or(0.0)),
            address: changed_text(&original.address, &edited.address),
            city: changed_text(&original.city, &edited.city),
            state: changed_text(&original.state, &edited.state),
            country: changed_text(&original.country, &edited.country),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes the update onto a local copy, for optimistic list patches.
    pub fn apply_to(&self, order: &mut Order) {
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(notes) = &self.notes {
            order.notes = Some(notes.clone());
        }
        if let Some(cost) = self.shipping_cost {
            order.shipping_cost = Some(cost);
        }
        if let Some(address) = &self.address {
            order.address = Some(address.clone());
        }
        if let Some(city) = &self.city {
            order.city = Some(city.clone());
        }
        if let Some(state) = &self.state {
            order.state = Some(state.clone());
        }
        if let Some(country) = &self.country {
            order.country = Some(country.clone());
        }
    }
}

impl Validate for OrderUpdate {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(cost) = self.shipping_cost {
            check_non_negative(&mut errors, "shippingCost", cost);
        }
        errors.into_result()
    }
}
