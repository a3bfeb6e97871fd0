use chrono::{DateTime, Utc};

use super::{
    FormMode, ValidationContext, ValidationErrors, Validate, check_min_len, has_at_most_two_decimals,
};
use crate::model::{DiscountType, ModelId, Offer, OfferPayload};

pub const MAX_PERCENTAGE: f64 = 100.0;
pub const MAX_FIXED_DISCOUNT: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct OfferForm {
    pub name: String,
    pub product_id: Option<ModelId>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Default for OfferForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            product_id: None,
            discount_type: DiscountType::Percentage,
            discount_value: 0.0,
            start_time: None,
            end_time: None,
            is_active: true,
        }
    }
}

impl OfferForm {
    pub fn from_offer(offer: &Offer) -> Self {
        Self {
            name: offer.name.clone(),
            product_id: Some(offer.product_id),
            discount_type: offer.discount_type,
            discount_value: offer.discount_value,
            start_time: Some(offer.start_time),
            end_time: Some(offer.end_time),
            is_active: offer.is_active,
        }
    }

    /// Validated wire body.
    pub fn to_payload(&self, ctx: &ValidationContext) -> Result<OfferPayload, ValidationErrors> {
        self.validate(ctx)?;
        match (self.product_id, self.start_time, self.end_time) {
            (Some(product_id), Some(start_time), Some(end_time)) => Ok(OfferPayload {
                name: self.name.trim().to_string(),
                product_id,
                discount_type: self.discount_type,
                discount_value: self.discount_value,
                start_time,
                end_time,
                is_active: self.is_active,
            }),
            _ => {
                let mut errors = ValidationErrors::new();
                errors.add("form", "Offer is incomplete");
                Err(errors)
            }
        }
    }
}

impl Validate for OfferForm {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_min_len(&mut errors, "name", &self.name, 2);
        if self.product_id.is_none() {
            errors.add("productId", "Select a product");
        }

        let value = self.discount_value;
        if !value.is_finite() || value < 0.0 {
            errors.add("discountValue", "Discount must be zero or greater");
        } else {
            match self.discount_type {
                DiscountType::Percentage if value > MAX_PERCENTAGE => {
                    errors.add("discountValue", "Percentage cannot exceed 100");
                }
                DiscountType::Fixed if value > MAX_FIXED_DISCOUNT => {
                    errors.add("discountValue", "Fixed discount cannot exceed 1,000,000");
                }
                _ => {}
            }
            if !has_at_most_two_decimals(value) {
                errors.add("discountValue", "At most 2 decimal places");
            }
        }

        match self.start_time {
            None => errors.add("startTime", "Start time is required"),
            Some(start) if ctx.mode == FormMode::Create && start <= ctx.now => {
                errors.add("startTime", "Start time must be in the future");
            }
            Some(_) => {}
        }
        match (self.start_time, self.end_time) {
            (_, None) => errors.add("endTime", "End time is required"),
            (Some(start), Some(end)) if end < start => {
                errors.add("endTime", "End time must be after start time");
            }
            _ => {}
        }
        errors.into_result()
    }
}
