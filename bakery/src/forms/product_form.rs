use chrono::{DateTime, Utc};
use transport::FormPart;

use super::{
    LocalImage, ValidationContext, ValidationErrors, Validate, check_min_len, check_non_negative,
    has_at_most_two_decimals,
};
use crate::model::{ModelId, Product};
use crate::slug::{is_valid_slug, slugify};

#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    name: String,
    slug: String,
    pub description: String,
    pub price: f64,
    pub compare_at_price: Option<f64>,
    pub cost_per_unit: Option<f64>,
    pub quantity: i64,
    pub categories: Vec<ModelId>,
    pub is_active: bool,
    pub availability: Option<DateTime<Utc>>,
    /// Already uploaded images the product keeps, in display order.
    pub existing_images: Vec<String>,
    pub new_images: Vec<LocalImage>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            price: 0.0,
            compare_at_price: None,
            cost_per_unit: None,
            quantity: 0,
            categories: Vec::new(),
            is_active: true,
            availability: None,
            existing_images: Vec::new(),
            new_images: Vec::new(),
        }
    }
}

impl ProductForm {
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            slug: slugify(&product.name),
            description: product.description.clone(),
            price: product.price,
            compare_at_price: product.compare_at_price,
            cost_per_unit: product.cost_per_unit,
            quantity: product.quantity,
            categories: product.categories.clone(),
            is_active: product.is_active,
            availability: product.availability,
            existing_images: product.images.clone(),
            new_images: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// The slug always follows the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.slug = slugify(&self.name);
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    pub fn remove_existing_image(&mut self, url: &str) {
        self.existing_images.retain(|u| u != url);
    }

    pub fn apply_to(&self, product: &mut Product) {
        product.name = self.name.trim().to_string();
        product.slug = self.slug.clone();
        product.description = self.description.clone();
        product.price = self.price;
        product.compare_at_price = self.compare_at_price;
        product.cost_per_unit = self.cost_per_unit;
        product.quantity = self.quantity;
        product.categories = self.categories.clone();
        product.is_active = self.is_active;
        product.availability = self.availability;
    }

    pub fn to_parts(&self) -> Vec<FormPart> {
        let mut parts = vec![
            FormPart::text("name", self.name.trim()),
            FormPart::text("slug", &self.slug),
            FormPart::text("description", &self.description),
            FormPart::text("price", self.price.to_string()),
            FormPart::text("quantity", self.quantity.to_string()),
            FormPart::text("isActive", self.is_active.to_string()),
        ];
        if let Some(compare) = self.compare_at_price {
            parts.push(FormPart::text("compareAtPrice", compare.to_string()));
        }
        if let Some(cost) = self.cost_per_unit {
            parts.push(FormPart::text("costPerUnit", cost.to_string()));
        }
        if let Some(availability) = self.availability {
            parts.push(FormPart::text("availability", availability.to_rfc3339()));
        }
        for category in &self.categories {
            parts.push(FormPart::text("categories[]", category.to_string()));
        }
        for url in &self.existing_images {
            parts.push(FormPart::text("existingImages[]", url));
        }
        for image in &self.new_images {
            parts.push(image.to_part("images"));
        }
        parts
    }
}

impl Validate for ProductForm {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_min_len(&mut errors, "name", &self.name, 2);
        if !is_valid_slug(&self.slug) {
            errors.add("slug", "Slug may only contain lowercase letters, numbers and hyphens");
        }

        check_non_negative(&mut errors, "price", self.price);
        if !has_at_most_two_decimals(self.price) {
            errors.add("price", "At most 2 decimal places");
        }
        if let Some(compare) = self.compare_at_price {
            if compare < self.price {
                errors.add("compareAtPrice", "Compare-at price must not be below the price");
            }
        }
        if let Some(cost) = self.cost_per_unit {
            check_non_negative(&mut errors, "costPerUnit", cost);
        }
        if self.quantity < 0 {
            errors.add("quantity", "Must be zero or greater");
        }
        if self.categories.is_empty() {
            errors.add("categories", "Select at least one category");
        }
        errors.into_result()
    }
}
