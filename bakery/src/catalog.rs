//! Storefront rails: what the home page and the category menu show.

use std::cmp::Ordering;

use crate::errors::Result;
use crate::model::{Category, Offer, Paginated, Product};
use crate::services::{CategoryService, OfferService, ProductService, ResourceService};
use crate::stores::{FilterPatch, ListFilter, SortDirection};

pub const RAIL_SIZE: usize = 8;

/// Active products, newest first.
pub fn new_arrivals(products: &[Product], n: usize) -> Vec<Product> {
    let mut active: Vec<&Product> = products.iter().filter(|p| p.is_active).collect();
    active.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    active.into_iter().take(n).cloned().collect()
}

/// Active products with the biggest markdown first; products without one
/// are left out.
pub fn trending(products: &[Product], n: usize) -> Vec<Product> {
    let mut discounted: Vec<(&Product, f64)> = products
        .iter()
        .filter(|p| p.is_active)
        .filter_map(|p| p.discount_percent().map(|d| (p, d)))
        .collect();
    discounted.sort_by(|(a, da), (b, db)| {
        db.partial_cmp(da)
            .unwrap_or(Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
    discounted.into_iter().take(n).map(|(p, _)| p.clone()).collect()
}

/// Active categories in name order.
pub fn category_menu(categories: &[Category]) -> Vec<Category> {
    let mut active: Vec<Category> = categories.iter().filter(|c| c.is_active).cloned().collect();
    active.sort_by_key(|c| c.name.to_lowercase());
    active
}

#[derive(Debug, Clone, Default)]
pub struct HomePage {
    pub new_arrivals: Vec<Product>,
    pub trending: Vec<Product>,
    pub categories: Vec<Category>,
    pub offers: Vec<Offer>,
}

/// Loads everything the home page shows.
pub async fn load_home(
    products: &ProductService,
    categories: &CategoryService,
    offers: &OfferService,
) -> Result<HomePage> {
    let product_filter = ListFilter::with_page_size(50)
        .merged(FilterPatch::new().sort("createdAt", SortDirection::Desc));
    let category_filter = ListFilter::with_page_size(100);
    let (product_page, category_page, active_offers) = futures::try_join!(
        products.list(&product_filter),
        categories.list(&category_filter),
        offers.active(),
    )?;
    Ok(build_home(product_page, category_page, active_offers))
}

fn build_home(
    products: Paginated<Product>,
    categories: Paginated<Category>,
    offers: Vec<Offer>,
) -> HomePage {
    HomePage {
        new_arrivals: new_arrivals(&products.data, RAIL_SIZE),
        trending: trending(&products.data, RAIL_SIZE),
        categories: category_menu(&categories.data),
        offers,
    }
}

/// Active products of one category, for the category page.
pub async fn category_products(
    products: &ProductService,
    category: &Category,
    page: u32,
) -> Result<Paginated<Product>> {
    let filter = ListFilter::default().merged(
        FilterPatch::new()
            .page(page)
            .extra("categoryId", category.id)
            .extra("isActive", true),
    );
    tracing::debug!(category = %category.slug, page, "Loading category products");
    products.list(&filter).await
}
