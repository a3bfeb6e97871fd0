pub mod auth;
pub mod filter;
pub mod resource;

pub use auth::AuthStore;
pub use filter::{DEFAULT_PAGE_SIZE, FilterPatch, ListFilter, SortDirection};
pub use resource::{BulkDeleteOutcome, ListState, ResourceStore};

use crate::services::{
    CategoryService, CustomerService, OfferService, OrderService, ProductService,
};

pub type CustomerStore = ResourceStore<CustomerService>;
pub type ProductStore = ResourceStore<ProductService>;
pub type CategoryStore = ResourceStore<CategoryService>;
pub type OrderStore = ResourceStore<OrderService>;
pub type OfferStore = ResourceStore<OfferService>;
