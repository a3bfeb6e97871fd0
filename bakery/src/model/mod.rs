use serde::{Deserialize, Deserializer};

pub type ModelId = i64;

pub mod auth;
pub mod category;
pub mod customer;
pub mod offer;
pub mod order;
pub mod product;

pub use auth::{AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest};
pub use category::Category;
pub use customer::Customer;
pub use offer::{DiscountType, MissingOfferField, Offer, OfferPayload, OfferRecord};
pub use order::{Order, OrderHistoryEntry, OrderItem, OrderStatus};
pub use product::Product;

/// Anything listed in a table and patched by id.
pub trait Identified {
    fn id(&self) -> ModelId;
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: 1,
            limit: 0,
            total_pages: 0,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    #[serde(default, alias = "totalCount", alias = "total_count", alias = "totalItems")]
    total: Option<u64>,
    #[serde(default, alias = "currentPage")]
    page: Option<u32>,
    #[serde(default, alias = "pageSize")]
    limit: Option<u32>,
    #[serde(default, alias = "total_pages")]
    total_pages: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageShape<T> {
    Envelope {
        data: Vec<T>,
        #[serde(flatten)]
        meta: PageMeta,
        #[serde(default, alias = "meta")]
        pagination: Option<PageMeta>,
    },
    Bare(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Paginated<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (data, meta) = match PageShape::<T>::deserialize(deserializer)? {
            PageShape::Envelope {
                data,
                meta,
                pagination,
            } => (data, pagination.unwrap_or(meta)),
            PageShape::Bare(data) => (data, PageMeta::default()),
        };
        let count = data.len() as u64;
        let total = meta.total.unwrap_or(count);
        let limit = meta.limit.unwrap_or(data.len() as u32);
        let total_pages = meta.total_pages.unwrap_or_else(|| {
            if limit == 0 {
                0
            } else {
                total.div_ceil(limit as u64) as u32
            }
        });
        Ok(Self {
            data,
            total,
            page: meta.page.unwrap_or(1),
            limit,
            total_pages,
        })
    }
}

/// A single resource, either bare or wrapped as `{"data": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum Single<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Single<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Single::Wrapped { data } => data,
            Single::Bare(inner) => inner,
        }
    }
}

pub(crate) fn default_true() -> bool {
    true
}

/// Accepts numbers sent as JSON strings (`"12.50"`), which some endpoints do
/// for decimal columns.
pub(crate) fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Num {
        F(f64),
        S(String),
    }
    match Num::deserialize(deserializer)? {
        Num::F(v) => Ok(v),
        Num::S(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

pub(crate) fn lenient_opt_f64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Num {
        F(f64),
        S(String),
    }
    match Option::<Num>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Num::F(v)) => Ok(Some(v)),
        Some(Num::S(s)) if s.trim().is_empty() => Ok(None),
        Some(Num::S(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}
