use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 250;

/// Exclusive upper bound on `price`; NUMERIC(14,2) keeps 12 integer digits.
pub fn price_limit() -> Decimal {
    Decimal::new(1_000_000_000_000, 0)
}

/// Closed set of product classifications. Stored as the Postgres enum
/// `product_category` and serialized by member name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_category", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Tools,
    Food,
    Cloths,
    Housewares,
    Automotive,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Tools,
        Category::Food,
        Category::Cloths,
        Category::Housewares,
        Category::Automotive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tools => "TOOLS",
            Category::Food => "FOOD",
            Category::Cloths => "CLOTHS",
            Category::Housewares => "HOUSEWARES",
            Category::Automotive => "AUTOMOTIVE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    /// Member names are matched exactly, the way they appear on the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown category: {}", s)))
    }
}

/// Stored product. `id` is assigned by the database and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Exact decimal, always emitted as a string.
    #[serde(serialize_with = "rust_decimal::serde::str::serialize")]
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Body of `POST /products` and `PUT /products/:id`. Any `id` in the body is
/// ignored; `price` may arrive as a string or a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl ProductPayload {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }
        if self.name.chars().count() > NAME_MAX_LEN {
            return Err(AppError::BadRequest(format!(
                "name must be at most {} characters",
                NAME_MAX_LEN
            )));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_LEN {
                return Err(AppError::BadRequest(format!(
                    "description must be at most {} characters",
                    DESCRIPTION_MAX_LEN
                )));
            }
        }
        if self.price < Decimal::ZERO {
            return Err(AppError::BadRequest("price must be >= 0".to_string()));
        }
        if self.price >= price_limit() {
            return Err(AppError::BadRequest(format!(
                "price must be less than {}",
                price_limit()
            )));
        }
        Ok(())
    }
}

// ── Query parameters ──────────────────────────────────────────────────────────

/// Raw `GET /products` query string, decoded by [`ListParams::into_filters`].
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    pub name: Option<String>,
    pub category: Option<String>,
    pub available: Option<String>,
}

impl ListParams {
    pub fn into_filters(self) -> AppResult<ProductFilters> {
        let category = match self.category.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Category>()?),
        };
        let available = self.available.as_deref().map(parse_available).transpose()?;

        Ok(ProductFilters {
            name: self.name.filter(|n| !n.is_empty()),
            category,
            available,
        })
    }
}

fn parse_available(raw: &str) -> AppResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(AppError::BadRequest(format!("Invalid available: {}", raw))),
    }
}

/// Equality predicates, combined with AND. `None` means "don't filter".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub available: Option<bool>,
}

impl ProductFilters {
    pub fn matches(&self, product: &Product) -> bool {
        self.name.as_ref().map_or(true, |n| *n == product.name)
            && self.category.map_or(true, |c| c == product.category)
            && self.available.map_or(true, |a| a == product.available)
    }
}
