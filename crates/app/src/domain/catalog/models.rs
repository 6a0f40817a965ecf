//! Catalog Models

use std::str::FromStr;

use jiff::Timestamp;
use storefront_core::pagination::{PageRequest, Pagination};
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Category UUID
pub type CategoryUuid = TypedUuid<Category>;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Category Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub uuid: CategoryUuid,
    pub parent_uuid: Option<CategoryUuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Category Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub uuid: CategoryUuid,
    pub parent_uuid: Option<CategoryUuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Category Update Model; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub parent_uuid: Option<CategoryUuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Product Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub uuid: ProductUuid,
    pub category_uuid: Option<CategoryUuid>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: u64,
    pub compare_at_price: Option<u64>,
    pub images: Vec<String>,
    pub stock: u32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Product with its review summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: Product,
    pub average_rating: Option<f64>,
    pub review_count: u64,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub category_uuid: Option<CategoryUuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: u64,
    pub compare_at_price: Option<u64>,
    pub images: Vec<String>,
    pub stock: u32,
    pub is_active: bool,
    pub is_featured: bool,
}

/// Product Update Model; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub category_uuid: Option<CategoryUuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub compare_at_price: Option<u64>,
    pub images: Option<Vec<String>>,
    pub stock: Option<u32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

/// Product listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
}

impl ProductSort {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Name => "name",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort order: {0}")]
pub struct UnknownSort(pub String);

impl FromStr for ProductSort {
    type Err = UnknownSort;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "newest" => Ok(Self::Newest),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            other => Err(UnknownSort(other.to_string())),
        }
    }
}

/// Product listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: PageRequest,
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub featured: Option<bool>,
    pub sort: ProductSort,
    pub include_inactive: bool,
}

/// One page of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// Lowercase, hyphen-separated slug for a display name.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Linen Shirt — Blue!  "), "linen-shirt-blue");
        assert_eq!(slugify("Café Noir 2"), "café-noir-2");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn sort_parses_query_values() -> TestResult {
        assert_eq!("price_desc".parse::<ProductSort>()?, ProductSort::PriceDesc);
        assert!("cheapest".parse::<ProductSort>().is_err());

        Ok(())
    }
}
