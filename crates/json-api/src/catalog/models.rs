//! Catalog response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::catalog::models::{
    Category, CategoryUpdate, CategoryUuid, NewCategory, NewProduct, Product, ProductDetail,
    ProductUpdate, ProductUuid,
};

/// Category Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryResponse {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.uuid.into_uuid(),
            parent_id: category.parent_uuid.map(CategoryUuid::into_uuid),
            name: category.name,
            slug: category.slug,
            description: category.description,
            image_url: category.image_url,
            created_at: category.created_at.to_string(),
            updated_at: category.updated_at.to_string(),
        }
    }
}

/// Category summary embedded in a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductCategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Product Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub id: Uuid,
    pub category: Option<ProductCategoryResponse>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,

    /// Unit price in minor units
    pub price: u64,

    /// Previous price shown struck through
    pub compare_at_price: Option<u64>,

    pub images: Vec<String>,
    pub stock: u32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let category = match (product.category_uuid, product.category_name, product.category_slug) {
            (Some(uuid), Some(name), Some(slug)) => Some(ProductCategoryResponse {
                id: uuid.into_uuid(),
                name,
                slug,
            }),
            _ => None,
        };

        Self {
            id: product.uuid.into_uuid(),
            category,
            name: product.name,
            slug: product.slug,
            description: product.description,
            price: product.price,
            compare_at_price: product.compare_at_price,
            images: product.images,
            stock: product.stock,
            is_active: product.is_active,
            is_featured: product.is_featured,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Product Detail Response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductDetailResponse {
    pub product: ProductResponse,

    /// Mean rating, absent until the first review
    pub average_rating: Option<f64>,

    pub review_count: u64,
}

impl From<ProductDetail> for ProductDetailResponse {
    fn from(detail: ProductDetail) -> Self {
        Self {
            product: detail.product.into(),
            average_rating: detail.average_rating,
            review_count: detail.review_count,
        }
    }
}


/// Create Category Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCategoryRequest {
    pub name: String,

    /// Derived from the name when empty
    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub parent_id: Option<Uuid>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(request: CreateCategoryRequest) -> Self {
        Self {
            uuid: CategoryUuid::new(),
            parent_uuid: request.parent_id.map(Into::into),
            name: request.name,
            slug: request.slug,
            description: request.description,
            image_url: request.image_url,
        }
    }
}

/// Update Category Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct UpdateCategoryRequest {
    pub parent_id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<UpdateCategoryRequest> for CategoryUpdate {
    fn from(request: UpdateCategoryRequest) -> Self {
        Self {
            parent_uuid: request.parent_id.map(Into::into),
            name: request.name,
            slug: request.slug,
            description: request.description,
            image_url: request.image_url,
        }
    }
}

const fn default_active() -> bool {
    true
}

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    pub name: String,

    /// Derived from the name when empty
    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub category_id: Option<Uuid>,

    #[serde(default)]
    pub description: Option<String>,

    /// Unit price in minor units
    pub price: u64,

    #[serde(default)]
    pub compare_at_price: Option<u64>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub stock: u32,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default)]
    pub is_featured: bool,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        Self {
            uuid: ProductUuid::new(),
            category_uuid: request.category_id.map(Into::into),
            name: request.name,
            slug: request.slug,
            description: request.description,
            price: request.price,
            compare_at_price: request.compare_at_price,
            images: request.images,
            stock: request.stock,
            is_active: request.is_active,
            is_featured: request.is_featured,
        }
    }
}

/// Update Product Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct UpdateProductRequest {
    pub category_id: Option<Uuid>,
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

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        Self {
            category_uuid: request.category_id.map(Into::into),
            name: request.name,
            slug: request.slug,
            description: request.description,
            price: request.price,
            compare_at_price: request.compare_at_price,
            images: request.images,
            stock: request.stock,
            is_active: request.is_active,
            is_featured: request.is_featured,
        }
    }
}
