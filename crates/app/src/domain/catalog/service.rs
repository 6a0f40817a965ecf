//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{
            Category, CategoryUpdate, CategoryUuid, NewCategory, NewProduct, Product,
            ProductDetail, ProductPage, ProductQuery, ProductUpdate, ProductUuid, slugify,
        },
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

/// Trimmed name plus a slug derived from `slug`, or from the name when no slug was given.
fn name_and_slug(name: &str, slug: &str) -> Result<(String, String), CatalogServiceError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(CatalogServiceError::InvalidData);
    }

    let slug = if slug.trim().is_empty() {
        slugify(name)
    } else {
        slugify(slug)
    };

    if slug.is_empty() {
        return Err(CatalogServiceError::InvalidData);
    }

    Ok((name.to_string(), slug))
}

fn normalise_optional_slug(slug: Option<&str>) -> Result<Option<String>, CatalogServiceError> {
    slug.map(|slug| match slugify(slug) {
        normalised if normalised.is_empty() => Err(CatalogServiceError::InvalidData),
        normalised => Ok(normalised),
    })
    .transpose()
}

#[async_trait]
impl CatalogService for PgCatalogService {
    #[tracing::instrument(name = "catalog.service.list_categories", skip(self), err)]
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let categories = self.repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }

    #[tracing::instrument(name = "catalog.service.get_category", skip(self), err)]
    async fn get_category(&self, slug: &str) -> Result<Category, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let category = self.repository.get_category(&mut tx, slug).await?;

        tx.commit().await?;

        Ok(category)
    }

    #[tracing::instrument(
        name = "catalog.service.create_category",
        skip(self, category),
        fields(category_uuid = %category.uuid),
        err
    )]
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<Category, CatalogServiceError> {
        let (name, slug) = name_and_slug(&category.name, &category.slug)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_category(
                &mut tx,
                &NewCategory {
                    name,
                    slug,
                    ..category
                },
            )
            .await?;

        tx.commit().await?;

        info!(slug = %created.slug, "created category");

        Ok(created)
    }

    #[tracing::instrument(name = "catalog.service.update_category", skip(self, update), err)]
    async fn update_category(
        &self,
        category: CategoryUuid,
        update: CategoryUpdate,
    ) -> Result<Category, CatalogServiceError> {
        if update.parent_uuid == Some(category) {
            return Err(CatalogServiceError::InvalidData);
        }

        let update = CategoryUpdate {
            slug: normalise_optional_slug(update.slug.as_deref())?,
            name: update.name.map(|name| name.trim().to_string()),
            ..update
        };

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_category(&mut tx, category, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(name = "catalog.service.delete_category", skip(self), err)]
    async fn delete_category(&self, category: CategoryUuid) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_category(&mut tx, category).await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "catalog.service.list_products",
        skip(self, query),
        fields(
            page = query.page.page(),
            per_page = query.page.per_page(),
            total = tracing::field::Empty
        ),
        err
    )]
    async fn list_products(&self, query: ProductQuery) -> Result<ProductPage, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let total = self.repository.count_products(&mut tx, &query).await?;
        let products = self.repository.list_products(&mut tx, &query).await?;

        tx.commit().await?;

        Span::current().record("total", total);

        Ok(ProductPage {
            products,
            pagination: query.page.paginate(total),
        })
    }

    #[tracing::instrument(name = "catalog.service.get_product", skip(self), err)]
    async fn get_product(&self, slug: &str) -> Result<ProductDetail, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product_detail(&mut tx, slug).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(name = "catalog.service.get_product_by_uuid", skip(self), err)]
    async fn get_product_by_uuid(
        &self,
        product: ProductUuid,
    ) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "catalog.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid),
        err
    )]
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError> {
        let (name, slug) = name_and_slug(&product.name, &product.slug)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_product(
                &mut tx,
                &NewProduct {
                    name,
                    slug,
                    ..product
                },
            )
            .await?;

        tx.commit().await?;

        info!(slug = %created.slug, price = created.price, "created product");

        Ok(created)
    }

    #[tracing::instrument(name = "catalog.service.update_product", skip(self, update), err)]
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, CatalogServiceError> {
        if update
            .name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(CatalogServiceError::InvalidData);
        }

        let update = ProductUpdate {
            slug: normalise_optional_slug(update.slug.as_deref())?,
            name: update.name.map(|name| name.trim().to_string()),
            ..update
        };

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(name = "catalog.service.delete_product", skip(self), err)]
    async fn delete_product(&self, product: ProductUuid) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        info!(product_uuid = %product, "soft-deleted product");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Every category, ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogServiceError>;

    async fn get_category(&self, slug: &str) -> Result<Category, CatalogServiceError>;

    /// Create a category. An empty slug is derived from the name.
    async fn create_category(&self, category: NewCategory)
    -> Result<Category, CatalogServiceError>;

    async fn update_category(
        &self,
        category: CategoryUuid,
        update: CategoryUpdate,
    ) -> Result<Category, CatalogServiceError>;

    /// Delete a category; its products become uncategorised.
    async fn delete_category(&self, category: CategoryUuid) -> Result<(), CatalogServiceError>;

    /// Filtered, sorted and paginated products.
    async fn list_products(&self, query: ProductQuery) -> Result<ProductPage, CatalogServiceError>;

    /// An active product by slug, with its review summary.
    async fn get_product(&self, slug: &str) -> Result<ProductDetail, CatalogServiceError>;

    /// Any non-deleted product by id, including inactive ones.
    async fn get_product_by_uuid(
        &self,
        product: ProductUuid,
    ) -> Result<Product, CatalogServiceError>;

    /// Create a product. An empty slug is derived from the name.
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError>;

    /// Partially update a product.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, CatalogServiceError>;

    /// Soft-delete a product. It disappears from listings and can no longer be ordered.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), CatalogServiceError>;
}
