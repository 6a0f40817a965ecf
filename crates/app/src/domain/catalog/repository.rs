//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{
        amount_param, count_param, try_get_amount, try_get_count, try_get_optional_amount,
        try_get_total,
    },
    domain::catalog::models::{
        Category, CategoryUpdate, CategoryUuid, NewCategory, NewProduct, Product, ProductDetail,
        ProductQuery, ProductUpdate, ProductUuid,
    },
};

const LIST_CATEGORIES_SQL: &str = include_str!("sql/list_categories.sql");
const GET_CATEGORY_SQL: &str = include_str!("sql/get_category.sql");
const CREATE_CATEGORY_SQL: &str = include_str!("sql/create_category.sql");
const UPDATE_CATEGORY_SQL: &str = include_str!("sql/update_category.sql");
const DELETE_CATEGORY_SQL: &str = include_str!("sql/delete_category.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const COUNT_PRODUCTS_SQL: &str = include_str!("sql/count_products.sql");
const GET_PRODUCT_DETAIL_SQL: &str = include_str!("sql/get_product_detail.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        query_as::<Postgres, Category>(LIST_CATEGORIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<Category, sqlx::Error> {
        query_as::<Postgres, Category>(GET_CATEGORY_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: &NewCategory,
    ) -> Result<Category, sqlx::Error> {
        query_as::<Postgres, Category>(CREATE_CATEGORY_SQL)
            .bind(category.uuid.into_uuid())
            .bind(category.parent_uuid.map(CategoryUuid::into_uuid))
            .bind(&category.name)
            .bind(&category.slug)
            .bind(category.description.as_deref())
            .bind(category.image_url.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: CategoryUuid,
        update: &CategoryUpdate,
    ) -> Result<Category, sqlx::Error> {
        query_as::<Postgres, Category>(UPDATE_CATEGORY_SQL)
            .bind(category.into_uuid())
            .bind(update.parent_uuid.map(CategoryUuid::into_uuid))
            .bind(update.name.as_deref())
            .bind(update.slug.as_deref())
            .bind(update.description.as_deref())
            .bind(update.image_url.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: CategoryUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CATEGORY_SQL)
            .bind(category.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductQuery,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let min_price = filter
            .min_price
            .map(|price| amount_param(price, "min_price"))
            .transpose()?;

        let max_price = filter
            .max_price
            .map(|price| amount_param(price, "max_price"))
            .transpose()?;

        let offset = i64::try_from(filter.page.offset()).unwrap_or(i64::MAX);

        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .bind(filter.include_inactive)
            .bind(filter.category.as_deref())
            .bind(filter.search.as_deref())
            .bind(min_price)
            .bind(max_price)
            .bind(filter.featured)
            .bind(filter.sort.as_str())
            .bind(filter.page.limit())
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductQuery,
    ) -> Result<u64, sqlx::Error> {
        let min_price = filter
            .min_price
            .map(|price| amount_param(price, "min_price"))
            .transpose()?;

        let max_price = filter
            .max_price
            .map(|price| amount_param(price, "max_price"))
            .transpose()?;

        let row = query(COUNT_PRODUCTS_SQL)
            .bind(filter.include_inactive)
            .bind(filter.category.as_deref())
            .bind(filter.search.as_deref())
            .bind(min_price)
            .bind(max_price)
            .bind(filter.featured)
            .fetch_one(&mut **tx)
            .await?;

        try_get_total(&row, "total")
    }

    pub(crate) async fn get_product_detail(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<ProductDetail, sqlx::Error> {
        query_as::<Postgres, ProductDetail>(GET_PRODUCT_DETAIL_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<Product, sqlx::Error> {
        let compare_at_price = product
            .compare_at_price
            .map(|price| amount_param(price, "compare_at_price"))
            .transpose()?;

        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.category_uuid.map(CategoryUuid::into_uuid))
            .bind(&product.name)
            .bind(&product.slug)
            .bind(product.description.as_deref())
            .bind(amount_param(product.price, "price")?)
            .bind(compare_at_price)
            .bind(&product.images)
            .bind(count_param(product.stock, "stock")?)
            .bind(product.is_active)
            .bind(product.is_featured)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
    ) -> Result<Product, sqlx::Error> {
        let price = update
            .price
            .map(|price| amount_param(price, "price"))
            .transpose()?;

        let compare_at_price = update
            .compare_at_price
            .map(|price| amount_param(price, "compare_at_price"))
            .transpose()?;

        let stock = update
            .stock
            .map(|stock| count_param(stock, "stock"))
            .transpose()?;

        query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(update.category_uuid.map(CategoryUuid::into_uuid))
            .bind(update.name.as_deref())
            .bind(update.slug.as_deref())
            .bind(update.description.as_deref())
            .bind(price)
            .bind(compare_at_price)
            .bind(update.images.as_deref())
            .bind(stock)
            .bind(update.is_active)
            .bind(update.is_featured)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Category {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CategoryUuid::from_uuid(row.try_get("uuid")?),
            parent_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("parent_uuid")?
                .map(CategoryUuid::from_uuid),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            category_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("category_uuid")?
                .map(CategoryUuid::from_uuid),
            category_name: row.try_get("category_name")?,
            category_slug: row.try_get("category_slug")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            compare_at_price: try_get_optional_amount(row, "compare_at_price")?,
            images: row.try_get("images")?,
            stock: try_get_count(row, "stock")?,
            is_active: row.try_get("is_active")?,
            is_featured: row.try_get("is_featured")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductDetail {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product: Product::from_row(row)?,
            average_rating: row.try_get("average_rating")?,
            review_count: try_get_total(row, "review_count")?,
        })
    }
}
