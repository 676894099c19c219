use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use super::db_error;
use crate::entity::{brand, category, product};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CreateProduct, Product, ProductDetails, ProductFilter, ProductSort, ProductSummary, image_path,
};
use crate::repository::ProductRepository;

#[derive(Clone)]
pub struct PgProductRepository {
    base: BaseRepository<product::Entity>,
    categories: BaseRepository<category::Entity>,
    brands: BaseRepository<brand::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db.clone()),
            categories: BaseRepository::new(db.clone()),
            brands: BaseRepository::new(db),
        }
    }
}

const LIKE_ESCAPE: char = '!';

/// Case-folded `LIKE` pattern matching `needle` literally anywhere in a name.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self, filter: &ProductFilter) -> CatalogResult<Vec<Product>> {
        let mut query = product::Entity::find();

        if let Some(min) = filter.min_price {
            query = query.filter(product::Column::UnitPrice.gte(min));
        }

        if let Some(max) = filter.max_price {
            query = query.filter(product::Column::UnitPrice.lte(max));
        }

        if let Some(floor) = filter.in_stock_above {
            query = query.filter(product::Column::QuantityInStock.gt(floor));
        }

        if let Some(ref name) = filter.name {
            query = query.filter(Expr::cust_with_values(
                r#"LOWER("product"."name") LIKE $1 ESCAPE '!'"#,
                [contains_pattern(name)],
            ));
        }

        if let Some(ref category_name) = filter.category {
            query = query
                .inner_join(category::Entity)
                .filter(category::Column::Name.eq(category_name.as_str()));
        }

        if let Some(ref brand_name) = filter.brand {
            query = query
                .inner_join(brand::Entity)
                .filter(brand::Column::Name.eq(brand_name.as_str()));
        }

        query = match filter.sort {
            ProductSort::Id => query.order_by_asc(product::Column::Id),
            ProductSort::Price => query
                .order_by_asc(product::Column::UnitPrice)
                .order_by_asc(product::Column::Id),
        };

        let models = query.all(self.base.db()).await.map_err(db_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i32) -> CatalogResult<Option<Product>> {
        let model = self.base.find_by_id(id).await.map_err(db_error)?;
        Ok(model.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Product>> {
        let model = product::Entity::find()
            .filter(product::Column::Name.eq(name))
            .order_by_asc(product::Column::Id)
            .one(self.base.db())
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn find_details(&self, id: i32) -> CatalogResult<Option<ProductDetails>> {
        let row: Option<(String, String, f64, String)> = product::Entity::find_by_id(id)
            .select_only()
            .column_as(product::Column::Name, "name")
            .column_as(brand::Column::Name, "brand")
            .column_as(product::Column::UnitPrice, "price")
            .column_as(category::Column::Name, "category")
            .inner_join(brand::Entity)
            .inner_join(category::Entity)
            .into_tuple()
            .one(self.base.db())
            .await
            .map_err(db_error)?;

        Ok(row.map(|(name, brand, price, category)| ProductDetails {
            name,
            brand,
            price,
            category,
            image_path: image_path(id),
        }))
    }

    async fn find_names(&self) -> CatalogResult<Vec<String>> {
        product::Entity::find()
            .select_only()
            .column(product::Column::Name)
            .order_by_asc(product::Column::Id)
            .into_tuple()
            .all(self.base.db())
            .await
            .map_err(db_error)
    }

    async fn find_summaries_by_category(
        &self,
        category_id: &str,
    ) -> CatalogResult<Vec<ProductSummary>> {
        let Some(category) = self
            .categories
            .find_by_id(category_id.to_string())
            .await
            .map_err(db_error)?
        else {
            return Ok(Vec::new());
        };

        let models = product::Entity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_asc(product::Column::Id)
            .all(self.base.db())
            .await
            .map_err(db_error)?;

        Ok(models
            .into_iter()
            .map(|m| ProductSummary {
                id: m.id,
                name: m.name,
                price: m.unit_price,
                category: category.name.clone(),
                img_path: image_path(m.id),
            })
            .collect())
    }

    async fn insert(&self, input: CreateProduct) -> CatalogResult<Product> {
        let active_model: product::ActiveModel = input.into();

        let model = self.base.insert(active_model).await.map_err(db_error)?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn update(&self, product: Product) -> CatalogResult<Product> {
        let id = product.id;
        let active_model: product::ActiveModel = product.into();

        let model = self.base.update(active_model).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => CatalogError::ProductNotFound(id),
            e => db_error(e),
        })?;

        tracing::info!(product_id = id, "Updated product");
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> CatalogResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await.map_err(db_error)?;

        if rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn category_exists(&self, id: &str) -> CatalogResult<bool> {
        self.categories
            .exists(id.to_string())
            .await
            .map_err(db_error)
    }

    async fn brand_exists(&self, id: i32) -> CatalogResult<bool> {
        self.brands.exists(id).await.map_err(db_error)
    }
}
