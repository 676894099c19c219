use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use std::collections::HashMap;

use super::{db_error, unique_violation};
use crate::entity::{category, product};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, CategoryProductCount, CategoryWithProducts, Product};
use crate::repository::CategoryRepository;

#[derive(Clone)]
pub struct PgCategoryRepository {
    base: BaseRepository<category::Entity>,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn products_of(
        &self,
        category_ids: Vec<String>,
    ) -> CatalogResult<HashMap<String, Vec<Product>>> {
        let models = product::Entity::find()
            .filter(product::Column::CategoryId.is_in(category_ids))
            .order_by_asc(product::Column::Id)
            .all(self.base.db())
            .await
            .map_err(db_error)?;

        let mut grouped: HashMap<String, Vec<Product>> = HashMap::new();
        for model in models {
            grouped
                .entry(model.category_id.clone())
                .or_default()
                .push(model.into());
        }
        Ok(grouped)
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_all(&self) -> CatalogResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(self.base.db())
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Category>> {
        let model = self.base.find_by_id(id.to_string()).await.map_err(db_error)?;
        Ok(model.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find()
            .filter(category::Column::Name.eq(name))
            .one(self.base.db())
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn insert(&self, category: Category) -> CatalogResult<Category> {
        let name = category.name.clone();
        let active_model: category::ActiveModel = category.into();

        let model = self
            .base
            .insert(active_model)
            .await
            .map_err(|e| unique_violation(e, "Category", &name))?;

        tracing::info!(category_id = %model.id, "Created category");
        Ok(model.into())
    }

    async fn update(&self, category: Category) -> CatalogResult<Category> {
        let id = category.id.clone();
        let name = category.name.clone();
        let active_model: category::ActiveModel = category.into();

        let model = self.base.update(active_model).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => CatalogError::CategoryNotFound(id.clone()),
            e => unique_violation(e, "Category", &name),
        })?;

        tracing::info!(category_id = %model.id, "Updated category");
        Ok(model.into())
    }

    async fn delete(&self, id: &str) -> CatalogResult<bool> {
        // Products go with it through ON DELETE CASCADE
        let rows_affected = self
            .base
            .delete_by_id(id.to_string())
            .await
            .map_err(db_error)?;

        if rows_affected > 0 {
            tracing::info!(category_id = %id, "Deleted category");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn find_all_with_products(&self) -> CatalogResult<Vec<CategoryWithProducts>> {
        let categories = self.find_all().await?;
        let ids = categories.iter().map(|c| c.id.clone()).collect();
        let mut products = self.products_of(ids).await?;

        Ok(categories
            .into_iter()
            .map(|c| {
                let items = products.remove(&c.id).unwrap_or_default();
                CategoryWithProducts::new(c, items)
            })
            .collect())
    }

    async fn find_with_products(&self, id: &str) -> CatalogResult<Option<CategoryWithProducts>> {
        let Some(category) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let mut products = self.products_of(vec![category.id.clone()]).await?;
        let items = products.remove(&category.id).unwrap_or_default();

        Ok(Some(CategoryWithProducts::new(category, items)))
    }

    async fn names_with_counts(&self) -> CatalogResult<Vec<CategoryProductCount>> {
        let rows: Vec<(String, i64)> = category::Entity::find()
            .select_only()
            .column(category::Column::Name)
            .column_as(product::Column::Id.count(), "product_count")
            .join(JoinType::LeftJoin, category::Relation::Product.def())
            .group_by(category::Column::Id)
            .group_by(category::Column::Name)
            .order_by_asc(category::Column::Name)
            .into_tuple()
            .all(self.base.db())
            .await
            .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .map(|(name, product_count)| CategoryProductCount {
                name,
                product_count,
            })
            .collect())
    }
}
