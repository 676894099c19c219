use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, SqlErr};

use super::{db_error, unique_violation};
use crate::entity::brand;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Brand, CreateBrand};
use crate::repository::BrandRepository;

#[derive(Clone)]
pub struct PgBrandRepository {
    base: BaseRepository<brand::Entity>,
}

impl PgBrandRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl BrandRepository for PgBrandRepository {
    async fn find_all(&self) -> CatalogResult<Vec<Brand>> {
        let models = brand::Entity::find()
            .order_by_asc(brand::Column::Id)
            .all(self.base.db())
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i32) -> CatalogResult<Option<Brand>> {
        let model = self.base.find_by_id(id).await.map_err(db_error)?;
        Ok(model.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Brand>> {
        let model = brand::Entity::find()
            .filter(brand::Column::Name.eq(name))
            .one(self.base.db())
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn insert(&self, input: CreateBrand) -> CatalogResult<Brand> {
        let active_model = brand::ActiveModel {
            id: NotSet,
            name: Set(input.name.clone()),
        };

        let model = self
            .base
            .insert(active_model)
            .await
            .map_err(|e| unique_violation(e, "Brand", &input.name))?;

        tracing::info!(brand_id = model.id, "Created brand");
        Ok(model.into())
    }

    async fn update(&self, brand: Brand) -> CatalogResult<Brand> {
        let active_model = brand::ActiveModel {
            id: Set(brand.id),
            name: Set(brand.name.clone()),
        };

        let model = self.base.update(active_model).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => CatalogError::BrandNotFound(brand.id),
            e => unique_violation(e, "Brand", &brand.name),
        })?;

        tracing::info!(brand_id = model.id, "Updated brand");
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> CatalogResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await.map_err(|e| {
            match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => CatalogError::BrandInUse(id),
                _ => db_error(e),
            }
        })?;

        if rows_affected > 0 {
            tracing::info!(brand_id = id, "Deleted brand");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
