use std::sync::Arc;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CategoryProductCount, CategoryWithProducts, CreateCategory, UpdateCategory,
};
use crate::repository::CategoryRepository;

/// Names ensured by `POST /categories/init`.
pub const DEFAULT_CATEGORIES: [&str; 5] =
    ["Homme", "Femme", "Mixte", "Enfant Fille", "Enfant Garçon"];

pub struct CategoryService<C: CategoryRepository> {
    repository: Arc<C>,
}

impl<C: CategoryRepository> Clone for CategoryService<C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<C: CategoryRepository> CategoryService<C> {
    pub fn new(repository: C) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list_categories(&self) -> CatalogResult<Vec<CategoryWithProducts>> {
        self.repository.find_all_with_products().await
    }

    /// Categories without their products
    pub async fn list_category_dtos(&self) -> CatalogResult<Vec<Category>> {
        self.repository.find_all().await
    }

    pub async fn get_category(&self, id: &str) -> CatalogResult<CategoryWithProducts> {
        self.repository
            .find_with_products(id)
            .await?
            .ok_or_else(|| CatalogError::CategoryNotFound(id.to_string()))
    }

    pub async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        self.repository.find_by_name(name).await
    }

    pub async fn names_with_counts(&self) -> CatalogResult<Vec<CategoryProductCount>> {
        self.repository.names_with_counts().await
    }

    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        if self.repository.find_by_name(&input.name).await?.is_some() {
            return Err(CatalogError::DuplicateName {
                entity: "Category",
                name: input.name,
            });
        }

        self.repository.insert(Category::new(input)).await
    }

    /// Returns the existing category named `name`, creating it if missing.
    pub async fn ensure_category(&self, name: &str) -> CatalogResult<Category> {
        if let Some(existing) = self.repository.find_by_name(name).await? {
            return Ok(existing);
        }

        self.repository
            .insert(Category::new(CreateCategory {
                name: name.to_string(),
            }))
            .await
    }

    /// Ensures every name in [`DEFAULT_CATEGORIES`] exists; safe to repeat.
    pub async fn init_default_categories(&self) -> CatalogResult<()> {
        for name in DEFAULT_CATEGORIES {
            self.ensure_category(name).await?;
        }

        tracing::info!(count = DEFAULT_CATEGORIES.len(), "Default categories initialized");
        Ok(())
    }

    pub async fn update_category(
        &self,
        id: &str,
        input: UpdateCategory,
    ) -> CatalogResult<Category> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let mut category = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::CategoryNotFound(id.to_string()))?;

        if let Some(ref name) = input.name {
            if let Some(other) = self.repository.find_by_name(name).await? {
                if other.id != id {
                    return Err(CatalogError::DuplicateName {
                        entity: "Category",
                        name: name.clone(),
                    });
                }
            }
        }

        category.apply_update(input);
        self.repository.update(category).await
    }

    /// Deletes the category together with all of its products.
    pub async fn delete_category(&self, id: &str) -> CatalogResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CatalogError::CategoryNotFound(id.to_string()));
        }

        Ok(())
    }
}
