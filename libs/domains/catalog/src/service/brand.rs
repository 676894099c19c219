use std::sync::Arc;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Brand, CreateBrand, UpdateBrand};
use crate::repository::BrandRepository;
use crate::sequence::{SequenceRepository, SequenceService, SequencedEntity};

pub struct BrandService<B: BrandRepository, S: SequenceRepository> {
    repository: Arc<B>,
    sequence: SequenceService<S>,
}

impl<B: BrandRepository, S: SequenceRepository> Clone for BrandService<B, S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            sequence: self.sequence.clone(),
        }
    }
}

impl<B: BrandRepository, S: SequenceRepository> BrandService<B, S> {
    pub fn new(repository: B, sequence: S) -> Self {
        Self {
            repository: Arc::new(repository),
            sequence: SequenceService::new(sequence),
        }
    }

    pub async fn list_brands(&self) -> CatalogResult<Vec<Brand>> {
        self.repository.find_all().await
    }

    pub async fn get_brand(&self, id: i32) -> CatalogResult<Brand> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::BrandNotFound(id))
    }

    pub async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Brand>> {
        self.repository.find_by_name(name).await
    }

    pub async fn create_brand(&self, input: CreateBrand) -> CatalogResult<Brand> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        if self.repository.find_by_name(&input.name).await?.is_some() {
            return Err(CatalogError::DuplicateName {
                entity: "Brand",
                name: input.name,
            });
        }

        self.repository.insert(input).await
    }

    pub async fn update_brand(&self, id: i32, input: UpdateBrand) -> CatalogResult<Brand> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let mut brand = self.get_brand(id).await?;

        if let Some(ref name) = input.name {
            if let Some(other) = self.repository.find_by_name(name).await? {
                if other.id != id {
                    return Err(CatalogError::DuplicateName {
                        entity: "Brand",
                        name: name.clone(),
                    });
                }
            }
        }

        brand.apply_update(input);
        self.repository.update(brand).await
    }

    /// Deletes the brand, then renumbers the remaining brands to 1..N.
    ///
    /// Brands still referenced by products are refused with
    /// [`CatalogError::BrandInUse`].
    pub async fn delete_brand(&self, id: i32) -> CatalogResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CatalogError::BrandNotFound(id));
        }

        self.sequence.reassign(SequencedEntity::Brand).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockBrandRepository;
    use crate::sequence::MockSequenceRepository;
    use mockall::predicate::eq;

    fn nike() -> Brand {
        Brand {
            id: 1,
            name: "Nike".to_string(),
        }
    }

    #[tokio::test]
    async fn test_delete_renumbers_brands_once() {
        let mut repo = MockBrandRepository::new();
        repo.expect_delete().with(eq(1)).times(1).returning(|_| Ok(true));

        let mut sequence = MockSequenceRepository::new();
        sequence
            .expect_renumber()
            .with(eq(SequencedEntity::Brand))
            .times(1)
            .returning(|_| Ok(1));

        let service = BrandService::new(repo, sequence);
        service.delete_brand(1).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_brand_skips_renumbering() {
        let mut repo = MockBrandRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let mut sequence = MockSequenceRepository::new();
        sequence.expect_renumber().never();

        let service = BrandService::new(repo, sequence);
        let result = service.delete_brand(42).await;

        assert!(matches!(result, Err(CatalogError::BrandNotFound(42))));
    }

    #[tokio::test]
    async fn test_delete_brand_in_use_skips_renumbering() {
        let mut repo = MockBrandRepository::new();
        repo.expect_delete()
            .returning(|id| Err(CatalogError::BrandInUse(id)));

        let mut sequence = MockSequenceRepository::new();
        sequence.expect_renumber().never();

        let service = BrandService::new(repo, sequence);
        let result = service.delete_brand(1).await;

        assert!(matches!(result, Err(CatalogError::BrandInUse(1))));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let mut repo = MockBrandRepository::new();
        repo.expect_find_by_name()
            .times(1)
            .returning(|_| Ok(Some(nike())));
        repo.expect_insert().never();

        let service = BrandService::new(repo, MockSequenceRepository::new());
        let result = service
            .create_brand(CreateBrand {
                name: "Nike".to_string(),
            })
            .await;

        assert!(matches!(result, Err(CatalogError::DuplicateName { .. })));
    }

    #[tokio::test]
    async fn test_update_keeps_name_when_absent() {
        let mut repo = MockBrandRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(Some(nike())));
        repo.expect_find_by_name().never();
        repo.expect_update().returning(Ok);

        let service = BrandService::new(repo, MockSequenceRepository::new());
        let brand = service.update_brand(1, UpdateBrand::default()).await.unwrap();

        assert_eq!(brand, nike());
    }

    #[tokio::test]
    async fn test_update_missing_brand_is_not_found() {
        let mut repo = MockBrandRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let service = BrandService::new(repo, MockSequenceRepository::new());
        let result = service
            .update_brand(
                9,
                UpdateBrand {
                    name: Some("Puma".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(CatalogError::BrandNotFound(9))));
    }
}
