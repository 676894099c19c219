use std::path::{Path, PathBuf};
use std::sync::Arc;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CreateProduct, Product, ProductDetails, ProductFilter, ProductSummary, UpdateProduct,
    image_path,
};
use crate::repository::ProductRepository;
use crate::sequence::{SequenceRepository, SequenceService, SequencedEntity};

pub struct ProductService<P: ProductRepository, S: SequenceRepository> {
    repository: Arc<P>,
    sequence: SequenceService<S>,
    assets_dir: PathBuf,
}

impl<P: ProductRepository, S: SequenceRepository> Clone for ProductService<P, S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            sequence: self.sequence.clone(),
            assets_dir: self.assets_dir.clone(),
        }
    }
}

impl<P: ProductRepository, S: SequenceRepository> ProductService<P, S> {
    /// `assets_dir` is the root that contains `images/tshirts/`.
    pub fn new(repository: P, sequence: S, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            repository: Arc::new(repository),
            sequence: SequenceService::new(sequence),
            assets_dir: assets_dir.into(),
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    pub async fn list_products(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        self.repository.find_all(&filter).await
    }

    pub async fn get_product(&self, id: i32) -> CatalogResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    pub async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Product>> {
        self.repository.find_by_name(name).await
    }

    pub async fn get_details(&self, id: i32) -> CatalogResult<ProductDetails> {
        self.repository
            .find_details(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    pub async fn list_names(&self) -> CatalogResult<Vec<String>> {
        self.repository.find_names().await
    }

    pub async fn list_by_category(&self, category_id: &str) -> CatalogResult<Vec<ProductSummary>> {
        if !self.repository.category_exists(category_id).await? {
            return Err(CatalogError::CategoryNotFound(category_id.to_string()));
        }

        self.repository.find_summaries_by_category(category_id).await
    }

    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.check_references(&input.category_id, input.brand_id)
            .await?;

        self.repository.insert(input).await
    }

    /// Overwrites only the fields present in `input`.
    pub async fn update_product(&self, id: i32, input: UpdateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let mut product = self.get_product(id).await?;
        product.apply_update(input);

        self.check_references(&product.category_id, product.brand_id)
            .await?;

        self.repository.update(product).await
    }

    /// Deletes the product, then renumbers the remaining products to 1..N.
    pub async fn delete_product(&self, id: i32) -> CatalogResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CatalogError::ProductNotFound(id));
        }

        self.sequence.reassign(SequencedEntity::Product).await
    }

    /// Raw JPEG bytes of the product's image.
    pub async fn load_image(&self, id: i32) -> CatalogResult<Vec<u8>> {
        self.get_product(id).await?;

        let path = self.assets_dir.join(image_path(id));
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(product_id = id, path = %path.display(), "Image file missing");
                Err(CatalogError::ImageNotFound(id))
            }
            Err(e) => {
                tracing::error!(product_id = id, path = %path.display(), error = %e, "Failed to read image");
                Err(CatalogError::Io(e))
            }
        }
    }

    async fn check_references(&self, category_id: &str, brand_id: i32) -> CatalogResult<()> {
        if !self.repository.category_exists(category_id).await? {
            return Err(CatalogError::CategoryNotFound(category_id.to_string()));
        }
        if !self.repository.brand_exists(brand_id).await? {
            return Err(CatalogError::BrandNotFound(brand_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Size;
    use crate::repository::MockProductRepository;
    use crate::sequence::MockSequenceRepository;
    use mockall::predicate::eq;

    fn stored(id: i32) -> Product {
        Product::new(
            id,
            CreateProduct {
                name: "T-Shirt simple".to_string(),
                description: Some("Un simple demi manche".to_string()),
                unit_price: 15.95,
                quantity_in_stock: 10,
                color: "Blanc".to_string(),
                category_id: "cat-hommes".to_string(),
                brand_id: 1,
                size: Size::L,
            },
        )
    }

    fn service(
        repo: MockProductRepository,
        sequence: MockSequenceRepository,
    ) -> ProductService<MockProductRepository, MockSequenceRepository> {
        ProductService::new(repo, sequence, "assets")
    }

    #[tokio::test]
    async fn test_delete_renumbers_products_once() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete().with(eq(3)).times(1).returning(|_| Ok(true));

        let mut sequence = MockSequenceRepository::new();
        sequence
            .expect_renumber()
            .with(eq(SequencedEntity::Product))
            .times(1)
            .returning(|_| Ok(2));

        service(repo, sequence).delete_product(3).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_product_writes_nothing() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let mut sequence = MockSequenceRepository::new();
        sequence.expect_renumber().never();

        let result = service(repo, sequence).delete_product(99).await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound(99))));
    }

    #[tokio::test]
    async fn test_update_preserves_absent_fields() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(stored(id))));
        repo.expect_category_exists().returning(|_| Ok(true));
        repo.expect_brand_exists().returning(|_| Ok(true));
        repo.expect_update().times(1).returning(Ok);

        let updated = service(repo, MockSequenceRepository::new())
            .update_product(
                1,
                UpdateProduct {
                    quantity_in_stock: Some(0),
                    color: Some("Noir".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.quantity_in_stock, 0);
        assert_eq!(updated.color, "Noir");
        assert_eq!(updated.name, "T-Shirt simple");
        assert_eq!(updated.unit_price, 15.95);
        assert_eq!(updated.size, Size::L);
    }

    #[tokio::test]
    async fn test_update_with_unknown_brand_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(stored(id))));
        repo.expect_category_exists().returning(|_| Ok(true));
        repo.expect_brand_exists().with(eq(7)).returning(|_| Ok(false));
        repo.expect_update().never();

        let result = service(repo, MockSequenceRepository::new())
            .update_product(
                1,
                UpdateProduct {
                    brand_id: Some(7),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(CatalogError::BrandNotFound(7))));
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_category_exists().returning(|_| Ok(false));
        repo.expect_insert().never();

        let mut input = CreateProduct {
            name: "T-Shirt V".to_string(),
            description: None,
            unit_price: 17.95,
            quantity_in_stock: 5,
            color: "Blanc".to_string(),
            category_id: "nope".to_string(),
            brand_id: 1,
            size: Size::M,
        };
        let result = service(repo, MockSequenceRepository::new())
            .create_product(input.clone())
            .await;
        assert!(matches!(result, Err(CatalogError::CategoryNotFound(_))));

        input.unit_price = -1.0;
        let result = service(MockProductRepository::new(), MockSequenceRepository::new())
            .create_product(input)
            .await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_by_missing_category_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_category_exists().returning(|_| Ok(false));
        repo.expect_find_summaries_by_category().never();

        let result = service(repo, MockSequenceRepository::new())
            .list_by_category("missing")
            .await;
        assert!(matches!(result, Err(CatalogError::CategoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_image_file_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(stored(id))));

        let service = ProductService::new(
            repo,
            MockSequenceRepository::new(),
            std::env::temp_dir().join("catalog-no-such-assets"),
        );
        let result = service.load_image(1).await;

        assert!(matches!(result, Err(CatalogError::ImageNotFound(1))));
    }
}
