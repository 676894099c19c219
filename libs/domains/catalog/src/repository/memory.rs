use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{BrandRepository, CategoryRepository, ProductRepository};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Brand, Category, CategoryProductCount, CategoryWithProducts, CreateBrand, CreateProduct,
    Product, ProductDetails, ProductFilter, ProductSort, ProductSummary, image_path,
};
use crate::sequence::{SequenceRepository, SequencedEntity};

#[derive(Debug)]
struct CatalogState {
    brands: BTreeMap<i32, Brand>,
    categories: BTreeMap<String, Category>,
    products: BTreeMap<i32, Product>,
    next_brand_id: i32,
    next_product_id: i32,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            brands: BTreeMap::new(),
            categories: BTreeMap::new(),
            products: BTreeMap::new(),
            next_brand_id: 1,
            next_product_id: 1,
        }
    }
}

impl CatalogState {
    fn category_products(&self, category_id: &str) -> Vec<Product> {
        self.products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect()
    }

    fn with_products(&self, category: &Category) -> CategoryWithProducts {
        CategoryWithProducts::new(category.clone(), self.category_products(&category.id))
    }

    fn sorted_categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.values().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    fn category_name_taken(&self, name: &str, except: Option<&str>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id.as_str()) != except)
    }

    fn brand_name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.brands
            .values()
            .any(|b| b.name == name && Some(b.id) != except)
    }

    /// Mirrors the store's rules: ids 1..N by previous order, product
    /// `brand_id` follows its brand, and the next id continues at N+1.
    fn renumber(&mut self, entity: SequencedEntity) -> u64 {
        let mut changed = 0;

        match entity {
            SequencedEntity::Product => {
                let old = std::mem::take(&mut self.products);
                for (new_id, (old_id, mut product)) in (1..).zip(old) {
                    if new_id != old_id {
                        product.renumber(new_id);
                        changed += 1;
                    }
                    self.products.insert(new_id, product);
                }
                self.next_product_id = self.products.len() as i32 + 1;
            }
            SequencedEntity::Brand => {
                let old = std::mem::take(&mut self.brands);
                let mut moved = BTreeMap::new();
                for (new_id, (old_id, mut brand)) in (1..).zip(old) {
                    if new_id != old_id {
                        brand.id = new_id;
                        moved.insert(old_id, new_id);
                        changed += 1;
                    }
                    self.brands.insert(new_id, brand);
                }
                for product in self.products.values_mut() {
                    if let Some(&new_id) = moved.get(&product.brand_id) {
                        product.brand_id = new_id;
                    }
                }
                self.next_brand_id = self.brands.len() as i32 + 1;
            }
        }

        changed
    }
}

/// In-memory catalog implementing every repository trait over one shared
/// state, so cascades and renumbering behave as they do in Postgres.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BrandRepository for InMemoryCatalog {
    async fn find_all(&self) -> CatalogResult<Vec<Brand>> {
        let state = self.state.read().await;
        Ok(state.brands.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> CatalogResult<Option<Brand>> {
        let state = self.state.read().await;
        Ok(state.brands.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Brand>> {
        let state = self.state.read().await;
        Ok(state.brands.values().find(|b| b.name == name).cloned())
    }

    async fn insert(&self, input: CreateBrand) -> CatalogResult<Brand> {
        let mut state = self.state.write().await;

        if state.brand_name_taken(&input.name, None) {
            return Err(CatalogError::DuplicateName {
                entity: "Brand",
                name: input.name,
            });
        }

        let brand = Brand {
            id: state.next_brand_id,
            name: input.name,
        };
        state.next_brand_id += 1;
        state.brands.insert(brand.id, brand.clone());

        tracing::info!(brand_id = brand.id, "Created brand");
        Ok(brand)
    }

    async fn update(&self, brand: Brand) -> CatalogResult<Brand> {
        let mut state = self.state.write().await;

        if !state.brands.contains_key(&brand.id) {
            return Err(CatalogError::BrandNotFound(brand.id));
        }
        if state.brand_name_taken(&brand.name, Some(brand.id)) {
            return Err(CatalogError::DuplicateName {
                entity: "Brand",
                name: brand.name,
            });
        }

        state.brands.insert(brand.id, brand.clone());
        tracing::info!(brand_id = brand.id, "Updated brand");
        Ok(brand)
    }

    async fn delete(&self, id: i32) -> CatalogResult<bool> {
        let mut state = self.state.write().await;

        if !state.brands.contains_key(&id) {
            return Ok(false);
        }
        if state.products.values().any(|p| p.brand_id == id) {
            return Err(CatalogError::BrandInUse(id));
        }

        state.brands.remove(&id);
        tracing::info!(brand_id = id, "Deleted brand");
        Ok(true)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn find_all(&self) -> CatalogResult<Vec<Category>> {
        let state = self.state.read().await;
        Ok(state.sorted_categories().into_iter().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.values().find(|c| c.name == name).cloned())
    }

    async fn insert(&self, category: Category) -> CatalogResult<Category> {
        let mut state = self.state.write().await;

        if state.category_name_taken(&category.name, None) {
            return Err(CatalogError::DuplicateName {
                entity: "Category",
                name: category.name,
            });
        }

        state
            .categories
            .insert(category.id.clone(), category.clone());
        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    async fn update(&self, category: Category) -> CatalogResult<Category> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&category.id) {
            return Err(CatalogError::CategoryNotFound(category.id));
        }
        if state.category_name_taken(&category.name, Some(&category.id)) {
            return Err(CatalogError::DuplicateName {
                entity: "Category",
                name: category.name,
            });
        }

        state
            .categories
            .insert(category.id.clone(), category.clone());
        tracing::info!(category_id = %category.id, "Updated category");
        Ok(category)
    }

    async fn delete(&self, id: &str) -> CatalogResult<bool> {
        let mut state = self.state.write().await;

        if state.categories.remove(id).is_none() {
            return Ok(false);
        }

        let before = state.products.len();
        state.products.retain(|_, p| p.category_id != id);
        let removed = before - state.products.len();

        tracing::info!(category_id = %id, removed_products = removed, "Deleted category");
        Ok(true)
    }

    async fn find_all_with_products(&self) -> CatalogResult<Vec<CategoryWithProducts>> {
        let state = self.state.read().await;
        Ok(state
            .sorted_categories()
            .into_iter()
            .map(|c| state.with_products(c))
            .collect())
    }

    async fn find_with_products(&self, id: &str) -> CatalogResult<Option<CategoryWithProducts>> {
        let state = self.state.read().await;
        Ok(state.categories.get(id).map(|c| state.with_products(c)))
    }

    async fn names_with_counts(&self) -> CatalogResult<Vec<CategoryProductCount>> {
        let state = self.state.read().await;
        Ok(state
            .sorted_categories()
            .into_iter()
            .map(|c| CategoryProductCount {
                name: c.name.clone(),
                product_count: state
                    .products
                    .values()
                    .filter(|p| p.category_id == c.id)
                    .count() as i64,
            })
            .collect())
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn find_all(&self, filter: &ProductFilter) -> CatalogResult<Vec<Product>> {
        let state = self.state.read().await;

        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|p| filter.matches_fields(p))
            .filter(|p| match filter.category {
                Some(ref name) => state
                    .categories
                    .get(&p.category_id)
                    .is_some_and(|c| &c.name == name),
                None => true,
            })
            .filter(|p| match filter.brand {
                Some(ref name) => state
                    .brands
                    .get(&p.brand_id)
                    .is_some_and(|b| &b.name == name),
                None => true,
            })
            .cloned()
            .collect();

        if filter.sort == ProductSort::Price {
            products.sort_by(|a, b| a.unit_price.total_cmp(&b.unit_price).then(a.id.cmp(&b.id)));
        }

        Ok(products)
    }

    async fn find_by_id(&self, id: i32) -> CatalogResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.values().find(|p| p.name == name).cloned())
    }

    async fn find_details(&self, id: i32) -> CatalogResult<Option<ProductDetails>> {
        let state = self.state.read().await;

        let Some(product) = state.products.get(&id) else {
            return Ok(None);
        };
        let brand = state
            .brands
            .get(&product.brand_id)
            .ok_or(CatalogError::BrandNotFound(product.brand_id))?;
        let category = state
            .categories
            .get(&product.category_id)
            .ok_or_else(|| CatalogError::CategoryNotFound(product.category_id.clone()))?;

        Ok(Some(ProductDetails {
            name: product.name.clone(),
            brand: brand.name.clone(),
            price: product.unit_price,
            category: category.name.clone(),
            image_path: product.image_path.clone(),
        }))
    }

    async fn find_names(&self) -> CatalogResult<Vec<String>> {
        let state = self.state.read().await;
        Ok(state.products.values().map(|p| p.name.clone()).collect())
    }

    async fn find_summaries_by_category(
        &self,
        category_id: &str,
    ) -> CatalogResult<Vec<ProductSummary>> {
        let state = self.state.read().await;

        let Some(category) = state.categories.get(category_id) else {
            return Ok(Vec::new());
        };

        Ok(state
            .category_products(category_id)
            .into_iter()
            .map(|p| ProductSummary {
                id: p.id,
                name: p.name,
                price: p.unit_price,
                category: category.name.clone(),
                img_path: image_path(p.id),
            })
            .collect())
    }

    async fn insert(&self, input: CreateProduct) -> CatalogResult<Product> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&input.category_id) {
            return Err(CatalogError::CategoryNotFound(input.category_id));
        }
        if !state.brands.contains_key(&input.brand_id) {
            return Err(CatalogError::BrandNotFound(input.brand_id));
        }

        let product = Product::new(state.next_product_id, input);
        state.next_product_id += 1;
        state.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn update(&self, product: Product) -> CatalogResult<Product> {
        let mut state = self.state.write().await;

        if !state.products.contains_key(&product.id) {
            return Err(CatalogError::ProductNotFound(product.id));
        }
        if !state.categories.contains_key(&product.category_id) {
            return Err(CatalogError::CategoryNotFound(product.category_id));
        }
        if !state.brands.contains_key(&product.brand_id) {
            return Err(CatalogError::BrandNotFound(product.brand_id));
        }

        state.products.insert(product.id, product.clone());
        tracing::info!(product_id = product.id, "Updated product");
        Ok(product)
    }

    async fn delete(&self, id: i32) -> CatalogResult<bool> {
        let mut state = self.state.write().await;

        if state.products.remove(&id).is_some() {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn category_exists(&self, id: &str) -> CatalogResult<bool> {
        let state = self.state.read().await;
        Ok(state.categories.contains_key(id))
    }

    async fn brand_exists(&self, id: i32) -> CatalogResult<bool> {
        let state = self.state.read().await;
        Ok(state.brands.contains_key(&id))
    }
}

#[async_trait]
impl SequenceRepository for InMemoryCatalog {
    async fn renumber(&self, entity: SequencedEntity) -> CatalogResult<u64> {
        let mut state = self.state.write().await;
        Ok(state.renumber(entity))
    }
}
