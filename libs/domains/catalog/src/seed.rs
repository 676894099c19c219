//! Demo catalog loaded at startup when `SEED_DEMO_DATA` is enabled.
//!
//! Every row is looked up by name first, so running the seed against an
//! already seeded database changes nothing.

use std::collections::HashMap;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Brand, CreateBrand, CreateProduct, Size};
use crate::repository::{BrandRepository, CategoryRepository, ProductRepository};
use crate::sequence::SequenceRepository;
use crate::service::{BrandService, CategoryService, ProductService};

pub const DEMO_CATEGORIES: [&str; 3] = ["Hommes", "Femmes", "Enfants"];
pub const DEMO_BRANDS: [&str; 3] = ["Nike", "Adidas", "Jack & Jones"];

struct DemoProduct {
    name: &'static str,
    description: &'static str,
    unit_price: f64,
    quantity_in_stock: i32,
    color: &'static str,
    category: &'static str,
    brand: &'static str,
    size: Size,
}

const DEMO_PRODUCTS: [DemoProduct; 3] = [
    DemoProduct {
        name: "T-Shirt simple",
        description: "Un simple demi manche",
        unit_price: 15.95,
        quantity_in_stock: 10,
        color: "Blanc",
        category: "Hommes",
        brand: "Nike",
        size: Size::L,
    },
    DemoProduct {
        name: "T-Shirt V",
        description: "Un simple demi manche avec col en V",
        unit_price: 17.95,
        quantity_in_stock: 5,
        color: "Blanc",
        category: "Hommes",
        brand: "Nike",
        size: Size::M,
    },
    DemoProduct {
        name: "T-Shirt Oversize",
        description: "Un demi manche large",
        unit_price: 19.95,
        quantity_in_stock: 23,
        color: "Bleu",
        category: "Femmes",
        brand: "Jack & Jones",
        size: Size::S,
    },
];

/// Rows created by one seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub brands: usize,
    pub products: usize,
}

async fn ensure_brand<B, S>(brands: &BrandService<B, S>, name: &str) -> CatalogResult<(Brand, bool)>
where
    B: BrandRepository,
    S: SequenceRepository,
{
    if let Some(existing) = brands.find_by_name(name).await? {
        return Ok((existing, false));
    }

    let brand = brands
        .create_brand(CreateBrand {
            name: name.to_string(),
        })
        .await?;
    Ok((brand, true))
}

pub async fn seed_demo_data<C, B, P, S>(
    categories: &CategoryService<C>,
    brands: &BrandService<B, S>,
    products: &ProductService<P, S>,
) -> CatalogResult<SeedReport>
where
    C: CategoryRepository,
    B: BrandRepository,
    P: ProductRepository,
    S: SequenceRepository,
{
    let mut report = SeedReport::default();

    let mut category_ids = HashMap::new();
    for name in DEMO_CATEGORIES {
        let existed = categories.find_by_name(name).await?.is_some();
        let category = categories.ensure_category(name).await?;
        if !existed {
            report.categories += 1;
        }
        category_ids.insert(name, category.id);
    }

    let mut brand_ids = HashMap::new();
    for name in DEMO_BRANDS {
        let (brand, created) = ensure_brand(brands, name).await?;
        if created {
            report.brands += 1;
        }
        brand_ids.insert(name, brand.id);
    }

    for demo in &DEMO_PRODUCTS {
        if products.find_by_name(demo.name).await?.is_some() {
            continue;
        }

        let category_id = category_ids
            .get(demo.category)
            .cloned()
            .ok_or_else(|| CatalogError::CategoryNotFound(demo.category.to_string()))?;
        let brand_id = *brand_ids.get(demo.brand).ok_or_else(|| {
            CatalogError::Validation(format!("Demo brand {} is not seeded", demo.brand))
        })?;

        products
            .create_product(CreateProduct {
                name: demo.name.to_string(),
                description: Some(demo.description.to_string()),
                unit_price: demo.unit_price,
                quantity_in_stock: demo.quantity_in_stock,
                color: demo.color.to_string(),
                category_id,
                brand_id,
                size: demo.size,
            })
            .await?;
        report.products += 1;
    }

    tracing::info!(
        categories = report.categories,
        brands = report.brands,
        products = report.products,
        "Demo data seeded"
    );
    Ok(report)
}
