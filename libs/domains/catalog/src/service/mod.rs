//! Business layer: name uniqueness, reference checks, not-found mapping and
//! renumbering after deletes.

mod brand;
mod category;
mod product;

pub use brand::BrandService;
pub use category::{CategoryService, DEFAULT_CATEGORIES};
pub use product::ProductService;
