mod product_service;
pub mod sku;

pub use product_service::ProductService;
