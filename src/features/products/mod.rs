//! Catalog: products returned through the intake workflow.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/products` | List products by name |
//! | GET | `/api/products/{id}` | Get a product |
//! | POST | `/api/products` | Create a product (admin) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{PgProductRepository, ProductRepository};
pub use services::ProductService;
