//! Categories feature: CRUD plus paginated search.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/categories` | Create category |
//! | GET | `/api/categories` | Search categories (`page`, `per_page`, `sort`, `sort_dir`, `filter`) |
//! | GET | `/api/categories/{id}` | Get category |
//! | PUT | `/api/categories/{id}` | Update category |
//! | DELETE | `/api/categories/{id}` | Delete category |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod use_cases;

pub use use_cases::CategoryUseCases;
