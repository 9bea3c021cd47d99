pub mod in_memory;
pub mod postgres;

use crate::features::categories::models::Category;
use crate::shared::repository::SearchableRepository;

pub use in_memory::CategoryInMemoryRepository;
pub use postgres::PgCategoryRepository;

/// Storage contract for categories, implemented by every backend
pub type CategoryRepository = dyn SearchableRepository<Category>;
