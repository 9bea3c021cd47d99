use crate::features::categories::models::Category;
use crate::shared::in_memory::InMemoryRepository;

/// Category repository backed by a local `Vec`, for tests and offline runs
pub type CategoryInMemoryRepository = InMemoryRepository<Category>;
