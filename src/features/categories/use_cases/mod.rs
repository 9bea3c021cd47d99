pub mod create_category;
pub mod delete_category;
pub mod get_category;
pub mod list_categories;
pub mod update_category;

use std::sync::Arc;

pub use create_category::{CreateCategoryInput, CreateCategoryUseCase};
pub use delete_category::{DeleteCategoryInput, DeleteCategoryUseCase};
pub use get_category::{GetCategoryInput, GetCategoryUseCase};
pub use list_categories::{ListCategoriesInput, ListCategoriesOutput, ListCategoriesUseCase};
pub use update_category::{UpdateCategoryInput, UpdateCategoryUseCase};

use crate::features::categories::repositories::CategoryRepository;

/// Every category use case, wired to one repository
pub struct CategoryUseCases {
    pub create: CreateCategoryUseCase,
    pub get: GetCategoryUseCase,
    pub update: UpdateCategoryUseCase,
    pub delete: DeleteCategoryUseCase,
    pub list: ListCategoriesUseCase,
}

impl CategoryUseCases {
    pub fn new(repository: Arc<CategoryRepository>) -> Self {
        Self {
            create: CreateCategoryUseCase::new(Arc::clone(&repository)),
            get: GetCategoryUseCase::new(Arc::clone(&repository)),
            update: UpdateCategoryUseCase::new(Arc::clone(&repository)),
            delete: DeleteCategoryUseCase::new(Arc::clone(&repository)),
            list: ListCategoriesUseCase::new(repository),
        }
    }
}
