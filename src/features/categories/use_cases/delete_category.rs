use std::sync::Arc;

use crate::core::error::Result;
use crate::features::categories::repositories::CategoryRepository;

#[derive(Debug, Clone)]
pub struct DeleteCategoryInput {
    pub id: String,
}

pub struct DeleteCategoryUseCase {
    repository: Arc<CategoryRepository>,
}

impl DeleteCategoryUseCase {
    pub fn new(repository: Arc<CategoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, input: DeleteCategoryInput) -> Result<()> {
        self.repository.delete((&input.id).into()).await?;
        tracing::info!(category_id = %input.id, "Category deleted");
        Ok(())
    }
}
