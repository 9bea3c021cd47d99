use std::sync::Arc;

use crate::core::error::Result;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::repositories::CategoryRepository;

#[derive(Debug, Clone)]
pub struct GetCategoryInput {
    pub id: String,
}

pub struct GetCategoryUseCase {
    repository: Arc<CategoryRepository>,
}

impl GetCategoryUseCase {
    pub fn new(repository: Arc<CategoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, input: GetCategoryInput) -> Result<CategoryResponseDto> {
        let category = self.repository.find_by_id((&input.id).into()).await?;
        Ok(CategoryResponseDto::from(category))
    }
}
