use std::sync::Arc;

use crate::core::error::Result;
use crate::features::categories::dtos::{CategoryResponseDto, UpdateCategoryDto};
use crate::features::categories::repositories::CategoryRepository;

#[derive(Debug, Clone)]
pub struct UpdateCategoryInput {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// `None` leaves the active flag untouched
    pub is_active: Option<bool>,
}

impl UpdateCategoryInput {
    pub fn from_dto(id: impl Into<String>, dto: UpdateCategoryDto) -> Self {
        Self {
            id: id.into(),
            name: dto.name,
            description: dto.description,
            is_active: dto.is_active,
        }
    }
}

pub struct UpdateCategoryUseCase {
    repository: Arc<CategoryRepository>,
}

impl UpdateCategoryUseCase {
    pub fn new(repository: Arc<CategoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, input: UpdateCategoryInput) -> Result<CategoryResponseDto> {
        let mut category = self.repository.find_by_id((&input.id).into()).await?;

        category.update(input.name, input.description)?;
        match input.is_active {
            Some(true) => category.activate()?,
            Some(false) => category.deactivate()?,
            None => {}
        }

        self.repository.update(&category).await?;
        tracing::info!(category_id = %category.id(), "Category updated");

        Ok(CategoryResponseDto::from(category))
    }
}
