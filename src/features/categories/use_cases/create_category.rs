use std::sync::Arc;

use crate::core::error::Result;
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto};
use crate::features::categories::models::{Category, CategoryProperties};
use crate::features::categories::repositories::CategoryRepository;

#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl From<CreateCategoryDto> for CreateCategoryInput {
    fn from(dto: CreateCategoryDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            is_active: dto.is_active,
        }
    }
}

pub struct CreateCategoryUseCase {
    repository: Arc<CategoryRepository>,
}

impl CreateCategoryUseCase {
    pub fn new(repository: Arc<CategoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, input: CreateCategoryInput) -> Result<CategoryResponseDto> {
        let category = Category::new(
            CategoryProperties {
                name: input.name,
                description: input.description,
                is_active: input.is_active,
                created_at: None,
            },
            None,
        )?;

        self.repository.insert(&category).await?;
        tracing::info!(category_id = %category.id(), "Category created");

        Ok(CategoryResponseDto::from(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::features::categories::repositories::CategoryInMemoryRepository;
    use crate::shared::repository::SearchableRepository;

    fn input(name: &str) -> CreateCategoryInput {
        CreateCategoryInput {
            name: name.to_string(),
            description: None,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_create_category() {
        let repository = Arc::new(CategoryInMemoryRepository::new());
        let use_case = CreateCategoryUseCase::new(repository.clone());

        let output = use_case.execute(input("test")).await.unwrap();
        let stored = repository.find_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(output, CategoryResponseDto::from(&stored[0]));
        assert!(output.is_active);
        assert_eq!(output.description, None);

        let output = use_case
            .execute(CreateCategoryInput {
                name: "test".to_string(),
                description: Some("some description".to_string()),
                is_active: Some(false),
            })
            .await
            .unwrap();
        assert_eq!(output.description.as_deref(), Some("some description"));
        assert!(!output.is_active);
        assert_eq!(repository.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_name_is_not_stored() {
        let repository = Arc::new(CategoryInMemoryRepository::new());
        let use_case = CreateCategoryUseCase::new(repository.clone());

        let err = use_case.execute(input("")).await.unwrap_err();
        assert!(matches!(err, AppError::EntityValidation(_)));
        assert!(repository.find_all().await.unwrap().is_empty());
    }
}
