use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::shared::search::SearchResult;
use crate::shared::types::Meta;

// Create request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 255, message = "name must be between 1 and 255 characters"))]
    pub name: String,

    pub description: Option<String>,

    pub is_active: Option<bool>,
}

// Update request (full replacement of the mutable fields)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 255, message = "name must be between 1 and 255 characters"))]
    pub name: String,

    pub description: Option<String>,

    pub is_active: Option<bool>,
}

/// Response DTO for category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Category> for CategoryResponseDto {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id().as_uuid(),
            name: c.name().to_string(),
            description: c.description().map(str::to_string),
            is_active: c.is_active(),
            created_at: c.created_at(),
        }
    }
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self::from(&c)
    }
}

/// A page of items plus the pagination numbers clients need
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationOutput<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub current_page: i64,
    pub per_page: i64,
    pub last_page: i64,
}

impl<T> PaginationOutput<T> {
    pub fn from_result<E>(result: SearchResult<E>, f: impl FnMut(E) -> T) -> Self {
        let (total, current_page, per_page, last_page) = (
            result.total(),
            result.current_page(),
            result.per_page(),
            result.last_page(),
        );

        Self {
            items: result.into_items().into_iter().map(f).collect(),
            total,
            current_page,
            per_page,
            last_page,
        }
    }

    pub fn meta(&self) -> Meta {
        Meta {
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
            last_page: self.last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::search::{SearchResultProps, SortDirection};

    #[test]
    fn test_create_dto_validation() {
        let dto = CreateCategoryDto {
            name: String::new(),
            description: None,
            is_active: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateCategoryDto {
            name: "t".repeat(256),
            description: None,
            is_active: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateCategoryDto {
            name: "Movie".to_string(),
            description: None,
            is_active: Some(false),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_pagination_output_drops_search_echo() {
        let result = SearchResult::new(SearchResultProps {
            items: vec![1, 2],
            total: 3,
            current_page: 1,
            per_page: 2,
            sort: Some("name".to_string()),
            sort_dir: Some(SortDirection::Desc),
            filter: Some("fake".to_string()),
        });

        let output = PaginationOutput::from_result(result, |i| i * 10);
        assert_eq!(
            output,
            PaginationOutput {
                items: vec![10, 20],
                total: 3,
                current_page: 1,
                per_page: 2,
                last_page: 2,
            }
        );
        assert_eq!(output.meta().last_page, 2);
    }
}
