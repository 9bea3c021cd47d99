use std::sync::Arc;

use crate::core::error::Result;
use crate::features::categories::dtos::{CategoryResponseDto, PaginationOutput};
use crate::features::categories::repositories::CategoryRepository;
use crate::shared::search::{SearchInput, SearchParams};

pub type ListCategoriesInput = SearchInput;

pub type ListCategoriesOutput = PaginationOutput<CategoryResponseDto>;

pub struct ListCategoriesUseCase {
    repository: Arc<CategoryRepository>,
}

impl ListCategoriesUseCase {
    pub fn new(repository: Arc<CategoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, input: ListCategoriesInput) -> Result<ListCategoriesOutput> {
        let params = SearchParams::new(input);
        tracing::debug!(?params, "Searching categories");

        let result = self.repository.search(&params).await?;
        Ok(PaginationOutput::from_result(result, CategoryResponseDto::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::CategoryFakeBuilder;
    use crate::features::categories::repositories::CategoryInMemoryRepository;
    use crate::shared::repository::SearchableRepository;

    #[tokio::test]
    async fn test_list_sorted_by_created_at_when_input_is_empty() {
        let repository = Arc::new(CategoryInMemoryRepository::new());
        let categories = CategoryFakeBuilder::the_categories(2)
            .with_incremented_created_at()
            .build_many();
        repository.bulk_insert(&categories).await.unwrap();

        let use_case = ListCategoriesUseCase::new(repository);
        let output = use_case.execute(ListCategoriesInput::default()).await.unwrap();

        assert_eq!(
            output,
            PaginationOutput {
                items: categories.iter().rev().map(CategoryResponseDto::from).collect(),
                total: 2,
                current_page: 1,
                per_page: 15,
                last_page: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_list_with_pagination_sort_and_filter() {
        let repository = Arc::new(CategoryInMemoryRepository::new());
        let categories = CategoryFakeBuilder::the_categories(5)
            .with_name_fn(|i| ["a", "AAA", "AaA", "b", "c"][i].to_string())
            .build_many();
        repository.bulk_insert(&categories).await.unwrap();

        let use_case = ListCategoriesUseCase::new(repository);
        let output = use_case
            .execute(
                ListCategoriesInput::default()
                    .page(1)
                    .per_page(2)
                    .sort("name")
                    .filter("a"),
            )
            .await
            .unwrap();

        let names: Vec<&str> = output.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["AAA", "AaA"]);
        assert_eq!(output.total, 3);
        assert_eq!(output.last_page, 2);
    }

    #[tokio::test]
    async fn test_list_sixteen_categories_spans_two_pages() {
        let repository = Arc::new(CategoryInMemoryRepository::new());
        let categories = CategoryFakeBuilder::the_categories(16).build_many();
        repository.bulk_insert(&categories).await.unwrap();

        let use_case = ListCategoriesUseCase::new(repository);
        let output = use_case
            .execute(ListCategoriesInput::default().per_page(15))
            .await
            .unwrap();

        assert_eq!(output.total, 16);
        assert_eq!(output.last_page, 2);
        assert_eq!(output.items.len(), 15);
    }
}
