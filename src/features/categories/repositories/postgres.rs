use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryProperties};
use crate::shared::constants::BULK_INSERT_CHUNK_SIZE;
use crate::shared::entity_id::EntityIdRef;
use crate::shared::repository::{SearchableEntity, SearchableRepository};
use crate::shared::search::{SearchParams, SearchResult};

const SELECT_CATEGORY: &str =
    "SELECT id, name, description, is_active, created_at FROM categories";

/// Row shape of the `categories` table
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = AppError;

    /// Rows that break entity invariants come back as `LoadEntity`
    fn try_from(row: CategoryRow) -> Result<Self> {
        let properties = CategoryProperties {
            name: row.name,
            description: row.description,
            is_active: Some(row.is_active),
            created_at: Some(row.created_at),
        };

        Category::new(properties, Some(row.id.into())).map_err(|e| match e {
            AppError::EntityValidation(fields) => AppError::LoadEntity(fields),
            other => other,
        })
    }
}

/// Convert database error to more specific AppError
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique constraint violation (PostgreSQL error code 23505)
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Conflict("A category with this ID already exists".to_string());
        }
    }

    tracing::error!("Category query failed: {:?}", e);
    AppError::Database(e)
}

/// `%filter%` with LIKE metacharacters escaped, so the match is a plain substring
fn like_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for ch in filter.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn push_filter<'a>(builder: &mut QueryBuilder<'a, Postgres>, pattern: Option<&'a str>) {
    if let Some(pattern) = pattern {
        builder.push(" WHERE name ILIKE ").push_bind(pattern);
    }
}

/// ORDER BY expression for a whitelisted field. Names compare byte-wise so
/// the order does not depend on the database collation.
fn order_column(field: &str) -> &'static str {
    match field {
        "name" => r#"name COLLATE "C""#,
        _ => "created_at",
    }
}

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchableRepository<Category> for PgCategoryRepository {
    async fn insert(&self, entity: &Category) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entity.id().as_uuid())
        .bind(entity.name())
        .bind(entity.description())
        .bind(entity.is_active())
        .bind(entity.created_at())
        .execute(&self.pool)
        .await
        .map_err(handle_db_error)?;

        Ok(())
    }

    /// Runs every chunk inside one transaction: all rows or none
    async fn bulk_insert(&self, entities: &[Category]) -> Result<()> {
        if entities.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;

        for chunk in entities.chunks(BULK_INSERT_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO categories (id, name, description, is_active, created_at) ",
            );
            builder.push_values(chunk, |mut row, category| {
                row.push_bind(category.id().as_uuid())
                    .push_bind(category.name().to_string())
                    .push_bind(category.description().map(str::to_string))
                    .push_bind(category.is_active())
                    .push_bind(category.created_at());
            });

            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(handle_db_error)?;
        }

        tx.commit().await.map_err(handle_db_error)?;

        tracing::debug!(count = entities.len(), "Bulk inserted categories");
        Ok(())
    }

    async fn find_by_id(&self, id: EntityIdRef<'_>) -> Result<Category> {
        // A value that is not a UUID cannot match any row
        let uuid = id
            .resolve()
            .ok_or_else(|| AppError::entity_not_found(id))?
            .as_uuid();

        let row: CategoryRow = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_CATEGORY))
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::entity_not_found(id))?;

        row.try_into()
    }

    async fn find_all(&self) -> Result<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(SELECT_CATEGORY)
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        rows.into_iter().map(Category::try_from).collect()
    }

    async fn update(&self, entity: &Category) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $1, description = $2, is_active = $3
            WHERE id = $4
            "#,
        )
        .bind(entity.name())
        .bind(entity.description())
        .bind(entity.is_active())
        .bind(entity.id().as_uuid())
        .execute(&self.pool)
        .await
        .map_err(handle_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::entity_not_found(entity.id()));
        }

        Ok(())
    }

    async fn delete(&self, id: EntityIdRef<'_>) -> Result<()> {
        let uuid = id
            .resolve()
            .ok_or_else(|| AppError::entity_not_found(id))?
            .as_uuid();

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::entity_not_found(id));
        }

        Ok(())
    }

    async fn search(&self, params: &SearchParams) -> Result<SearchResult<Category>> {
        let (field, dir) = params.resolve_sort(self.sortable_fields(), Category::DEFAULT_SORT);
        let pattern = params.filter().map(like_pattern);

        // Get total count
        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM categories");
        push_filter(&mut count_query, pattern.as_deref());
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)?;

        // Get paginated results, identifier breaks ties
        let mut page_query: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_CATEGORY);
        push_filter(&mut page_query, pattern.as_deref());
        page_query
            .push(format!(
                " ORDER BY {} {}, id ASC",
                order_column(field),
                dir.as_sql()
            ))
            .push(" LIMIT ")
            .push_bind(params.limit())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let rows: Vec<CategoryRow> = page_query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        let items = rows
            .into_iter()
            .map(Category::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(SearchResult::for_params(items, total, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::CategoryFakeBuilder;
    use crate::features::categories::repositories::contract_tests as contract;

    fn row(name: &str) -> CategoryRow {
        CategoryRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_maps_to_entity() {
        let row = row("Movie");
        let id = row.id;
        let category = Category::try_from(row).unwrap();
        assert_eq!(category.id().as_uuid(), id);
        assert_eq!(category.name(), "Movie");
    }

    #[test]
    fn test_invalid_row_is_a_load_error() {
        let err = Category::try_from(row("")).unwrap_err();
        match err {
            AppError::LoadEntity(fields) => {
                assert!(fields
                    .messages()
                    .contains(&"name should not be empty".to_string()));
            }
            other => panic!("expected load entity error, got {:?}", other),
        }
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_order_column_whitelist() {
        assert_eq!(order_column("name"), r#"name COLLATE "C""#);
        assert_eq!(order_column("created_at"), "created_at");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_insert_and_find_round_trip(pool: PgPool) {
        let repo = PgCategoryRepository::new(pool);
        let category = CategoryFakeBuilder::a_category()
            .with_description(Some("some description"))
            .deactivate()
            .build();

        repo.insert(&category).await.unwrap();

        let found = repo.find_by_id(category.id().into()).await.unwrap();
        assert_eq!(found, category);

        let raw = category.id().to_string();
        let found = repo.find_by_id((&raw).into()).await.unwrap();
        assert_eq!(found, category);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_stored_row_with_empty_name_fails_to_load(pool: PgPool) {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO categories (id, name, description, is_active, created_at) VALUES ($1, '', NULL, TRUE, NOW())",
        )
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

        let repo = PgCategoryRepository::new(pool);
        let err = repo.find_by_id(EntityIdRef::Raw(&id.to_string())).await.unwrap_err();
        assert!(
            matches!(err, AppError::LoadEntity(ref fields) if fields.messages().contains(&"name should not be empty".to_string()))
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_filter_escapes_like_wildcards(pool: PgPool) {
        let repo = PgCategoryRepository::new(pool);
        repo.insert(&CategoryFakeBuilder::a_category().with_name("100% cotton").build())
            .await
            .unwrap();
        repo.insert(&CategoryFakeBuilder::a_category().with_name("100 cotton").build())
            .await
            .unwrap();

        let params = SearchParams::new(crate::shared::search::SearchInput::default().filter("0%"));
        let result = repo.search(&params).await.unwrap();
        assert_eq!(result.total(), 1);
        assert_eq!(result.items()[0].name(), "100% cotton");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_bulk_insert_is_all_or_nothing(pool: PgPool) {
        let repo = PgCategoryRepository::new(pool);
        let existing = CategoryFakeBuilder::a_category().build();
        repo.insert(&existing).await.unwrap();

        let mut batch = CategoryFakeBuilder::the_categories(3).build_many();
        batch.push(existing.clone());

        let err = repo.bulk_insert(&batch).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(repo.find_all().await.unwrap(), vec![existing]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_contract_not_found(pool: PgPool) {
        contract::not_found_for_unknown_ids(&PgCategoryRepository::new(pool)).await;
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_contract_insert_conflict(pool: PgPool) {
        contract::insert_rejects_duplicate_id(&PgCategoryRepository::new(pool)).await;
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_contract_update_and_delete(pool: PgPool) {
        contract::update_and_delete(&PgCategoryRepository::new(pool)).await;
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_contract_default_search(pool: PgPool) {
        contract::default_search_pages_by_created_at_desc(&PgCategoryRepository::new(pool)).await;
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_contract_unknown_sort(pool: PgPool) {
        contract::unknown_sort_falls_back_to_created_at_desc(&PgCategoryRepository::new(pool))
            .await;
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_contract_filter(pool: PgPool) {
        contract::filter_is_case_insensitive(&PgCategoryRepository::new(pool)).await;
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_contract_sort_by_name(pool: PgPool) {
        contract::sort_by_name_paginates(&PgCategoryRepository::new(pool)).await;
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_contract_filter_sort_paginate(pool: PgPool) {
        contract::filter_sort_and_paginate_together(&PgCategoryRepository::new(pool)).await;
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_contract_extreme_paging(pool: PgPool) {
        contract::extreme_paging_values(&PgCategoryRepository::new(pool)).await;
    }
}
