use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, EntityIdPath};
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto};
use crate::features::categories::use_cases::{
    CategoryUseCases, CreateCategoryInput, DeleteCategoryInput, GetCategoryInput,
    UpdateCategoryInput,
};
use crate::shared::search::SearchInput;
use crate::shared::types::ApiResponse;
use crate::shared::validation::FieldErrors;

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "Validation error")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(use_cases): State<Arc<CategoryUseCases>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::EntityValidation(FieldErrors::from(e)))?;

    let category = use_cases
        .create
        .execute(CreateCategoryInput::from(dto))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

/// List categories
///
/// Supports pagination, a case-insensitive name filter and sorting by
/// `name` or `created_at`. Without a valid sort the newest categories come first.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(SearchInput),
    responses(
        (status = 200, description = "Page of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(use_cases): State<Arc<CategoryUseCases>>,
    Query(query): Query<SearchInput>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let output = use_cases.list.execute(query).await?;
    let meta = output.meta();
    Ok(Json(ApiResponse::success(Some(output.items), None, Some(meta))))
}

/// Get category by id
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found"),
        (status = 422, description = "ID is not a UUID")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(use_cases): State<Arc<CategoryUseCases>>,
    EntityIdPath(id): EntityIdPath,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = use_cases
        .get
        .execute(GetCategoryInput { id: id.to_string() })
        .await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Update category
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(use_cases): State<Arc<CategoryUseCases>>,
    EntityIdPath(id): EntityIdPath,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::EntityValidation(FieldErrors::from(e)))?;

    let category = use_cases
        .update
        .execute(UpdateCategoryInput::from_dto(id.to_string(), dto))
        .await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Delete category
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 422, description = "ID is not a UUID")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(use_cases): State<Arc<CategoryUseCases>>,
    EntityIdPath(id): EntityIdPath,
) -> Result<StatusCode> {
    use_cases
        .delete
        .execute(DeleteCategoryInput { id: id.to_string() })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
