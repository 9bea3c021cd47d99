//! Storage contract shared by every backend, plus the filter/sort/paginate
//! helpers used by backends that search in process.

use std::cmp::Ordering;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::shared::entity_id::{EntityIdRef, UniqueEntityId};
use crate::shared::search::{SearchParams, SearchResult, SortDirection};

/// What a backend needs to know about an entity type to search it.
pub trait SearchableEntity: Clone + Send + Sync + 'static {
    /// Whitelist of fields accepted as `sort`
    const SORTABLE_FIELDS: &'static [&'static str];

    /// Applied when no sortable field was requested
    const DEFAULT_SORT: (&'static str, SortDirection);

    fn entity_id(&self) -> UniqueEntityId;

    /// Case-insensitive match of `filter` against the searchable text
    fn matches_filter(&self, filter: &str) -> bool;

    /// Ascending comparison on one of `SORTABLE_FIELDS`
    fn compare_field(&self, other: &Self, field: &str) -> Ordering;
}

#[async_trait]
pub trait SearchableRepository<E>: Send + Sync
where
    E: SearchableEntity,
{
    /// Persist a new entity. An existing identifier is a conflict.
    async fn insert(&self, entity: &E) -> Result<()>;

    /// Persist every entity or none of them
    async fn bulk_insert(&self, entities: &[E]) -> Result<()>;

    async fn find_by_id(&self, id: EntityIdRef<'_>) -> Result<E>;

    /// Every stored entity, in backend order
    async fn find_all(&self) -> Result<Vec<E>>;

    /// Overwrite the mutable fields of an existing entity
    async fn update(&self, entity: &E) -> Result<()>;

    async fn delete(&self, id: EntityIdRef<'_>) -> Result<()>;

    async fn search(&self, params: &SearchParams) -> Result<SearchResult<E>>;

    fn sortable_fields(&self) -> &'static [&'static str] {
        E::SORTABLE_FIELDS
    }
}

// =============================================================================
// IN-PROCESS SEARCH
// =============================================================================

pub fn apply_filter<E: SearchableEntity>(items: Vec<E>, filter: Option<&str>) -> Vec<E> {
    match filter {
        Some(filter) => items
            .into_iter()
            .filter(|item| item.matches_filter(filter))
            .collect(),
        None => items,
    }
}

/// Stable sort: entities with equal keys keep their incoming order
pub fn apply_sort<E: SearchableEntity>(mut items: Vec<E>, field: &str, dir: SortDirection) -> Vec<E> {
    items.sort_by(|a, b| {
        let ord = a.compare_field(b, field);
        match dir {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    items
}

pub fn apply_paginate<E>(items: Vec<E>, page: i64, per_page: i64) -> Vec<E> {
    let offset = usize::try_from((page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);
    let limit = usize::try_from(per_page).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(limit).collect()
}

/// filter -> sort -> count -> paginate over an in-memory snapshot
pub fn search_in_memory<E: SearchableEntity>(items: Vec<E>, params: &SearchParams) -> SearchResult<E> {
    let filtered = apply_filter(items, params.filter());
    let (field, dir) = params.resolve_sort(E::SORTABLE_FIELDS, E::DEFAULT_SORT);
    let sorted = apply_sort(filtered, field, dir);
    let total = sorted.len() as i64;
    let page = apply_paginate(sorted, params.page(), params.per_page());

    SearchResult::for_params(page, total, params)
}
