use std::marker::PhantomData;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::shared::entity_id::{EntityIdRef, UniqueEntityId};
use crate::shared::repository::{search_in_memory, SearchableEntity, SearchableRepository};
use crate::shared::search::{SearchParams, SearchResult};

/// Repository over an ordered `Vec`, owned by this instance only.
///
/// Each call holds the lock for its own duration; there is no coordination
/// across calls, so interleaved read-modify-write sequences can race.
pub struct InMemoryRepository<E> {
    items: RwLock<Vec<E>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: SearchableEntity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            _entity: PhantomData,
        }
    }

    fn position(items: &[E], id: Option<UniqueEntityId>) -> Option<usize> {
        let id = id?;
        items.iter().position(|item| item.entity_id() == id)
    }
}

impl<E: SearchableEntity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: SearchableEntity> SearchableRepository<E> for InMemoryRepository<E> {
    async fn insert(&self, entity: &E) -> Result<()> {
        let mut items = self.items.write().await;
        let id = entity.entity_id();
        if Self::position(&items, Some(id)).is_some() {
            return Err(AppError::Conflict(format!(
                "Entity with ID {} already exists",
                id
            )));
        }
        items.push(entity.clone());
        Ok(())
    }

    async fn bulk_insert(&self, entities: &[E]) -> Result<()> {
        let mut items = self.items.write().await;

        // Reject the whole batch before touching the collection
        for (index, entity) in entities.iter().enumerate() {
            let id = entity.entity_id();
            let repeated_in_batch = entities[..index].iter().any(|e| e.entity_id() == id);
            if repeated_in_batch || Self::position(&items, Some(id)).is_some() {
                return Err(AppError::Conflict(format!(
                    "Entity with ID {} already exists",
                    id
                )));
            }
        }

        items.extend(entities.iter().cloned());
        Ok(())
    }

    async fn find_by_id(&self, id: EntityIdRef<'_>) -> Result<E> {
        let items = self.items.read().await;
        Self::position(&items, id.resolve())
            .map(|index| items[index].clone())
            .ok_or_else(|| AppError::entity_not_found(id))
    }

    async fn find_all(&self) -> Result<Vec<E>> {
        Ok(self.items.read().await.clone())
    }

    async fn update(&self, entity: &E) -> Result<()> {
        let mut items = self.items.write().await;
        let id = entity.entity_id();
        let index = Self::position(&items, Some(id)).ok_or_else(|| AppError::entity_not_found(id))?;
        items[index] = entity.clone();
        Ok(())
    }

    async fn delete(&self, id: EntityIdRef<'_>) -> Result<()> {
        let mut items = self.items.write().await;
        let index = Self::position(&items, id.resolve()).ok_or_else(|| AppError::entity_not_found(id))?;
        items.remove(index);
        Ok(())
    }

    async fn search(&self, params: &SearchParams) -> Result<SearchResult<E>> {
        let snapshot = self.items.read().await.clone();
        Ok(search_in_memory(snapshot, params))
    }
}
