//! Test fixtures for categories.

use chrono::{DateTime, Duration, Utc};
use fake::faker::lorem::en::{Paragraph, Word};
use fake::Fake;

use crate::features::categories::models::{Category, CategoryProperties};
use crate::shared::entity_id::UniqueEntityId;

type IndexFn<T> = Box<dyn Fn(usize) -> T>;

/// Builds one or many valid categories with random names unless overridden.
pub struct CategoryFakeBuilder {
    count: usize,
    id: Option<IndexFn<UniqueEntityId>>,
    name: IndexFn<String>,
    description: IndexFn<Option<String>>,
    is_active: bool,
    created_at: Option<IndexFn<DateTime<Utc>>>,
}

impl CategoryFakeBuilder {
    pub fn a_category() -> Self {
        Self::the_categories(1)
    }

    pub fn the_categories(count: usize) -> Self {
        Self {
            count,
            id: None,
            name: Box::new(|_| Word().fake::<String>()),
            description: Box::new(|_| Some(Paragraph(1..3).fake::<String>())),
            is_active: true,
            created_at: None,
        }
    }

    pub fn with_id(mut self, id: UniqueEntityId) -> Self {
        self.id = Some(Box::new(move |_| id));
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = Box::new(move |_| name.clone());
        self
    }

    pub fn with_name_fn(mut self, f: impl Fn(usize) -> String + 'static) -> Self {
        self.name = Box::new(f);
        self
    }

    pub fn with_description(mut self, description: Option<&str>) -> Self {
        let description = description.map(str::to_string);
        self.description = Box::new(move |_| description.clone());
        self
    }

    pub fn deactivate(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn with_created_at_fn(mut self, f: impl Fn(usize) -> DateTime<Utc> + 'static) -> Self {
        self.created_at = Some(Box::new(f));
        self
    }

    /// Each entity is `index` milliseconds newer than the previous one
    pub fn with_incremented_created_at(self) -> Self {
        let base = Utc::now() - Duration::days(1);
        self.with_created_at_fn(move |index| base + Duration::milliseconds(index as i64))
    }

    pub fn build(self) -> Category {
        self.build_many()
            .into_iter()
            .next()
            .expect("builder always produces at least one category")
    }

    pub fn build_many(self) -> Vec<Category> {
        (0..self.count.max(1))
            .map(|index| {
                let properties = CategoryProperties {
                    name: (self.name)(index),
                    description: (self.description)(index),
                    is_active: Some(self.is_active),
                    created_at: self.created_at.as_ref().map(|f| f(index)),
                };
                let id = self.id.as_ref().map(|f| f(index));
                Category::new(properties, id).expect("fake category must be valid")
            })
            .collect()
    }
}
