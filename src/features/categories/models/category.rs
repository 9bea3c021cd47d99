use std::cmp::Ordering;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

use crate::core::error::{AppError, Result};
use crate::shared::entity_id::UniqueEntityId;
use crate::shared::repository::SearchableEntity;
use crate::shared::search::SortDirection;
use crate::shared::validation::{self, FieldErrors};

pub const NAME_MAX_LENGTH: usize = 255;

/// Constructor input. Missing optional values take their defaults.
#[derive(Debug, Clone, Default)]
pub struct CategoryProperties {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CategoryProperties {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct CategoryProps {
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

/// Category aggregate. The identifier and creation time never change; the
/// remaining attributes only move through validated mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    id: UniqueEntityId,
    #[serde(flatten)]
    props: CategoryProps,
}

impl Category {
    pub fn new(properties: CategoryProperties, id: Option<UniqueEntityId>) -> Result<Self> {
        // Stored timestamps keep microseconds, so the entity does too
        let created_at = properties
            .created_at
            .unwrap_or_else(Utc::now)
            .trunc_subsecs(6);

        let props = CategoryProps {
            name: properties.name,
            description: properties.description,
            is_active: properties.is_active.unwrap_or(true),
            created_at,
        };
        validate(&props).map_err(AppError::EntityValidation)?;

        Ok(Self {
            id: id.unwrap_or_default(),
            props,
        })
    }

    pub fn id(&self) -> UniqueEntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.props.name
    }

    pub fn description(&self) -> Option<&str> {
        self.props.description.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.props.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.props.created_at
    }

    pub fn update(&mut self, name: impl Into<String>, description: Option<String>) -> Result<()> {
        let next = CategoryProps {
            name: name.into(),
            description,
            ..self.props.clone()
        };
        self.commit(next)
    }

    pub fn activate(&mut self) -> Result<()> {
        let next = CategoryProps {
            is_active: true,
            ..self.props.clone()
        };
        self.commit(next)
    }

    pub fn deactivate(&mut self) -> Result<()> {
        let next = CategoryProps {
            is_active: false,
            ..self.props.clone()
        };
        self.commit(next)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id.to_string(),
            "name": self.props.name,
            "description": self.props.description,
            "is_active": self.props.is_active,
            "created_at": self.props.created_at,
        })
    }

    fn commit(&mut self, next: CategoryProps) -> Result<()> {
        validate(&next).map_err(AppError::EntityValidation)?;
        self.props = next;
        Ok(())
    }
}

fn validate(props: &CategoryProps) -> std::result::Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    validation::not_empty(&mut errors, "name", &props.name);
    validation::max_length(&mut errors, "name", &props.name, NAME_MAX_LENGTH);
    errors.into_result()
}

impl SearchableEntity for Category {
    const SORTABLE_FIELDS: &'static [&'static str] = &["name", "created_at"];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("created_at", SortDirection::Desc);

    fn entity_id(&self) -> UniqueEntityId {
        self.id
    }

    /// Unicode lowercase folding. PostgreSQL `ILIKE` folds by the database
    /// ctype instead, so the backends only agree exactly on ASCII names.
    fn matches_filter(&self, filter: &str) -> bool {
        self.props
            .name
            .to_lowercase()
            .contains(&filter.to_lowercase())
    }

    fn compare_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "name" => self.props.name.cmp(&other.props.name),
            "created_at" => self.props.created_at.cmp(&other.props.created_at),
            _ => Ordering::Equal,
        }
    }
}
