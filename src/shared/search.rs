//! Canonical request/response pair for paginated, filtered, sorted queries.
//!
//! [`SearchParams`] never fails to build: anything it cannot make sense of
//! falls back to the defaults in [`crate::shared::constants`].

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE, DEFAULT_PER_PAGE};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Lenient parse: only a case-insensitive "desc" yields `Desc`
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "desc" => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

// =============================================================================
// INPUT
// =============================================================================

/// Raw, untrusted search input as it arrives from a query string or JSON body.
/// Every field is kept as text so that junk can be coerced instead of rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchInput {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "lenient_string")]
    pub page: Option<String>,

    /// Items per page (default: 15)
    #[serde(default, deserialize_with = "lenient_string")]
    pub per_page: Option<String>,

    /// Field to sort by (`name` or `created_at`)
    #[serde(default, deserialize_with = "lenient_string")]
    pub sort: Option<String>,

    /// Sort direction (`asc` or `desc`), only used together with `sort`
    #[serde(default, deserialize_with = "lenient_string")]
    pub sort_dir: Option<String>,

    /// Case-insensitive substring matched against the name
    #[serde(default, deserialize_with = "lenient_string")]
    pub filter: Option<String>,
}

impl SearchInput {
    pub fn page(mut self, page: impl ToString) -> Self {
        self.page = Some(page.to_string());
        self
    }

    pub fn per_page(mut self, per_page: impl ToString) -> Self {
        self.per_page = Some(per_page.to_string());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn sort_dir(mut self, sort_dir: impl Into<String>) -> Self {
        self.sort_dir = Some(sort_dir.into());
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Accepts strings, numbers, booleans and null, keeping everything as text
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientString;

    impl<'de> Visitor<'de> for LenientString {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string, number, boolean or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(LenientString)
        }
    }

    deserializer.deserialize_any(LenientString)
}

// =============================================================================
// PARAMS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    page: i64,
    per_page: i64,
    sort: Option<String>,
    sort_dir: Option<SortDirection>,
    filter: Option<String>,
}

impl SearchParams {
    pub fn new(input: SearchInput) -> Self {
        let sort = input
            .sort
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // Direction only means something next to a sort field
        let sort_dir = sort
            .as_ref()
            .map(|_| SortDirection::parse_lenient(input.sort_dir.as_deref()));

        let filter = input.filter.filter(|f| !f.is_empty());

        Self {
            page: positive_or(input.page.as_deref(), DEFAULT_PAGE),
            per_page: positive_or(input.per_page.as_deref(), DEFAULT_PER_PAGE),
            sort,
            sort_dir,
            filter,
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn sort_dir(&self) -> Option<SortDirection> {
        self.sort_dir
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Rows skipped before the current page
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// The sort to apply given a repository's whitelist, or `fallback` when
    /// no (or an unsupported) field was requested.
    pub fn resolve_sort<'a>(
        &'a self,
        sortable_fields: &[&str],
        fallback: (&'a str, SortDirection),
    ) -> (&'a str, SortDirection) {
        match self.sort.as_deref() {
            Some(field) if sortable_fields.contains(&field) => {
                (field, self.sort_dir.unwrap_or_default())
            }
            _ => fallback,
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::new(SearchInput::default())
    }
}

impl From<SearchInput> for SearchParams {
    fn from(input: SearchInput) -> Self {
        Self::new(input)
    }
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

// =============================================================================
// RESULT
// =============================================================================

pub struct SearchResultProps<E> {
    pub items: Vec<E>,
    pub total: i64,
    pub current_page: i64,
    pub per_page: i64,
    pub sort: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub filter: Option<String>,
}

/// One page of entities. `last_page` is always derived from `total` and
/// `per_page`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<E> {
    items: Vec<E>,
    total: i64,
    current_page: i64,
    per_page: i64,
    last_page: i64,
    sort: Option<String>,
    sort_dir: Option<SortDirection>,
    filter: Option<String>,
}

impl<E> SearchResult<E> {
    pub fn new(props: SearchResultProps<E>) -> Self {
        let per_page = props.per_page.max(1);
        Self {
            last_page: last_page(props.total, per_page),
            items: props.items,
            total: props.total,
            current_page: props.current_page,
            per_page,
            sort: props.sort,
            sort_dir: props.sort_dir,
            filter: props.filter,
        }
    }

    /// Result for `items` found with `params`, echoing the request
    pub fn for_params(items: Vec<E>, total: i64, params: &SearchParams) -> Self {
        Self::new(SearchResultProps {
            items,
            total,
            current_page: params.page(),
            per_page: params.per_page(),
            sort: params.sort.clone(),
            sort_dir: params.sort_dir,
            filter: params.filter.clone(),
        })
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn into_items(self) -> Vec<E> {
        self.items
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn last_page(&self) -> i64 {
        self.last_page
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn sort_dir(&self) -> Option<SortDirection> {
        self.sort_dir
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }
}

impl<E: Serialize> SearchResult<E> {
    /// JSON form of the page. With `include_items == false` the `items` key
    /// is left out, so two results can be compared on metadata alone.
    pub fn to_json(&self, include_items: bool) -> Value {
        let mut value = json!({
            "total": self.total,
            "current_page": self.current_page,
            "per_page": self.per_page,
            "last_page": self.last_page,
            "sort": self.sort,
            "sort_dir": self.sort_dir,
            "filter": self.filter,
        });

        if include_items {
            value["items"] = serde_json::to_value(&self.items).unwrap_or(Value::Null);
        }

        value
    }
}

fn last_page(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        return 1;
    }
    // Ceiling division that stays in range for any positive per_page
    (total - 1) / per_page + 1
}
