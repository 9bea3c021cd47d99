pub mod constants;
pub mod entity_id;
pub mod in_memory;
pub mod repository;
pub mod search;
pub mod types;
pub mod validation;
