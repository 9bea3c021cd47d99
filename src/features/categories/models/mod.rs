pub mod category;
#[cfg(test)]
pub mod category_fake;

pub use category::{Category, CategoryProperties, NAME_MAX_LENGTH};
#[cfg(test)]
pub use category_fake::CategoryFakeBuilder;
