/// Page used when the request omits or mangles `page`
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the request omits or mangles `per_page`
pub const DEFAULT_PER_PAGE: i64 = 15;

/// Upper bound on rows written by a single multi-row INSERT
pub const BULK_INSERT_CHUNK_SIZE: usize = 1000;
