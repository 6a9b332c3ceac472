use skiff_core::SqlWriter;

/// Sqlite accepts the portable spelling for everything the default methods
/// produce, including `@name` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteSqlWriter {}

impl SqlWriter for SqliteSqlWriter {}
