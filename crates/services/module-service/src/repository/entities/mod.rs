//! SeaORM entities for modules, migration records and pages.

pub mod migration_record;
pub mod module;
pub mod page;
