//! Building blocks of the `knbn` command layer: relative date resolution
//! for sprint boundaries and multi-file board migration.

pub mod dates;
pub mod migrate;
