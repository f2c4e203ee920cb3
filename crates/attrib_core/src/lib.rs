//! Dynamic attribute tables: typed value cells, scope trees, and schema-driven binding of host fields.

/// Value cells, tables, schemas, bound hosts, and the JSON bridge.
pub mod attr;
