mod attributed;
mod datum;
mod error;
mod json;
mod kind;
mod math;
mod object;
mod schema;
mod slot;
mod table;

/// Host trait, per-instance attribute tables, and binding entry points.
pub use attributed::{Attributed, Host, assign_host, bind, clone_host, rebind, resolve_host};
/// Typed value cells and their element types.
pub use datum::{Datum, ElemRef, Element, GrowthPolicy, default_growth};
/// Error and result aliases.
pub use error::{AttrError, Result};
/// JSON document loading and encoding.
pub use json::{JsonOptions, load_into, load_table, to_json};
/// Closed set of value kinds.
pub use kind::Kind;
/// Vector and matrix element types.
pub use math::{Mat4, Vec4};
/// Shared object handles stored in pointer cells.
pub use object::{Object, ObjectRef};
/// Type registry of attribute signatures.
pub use schema::{Schema, SchemaRegistry, Signature};
/// Shared host field storage.
pub use slot::Slot;
/// Scope trees and their rendering.
pub use table::{RenderOptions, SELF_KEY, ScopeId, Table};
