use thiserror::Error;

use crate::attr::Kind;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, AttrError>;

/// Errors produced while manipulating cells, tables, schemas, and bound hosts.
#[derive(Debug, Error)]
pub enum AttrError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// JSON syntax or deserialization failure.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// JSON document was well-formed but did not describe a table.
	#[error("json shape at {path}: {reason}")]
	JsonShape {
		/// Dotted path of the offending member.
		path: String,
		/// What was wrong with it.
		reason: String,
	},
	/// Cell kind was already fixed to something else.
	#[error("kind already set to {current}, cannot change to {requested}")]
	KindAlreadySet {
		/// Kind the cell holds.
		current: Kind,
		/// Kind the caller asked for.
		requested: Kind,
	},
	/// Cell was accessed through the wrong element type.
	#[error("kind mismatch: expected {expected}, got {got}")]
	KindMismatch {
		/// Kind the caller asked for.
		expected: Kind,
		/// Kind the cell holds.
		got: Kind,
	},
	/// Operation needs a cell whose kind is already set.
	#[error("cell kind is not set")]
	KindUnset,
	/// Size-changing operation on a cell that aliases host storage.
	#[error("cannot {op} aliased storage")]
	AliasedStorage {
		/// Rejected operation name.
		op: &'static str,
	},
	/// Host slot was borrowed elsewhere while a cell tried to write it.
	#[error("host slot is borrowed, cannot write element {index}")]
	SlotBorrowed {
		/// Element the write targeted.
		index: usize,
	},
	/// External storage had no elements.
	#[error("cannot alias empty external storage")]
	EmptyExternal,
	/// Table-kind cells are edited through their owning table only.
	#[error("cannot {op} a table-kind cell directly")]
	ScopeCellManaged {
		/// Rejected operation name.
		op: &'static str,
	},
	/// Index at or beyond the cell length.
	#[error("index {index} out of range (len={len})")]
	IndexOutOfRange {
		/// Requested index.
		index: usize,
		/// Cell length.
		len: usize,
	},
	/// Adoption would make a scope its own ancestor.
	#[error("adopting scope {child} under {parent} would create a cycle")]
	AdoptCycle {
		/// Scope being adopted.
		child: String,
		/// Scope that would own it.
		parent: String,
	},
	/// Key already holds a cell of an incompatible kind.
	#[error("key {key} already holds {kind} data")]
	KeyKindConflict {
		/// Offending key.
		key: String,
		/// Kind the existing cell holds.
		kind: Kind,
	},
	/// Auxiliary attribute name collides with a prescribed attribute.
	#[error("{key} is a prescribed attribute")]
	PrescribedCollision {
		/// Offending key.
		key: String,
	},
	/// Scope handle no longer refers to a live scope.
	#[error("stale scope handle {scope}")]
	StaleScope {
		/// Rendered handle.
		scope: String,
	},
	/// Dotted scope path did not lead to a live scope.
	#[error("scope path `{path}`: {reason}")]
	ScopePath {
		/// Path as given.
		path: String,
		/// Which segment failed and how.
		reason: String,
	},
	/// Parent type was not registered before its derived type.
	#[error("parent type {parent} is not registered (composing {type_name})")]
	ParentNotRegistered {
		/// Derived type name.
		type_name: &'static str,
		/// Missing parent type name.
		parent: &'static str,
	},
	/// Type has no registered signatures.
	#[error("type {type_name} is not registered")]
	TypeNotRegistered {
		/// Requested type name.
		type_name: &'static str,
	},
	/// Signature accessor could not find its declaring type in the host.
	#[error("signature {name} does not apply to host {host}")]
	HostMismatch {
		/// Signature name.
		name: String,
		/// Host type name.
		host: &'static str,
	},
	/// Host slot length differs from the signature element count.
	#[error("signature {name} expects {expected} elements, host slot has {got}")]
	BindLengthMismatch {
		/// Signature name.
		name: String,
		/// Declared element count.
		expected: usize,
		/// Slot length.
		got: usize,
	},
	/// Text did not match the literal grammar of its kind.
	#[error("invalid {kind} literal: {input:?}")]
	InvalidLiteral {
		/// Target kind.
		kind: Kind,
		/// Rejected text.
		input: String,
	},
	/// Kind has no textual form to parse.
	#[error("{kind} values cannot be parsed from text")]
	ParseUnsupported {
		/// Target kind.
		kind: Kind,
	},
}
