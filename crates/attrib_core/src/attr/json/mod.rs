//! JSON documents as attribute tables.
//!
//! A document is an object whose members each look like
//! `{"type": "<kind>", "value": <element or array of elements>}`. Vector and
//! matrix elements use their literal grammar strings, table elements are
//! objects of the same shape, and pointer elements can only be `null`.

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::attr::{AttrError, Attributed, Datum, Kind, ObjectRef, Result, ScopeId, Table};

/// Limits and switches for JSON loading.
#[derive(Debug, Clone, Copy)]
pub struct JsonOptions {
	/// Deepest nested table accepted; the document root is depth 0.
	pub max_depth: u32,
	/// Reject members whose `type` is not a known kind instead of skipping them.
	pub strict_kinds: bool,
}

impl Default for JsonOptions {
	fn default() -> Self {
		Self {
			max_depth: 32,
			strict_kinds: true,
		}
	}
}

impl JsonOptions {
	/// Preset that skips unrecognized members.
	pub fn lenient() -> Self {
		Self {
			strict_kinds: false,
			..Self::default()
		}
	}
}

#[derive(Deserialize)]
struct EntryJson {
	#[serde(rename = "type")]
	kind: String,
}

/// Parse `text` into a fresh table.
pub fn load_table(text: &str, options: &JsonOptions) -> Result<Table> {
	let document: JsonValue = serde_json::from_str(text)?;
	let mut table = Table::new();
	load_scope(&mut table, ScopeId::ROOT, as_members(&document, "$")?, options, "$", 0)?;
	debug!(scopes = table.scope_count(), entries = table.len(ScopeId::ROOT), "load json table");
	Ok(table)
}

/// Merge `text` into the table of a bound host.
///
/// Members naming prescribed attributes overwrite elements in place, so an
/// aliased cell only accepts as many elements as its host field holds. Other
/// members become auxiliary attributes. Table members add child scopes.
pub fn load_into(attributes: &mut Attributed, text: &str, options: &JsonOptions) -> Result<()> {
	let document: JsonValue = serde_json::from_str(text)?;
	let members = as_members(&document, "$")?;
	let auxiliary = members.keys().filter(|key| !attributes.is_prescribed_attribute(key)).count();
	load_scope(attributes.table_mut(), ScopeId::ROOT, members, options, "$", 0)?;
	debug!(members = members.len(), auxiliary, "load json into attributes");
	Ok(())
}

/// Encode `table` in the document format [`load_table`] reads.
///
/// Cells without a kind are left out. Non-null pointers encode as their
/// description and do not load back.
pub fn to_json(table: &Table) -> JsonValue {
	scope_to_json(table, ScopeId::ROOT)
}

fn as_members<'a>(value: &'a JsonValue, path: &str) -> Result<&'a Map<String, JsonValue>> {
	value.as_object().ok_or_else(|| shape(path, "expected an object of attributes"))
}

fn shape(path: &str, reason: impl Into<String>) -> AttrError {
	AttrError::JsonShape {
		path: path.to_owned(),
		reason: reason.into(),
	}
}

fn load_scope(table: &mut Table, scope: ScopeId, members: &Map<String, JsonValue>, options: &JsonOptions, path: &str, depth: u32) -> Result<()> {
	if depth > options.max_depth {
		return Err(shape(path, format!("nesting deeper than {}", options.max_depth)));
	}

	for (key, member) in members {
		let path = format!("{path}.{key}");
		let entry = EntryJson::deserialize(member).map_err(|err| shape(&path, err.to_string()))?;
		let kind = match entry.kind.parse::<Kind>() {
			Ok(kind) => kind,
			Err(_) if !options.strict_kinds => {
				debug!(path = %path, kind = %entry.kind, "skip unknown kind");
				continue;
			}
			Err(_) => return Err(shape(&path, format!("unknown kind `{}`", entry.kind))),
		};

		let items: Vec<&JsonValue> = match member.get("value") {
			None => Vec::new(),
			Some(JsonValue::Array(items)) => items.iter().collect(),
			Some(item) => vec![item],
		};

		if kind == Kind::Table {
			if items.is_empty() {
				table.append(scope, key)?.set_kind(Kind::Table)?;
			}
			for (index, item) in items.into_iter().enumerate() {
				let item_path = format!("{path}[{index}]");
				let child_members = as_members(item, &item_path)?;
				let child = table.append_scope(scope, key)?;
				load_scope(table, child, child_members, options, &item_path, depth + 1)?;
			}
			continue;
		}

		let datum = table.append(scope, key)?;
		datum.set_kind(kind)?;
		for (index, item) in items.into_iter().enumerate() {
			let text = element_text(kind, item).ok_or_else(|| shape(&format!("{path}[{index}]"), format!("expected {kind} element")))?;
			write_element(datum, kind, &text, index)?;
		}
	}
	Ok(())
}

fn element_text(kind: Kind, item: &JsonValue) -> Option<String> {
	match (kind, item) {
		(Kind::Integer, JsonValue::Number(number)) => number.as_i64().and_then(|value| i32::try_from(value).ok()).map(|value| value.to_string()),
		(Kind::Float, JsonValue::Number(number)) => number.as_f64().map(|value| format!("{:?}", value as f32)),
		(Kind::String | Kind::Vector | Kind::Matrix, JsonValue::String(text)) => Some(text.clone()),
		(Kind::Pointer, JsonValue::Null) => Some(ObjectRef::NULL.to_string()),
		(Kind::Pointer, JsonValue::String(text)) if text == "null" => Some(text.clone()),
		_ => None,
	}
}

fn write_element(datum: &mut Datum, kind: Kind, text: &str, index: usize) -> Result<()> {
	if index < datum.len() {
		datum.set_from_string(text, index)
	} else {
		datum.push_from_string(kind, text)
	}
}

fn scope_to_json(table: &Table, scope: ScopeId) -> JsonValue {
	let mut out = Map::new();
	for (key, datum) in table.entries(scope) {
		let kind = datum.kind();
		if kind == Kind::Unknown {
			continue;
		}
		let items: Vec<JsonValue> = (0..datum.len()).map(|index| element_to_json(table, datum, index)).collect();
		let value = match <[JsonValue; 1]>::try_from(items) {
			Ok([single]) => single,
			Err(items) => JsonValue::Array(items),
		};

		let mut entry = Map::new();
		entry.insert("type".to_owned(), serde_json::json!(kind.as_str()));
		entry.insert("value".to_owned(), value);
		out.insert(key.to_owned(), JsonValue::Object(entry));
	}
	JsonValue::Object(out)
}

fn element_to_json(table: &Table, datum: &Datum, index: usize) -> JsonValue {
	match datum.kind() {
		Kind::Integer => datum.get::<i32>(index).map(|value| serde_json::json!(*value)).unwrap_or(JsonValue::Null),
		Kind::Float => datum.get::<f32>(index).map(|value| serde_json::json!(*value)).unwrap_or(JsonValue::Null),
		Kind::Pointer => match datum.get::<ObjectRef>(index) {
			Ok(pointer) if !pointer.is_null() => serde_json::json!(pointer.to_string()),
			_ => JsonValue::Null,
		},
		Kind::Table => datum.scopes().get(index).map(|child| scope_to_json(table, *child)).unwrap_or(JsonValue::Null),
		Kind::Unknown => JsonValue::Null,
		Kind::String | Kind::Vector | Kind::Matrix => datum.to_string_at(index).map(JsonValue::String).unwrap_or(JsonValue::Null),
	}
}
