use std::any::{Any, TypeId};

use super::{Signature, SchemaRegistry};
use crate::attr::{AttrError, Attributed, Host, Kind, Slot};

struct Base {
	attributes: Attributed,
	health: Slot<i32>,
}

impl Host for Base {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn attributes(&self) -> &Attributed {
		&self.attributes
	}

	fn attributes_mut(&mut self) -> &mut Attributed {
		&mut self.attributes
	}
}

struct Derived {
	base: Base,
	speed: Slot<f32>,
}

impl Host for Derived {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn base(&self) -> Option<&dyn Host> {
		Some(&self.base)
	}

	fn attributes(&self) -> &Attributed {
		self.base.attributes()
	}

	fn attributes_mut(&mut self) -> &mut Attributed {
		self.base.attributes_mut()
	}
}

fn names(registry: &SchemaRegistry, id: TypeId) -> Vec<String> {
	let schema = registry.get_by_id(id).expect("registered");
	schema.signatures.iter().map(|signature| signature.name.to_string()).collect()
}

fn base_signatures() -> Vec<Signature> {
	vec![Signature::field::<Base, i32>("health", 1, |host| &host.health), Signature::table("children", 0)]
}

#[test]
fn field_signature_takes_kind_from_element_type() {
	let signature = Signature::field::<Derived, f32>("speed", 1, |host| &host.speed);
	assert_eq!(signature.kind, Kind::Float);
	assert_eq!(signature.count, 1);
	assert!(signature.is_aliased());
	assert!(!Signature::table("children", 0).is_aliased());
}

#[test]
fn add_refuses_duplicates() {
	let mut registry = SchemaRegistry::new();
	assert!(registry.add::<Base>(base_signatures()));
	assert!(!registry.add::<Base>(Vec::new()));
	assert_eq!(registry.get::<Base>().expect("base").signatures.len(), 2);
	assert_eq!(registry.len(), 1);
}

#[test]
fn derived_schema_lists_own_signatures_then_parent() {
	let mut registry = SchemaRegistry::new();
	registry.add::<Base>(base_signatures());
	registry
		.add_with_parent::<Derived, Base>(vec![Signature::field::<Derived, f32>("speed", 1, |host| &host.speed)])
		.expect("parent present");

	assert_eq!(names(&registry, TypeId::of::<Derived>()), vec!["speed", "health", "children"]);
	let schema = registry.get::<Derived>().expect("derived");
	assert_eq!(schema.parent, Some(TypeId::of::<Base>()));
	assert!(schema.type_name.ends_with("Derived"));
}

#[test]
fn derived_schema_requires_parent() {
	let mut registry = SchemaRegistry::new();
	let err = registry.add_with_parent::<Derived, Base>(Vec::new()).expect_err("parent missing");
	assert!(matches!(err, AttrError::ParentNotRegistered { .. }));
	assert!(!registry.contains::<Derived>());
}

#[test]
fn derived_schema_rejects_names_shared_with_parent() {
	let mut registry = SchemaRegistry::new();
	registry.add::<Base>(base_signatures());
	let err = registry
		.add_with_parent::<Derived, Base>(vec![Signature::field::<Derived, f32>("health", 1, |host| &host.speed)])
		.expect_err("health is inherited");
	assert!(matches!(err, AttrError::PrescribedCollision { ref key } if key == "health"));
	assert!(!registry.contains::<Derived>());
}

#[test]
fn derived_schema_keeps_parent_snapshot() {
	let mut registry = SchemaRegistry::new();
	registry.add::<Base>(base_signatures());
	registry.add_with_parent::<Derived, Base>(Vec::new()).expect("parent present");
	assert!(registry.remove::<Base>());
	assert!(!registry.remove::<Base>());
	assert_eq!(names(&registry, TypeId::of::<Derived>()), vec!["health", "children"]);
}

#[test]
fn get_reports_unregistered_type() {
	let registry = SchemaRegistry::new();
	assert!(matches!(registry.get::<Base>(), Err(AttrError::TypeNotRegistered { .. })));
	assert!(registry.get_by_id(TypeId::of::<Base>()).is_none());
}

#[test]
fn clear_empties_registry() {
	let mut registry = SchemaRegistry::new();
	registry.add::<Base>(base_signatures());
	registry.add_with_parent::<Derived, Base>(Vec::new()).expect("parent present");
	assert_eq!(registry.all().len(), 2);
	registry.clear();
	assert!(registry.is_empty());
	assert!(!registry.contains::<Base>());
}
