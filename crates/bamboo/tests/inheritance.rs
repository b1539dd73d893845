// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Class hierarchies: field flattening, shadowing, diamonds, late parent
// links, cycle rejection and molecular fields.

use bamboo::{Datagram, DatagramIterator, Field, FieldId, Module, Parameter, SchemaError, TypeRef, Value};

fn field_names(module: &Module, class: TypeRef) -> Vec<String> {
    module
        .type_of(class)
        .and_then(|t| t.as_struct())
        .map(|s| {
            s.fields()
                .iter()
                .filter_map(|id| module.field_by_id(*id))
                .map(|f| f.name().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn set_xyz_method(module: &mut Module) -> TypeRef {
    let method = module.add_method();
    for name in ["x", "y", "z"] {
        module
            .add_parameter(method, Parameter::new(name, TypeRef::FLOAT32))
            .unwrap();
    }
    method
}

#[test]
fn test_child_inherits_parent_fields_in_id_order() {
    let mut module = Module::new();
    let object = module.add_class("DistributedObject").unwrap();
    let node = module.add_class("DistributedNode").unwrap();

    module.add_field(object, Field::new("zone", TypeRef::UINT32)).unwrap();
    module.add_field(node, Field::new("name", TypeRef::STRING)).unwrap();
    module.add_parent(node, object).unwrap();

    assert_eq!(field_names(&module, node), ["zone", "name"]);
    assert!(module.is_ancestor(object, node));

    // Fields added to the parent later reach the child.
    module.add_field(object, Field::new("owner", TypeRef::UINT32)).unwrap();
    assert_eq!(field_names(&module, node), ["zone", "name", "owner"]);
    assert_eq!(module.num_fields(), 3);
}

#[test]
fn test_declared_field_shadows_inherited() {
    let mut module = Module::new();
    let base = module.add_class("Base").unwrap();
    let derived = module.add_class("Derived").unwrap();
    module.add_field(base, Field::new("pos", TypeRef::INT16)).unwrap();
    module.add_parent(derived, base).unwrap();

    let own = module.add_field(derived, Field::new("pos", TypeRef::INT32)).unwrap();
    assert_eq!(module.field_by_name(derived, "pos").map(Field::id), Some(own));
    assert_eq!(module.fixed_size(derived), 4);
    assert_eq!(module.fixed_size(base), 2);

    // Declaring the same name twice in one class is still a conflict.
    assert!(matches!(
        module.add_field(derived, Field::new("pos", TypeRef::INT8)),
        Err(SchemaError::NameConflict { .. })
    ));
}

#[test]
fn test_diamond_keeps_one_copy() {
    let mut module = Module::new();
    let root = module.add_class("Root").unwrap();
    let left = module.add_class("Left").unwrap();
    let right = module.add_class("Right").unwrap();
    let leaf = module.add_class("Leaf").unwrap();

    module.add_field(root, Field::new("id", TypeRef::UINT32)).unwrap();
    module.add_field(left, Field::new("l", TypeRef::UINT8)).unwrap();
    module.add_field(right, Field::new("r", TypeRef::UINT8)).unwrap();
    module.add_parent(left, root).unwrap();
    module.add_parent(right, root).unwrap();
    module.add_parent(leaf, left).unwrap();
    module.add_parent(leaf, right).unwrap();

    assert_eq!(field_names(&module, leaf), ["id", "l", "r"]);
    assert_eq!(module.fixed_size(leaf), 6);
}

#[test]
fn test_first_parent_wins_name_clash() {
    let mut module = Module::new();
    let a = module.add_class("A").unwrap();
    let b = module.add_class("B").unwrap();
    let c = module.add_class("C").unwrap();
    let from_a = module.add_field(a, Field::new("value", TypeRef::UINT8)).unwrap();
    module.add_field(b, Field::new("value", TypeRef::UINT64)).unwrap();

    module.add_parent(c, a).unwrap();
    module.add_parent(c, b).unwrap();
    assert_eq!(module.field_by_name(c, "value").map(Field::id), Some(from_a));
    assert_eq!(module.fixed_size(c), 1);
}

#[test]
fn test_cycles_and_duplicate_parents_are_rejected() {
    let mut module = Module::new();
    let a = module.add_class("A").unwrap();
    let b = module.add_class("B").unwrap();
    let c = module.add_class("C").unwrap();
    module.add_parent(b, a).unwrap();
    module.add_parent(c, b).unwrap();

    assert!(matches!(
        module.add_parent(a, c),
        Err(SchemaError::InheritanceCycle { .. })
    ));
    assert!(matches!(
        module.add_parent(a, a),
        Err(SchemaError::InheritanceCycle { .. })
    ));
    assert!(matches!(
        module.add_parent(c, a),
        Err(SchemaError::DuplicateParent { .. })
    ));

    let cls = module.type_of(a).and_then(|t| t.as_class()).unwrap();
    assert_eq!(cls.num_parents(), 0);
    assert_eq!(cls.num_children(), 1);
}

/// Base, Derived and a Holder struct with a `Derived` field.
fn holder_schema() -> (Module, TypeRef, TypeRef, TypeRef) {
    let mut module = Module::new();
    let base = module.add_class("Base").unwrap();
    let derived = module.add_class("Derived").unwrap();
    let holder = module.add_struct("Holder").unwrap();
    module.add_field(holder, Field::new("derived", derived)).unwrap();
    (module, base, derived, holder)
}

#[test]
fn test_parent_link_cannot_make_class_contain_itself() {
    let (mut module, base, derived, holder) = holder_schema();
    module.add_field(base, Field::new("holder", holder)).unwrap();

    // Derived would inherit Holder, which holds a Derived.
    assert!(matches!(
        module.add_parent(derived, base),
        Err(SchemaError::InvalidType { .. })
    ));
    let cls = module.type_of(derived).and_then(|t| t.as_class()).unwrap();
    assert_eq!(cls.num_parents(), 0);
    assert!(field_names(&module, derived).is_empty());
    assert_eq!(module.type_of(base).and_then(|t| t.as_class()).unwrap().num_children(), 0);
    assert_eq!(module.fixed_size(holder), 0);
}

#[test]
fn test_parent_field_cannot_make_child_contain_itself() {
    let (mut module, base, derived, holder) = holder_schema();
    module.add_parent(derived, base).unwrap();

    assert!(matches!(
        module.add_field(base, Field::new("holder", holder)),
        Err(SchemaError::InvalidType { .. })
    ));
    assert_eq!(module.num_fields(), 1);
    assert!(field_names(&module, base).is_empty());
    assert!(field_names(&module, derived).is_empty());

    // Unrelated fields still reach the child.
    module.add_field(base, Field::new("hp", TypeRef::UINT16)).unwrap();
    assert_eq!(field_names(&module, derived), ["hp"]);
    assert_eq!(module.fixed_size(holder), 2);
}

#[test]
fn test_retyping_inherited_field_cannot_make_child_contain_itself() {
    let (mut module, base, derived, holder) = holder_schema();
    let hp = module.add_field(base, Field::new("hp", TypeRef::UINT16)).unwrap();
    module.add_parent(derived, base).unwrap();

    assert!(matches!(
        module.set_field_type(hp, holder),
        Err(SchemaError::InvalidType { .. })
    ));
    assert_eq!(module.field_by_id(hp).map(Field::ty), Some(TypeRef::UINT16));
    assert_eq!(module.fixed_size(derived), 2);
}

#[test]
fn test_molecular_field() {
    let mut module = Module::new();
    let avatar = module.add_class("Avatar").unwrap();
    let set_xyz = set_xyz_method(&mut module);
    let set_h = module.add_method();
    module
        .add_parameter(set_h, Parameter::new("h", TypeRef::INT16))
        .unwrap();

    let xyz = module
        .add_field(avatar, Field::new("setXYZ", set_xyz).with_keyword("broadcast"))
        .unwrap();
    let h = module
        .add_field(avatar, Field::new("setH", set_h).with_keyword("broadcast"))
        .unwrap();
    let pos = module.add_molecular(avatar, "setPos", &[xyz, h]).unwrap();

    let molecular = module.field_by_id(pos).unwrap();
    assert!(molecular.is_molecular());
    assert!(molecular.has_keyword("broadcast"));
    assert_eq!(molecular.atomics(), Some(&[xyz, h][..]));

    // Moleculars are listed but do not change the class's wire layout.
    assert_eq!(field_names(&module, avatar), ["setXYZ", "setH", "setPos"]);
    assert_eq!(module.fixed_size(avatar), 12 + 2);
    assert_eq!(module.fixed_size(molecular.ty()), 14);
}

#[test]
fn test_molecular_keyword_mismatch() {
    let mut module = Module::new();
    let avatar = module.add_class("Avatar").unwrap();
    let a = module
        .add_field(avatar, Field::new("a", TypeRef::UINT8).with_keyword("ram"))
        .unwrap();
    let b = module
        .add_field(avatar, Field::new("b", TypeRef::UINT8).with_keyword("db"))
        .unwrap();
    let before = module.num_fields();
    assert!(matches!(
        module.add_molecular(avatar, "ab", &[a, b]),
        Err(SchemaError::KeywordMismatch { .. })
    ));
    assert_eq!(module.num_fields(), before);
    assert!(module.add_molecular(avatar, "none", &[FieldId::UNASSIGNED]).is_err());
}

#[test]
fn test_class_value_round_trip() {
    let mut module = Module::new();
    let object = module.add_class("DistributedObject").unwrap();
    let avatar = module.add_class("Avatar").unwrap();
    module.add_field(object, Field::new("zone", TypeRef::UINT32)).unwrap();
    module.add_parent(avatar, object).unwrap();
    module.add_field(avatar, Field::new("name", TypeRef::STRING)).unwrap();

    let value = Value::Struct(vec![Value::Uint(2000), Value::from("Flippy")]);
    let mut dg = Datagram::new();
    dg.add_value(&module, avatar, &value).unwrap();

    let mut it = DatagramIterator::new(&dg);
    assert_eq!(it.read_uint32(), Ok(2000));
    assert_eq!(it.read_string().as_deref(), Ok("Flippy"));

    let mut it = DatagramIterator::new(&dg);
    assert_eq!(it.read_value(&module, avatar), Ok(value));
}

#[test]
fn test_constructor_is_not_a_wire_field() {
    let mut module = Module::new();
    let avatar = module.add_class("Avatar").unwrap();
    let ctor = set_xyz_method(&mut module);
    module.set_constructor(avatar, Field::new("Avatar", ctor)).unwrap();
    assert_eq!(module.fixed_size(avatar), 0);
    assert_eq!(module.wire_fields(avatar).count(), 0);
    let cls = module.type_of(avatar).and_then(|t| t.as_class()).unwrap();
    assert!(cls.has_constructor());
}
