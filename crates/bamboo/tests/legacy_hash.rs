// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Legacy hash and fingerprint stability across identical and changed schemas.

use bamboo::hash::HashGenerator;
use bamboo::{legacy_hash, Field, Module, Numeric, NumericRange, Parameter, Subtype, TypeRef};

/// A small game schema, built the same way every time.
fn game_schema(heading_modulus: f64) -> Module {
    let mut module = Module::new();
    module.add_keyword("required");
    module.add_keyword("broadcast");
    module.add_keyword("ram");

    let mut heading = Numeric::new(Subtype::Int16).unwrap();
    heading.set_divisor(10).unwrap();
    heading.set_modulus(heading_modulus).unwrap();
    let heading = module.add_numeric(heading);

    let mut hp = Numeric::new(Subtype::Uint8).unwrap();
    hp.set_range(NumericRange::unsigned(0, 100)).unwrap();
    let hp = module.add_numeric(hp);

    let point = module.add_struct("Point").unwrap();
    module.add_field(point, Field::new("x", TypeRef::FLOAT64)).unwrap();
    module.add_field(point, Field::new("y", TypeRef::FLOAT64)).unwrap();

    let object = module.add_class("DistributedObject").unwrap();
    module
        .add_field(object, Field::new("zone", TypeRef::UINT32).with_keywords(["required", "ram"]))
        .unwrap();

    let avatar = module.add_class("Avatar").unwrap();
    module.add_parent(avatar, object).unwrap();
    module
        .add_field(avatar, Field::new("name", TypeRef::STRING).with_keyword("required"))
        .unwrap();
    module.add_field(avatar, Field::new("hp", hp)).unwrap();

    let set_pos = module.add_method();
    module
        .add_parameter(set_pos, Parameter::new("at", point))
        .unwrap();
    module
        .add_parameter(set_pos, Parameter::new("heading", heading))
        .unwrap();
    module
        .add_field(avatar, Field::new("setPos", set_pos).with_keyword("broadcast"))
        .unwrap();
    module
}

#[test]
fn test_legacy_hash_is_deterministic() {
    assert_eq!(legacy_hash(&game_schema(360.0)), legacy_hash(&game_schema(360.0)));
}

#[test]
fn test_legacy_hash_sees_constraints() {
    assert_ne!(legacy_hash(&game_schema(360.0)), legacy_hash(&game_schema(180.0)));
}

#[test]
fn test_legacy_hash_sees_declaration_order() {
    let build = |first: &str, second: &str| {
        let mut module = Module::new();
        module.add_struct(first).unwrap();
        module.add_struct(second).unwrap();
        legacy_hash(&module)
    };
    assert_ne!(build("A", "B"), build("B", "A"));
}

#[test]
fn test_legacy_hash_of_single_class() {
    let mut module = Module::new();
    let cls = module.add_class("C").unwrap();
    module
        .add_field(cls, Field::new("v", TypeRef::INT8).with_keyword("db"))
        .unwrap();

    // 1, one type | "C" | 0 parents | 1 field | db flag | int8, divisor 1
    let mut expected = HashGenerator::new();
    for i in [1, 1, 1, i32::from(b'C'), 0, 1, 0x0010, 0, 1] {
        expected.add_int(i);
    }
    assert_eq!(legacy_hash(&module), expected.hash());
}

#[cfg(feature = "fingerprint")]
#[test]
fn test_fingerprint_tracks_schema() {
    use bamboo::hash::fingerprint;

    let a = fingerprint(&game_schema(360.0));
    assert_eq!(a, fingerprint(&game_schema(360.0)));
    assert_ne!(a, fingerprint(&game_schema(180.0)));
    assert_eq!(a.to_string().len(), 32);
}
