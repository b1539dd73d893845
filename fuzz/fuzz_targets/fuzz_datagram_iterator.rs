// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use bamboo::{DatagramIterator, Field, Module, NumericRange, TypeRef};
use libfuzzer_sys::fuzz_target;

fn schema() -> Option<(Module, TypeRef)> {
    let mut module = Module::new();
    let point = module.add_struct("Point").ok()?;
    module.add_field(point, Field::new("x", TypeRef::INT16)).ok()?;
    module.add_field(point, Field::new("y", TypeRef::INT16)).ok()?;
    let path = module.add_array(point, NumericRange::unbounded()).ok()?;

    let avatar = module.add_class("Avatar").ok()?;
    module.add_field(avatar, Field::new("name", TypeRef::STRING)).ok()?;
    module.add_field(avatar, Field::new("path", path)).ok()?;
    module.add_field(avatar, Field::new("data", TypeRef::BLOB)).ok()?;
    Some((module, avatar))
}

fuzz_target!(|data: &[u8]| {
    let Some((module, avatar)) = schema() else {
        return;
    };

    // Decoding must fail cleanly and leave the cursor in place
    let mut it = DatagramIterator::from_bytes(data);
    if it.read_value(&module, avatar).is_err() {
        assert_eq!(it.tell(), 0);
    }

    let mut it = DatagramIterator::from_bytes(data);
    let _ = it.read_packed(&module, avatar);

    let mut it = DatagramIterator::from_bytes(data);
    while it.remaining() > 0 {
        if it.read_string().is_err() && it.read_uint8().is_err() {
            break;
        }
    }
});
