// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use bamboo::{Datagram, Module, Numeric, NumericRange, Subtype, TypeRef, Value};
use libfuzzer_sys::fuzz_target;

fn schema() -> Option<(Module, TypeRef)> {
    let mut module = Module::new();
    let mut heading = Numeric::new(Subtype::Int32).ok()?;
    heading.set_divisor(100).ok()?;
    heading.set_range(NumericRange::floating(-180.0, 180.0)).ok()?;
    let heading = module.add_numeric(heading);
    let headings = module.add_array(heading, NumericRange::unsigned(0, 16)).ok()?;
    Some((module, headings))
}

fuzz_target!(|data: &[u8]| {
    let Some((module, headings)) = schema() else {
        return;
    };

    // Anything that validates must decode and re-encode to the same bytes
    if module.validate_packed(headings, data).is_ok() {
        let value = Value::unpack(&module, headings, data).expect("validated bytes decode");
        let mut dg = Datagram::new();
        dg.add_value(&module, headings, &value).expect("decoded value packs");
        assert_eq!(dg.data(), data);
    }
});
