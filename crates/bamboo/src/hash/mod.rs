// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema hashes for compatibility checks between peers.

#[cfg(feature = "fingerprint")]
mod fingerprint;
mod generator;
mod legacy;

#[cfg(feature = "fingerprint")]
pub use fingerprint::{fingerprint, SchemaHash};
pub use generator::HashGenerator;
pub use legacy::legacy_hash;
