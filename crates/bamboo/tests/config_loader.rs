// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// YAML datagram configuration (requires the `config-loaders` feature).

use bamboo::config::DEFAULT_DATAGRAM_CAPACITY;
use bamboo::{Datagram, DatagramConfig, DatagramError};
use std::io::Write;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "datagram:\n  max_size: 16\n  initial_capacity: 8").unwrap();

    let config = DatagramConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.max_size, Some(16));
    assert_eq!(config.initial_capacity, 8);

    let mut dg = Datagram::with_config(&config);
    dg.add_uint64(1).unwrap();
    dg.add_uint64(2).unwrap();
    assert_eq!(
        dg.add_uint8(3),
        Err(DatagramError::Overflow { size: 17, max: 16 })
    );
}

#[test]
fn test_missing_keys_use_defaults() {
    let config = DatagramConfig::from_yaml_str("datagram:\n  max_size: 1400\n").unwrap();
    assert_eq!(config.max_size, Some(1400));
    assert_eq!(config.initial_capacity, DEFAULT_DATAGRAM_CAPACITY);

    let config = DatagramConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, DatagramConfig::default());
}

#[test]
fn test_invalid_yaml_is_reported() {
    let err = DatagramConfig::from_yaml_str("datagram: [1, 2").unwrap_err();
    assert!(err.starts_with("Failed to parse YAML"));
}

#[test]
fn test_missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = DatagramConfig::load_from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.contains("absent.yaml"));
}
