// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire constants and datagram configuration.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: size-tag width, chosen at build time with the `sizetag32` feature
//! - **Level 2 (Dynamic)**: [`DatagramConfig`] for per-datagram limits (max size, capacity)
//!
//! # Example
//!
//! ```
//! use bamboo::config::{DatagramConfig, SIZETAG_WIDTH};
//! use bamboo::Datagram;
//!
//! let config = DatagramConfig::default().with_max_size(1400);
//! let mut dg = Datagram::with_config(&config);
//! dg.add_string("hello").unwrap();
//! assert_eq!(dg.size(), SIZETAG_WIDTH + 5);
//! ```

// =======================================================================
// Size tags
// =======================================================================

/// Length prefix used in front of strings, blobs and variable arrays.
#[cfg(not(feature = "sizetag32"))]
pub type SizeTag = u16;

/// Length prefix used in front of strings, blobs and variable arrays.
#[cfg(feature = "sizetag32")]
pub type SizeTag = u32;

/// Width of a size tag on the wire, in bytes.
pub const SIZETAG_WIDTH: usize = std::mem::size_of::<SizeTag>();

/// Largest length a single size tag can describe.
pub const SIZETAG_MAX: usize = SizeTag::MAX as usize;

/// Initial buffer capacity of a new [`crate::Datagram`].
pub const DEFAULT_DATAGRAM_CAPACITY: usize = 64;

// =======================================================================
// Runtime configuration
// =======================================================================

/// Per-datagram limits.
///
/// `max_size = None` means the buffer grows without bound; with a cap, any
/// write that would push the datagram past it fails with
/// [`crate::DatagramError::Overflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DatagramConfig {
    /// Maximum datagram size in bytes.
    pub max_size: Option<usize>,
    /// Bytes preallocated by a new datagram.
    pub initial_capacity: usize,
}

impl Default for DatagramConfig {
    fn default() -> Self {
        Self {
            max_size: None,
            initial_capacity: DEFAULT_DATAGRAM_CAPACITY,
        }
    }
}

impl DatagramConfig {
    /// Cap datagrams at `max_size` bytes.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Remove the size cap.
    pub fn unbounded(mut self) -> Self {
        self.max_size = None;
        self
    }

    /// Preallocate `capacity` bytes.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Cap datagrams at the largest length a size tag can describe, so the
    /// whole datagram can itself be nested as a blob.
    pub fn nestable() -> Self {
        Self::default().with_max_size(SIZETAG_MAX)
    }
}

#[cfg(feature = "config-loaders")]
mod loaders {
    use super::DatagramConfig;
    use std::fs;
    use std::path::Path;

    /// Root YAML document.
    ///
    /// ```yaml
    /// datagram:
    ///   max_size: 1400
    ///   initial_capacity: 256
    /// ```
    #[derive(Debug, serde::Deserialize)]
    struct YamlConfigDocument {
        #[serde(default)]
        datagram: DatagramConfig,
    }

    impl DatagramConfig {
        /// Parse a configuration from YAML text.
        pub fn from_yaml_str(yaml_content: &str) -> Result<Self, String> {
            let doc: YamlConfigDocument = serde_yaml::from_str(yaml_content)
                .map_err(|e| format!("Failed to parse YAML: {}", e))?;
            log::debug!(
                "[DatagramConfig::from_yaml_str] max_size={:?} initial_capacity={}",
                doc.datagram.max_size,
                doc.datagram.initial_capacity
            );
            Ok(doc.datagram)
        }

        /// Load a configuration from a YAML file.
        pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| {
                format!(
                    "Failed to read config file '{}': {}",
                    path.as_ref().display(),
                    e
                )
            })?;
            Self::from_yaml_str(&content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizetag_constants_agree() {
        assert_eq!(SIZETAG_MAX as u64 + 1, 1u64 << (SIZETAG_WIDTH * 8));
        #[cfg(not(feature = "sizetag32"))]
        assert_eq!(SIZETAG_WIDTH, 2);
        #[cfg(feature = "sizetag32")]
        assert_eq!(SIZETAG_WIDTH, 4);
    }

    #[test]
    fn test_default_config_is_unbounded() {
        let config = DatagramConfig::default();
        assert_eq!(config.max_size, None);
        assert_eq!(config.initial_capacity, DEFAULT_DATAGRAM_CAPACITY);
    }

    #[test]
    fn test_config_builders() {
        let config = DatagramConfig::default()
            .with_max_size(512)
            .with_initial_capacity(128);
        assert_eq!(config.max_size, Some(512));
        assert_eq!(config.initial_capacity, 128);
        assert_eq!(config.unbounded().max_size, None);
        assert_eq!(DatagramConfig::nestable().max_size, Some(SIZETAG_MAX));
    }
}
