// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::Module;
use crate::error::IndexError;

/// An import statement carried by the schema (`from module import a, b`).
///
/// Imports do not affect the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    module: String,
    symbols: Vec<String>,
}

impl Import {
    pub fn new(module: &str) -> Self {
        Self {
            module: module.to_string(),
            symbols: Vec::new(),
        }
    }

    pub fn with_symbol(mut self, symbol: &str) -> Self {
        self.add_symbol(symbol);
        self
    }

    /// Add a symbol. Returns false if it was already imported.
    pub fn add_symbol(&mut self, symbol: &str) -> bool {
        if self.symbols.iter().any(|s| s == symbol) {
            return false;
        }
        self.symbols.push(symbol.to_string());
        true
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn num_symbols(&self) -> usize {
        self.symbols.len()
    }

    pub fn nth_symbol(&self, n: usize) -> Result<&str, IndexError> {
        IndexError::get("symbol", &self.symbols, n).map(String::as_str)
    }
}

impl Module {
    /// Record an import. Symbols for a module that is already imported are
    /// merged into the existing entry.
    pub fn add_import(&mut self, import: Import) {
        match self.imports.iter_mut().find(|i| i.module == import.module) {
            Some(existing) => {
                for symbol in &import.symbols {
                    existing.add_symbol(symbol);
                }
                log::debug!(
                    "[Module::add_import] merged into '{}' ({} symbols)",
                    existing.module,
                    existing.symbols.len()
                );
            }
            None => {
                log::debug!("[Module::add_import] '{}'", import.module);
                self.imports.push(import);
            }
        }
    }

    pub fn num_imports(&self) -> usize {
        self.imports.len()
    }

    pub fn nth_import(&self, n: usize) -> Result<&Import, IndexError> {
        IndexError::get("import", &self.imports, n)
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }
}
