// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::error::IndexError;
use std::collections::BTreeSet;

/// An ordered set of keywords (`ram`, `broadcast`, `ownsend`, ...).
///
/// Insertion order is kept for positional access. Comparison ignores order.
#[derive(Debug, Clone, Default)]
pub struct KeywordList {
    keywords: Vec<String>,
    by_name: BTreeSet<String>,
}

impl KeywordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyword. Returns false if it was already present.
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        if !self.by_name.insert(keyword.to_string()) {
            return false;
        }
        self.keywords.push(keyword.to_string());
        true
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.by_name.contains(keyword)
    }

    pub fn num_keywords(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn nth_keyword(&self, n: usize) -> Result<&str, IndexError> {
        IndexError::get("keyword", &self.keywords, n).map(String::as_str)
    }

    /// Keywords in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Keywords in lexical order.
    pub fn sorted(&self) -> impl Iterator<Item = &str> {
        self.by_name.iter().map(String::as_str)
    }

    /// True if both lists hold the same keywords, in any order.
    pub fn has_matching_keywords(&self, other: &KeywordList) -> bool {
        self.by_name == other.by_name
    }

    /// Replace this list with a copy of `other`.
    pub fn copy_keywords(&mut self, other: &KeywordList) {
        self.clone_from(other);
    }
}

impl PartialEq for KeywordList {
    fn eq(&self, other: &Self) -> bool {
        self.has_matching_keywords(other)
    }
}

impl<'a> FromIterator<&'a str> for KeywordList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut list = KeywordList::new();
        for kw in iter {
            list.add_keyword(kw);
        }
        list
    }
}
