// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Prime-sequence hash accumulator.

use std::sync::OnceLock;

/// Length of the prime table. Positions past it wrap around.
const MAX_PRIME_NUMBERS: usize = 10_000;

fn primes() -> &'static [u32] {
    static PRIMES: OnceLock<Vec<u32>> = OnceLock::new();
    PRIMES.get_or_init(|| {
        let mut primes: Vec<u32> = Vec::with_capacity(MAX_PRIME_NUMBERS);
        primes.push(2);
        let mut candidate = 3u32;
        while primes.len() < MAX_PRIME_NUMBERS {
            let is_prime = primes
                .iter()
                .take_while(|&&p| p * p <= candidate)
                .all(|&p| candidate % p != 0);
            if is_prime {
                primes.push(candidate);
            }
            candidate += 2;
        }
        primes
    })
}

/// Hashes a sequence of integers by multiplying each one by the next prime
/// and summing, truncated to 32 bits.
#[derive(Debug, Clone, Default)]
pub struct HashGenerator {
    hash: u32,
    index: usize,
}

impl HashGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_int(&mut self, num: i32) {
        let prime = primes()[self.index];
        self.hash = self.hash.wrapping_add(prime.wrapping_mul(num as u32));
        self.index = (self.index + 1) % MAX_PRIME_NUMBERS;
    }

    /// Add the length, then each byte as a signed char.
    pub fn add_string(&mut self, s: &str) {
        self.add_int(s.len() as i32);
        for &b in s.as_bytes() {
            self.add_int(i32::from(b as i8));
        }
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }
}
