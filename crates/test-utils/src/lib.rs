//! This crate provides test-utilities for the wallet backup crates: deterministic and random
//! keys, pre-populated wallets, a key store that can be told to fail, and proptest strategies.

pub mod keys;
pub mod strategies;
pub mod wallet;
