//! Property-based tests for acctest-sync.
//!
//! Run with: cargo test --test property_tests

pub mod runner;
