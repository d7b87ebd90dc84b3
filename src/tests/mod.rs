//! Cross-module test suite.
//!
//! Most behavior is tested alongside its module (`#[cfg(test)] mod tests`
//! inside `value.rs`, `hash/table.rs`, `join.rs`, etc). This directory holds
//! tests that exercise more than one module at a time: full table-to-table
//! pipelines and property-based invariants drawn from §8 of the design spec.

#[cfg(test)]
mod integration;
