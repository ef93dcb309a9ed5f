//! Property-based tests

pub mod color_proptest;
