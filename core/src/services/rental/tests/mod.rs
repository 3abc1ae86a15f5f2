//! Tests for the rental agreement engine

mod fixtures;
mod concurrency_tests;
