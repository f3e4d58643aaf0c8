//! Tests for domain model and value types.

mod value_tests;
