//! Tests for property service
