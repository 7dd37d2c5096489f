//! Common test utilities shared across test types
//!
//! - `fixtures.rs` - Test data builders and an in-memory tracker harness
//! - `mocks.rs` - Store wrappers that fail or race on demand
