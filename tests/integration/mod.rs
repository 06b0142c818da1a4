//! Integration test modules.

mod fixtures;
mod sync_test;
mod translate_test;
