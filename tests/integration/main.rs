//! Integration tests

mod analytics_test;
mod collection_test;
mod store_test;
