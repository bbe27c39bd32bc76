//! Integration tests for appeal-engine

mod config_test;
mod e2e_test;
mod property_test;
