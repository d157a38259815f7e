//! Unit tests - configuration, model loading and parsing without a query
//!
//! These tests run against the public API only and need no fixtures beyond
//! temporary files.

mod catalog_file_tests;
mod config_env_tests;
mod path_parser_robustness_tests;
