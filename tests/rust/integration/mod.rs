//! Integration tests - resolution over the auction house fixture model
//!
//! These tests build query paths with the path binder, materialize table
//! groups the way a plan builder would and check what the resolver maps each
//! path onto.

mod expression_type_tests;
mod fixture;
mod from_clause_tests;
mod model_part_resolution_tests;
mod treat_resolution_tests;
