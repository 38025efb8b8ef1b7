//! Query parsing and execution.
//!
//! Pipeline: `normalize` → `parse_statement` (→ `parse_condition`) →
//! `schema::associate` → `Predicate::build` → `scan` per FROM table → merge.

pub mod ast;
pub mod executor;
pub mod lexer;
pub mod normalize;
pub mod parser;
pub mod predicates;
pub mod scan;

pub use ast::{Condition, Operand, Operator, Statement};
pub use executor::QueryEngine;
pub use normalize::normalize;
pub use parser::{parse_condition, parse_statement};
pub use predicates::{compare_values, Predicate};
pub use scan::{project, scan, scan_indexed};
