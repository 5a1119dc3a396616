//! TDS statement field extraction module.

mod parser;
pub mod rules;

pub use parser::{StatementFields, StatementParser};
