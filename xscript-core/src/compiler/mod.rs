//! Compile-time side of the engine: what the script compiler may emit.

pub mod instruction_table;
pub mod signature;
