pub mod config;
pub mod core;
pub mod error;

pub use crate::core::category::CategoryTable;
pub use crate::core::engine::{SoundChangeEngine, TraceStep, WordResult};
pub use crate::error::{ApplyFault, CategoryError, RuleError, SyntaxError};
