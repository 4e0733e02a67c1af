//! # Hydraulic Calculations
//!
//! This module contains the calculation types. Each calculation follows the
//! pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! Every stage is a pure function of its inputs: no shared state, no I/O, no
//! blocking. Batch comparison of scenarios is simply independent invocations
//! with no synchronization beyond result collection.
//!
//! ## Available Calculations
//!
//! - [`riprap`] - Stable riprap sizing for open-channel flow (Maynord/USACE)

pub mod riprap;

// Re-export commonly used types
pub use riprap::{calculate, RiprapInput, RiprapResult, StabilityCheck, StabilityStatus};
