mod config;
mod errors;
mod summary;
mod table;

pub use crate::{config::*, errors::*, summary::*, table::*};

/// Identifier under which adapters are expected to report the intercept
/// term. It is ordered last by default and can be silenced like any other
/// variable.
pub const INTERCEPT: &str = "const";
