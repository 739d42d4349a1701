// Utility module for configuration, logging and errors
// Author: Gabriel Demetrios Lafis

mod config;
mod error;
mod logging;

pub use config::*;
pub use error::*;
pub use logging::*;
