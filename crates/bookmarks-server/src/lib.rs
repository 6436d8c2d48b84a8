pub mod config;
pub mod error;
pub mod logging;
pub mod run;

pub use error::{Error, Result};
