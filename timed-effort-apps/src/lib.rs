#![doc = include_str!("../README.md")]

mod effort_config;
mod error;
pub mod utils;

pub use effort_config::*;
pub use error::*;
