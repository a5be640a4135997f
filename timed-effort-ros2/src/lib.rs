#![doc = include_str!("../README.md")]
#![cfg(feature = "ros2")]
#![warn(
    future_incompatible,
    missing_docs,
    rust_2018_idioms,
    single_use_lifetimes,
    unreachable_pub
)]
#![warn(clippy::default_trait_access, clippy::wildcard_imports)]

mod effort_client;
mod spinner;

pub use effort_client::*;
// re-export
pub use r2r;
