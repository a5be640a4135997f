#![doc = include_str!("../README.md")]

mod clients;
mod command;
mod coordinator;
mod error;
mod pending_call;
mod scheduler;
mod traits;

pub use clients::*;
pub use command::*;
pub use coordinator::*;
pub use error::*;
pub use pending_call::*;
pub use scheduler::*;
pub use traits::*;
