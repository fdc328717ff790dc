//! Core logic including the agent, the action protocol, the control loop and
//! tool dispatch.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod agent;
pub mod conversation;
mod error;
mod model_client;
pub mod protocol;
mod react;
pub mod tool;

pub use agent::{Agent, AgentBuilder};
pub use error::Error;
pub use react::{DEFAULT_MAX_ITERATIONS, LoopEvent, LoopOutcome, ReactLoop};
