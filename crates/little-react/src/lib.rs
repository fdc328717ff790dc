//! An out-of-the-box ReAct agent that answers questions about planet masses
//! with a calculator and a lookup table.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to bring the loop into your own host apps.

#![deny(missing_docs)]

mod session;
pub mod tools;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`little_react_core`] crate.
pub mod core {
    pub use little_react_core::*;
}
