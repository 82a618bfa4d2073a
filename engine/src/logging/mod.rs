//! Log plumbing for hosts embedding the ECS.
//!
//! The core reports through the [`log`] facade: `debug!` for bookkeeping such as flush
//! statistics, `warn!` for ignored requests, and `error!` for systems that could not be built.
//! A host can install any `log` backend, or use [`ChannelLogger`] to receive the records on a
//! channel and surface them in its own UI.

mod channel;

pub use channel::{ChannelLogger, LogMessage};
