//! # felt_runtime: Table Orchestration
//!
//! Drives a [`felt_engine`] table in real time: serializes human and CPU
//! turns, deals the next hand automatically and arms watchdog timers so a
//! CPU seat can never stall a hand.
//!
//! - [`runtime::TableRuntime`] - synchronous owner of the table state and its timers
//! - [`actor::spawn_table`] - tokio task wrapping a runtime behind a [`actor::RuntimeHandle`]
//! - [`events`] - the outbound [`events::TableEvent`] stream and its sinks
//! - [`scheduler`] - the timer table
//!
//! ```no_run
//! use std::sync::Arc;
//! use felt_runtime::actor::spawn_table;
//! use felt_runtime::config::RuntimeConfig;
//! use felt_runtime::events::ChannelSink;
//!
//! # async fn demo() -> Result<(), felt_runtime::errors::RuntimeError> {
//! let (sink, mut events) = ChannelSink::new();
//! let table = spawn_table(RuntimeConfig::default(), Arc::new(sink))?;
//! table.begin_hand().await?;
//! while let Some(event) = events.recv().await {
//!     println!("{}", event.name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod runtime;
pub mod scheduler;

pub use actor::{spawn_runtime, spawn_table, RuntimeHandle};
pub use config::{ConfigError, RuntimeConfig};
pub use errors::RuntimeError;
pub use events::{ChannelSink, EventSink, ForcedReason, RecordingSink, TableEvent};
pub use runtime::TableRuntime;
