//! Error types for ukiyo.
//!
//! Every fallible operation in the workspace returns [`UkiyoResult`].
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! Provider failures are classified with [`FailureClass`] so the gateways can
//! decide between aborting and moving on to the next candidate model without
//! inspecting message text.
//!
//! # Examples
//!
//! ```
//! use ukiyo_error::{ConfigError, UkiyoResult};
//!
//! fn load() -> UkiyoResult<String> {
//!     Err(ConfigError::new("Missing database url"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod gateway;
mod http;
mod pipeline;
mod provider;
mod storage;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{UkiyoError, UkiyoErrorKind, UkiyoResult};
pub use gateway::{GatewayError, GatewayErrorKind};
pub use http::HttpError;
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use provider::{FailureClass, ProviderError, ProviderErrorKind, ProviderResult};
pub use storage::{StorageError, StorageErrorKind};
