//! Error types for the Quill library.
//!
//! This crate provides the foundation error types used throughout the Quill workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use quill_error::{PlatformError, PlatformErrorKind, QuillResult};
//!
//! fn edit_menu() -> QuillResult<()> {
//!     Err(PlatformError::new(PlatformErrorKind::Forbidden("edit message".into())))?
//! }
//!
//! match edit_menu() {
//!     Ok(()) => println!("edited"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod platform;
mod reactive;
mod render;
mod route;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{QuillError, QuillErrorKind, QuillResult};
pub use platform::{PlatformError, PlatformErrorKind, PlatformResult};
pub use reactive::{ReactiveError, ReactiveErrorKind};
pub use render::RenderError;
pub use route::{RouteError, RouteErrorKind};
