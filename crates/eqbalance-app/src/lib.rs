//! EqBalance application shell.
//!
//! Drives an [`eqbalance_core::Equation`] from a JSON gesture script and
//! draws it with a monospace text backend.

pub mod app;
pub mod error;
pub mod script;
pub mod text_backend;

pub use app::{App, AppOptions};
pub use error::{AppError, AppResult};
pub use script::{Script, Step};
pub use text_backend::{TextElement, TextFactory};
