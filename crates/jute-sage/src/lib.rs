//! SageMath export for Jute vote graphs.
//!
//! Renders the weighted edges of a tip's vote graph and its linear order as
//! a SageMath script that plots the DAG with edge labels and titles the plot
//! with the ordering. Rendering is pure; writing goes to any
//! [`std::io::Write`] or a file path chosen by the caller.

pub mod config;
pub mod error;
pub mod script;

pub use config::SageConfig;
pub use error::{ExportError, ExportResult};
pub use script::{render, render_tip, write_script, write_script_file};
