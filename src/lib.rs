//! Library crate for userdir-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state and update loop (`app`)
//! - HTTP client for the remote user directory (`api`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `userdir-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Client and error types shared across the crate.
pub use api::{ApiError, DirectoryClient};
