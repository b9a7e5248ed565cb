//! # Rcbook Architecture
//!
//! Rcbook is a **UI-agnostic vehicle record library**. It keeps a book of vehicle
//! registration records, searches them, and renders registration certificates as PDF
//! documents, one at a time or zipped in bulk. The `rcbook` binary is one client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (indexes / id prefixes → Vehicles)     │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Form and dashboard controllers, export pipeline          │
//! │  - Returns CmdResult with notices instead of printing       │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                            │
//!                  ▼                            ▼
//! ┌──────────────────────────────┐  ┌───────────────────────────┐
//! │  Storage Layer (store/)      │  │  Rendering (render/,      │
//! │  - VehicleStore over a       │  │  layout.rs)               │
//! │    StorageBackend            │  │  - Field layout table     │
//! │  - FsBackend, MemBackend     │  │  - PDF certificate output │
//! └──────────────────────────────┘  └───────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the
//! process. Failures a user should see come back as [`commands::CmdMessage`]s
//! inside a [`commands::CmdResult`]; everything else is a [`error::RcbookError`].
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Form/dashboard controllers, export, config, sample data
//! - [`store`]: Record store and its storage backends
//! - [`model`]: Core data types (`Vehicle`, `VehicleFields`, `VehicleField`)
//! - [`layout`]: Static field-to-page-position table
//! - [`render`]: Overlay planning and PDF rendering
//! - [`search`]: Free-text filtering
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod search;
pub mod store;
