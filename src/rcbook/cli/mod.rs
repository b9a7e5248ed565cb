//! # CLI Behavior
//!
//! This is **one possible UI client** for rcbook, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, the logger
//! and output formatting.
//!
//! ## Naked Execution (`rcbook`)
//!
//! Running `rcbook` with no arguments lists the records, the same as `rcbook list`.
//!
//! ## Record References
//!
//! Commands that act on existing records take list indexes (`1`, `2`, as printed by
//! `list`) or id prefixes (`6f1c`). With `--search`, indexes count within the
//! searched list.
//!
//! ## Exit Status
//!
//! `0` on success. `1` when the command fails outright (`Error: …` on stderr) or when
//! it completes with an error notice, such as a validation failure or a failed
//! export.

mod commands;
mod print;
pub mod setup;

pub use commands::run;
