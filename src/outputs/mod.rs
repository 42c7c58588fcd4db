//! Output artifacts of a harvest run.
//!
//! # Submodules
//!
//! - [`jsonl`]: the append-only JSON Lines file, one [`PageRecord`] per line
//! - [`raw`]: byte-for-byte HTML snapshots, one file per page
//!
//! # Output Structure
//!
//! ```text
//! output.jl              # {"url":…,"title":…,"text":…,"tags":[…]} per line
//! wikipages/
//! ├── Robotics.html
//! ├── Robot.html
//! └── Chatbot.html
//! ```
//!
//! [`PageRecord`]: crate::models::PageRecord

pub mod jsonl;
pub mod raw;
