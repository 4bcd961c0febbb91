//! fimcheck — directory integrity scanner.
//!
//! Hashes every file in a watched directory, diffs the digests against a
//! persisted baseline, and reports new, modified and deleted files.

pub mod cli;
pub mod core;
pub mod tripwire;
