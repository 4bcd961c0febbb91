//! Tripwire — SHA-256 hashing, baseline comparison, event sinks.

pub mod comparator;
pub mod eventlog;
pub mod hasher;
