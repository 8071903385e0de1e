//! Shared types for webtidy
//!
//! This crate provides common types used across the webtidy ecosystem,
//! including user and thread identifiers and the option value union.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// User identifier
///
/// Each user carries a unique numeric identifier. Fresh identifiers come
/// from a process-wide monotonic counter; callers may also supply their
/// own, and duplicates are accepted without validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

static USER_COUNTER: AtomicU64 = AtomicU64::new(0);

impl UserId {
    /// Create a user ID from an existing value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocate the next process-wide user ID
    pub fn next() -> Self {
        Self(USER_COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    /// Get the underlying value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        UserId(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discussion thread identifier
///
/// Thread IDs are allocated by a `ThreadClient`, not from a global
/// counter. `Display` prints the bare digits; the close-thread request
/// sends exactly that rendering as its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThreadId(pub u64);

impl ThreadId {
    /// Create a thread ID from an existing value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ThreadId {
    fn from(id: u64) -> Self {
        ThreadId(id)
    }
}

impl From<ThreadId> for u64 {
    fn from(id: ThreadId) -> Self {
        id.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value kind accepted by the general option accumulator
///
/// Options are strings, numbers, or booleans. Integers and floats are
/// kept apart so that whole-number options serialize without a
/// fractional part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// String option
    Str(String),
    /// Integer option
    Int(i64),
    /// Floating-point option
    Float(f64),
    /// Boolean option
    Bool(bool),
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Int(v as i64)
    }
}

impl From<u32> for OptionValue {
    fn from(v: u32) -> Self {
        OptionValue::Int(v as i64)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Str(v) => write!(f, "{}", v),
            OptionValue::Int(v) => write!(f, "{}", v),
            OptionValue::Float(v) => write!(f, "{}", v),
            OptionValue::Bool(v) => write!(f, "{}", v),
        }
    }
}
