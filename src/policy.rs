use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Default word budget for size-bounded batching.
pub const DEFAULT_WORDS_PER_FILE: usize = 5_000;

/// Keyword selecting [`BatchingPolicy::DirectoryGrouped`].
pub const FOLDER_KEYWORD: &str = "folder";

/// How discovered files are grouped into output batches.
///
/// Chosen once per run and never changed while planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchingPolicy {
    /// Accumulate files until the running word count reaches `threshold`.
    SizeBounded {
        /// Word budget that closes a batch once met or exceeded
        threshold: NonZeroUsize,
    },
    /// One batch per source directory, no size limit.
    DirectoryGrouped,
}

impl BatchingPolicy {
    /// Creates a size-bounded policy.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `threshold` is zero.
    pub fn size_bounded(threshold: usize) -> Result<Self> {
        NonZeroUsize::new(threshold)
            .map(|threshold| Self::SizeBounded { threshold })
            .ok_or_else(|| Error::config("word threshold must be greater than 0"))
    }

    /// Parses the optional second CLI argument, falling back to the default
    /// threshold when the value is missing or unrecognized.
    ///
    /// Returns the policy together with the rejected value, if any, so the
    /// caller can report the fallback.
    #[must_use]
    pub fn from_arg_lenient(arg: Option<&str>) -> (Self, Option<Error>) {
        match arg.map(str::parse::<Self>) {
            None => (Self::default(), None),
            Some(Ok(policy)) => (policy, None),
            Some(Err(e)) => (Self::default(), Some(e)),
        }
    }

    /// Returns the word threshold for size-bounded policies.
    #[must_use]
    pub const fn threshold(&self) -> Option<usize> {
        match self {
            Self::SizeBounded { threshold } => Some(threshold.get()),
            Self::DirectoryGrouped => None,
        }
    }
}

impl Default for BatchingPolicy {
    fn default() -> Self {
        Self::SizeBounded {
            threshold: NonZeroUsize::new(DEFAULT_WORDS_PER_FILE)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Accepts `folder` or a leading run of digits (`"3.5"` and `"12abc"` read
/// as 3 and 12). Anything without a positive leading integer is rejected.
impl FromStr for BatchingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == FOLDER_KEYWORD {
            return Ok(Self::DirectoryGrouped);
        }

        leading_integer(s)
            .and_then(NonZeroUsize::new)
            .map(|threshold| Self::SizeBounded { threshold })
            .ok_or_else(|| Error::invalid_policy(s))
    }
}

/// Parses the digits at the start of `s`, after an optional `+`.
/// Values too large for `usize` saturate.
fn leading_integer(s: &str) -> Option<usize> {
    let unsigned = s.strip_prefix('+').unwrap_or(s);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];

    if digits.is_empty() {
        return None;
    }

    Some(digits.parse().unwrap_or(usize::MAX))
}

impl fmt::Display for BatchingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeBounded { threshold } => write!(f, "size-bounded ({threshold} words)"),
            Self::DirectoryGrouped => f.write_str("directory-grouped"),
        }
    }
}
