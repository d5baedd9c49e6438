// prelude.rs - Convenient re-exports for the idiomatic API.
//
//! # Prelude
//!
//! ```
//! use ferroni_named::prelude::*;
//!
//! let re = Regex::new(r"(?<n>\d+)").unwrap();
//! let m = re.captures("answer: 42").unwrap();
//! assert_eq!(&m["n"], "42");
//! ```

pub use crate::api::{
    CaptureMatches, Captures, CapturesIter, FindIter, Match, NamedGroups, Regex, RegexBuilder,
};
pub use crate::error::RegexError;
pub use crate::regdefs::RegexOptions;
pub use crate::regsubst::Replacer;
