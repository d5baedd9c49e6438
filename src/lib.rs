//! # Ferroni Named
//!
//! Pure-Rust regex engine for the ECMAScript pattern dialect, with named
//! capture groups (`(?<name>...)`), named backreferences (`\k<name>`) and
//! named replacement markers (`$<name>`). Literal prefixes are located with
//! [`memchr`](https://crates.io/crates/memchr).
//!
//! ## Quick Start
//!
//! ```rust
//! use ferroni_named::prelude::*;
//!
//! let re = Regex::new(r"(?<year>\d{4})-(?<month>\d{2})-(?<day>\d{2})").unwrap();
//! let caps = re.captures("Date: 2015-01-02").unwrap();
//! assert_eq!(&caps["year"], "2015");
//!
//! let groups = caps.groups().unwrap();
//! assert_eq!(groups.keys().collect::<Vec<_>>(), ["year", "month", "day"]);
//!
//! let out = re.replace("2015-01-02", "$<day>/$<month>/$<year>");
//! assert_eq!(out, "02/01/2015");
//! ```
//!
//! For fine-grained control, use [`RegexBuilder`](api::RegexBuilder):
//!
//! ```rust
//! use ferroni_named::prelude::*;
//!
//! let re = Regex::builder(r"hello")
//!     .case_insensitive(true)
//!     .build()
//!     .unwrap();
//! assert!(re.is_match("Hello World"));
//! ```
//!
//! ## Low-Level API
//!
//! The compiler and matcher can be driven directly:
//!
//! ```rust
//! use ferroni_named::regcomp::reg_new;
//! use ferroni_named::regdefs::RegexOptions;
//! use ferroni_named::regexec::{reg_search, MatchArg};
//!
//! let reg = reg_new(r"\d{4}-\d{2}-\d{2}", RegexOptions::empty()).unwrap();
//! let mut msa = MatchArg::new(&reg);
//! let start = reg_search(&reg, "Date: 2026-02-12", 0, &mut msa).unwrap();
//!
//! assert_eq!(start, Some(6));
//! assert_eq!(msa.region.get(0), Some((6, 16)));
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`regparse`] | Pattern parser |
//! | [`regparse_types`] | Syntax tree and group table |
//! | [`regcomp`] | Group table builder and tree-to-bytecode compiler |
//! | [`regexec`] | Backtracking VM and search loop |
//! | [`regint`] | Internal types and opcodes |
//! | [`regdefs`] | Options, error codes and match regions |
//! | [`regenc`] | UTF-8 helpers and character classes |
//! | [`regsubst`] | Replacement templates |
//! | [`regerror`] | Error messages |
//! | [`api`] | Idiomatic Rust API |

#![allow(clippy::new_without_default)]

pub mod api;
pub mod error;
pub mod prelude;
pub mod regcomp;
pub mod regdefs;
pub mod regenc;
pub mod regerror;
pub mod regexec;
pub mod regint;
pub mod regparse;
pub mod regparse_types;
pub mod regsubst;

pub use regexec::{
    reg_get_retry_limit_in_match, reg_get_retry_limit_in_search, reg_get_time_limit,
    reg_set_retry_limit_in_match, reg_set_retry_limit_in_search, reg_set_time_limit,
};
pub use regparse::{
    reg_get_capture_num_limit, reg_get_parse_depth_limit, reg_set_capture_num_limit,
    reg_set_parse_depth_limit,
};
