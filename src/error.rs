// error.rs - Idiomatic Rust error type.
//
// Groups the i32 codes from `regdefs` into semantic variants while
// preserving the original code for callers that want it.

use thiserror::Error;

use crate::regdefs::*;
use crate::regerror::reg_error_code_to_str;

/// Error type for regex compilation and matching operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexError {
    /// Malformed pattern text, including malformed group names and
    /// references to undeclared group names.
    #[error("syntax error: {message}")]
    Syntax { code: i32, message: String },
    /// The same group name was declared twice.
    #[error("duplicate group name <{name}>")]
    DuplicateGroupName { name: String },
    /// Too many capture groups in one pattern.
    #[error("too many captures")]
    TooManyCaptures,
    /// Parse depth limit exceeded.
    #[error("parse depth limit over")]
    ParseDepthLimitOver,
    /// Backtrack budget for a single match attempt exceeded.
    #[error("retry-limit-in-match over")]
    RetryLimitInMatchOver,
    /// Backtrack budget for a whole search exceeded.
    #[error("retry-limit-in-search over")]
    RetryLimitInSearchOver,
    /// Wall-clock budget exceeded.
    #[error("time limit over")]
    TimeLimitOver,
    /// Invalid argument passed to a function.
    #[error("invalid argument")]
    InvalidArgument,
    /// Internal engine bug (should not occur in correct usage).
    #[error("internal error: {message}")]
    InternalBug { code: i32, message: String },
    /// Other error not covered by specific variants.
    #[error("error code {0}")]
    Other(i32),
}

impl From<i32> for RegexError {
    fn from(code: i32) -> Self {
        RegexError::with_param(code, None)
    }
}

impl RegexError {
    /// Build an error from a code, filling the `%n` slot of the message with
    /// `param` when the code takes one.
    pub fn with_param(code: i32, param: Option<&str>) -> Self {
        match code {
            REGERR_RETRY_LIMIT_IN_MATCH_OVER => RegexError::RetryLimitInMatchOver,
            REGERR_RETRY_LIMIT_IN_SEARCH_OVER => RegexError::RetryLimitInSearchOver,
            REGERR_TIME_LIMIT_OVER => RegexError::TimeLimitOver,
            REGERR_PARSE_DEPTH_LIMIT_OVER => RegexError::ParseDepthLimitOver,
            REGERR_INVALID_ARGUMENT => RegexError::InvalidArgument,
            REGERR_TOO_MANY_CAPTURES => RegexError::TooManyCaptures,
            REGERR_MULTIPLEX_DEFINED_NAME => RegexError::DuplicateGroupName {
                name: param.unwrap_or_default().to_string(),
            },

            REGERR_PARSER_BUG | REGERR_UNDEFINED_BYTECODE => {
                RegexError::InternalBug {
                    code,
                    message: reg_error_code_to_str(code, None),
                }
            }

            c if reg_is_pattern_error(c) => RegexError::Syntax {
                code: c,
                message: reg_error_code_to_str(c, param),
            },

            _ => RegexError::Other(code),
        }
    }

    /// Returns the numeric error code.
    pub fn code(&self) -> i32 {
        match self {
            RegexError::Syntax { code, .. } => *code,
            RegexError::DuplicateGroupName { .. } => REGERR_MULTIPLEX_DEFINED_NAME,
            RegexError::TooManyCaptures => REGERR_TOO_MANY_CAPTURES,
            RegexError::ParseDepthLimitOver => REGERR_PARSE_DEPTH_LIMIT_OVER,
            RegexError::RetryLimitInMatchOver => REGERR_RETRY_LIMIT_IN_MATCH_OVER,
            RegexError::RetryLimitInSearchOver => REGERR_RETRY_LIMIT_IN_SEARCH_OVER,
            RegexError::TimeLimitOver => REGERR_TIME_LIMIT_OVER,
            RegexError::InvalidArgument => REGERR_INVALID_ARGUMENT,
            RegexError::InternalBug { code, .. } => *code,
            RegexError::Other(code) => *code,
        }
    }

    /// True for the errors a matcher raises when its step or time budget runs
    /// out. These are recoverable: retry with a larger budget or a simpler
    /// pattern.
    pub fn is_match_timeout(&self) -> bool {
        matches!(
            self,
            RegexError::RetryLimitInMatchOver
                | RegexError::RetryLimitInSearchOver
                | RegexError::TimeLimitOver
        )
    }

    /// True for errors raised while compiling a pattern.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            RegexError::Syntax { .. }
                | RegexError::DuplicateGroupName { .. }
                | RegexError::TooManyCaptures
                | RegexError::ParseDepthLimitOver
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_syntax_error() {
        let err = RegexError::from(REGERR_PREMATURE_END_OF_CHAR_CLASS);
        assert!(matches!(err, RegexError::Syntax { .. }));
        assert_eq!(err.code(), REGERR_PREMATURE_END_OF_CHAR_CLASS);
        assert!(err.to_string().contains("syntax error"));
        assert!(err.is_compile_error());
    }

    #[test]
    fn syntax_error_with_name() {
        let err = RegexError::with_param(REGERR_UNDEFINED_NAME_REFERENCE, Some("year"));
        assert_eq!(err.to_string(), "syntax error: undefined name <year> reference");
    }

    #[test]
    fn duplicate_name() {
        let err = RegexError::with_param(REGERR_MULTIPLEX_DEFINED_NAME, Some("dup"));
        assert_eq!(
            err,
            RegexError::DuplicateGroupName {
                name: "dup".to_string()
            }
        );
        assert_eq!(err.code(), REGERR_MULTIPLEX_DEFINED_NAME);
        assert_eq!(err.to_string(), "duplicate group name <dup>");
    }

    #[test]
    fn timeouts() {
        assert!(RegexError::from(REGERR_RETRY_LIMIT_IN_MATCH_OVER).is_match_timeout());
        assert!(RegexError::from(REGERR_TIME_LIMIT_OVER).is_match_timeout());
        assert!(!RegexError::from(REGERR_INVALID_BACKREF).is_match_timeout());
        assert!(!RegexError::TimeLimitOver.is_compile_error());
    }

    #[test]
    fn from_internal_bug() {
        let err = RegexError::from(REGERR_PARSER_BUG);
        assert!(matches!(err, RegexError::InternalBug { .. }));
        let err = RegexError::from(REGERR_UNDEFINED_BYTECODE);
        assert!(matches!(err, RegexError::InternalBug { .. }));
        assert!(matches!(RegexError::from(-12), RegexError::Other(-12)));
    }

    #[test]
    fn from_unknown_code() {
        let err = RegexError::from(-9999);
        assert!(matches!(err, RegexError::Other(-9999)));
        assert_eq!(err.code(), -9999);
    }

    #[test]
    fn error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(RegexError::InvalidArgument);
        assert_eq!(err.to_string(), "invalid argument");
    }
}
