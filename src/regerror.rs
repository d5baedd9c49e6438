// regerror.rs - Error code to string conversion.
//
// Maps the numeric codes in `regdefs` to human-readable messages.
// Messages that mention a group name carry a `%n` placeholder.

use crate::regdefs::*;

/// Get the format string for an error code.
pub fn reg_error_code_to_format(code: i32) -> &'static str {
    match code {
        REG_MISMATCH => "mismatch",
        REGERR_PARSER_BUG => "internal parser error (bug)",
        REGERR_UNDEFINED_BYTECODE => "undefined bytecode (bug)",
        REGERR_PARSE_DEPTH_LIMIT_OVER => "parse depth limit over",
        REGERR_RETRY_LIMIT_IN_MATCH_OVER => "retry-limit-in-match over",
        REGERR_RETRY_LIMIT_IN_SEARCH_OVER => "retry-limit-in-search over",
        REGERR_TIME_LIMIT_OVER => "time limit over",
        REGERR_INVALID_ARGUMENT => "invalid argument",
        REGERR_END_PATTERN_AT_LEFT_BRACE => "end pattern at left brace",
        REGERR_PREMATURE_END_OF_CHAR_CLASS => "premature end of char-class",
        REGERR_END_PATTERN_AT_ESCAPE => "end pattern at escape",
        REGERR_CONTROL_CODE_SYNTAX => "invalid control-code syntax",
        REGERR_UNMATCHED_RANGE_SPECIFIER_IN_CHAR_CLASS => {
            "unmatched range specifier in char-class"
        }
        REGERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED => {
            "target of repeat operator is not specified"
        }
        REGERR_TARGET_OF_REPEAT_OPERATOR_INVALID => "target of repeat operator is invalid",
        REGERR_NESTED_REPEAT_OPERATOR => "nested repeat operator",
        REGERR_UNMATCHED_CLOSE_PARENTHESIS => "unmatched close parenthesis",
        REGERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS => {
            "end pattern with unmatched parenthesis"
        }
        REGERR_END_PATTERN_IN_GROUP => "end pattern in group",
        REGERR_UNDEFINED_GROUP_OPTION => "undefined group option",
        REGERR_INVALID_REPEAT_RANGE_PATTERN => "invalid repeat range {lower,upper}",
        REGERR_INVALID_ESCAPE => "invalid escape",
        REGERR_UNMATCHED_CLOSE_BRACKET => "unmatched close bracket",
        REGERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE => {
            "upper is smaller than lower in repeat range"
        }
        REGERR_EMPTY_RANGE_IN_CHAR_CLASS => "empty range in char class",
        REGERR_INVALID_BACKREF => "invalid backref number/name",
        REGERR_TOO_MANY_CAPTURES => "too many captures",
        REGERR_EMPTY_GROUP_NAME => "group name is empty",
        REGERR_INVALID_GROUP_NAME => "invalid group name <%n>",
        REGERR_INVALID_CHAR_IN_GROUP_NAME => "invalid char in group name <%n>",
        REGERR_UNDEFINED_NAME_REFERENCE => "undefined name <%n> reference",
        REGERR_MULTIPLEX_DEFINED_NAME => "multiplex defined name <%n>",
        REGERR_INVALID_CODE_POINT_VALUE => "invalid code point value",
        REGERR_TOO_BIG_WIDE_CHAR_VALUE => "too big wide-char value",
        _ => "undefined error code",
    }
}

/// Check if an error code takes a group name parameter.
pub fn reg_is_error_code_needs_param(code: i32) -> bool {
    matches!(
        code,
        REGERR_UNDEFINED_NAME_REFERENCE
            | REGERR_MULTIPLEX_DEFINED_NAME
            | REGERR_INVALID_GROUP_NAME
            | REGERR_INVALID_CHAR_IN_GROUP_NAME
    )
}

/// Convert an error code to a human-readable string.
/// For parameterized errors, pass the group name in `param`.
pub fn reg_error_code_to_str(code: i32, param: Option<&str>) -> String {
    let fmt = reg_error_code_to_format(code);

    if reg_is_error_code_needs_param(code) {
        let par_str = param
            .unwrap_or("")
            .chars()
            .map(|c| {
                if c.is_control() {
                    format!("\\u{{{:x}}}", c as u32)
                } else {
                    c.to_string()
                }
            })
            .collect::<String>();
        fmt.replace("%n", &par_str)
    } else {
        fmt.to_string()
    }
}
