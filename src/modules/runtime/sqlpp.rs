//! Literal escaping for SQL++ statement text
//!
//! Every untrusted value (keys, field payloads) passes through exactly one of
//! these functions on its way into a statement.

/// Single-quoted SQL++ string literal.
///
/// Backslashes are escaped first so a trailing `\` cannot swallow the
/// doubled quote that follows it.
pub fn quote_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "''");
    format!("'{}'", escaped)
}

/// Double-quoted JSON string, used inside object constructors
pub fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

/// `hex("...")` constructor for an opaque byte payload
pub fn hex_constructor(bytes: &[u8]) -> String {
    format!("hex(\"{}\")", hex::encode_upper(bytes))
}
