//! Purpose: Decode JSON text and classify decode failures into stable categories.
//! Exports: `from_str`, `ParseFailureCategory`, `categorize_error`, `categorize_message`,
//! `hint_for_category`, `hint_for_error`, `value_kind`.
//! Role: Parser boundary over serde_json used by every load path.
//! Invariants: Category labels are stable; they appear in user-facing hints.
//! Notes: Error construction is done by callsites so path context stays explicit.

use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::error::Category;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParseFailureCategory {
    Syntax,
    Eof,
    Utf8,
    DepthLimit,
    NotObject,
    Data,
    Unknown,
}

impl ParseFailureCategory {
    pub(crate) fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::Utf8 => "utf8",
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::NotObject => "not-object",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::Unknown => "unknown",
        }
    }

    fn advice(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => {
                "Check for missing commas, quotes, or brackets near the reported position."
            }
            ParseFailureCategory::Eof => "The document ends early; the file may be truncated.",
            ParseFailureCategory::Utf8 => "Re-save the file with UTF-8 encoding.",
            ParseFailureCategory::DepthLimit => {
                "Nesting exceeds the decoder recursion limit; flatten the document."
            }
            ParseFailureCategory::NotObject => {
                "The top-level value must be a JSON object, e.g. {\"key\": \"value\"}."
            }
            ParseFailureCategory::Data => "The document does not match the expected shape.",
            ParseFailureCategory::Unknown => "Inspect the file contents for corruption.",
        }
    }
}

pub(crate) fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(input)
}

pub(crate) fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    // serde_json reports recursion overflow as a syntax error; the message is the only signal.
    let by_message = categorize_message(&err.to_string());
    if by_message == ParseFailureCategory::DepthLimit {
        return by_message;
    }
    match err.classify() {
        Category::Syntax => ParseFailureCategory::Syntax,
        Category::Eof => ParseFailureCategory::Eof,
        Category::Data => ParseFailureCategory::Data,
        Category::Io => ParseFailureCategory::Unknown,
    }
}

pub(crate) fn categorize_message(message: &str) -> ParseFailureCategory {
    let lower = message.to_ascii_lowercase();
    if lower.contains("recursion limit") {
        ParseFailureCategory::DepthLimit
    } else if lower.contains("utf-8") || lower.contains("utf8") {
        ParseFailureCategory::Utf8
    } else if lower.contains("eof while parsing") {
        ParseFailureCategory::Eof
    } else if lower.contains("must be a json object") {
        ParseFailureCategory::NotObject
    } else if lower.contains("expected")
        || lower.contains("trailing")
        || lower.contains("invalid")
        || lower.contains("key must be a string")
    {
        ParseFailureCategory::Syntax
    } else {
        ParseFailureCategory::Unknown
    }
}

pub(crate) fn hint_for_category(category: ParseFailureCategory, context: &str) -> String {
    format!(
        "parse category: {}; context: {context}. {}",
        category.label(),
        category.advice()
    )
}

pub(crate) fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    hint_for_category(categorize_error(err), context)
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
