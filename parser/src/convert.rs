//! Typed coercion of raw option values.
//!
//! Parsing keeps every value as the string the user typed. Callers that
//! want typed values run them through [`convert`] with the option's
//! [`ValueType`] after the parse.

use std::path::{Path, PathBuf};

use argline_core::ValueType;
use chrono::{DateTime, FixedOffset, NaiveDate};
use thiserror::Error;
use url::Url;

/// A converted option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    File(PathBuf),
    Files(Vec<PathBuf>),
    Url(Url),
}

/// Errors from [`convert`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("not a number: {0}")]
    InvalidNumber(String),

    #[error("not a date (expected YYYY-MM-DD or RFC 3339): {0}")]
    InvalidDate(String),

    #[error("file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Converts `raw` according to `value_type`.
///
/// Numbers containing a `.` become floats, everything else must be an
/// integer. Dates accept `YYYY-MM-DD` or a full RFC 3339 timestamp. `Files`
/// splits on the platform path-list separator.
///
/// # Examples
///
/// ```
/// use argline_core::ValueType;
/// use argline_parser::{Value, convert};
///
/// assert_eq!(convert("42", ValueType::Number), Ok(Value::Integer(42)));
/// assert_eq!(convert("2.5", ValueType::Number), Ok(Value::Float(2.5)));
/// assert!(convert("forty", ValueType::Number).is_err());
/// ```
pub fn convert(raw: &str, value_type: ValueType) -> Result<Value, ConvertError> {
    match value_type {
        ValueType::String => Ok(Value::String(raw.to_string())),
        ValueType::Number => convert_number(raw),
        ValueType::Date => convert_date(raw),
        ValueType::File => Ok(Value::File(PathBuf::from(raw))),
        ValueType::ExistingFile => {
            let path = Path::new(raw);
            if path.exists() {
                Ok(Value::File(path.to_path_buf()))
            } else {
                Err(ConvertError::FileNotFound(path.to_path_buf()))
            }
        }
        ValueType::Files => Ok(Value::Files(std::env::split_paths(raw).collect())),
        ValueType::Url => Url::parse(raw)
            .map(Value::Url)
            .map_err(|source| ConvertError::InvalidUrl {
                value: raw.to_string(),
                source,
            }),
    }
}

fn convert_number(raw: &str) -> Result<Value, ConvertError> {
    let invalid = || ConvertError::InvalidNumber(raw.to_string());
    if raw.contains('.') {
        raw.parse::<f64>().map(Value::Float).map_err(|_| invalid())
    } else {
        raw.parse::<i64>().map(Value::Integer).map_err(|_| invalid())
    }
}

fn convert_date(raw: &str) -> Result<Value, ConvertError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Value::Date(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(Value::DateTime)
        .map_err(|_| ConvertError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_number_forms() {
        assert_eq!(convert("-7", ValueType::Number), Ok(Value::Integer(-7)));
        assert_eq!(convert("0.5", ValueType::Number), Ok(Value::Float(0.5)));
        assert_eq!(
            convert("1e3", ValueType::Number),
            Err(ConvertError::InvalidNumber("1e3".to_string()))
        );
    }

    #[test]
    fn test_dates() {
        assert_eq!(
            convert("2024-02-29", ValueType::Date),
            Ok(Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
        );
        assert!(matches!(
            convert("2024-02-29T10:00:00+02:00", ValueType::Date),
            Ok(Value::DateTime(_))
        ));
        assert!(convert("yesterday", ValueType::Date).is_err());
    }

    #[test]
    fn test_existing_file() {
        let file = NamedTempFile::new().unwrap();
        let raw = file.path().to_str().unwrap();

        assert_eq!(
            convert(raw, ValueType::ExistingFile),
            Ok(Value::File(file.path().to_path_buf()))
        );

        let missing = file.path().with_extension("missing");
        assert_eq!(
            convert(missing.to_str().unwrap(), ValueType::ExistingFile),
            Err(ConvertError::FileNotFound(missing.clone()))
        );
    }

    #[test]
    fn test_files_split_on_path_separator() {
        let joined = std::env::join_paths(["a", "b"]).unwrap();
        assert_eq!(
            convert(joined.to_str().unwrap(), ValueType::Files),
            Ok(Value::Files(vec![PathBuf::from("a"), PathBuf::from("b")]))
        );
    }

    #[test]
    fn test_url() {
        let Ok(Value::Url(url)) = convert("https://example.com/a", ValueType::Url) else {
            panic!("expected a URL");
        };
        assert_eq!(url.host_str(), Some("example.com"));
        assert!(matches!(
            convert("not a url", ValueType::Url),
            Err(ConvertError::InvalidUrl { .. })
        ));
    }
}
