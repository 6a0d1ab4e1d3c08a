#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

use std::fmt;

/// Result type with custom Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error information
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// Type of error and additional information
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub error_type: ErrorType,

    /// Where this error occurred
    pub location: String,
}

/// Possible error types
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    /// This error was not labeled :(
    LabelMe,

    // ? Event related errors
    MissingField {
        field: String,
    },
    InvalidDate {
        value: String,
    },
    InvalidTime {
        value: String,
    },
    InvalidSlug,
    SlugTaken,

    // ? Booking related errors
    InvalidEmail,
    UnknownEvent,

    // ? Configuration and connection errors
    MissingConfiguration {
        key: String,
    },
    ConnectionFailed {
        reason: String,
    },

    // ? General errors
    DatabaseError {
        operation: String,
        collection: String,
    },
    NotFound,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorType::LabelMe => write!(f, "unlabeled error"),
            ErrorType::MissingField { field } => write!(f, "`{field}` is required"),
            ErrorType::InvalidDate { value } => write!(f, "invalid date `{value}`"),
            ErrorType::InvalidTime { value } => {
                write!(f, "invalid time `{value}`, expected HH:MM (24h)")
            }
            ErrorType::InvalidSlug => write!(f, "title does not produce a usable slug"),
            ErrorType::SlugTaken => write!(f, "an event with this slug already exists"),
            ErrorType::InvalidEmail => write!(f, "invalid email address"),
            ErrorType::UnknownEvent => write!(f, "referenced event does not exist"),
            ErrorType::MissingConfiguration { key } => {
                write!(f, "missing required configuration `{key}`")
            }
            ErrorType::ConnectionFailed { reason } => {
                write!(f, "failed to connect to the database: {reason}")
            }
            ErrorType::DatabaseError {
                operation,
                collection,
            } => write!(f, "database error during {operation} on {collection}"),
            ErrorType::NotFound => write!(f, "not found"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.error_type, self.location)
    }
}

impl std::error::Error for Error {}

#[macro_export]
macro_rules! create_error {
    ( $error: ident $( $tt:tt )? ) => {
        $crate::Error {
            error_type: $crate::ErrorType::$error $( $tt )?,
            location: format!("{}:{}:{}", file!(), line!(), column!()),
        }
    };
}

#[macro_export]
macro_rules! create_database_error {
    ( $operation: expr, $collection: expr ) => {
        $crate::create_error!(DatabaseError {
            operation: $operation.to_string(),
            collection: $collection.to_string()
        })
    };
}

#[cfg(test)]
mod tests {
    use crate::ErrorType;

    #[test]
    fn use_macro_to_construct_error() {
        let error = create_error!(LabelMe);
        assert!(matches!(error.error_type, ErrorType::LabelMe));
        assert!(error.location.starts_with(file!()));
    }

    #[test]
    fn use_macro_to_construct_complex_error() {
        let error = create_error!(MissingField {
            field: "title".to_string()
        });

        assert_eq!(
            error.error_type,
            ErrorType::MissingField {
                field: "title".to_string()
            }
        );
        assert_eq!(error.error_type.to_string(), "`title` is required");
    }

    #[test]
    fn use_macro_to_construct_database_error() {
        let error = create_database_error!("insert_one", "events");
        assert_eq!(
            error.error_type,
            ErrorType::DatabaseError {
                operation: "insert_one".to_string(),
                collection: "events".to_string()
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialises_with_type_tag() {
        let error = create_error!(InvalidTime {
            value: "24:00".to_string()
        });

        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["type"], "InvalidTime");
        assert_eq!(value["value"], "24:00");
        assert!(value["location"].is_string());
    }
}
