use std::io;

use crate::error::{ConfigError, InversionError};

#[test]
fn bad_input_exits_with_two() {
    let config = InversionError::from(ConfigError::Empty {
        what: "observed luminosity function",
    });
    assert_eq!(config.exit_code(), 2);

    let missing = InversionError::Io {
        path: "lf.json".to_string(),
        source: io::Error::from(io::ErrorKind::NotFound),
    };
    assert_eq!(missing.exit_code(), 2);

    let source = serde_json::from_str::<f64>("{").unwrap_err();
    let malformed = InversionError::Parse {
        path: "lf.json".to_string(),
        source,
    };
    assert_eq!(malformed.exit_code(), 2);
}

#[test]
fn unwritable_result_is_not_reported_as_bad_input() {
    let err = InversionError::Output {
        path: "/read-only/result.json".to_string(),
        source: io::Error::from(io::ErrorKind::PermissionDenied),
    };
    assert_eq!(err.exit_code(), 3);
    assert!(err.to_string().starts_with("failed to write /read-only/result.json"));
}
