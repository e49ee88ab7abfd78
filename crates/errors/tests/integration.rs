//! Integration tests for error types

#[cfg(test)]
mod tests {
    use banker_errors::*;

    #[test]
    fn test_error_conversion() {
        let load_err = StateLoadError::NotFound {
            path: "missing.txt".into(),
        };
        let err: Error = load_err.into();
        assert!(matches!(err, Error::StateLoad(_)));

        let err: Error = IndexError::ProcessOutOfRange { index: 7, count: 5 }.into();
        assert!(matches!(err, Error::Index(_)));
    }

    #[test]
    fn test_error_display() {
        let err = StateLoadError::CapacityExceeded {
            processes: 21,
            resources: 3,
            max_processes: 20,
            max_resources: 20,
        };
        assert_eq!(
            err.to_string(),
            "maximum exceeded, requested numProcesses = 21 numResources = 3, maximum = 20, 20"
        );

        let err = IndexError::LengthMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "vector length mismatch: expected 3, got 2");
    }

    #[test]
    fn test_error_clone() {
        let err = StateLoadError::Truncated {
            block: "claim matrix".into(),
            expected: "integer".into(),
        };
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                ..
            }
        ));
    }

    #[test]
    fn test_user_facing_codes() {
        let err: Error = StateLoadError::Malformed {
            block: "resource totals".into(),
            line: 3,
            expected: "integer".into(),
            found: "x".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("state.malformed"));
        assert!(err.user_hint().is_some());
        assert!(!err.is_retryable());

        let err: Error = ConfigError::InvalidValue {
            field: "BANKER_COLOR".into(),
            value: "purple".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("config.invalid_value"));
    }

    #[test]
    fn test_overflow_error() {
        let err: Error = StateLoadError::Overflow {
            quantity: "need of P0 R0".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "state load error: need of P0 R0 overflows a signed 64-bit value"
        );
        assert_eq!(err.user_code(), Some("state.overflow"));
        assert!(err.user_hint().is_some());
    }
}
