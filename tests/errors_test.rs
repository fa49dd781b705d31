//! Error type behavior
//!
//! Checks the messages surfaced to operators and the conversions the
//! pipeline relies on when propagating failures with `?`.

use framesieve::batch::BatchError;
use framesieve::errors::SieveError;
use std::error::Error;
use std::io;
use std::path::PathBuf;

#[cfg(test)]
mod sieve_error_tests {
    use super::*;

    #[test]
    fn test_display_messages_name_the_failing_stage() {
        let cases = [
            (SieveError::Capture("lost device".into()), "Capture error: lost device"),
            (SieveError::Decode("bad header".into()), "Decode error: bad header"),
            (SieveError::Detector("backend gone".into()), "Detector error: backend gone"),
            (SieveError::Export("disk full".into()), "Export error: disk full"),
            (SieveError::Config("fps is zero".into()), "Configuration error: fps is zero"),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_io_errors_convert_and_chain() {
        let err: SieveError = io::Error::new(io::ErrorKind::NotFound, "no such file").into();
        assert!(matches!(err, SieveError::Io(_)));
        assert!(err.to_string().starts_with("IO error:"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_image_errors_convert_and_chain() {
        let decode_failure = image::load_from_memory(&[1, 2, 3]).unwrap_err();
        let err: SieveError = decode_failure.into();
        assert!(matches!(err, SieveError::Image(_)));
        assert!(err.to_string().starts_with("Image error:"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_message_variants_have_no_source() {
        let err = SieveError::Capture("whatever".into());
        assert!(err.source().is_none());
    }
}

#[cfg(test)]
mod batch_error_tests {
    use super::*;

    #[test]
    fn test_no_input_message_is_exact() {
        assert_eq!(
            BatchError::NoInput.to_string(),
            "No input: no frames could be scored"
        );
    }

    #[test]
    fn test_read_dir_message_names_the_directory() {
        let err = BatchError::ReadDir {
            path: PathBuf::from("/tmp/missing"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let message = err.to_string();
        assert!(message.contains("/tmp/missing"));
        assert!(message.contains("gone"));
    }

    #[test]
    fn test_sieve_errors_pass_through_unchanged() {
        let inner = SieveError::Export("sink rejected frame".into());
        let err: BatchError = inner.into();
        assert_eq!(err.to_string(), "Export error: sink rejected frame");
        assert!(matches!(err, BatchError::Sieve(_)));
    }
}
