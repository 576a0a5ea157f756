//! Tests for error messages and path context

#[cfg(test)]
mod tests {
    use bandnorm::PipelineError;
    use bandnorm::io::error::{WithPath, computation_error, invalid_parameter, unsupported_raster};
    use std::error::Error;
    use std::path::{Path, PathBuf};

    // Tests I/O failures carry their path and operation
    // Verified by dropping the operation from the message
    #[test]
    fn test_with_path() {
        let failed: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        let error = failed.with_path(Path::new("/data/S1"), "list folder").unwrap_err();

        let message = error.to_string();
        assert!(message.contains("list folder"));
        assert!(message.contains("/data/S1"));
        assert!(message.contains("gone"));
        assert!(error.source().is_some());
        assert!(matches!(error, PipelineError::FileSystem { .. }));
    }

    // Tests helper constructors fill in every field
    // Verified by swapping value and reason
    #[test]
    fn test_helpers() {
        match invalid_parameter("threads", &0, &"must be at least 1") {
            PipelineError::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                assert_eq!(parameter, "threads");
                assert_eq!(value, "0");
                assert_eq!(reason, "must be at least 1");
            }
            other => panic!("unexpected {other:?}"),
        }

        let error = computation_error("merge", &"band count differs");
        assert_eq!(error.to_string(), "Computation error in merge: band count differs");

        let error = unsupported_raster(Path::new("a.tif"), &"planar");
        assert_eq!(error.to_string(), "Unsupported raster 'a.tif': planar");
    }

    // Tests folder-level messages name the expected table
    // Verified by omitting the table path
    #[test]
    fn test_missing_statistics_message() {
        let error = PipelineError::MissingStatistics {
            folder: PathBuf::from("/data/DK_DSM"),
            path: PathBuf::from("/data/DK_DSM_stats.csv"),
        };
        let message = error.to_string();
        assert!(message.contains("/data/DK_DSM'"));
        assert!(message.contains("/data/DK_DSM_stats.csv"));

        let error = PipelineError::BandCountMismatch {
            path: PathBuf::from("b.tif"),
            expected: 3,
            found: 4,
        };
        assert!(error.to_string().contains("expected 3 bands, found 4"));
    }
}
