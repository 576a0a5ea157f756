//! Tests for pipeline configuration defaults and validation

#[cfg(test)]
mod tests {
    use bandnorm::PipelineError;
    use bandnorm::io::configuration::{
        DEFAULT_FOLDERS, NORMALIZED_SUBFOLDER, PipelineConfig, RASTER_EXTENSION, STATS_SUFFIX,
    };
    use std::path::PathBuf;

    fn assert_invalid(config: &PipelineConfig, expected: &str) {
        match config.validate() {
            Err(PipelineError::InvalidParameter { parameter, .. }) => {
                assert_eq!(parameter, expected);
            }
            other => panic!("expected invalid {expected}, got {other:?}"),
        }
    }

    // Tests the built-in defaults
    // Verified by changing the default suffix
    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.folders,
            DEFAULT_FOLDERS.iter().map(PathBuf::from).collect::<Vec<_>>()
        );
        assert_eq!(config.output_subfolder, NORMALIZED_SUBFOLDER);
        assert_eq!(config.stats_suffix, STATS_SUFFIX);
        assert_eq!(config.extension, RASTER_EXTENSION);
        assert_eq!(config.threads, None);
        assert!(config.validate().is_ok());
    }

    // Tests folder replacement keeps the other defaults
    // Verified by appending to the default folders
    #[test]
    fn test_with_folders() {
        let config = PipelineConfig::with_folders(["a", "b/c"]);
        assert_eq!(config.folders, vec![PathBuf::from("a"), PathBuf::from("b/c")]);
        assert_eq!(config.stats_suffix, STATS_SUFFIX);
    }

    // Tests every rejected field
    // Verified by removing each check in turn
    #[test]
    fn test_validate_rejections() {
        assert_invalid(&PipelineConfig::with_folders(Vec::<PathBuf>::new()), "folders");

        for subfolder in ["", "a/b", "..", "/abs"] {
            let mut config = PipelineConfig::with_folders(["x"]);
            config.output_subfolder = subfolder.to_string();
            assert_invalid(&config, "output_subfolder");
        }

        let mut config = PipelineConfig::with_folders(["x"]);
        config.stats_suffix = String::new();
        assert_invalid(&config, "stats_suffix");

        for extension in ["", ".tif"] {
            let mut config = PipelineConfig::with_folders(["x"]);
            config.extension = extension.to_string();
            assert_invalid(&config, "extension");
        }

        let mut config = PipelineConfig::with_folders(["x"]);
        config.threads = Some(0);
        assert_invalid(&config, "threads");

        config.threads = Some(1);
        assert!(config.validate().is_ok());
    }
}
