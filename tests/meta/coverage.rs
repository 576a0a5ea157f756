//! Enforces the one-to-one layout between `src` and `tests/unit`

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";
    const TESTS_DIR: &str = "tests";

    /// Every `.rs` file below `dir`, relative to `dir`
    fn rust_files(dir: &Path) -> io::Result<BTreeSet<PathBuf>> {
        let mut files = BTreeSet::new();
        let mut pending = vec![dir.to_path_buf()];
        while let Some(current) = pending.pop() {
            for entry in fs::read_dir(&current)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                    let relative = path
                        .strip_prefix(dir)
                        .map_err(|_| io::Error::other("entry outside scanned directory"))?;
                    files.insert(relative.to_path_buf());
                }
            }
        }
        Ok(files)
    }

    fn is_module_root(path: &Path) -> bool {
        matches!(
            path.file_name().and_then(|name| name.to_str()),
            Some("mod.rs" | "main.rs" | "lib.rs")
        )
    }

    fn listing(paths: &[&PathBuf], prefix: &str) -> String {
        paths
            .iter()
            .map(|path| format!("  - {prefix}/{}", path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Tests each source file has a unit test file at the mirrored path
    // Verified by deleting tests/unit/raster/writer.rs
    #[test]
    fn test_all_src_files_have_unit_tests() {
        let src = rust_files(Path::new(SRC_DIR)).unwrap();
        let unit = rust_files(Path::new(UNIT_DIR)).unwrap();

        let missing: Vec<&PathBuf> = src
            .iter()
            .filter(|path| !is_module_root(path) && !unit.contains(*path))
            .collect();

        assert!(
            missing.is_empty(),
            "Source files without unit tests under {UNIT_DIR}:\n{}",
            listing(&missing, SRC_DIR)
        );
    }

    // Tests no unit test file outlives its source file
    // Verified by adding tests/unit/io/orphan.rs
    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let src = rust_files(Path::new(SRC_DIR)).unwrap();
        let unit = rust_files(Path::new(UNIT_DIR)).unwrap();

        let orphaned: Vec<&PathBuf> = unit
            .iter()
            .filter(|path| !is_module_root(path) && !src.contains(*path))
            .collect();

        assert!(
            orphaned.is_empty(),
            "Unit test files without a source file:\n{}",
            listing(&orphaned, UNIT_DIR)
        );
    }

    // Tests every non-root test file declares at least one test
    // Verified by removing the #[test] attributes from tests/pipeline.rs
    #[test]
    fn test_all_test_files_contain_tests() {
        let tests_dir = Path::new(TESTS_DIR);
        let mut empty = Vec::new();
        for path in rust_files(tests_dir).unwrap() {
            if is_module_root(&path) {
                continue;
            }
            let content = fs::read_to_string(tests_dir.join(&path)).unwrap();
            if !content.contains("#[test]") {
                empty.push(path);
            }
        }

        assert!(
            empty.is_empty(),
            "Test files without any #[test] function:\n{}",
            listing(&empty.iter().collect::<Vec<_>>(), TESTS_DIR)
        );
    }

    // Tests every source and test file opens with a module doc comment
    // Verified by stripping the header of src/io/discovery.rs
    #[test]
    fn test_all_files_have_module_docs() {
        let mut undocumented = Vec::new();
        for dir in [SRC_DIR, TESTS_DIR] {
            for path in rust_files(Path::new(dir)).unwrap() {
                let full = Path::new(dir).join(&path);
                let content = fs::read_to_string(&full).unwrap();
                if !content.trim_start().starts_with("//!") {
                    undocumented.push(full);
                }
            }
        }

        assert!(
            undocumented.is_empty(),
            "Files without a //! module doc:\n{}",
            undocumented
                .iter()
                .map(|path| format!("  - {}", path.display()))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}
