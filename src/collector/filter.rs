//! Filename-based file selection

/// Substrings that mark a file name as a test file.
///
/// Matched anywhere in the name, so `my_test.helper.go` counts as a test file too.
pub const TEST_FILE_MARKERS: [&str; 2] = ["_test.", ".test."];

/// Decides which file names go into the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    /// `.` + extension, in configured order
    suffixes: Vec<String>,
    skip_tests: bool,
}

impl FileFilter {
    pub fn new<I, S>(extensions: I, skip_tests: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes = extensions
            .into_iter()
            .map(|ext| format!(".{}", ext.as_ref()))
            .collect();
        Self {
            suffixes,
            skip_tests,
        }
    }

    pub fn skip_tests(&self) -> bool {
        self.skip_tests
    }

    /// First configured extension the name ends with, without the dot.
    ///
    /// Case-sensitive: `.go` matches `foo.go` but not `foo.Go`.
    pub fn matched_extension(&self, file_name: &str) -> Option<&str> {
        self.suffixes
            .iter()
            .find(|suffix| file_name.ends_with(suffix.as_str()))
            .map(|suffix| &suffix[1..])
    }

    pub fn is_test_file(file_name: &str) -> bool {
        TEST_FILE_MARKERS
            .iter()
            .any(|marker| file_name.contains(marker))
    }

    /// Whether a file with this name should be emitted
    pub fn accepts(&self, file_name: &str) -> bool {
        if self.matched_extension(file_name).is_none() {
            return false;
        }
        !(self.skip_tests && Self::is_test_file(file_name))
    }
}
