//! Input sources for sequence files.
//!
//! An [`Input`] is either a file path or standard input (`-`), so either side
//! of a comparison can sit at the end of a Unix pipeline.
//!
//! # Example
//!
//! ```rust
//! use kmercompare::input::Input;
//! use std::path::Path;
//!
//! let input = Input::from_path(Path::new("reference.fa"));
//! assert!(input.is_file());
//!
//! let input = Input::from_path(Path::new("-"));
//! assert!(input.is_stdin());
//! assert_eq!(input.to_string(), "<stdin>");
//! ```

use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

use crate::error::KmerCompareError;

/// Where a sequence stream comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Input {
    /// Read from a file at the specified path.
    File(PathBuf),
    /// Read from standard input.
    #[default]
    Stdin,
}

impl Input {
    /// Creates an `Input` from a path, treating `-` as standard input.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// Returns `true` if this input is stdin.
    #[must_use]
    pub const fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }

    /// Returns `true` if this input is a file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Returns the file path if this is a file input.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stdin => None,
        }
    }

    /// Path used to name this input in error messages.
    #[must_use]
    pub fn display_path(&self) -> PathBuf {
        match self {
            Self::File(path) => path.clone(),
            Self::Stdin => PathBuf::from("<stdin>"),
        }
    }

    /// Returns `true` if the input is a file with a `.gz` extension.
    #[must_use]
    pub fn is_gzip(&self) -> bool {
        self.as_path()
            .and_then(Path::extension)
            .is_some_and(|ext| ext == "gz")
    }

    /// Opens the input for reading.
    ///
    /// With the `gzip` feature, `.gz` files are decompressed on the fly.
    /// Without it they are read as-is.
    ///
    /// # Errors
    ///
    /// Returns [`KmerCompareError::Io`] if the file cannot be opened.
    pub fn open(&self) -> Result<Box<dyn Read + Send>, KmerCompareError> {
        match self {
            Self::Stdin => Ok(Box::new(io::stdin())),
            Self::File(path) => {
                let file = File::open(path).map_err(|source| KmerCompareError::Io {
                    source,
                    path: path.clone(),
                })?;
                Ok(self.decompress(file))
            }
        }
    }

    #[cfg(feature = "gzip")]
    fn decompress(&self, file: File) -> Box<dyn Read + Send> {
        if self.is_gzip() {
            Box::new(flate2::read::MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        }
    }

    #[cfg(not(feature = "gzip"))]
    #[allow(clippy::unused_self)]
    fn decompress(&self, file: File) -> Box<dyn Read + Send> {
        Box::new(file)
    }
}

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_is_stdin() {
        let input = Input::from_path(Path::new("-"));
        assert!(input.is_stdin());
        assert!(input.as_path().is_none());
        assert_eq!(input.display_path(), PathBuf::from("<stdin>"));
    }

    #[test]
    fn other_paths_are_files() {
        let input = Input::from_path(Path::new("reads.fa"));
        assert!(input.is_file());
        assert_eq!(input.as_path(), Some(Path::new("reads.fa")));
        assert_eq!(input.to_string(), "reads.fa");
    }

    #[test]
    fn gzip_detection() {
        assert!(Input::from_path(Path::new("reads.fa.gz")).is_gzip());
        assert!(!Input::from_path(Path::new("reads.fa")).is_gzip());
        assert!(!Input::Stdin.is_gzip());
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let input = Input::from_path(Path::new("/nonexistent/kmercompare/ref.fa"));
        match input.open() {
            Err(KmerCompareError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/kmercompare/ref.fa"));
            }
            Err(other) => panic!("expected Io error, got {other}"),
            Ok(_) => panic!("expected Io error"),
        }
    }
}
