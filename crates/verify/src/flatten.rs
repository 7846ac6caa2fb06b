//! Source flattening seam.
//!
//! Import-graph flattening is a collaborator, not part of this crate: the
//! trait is the boundary where a real flattener plugs in. The default
//! implementation handles the self-contained single-file case.

use crate::error::VerifyError;
use std::path::Path;

/// Produces one self-contained source text for a file. Import resolution is
/// the implementer's responsibility.
pub trait Flatten {
    fn flatten(&self, path: &Path) -> Result<String, VerifyError>;
}

/// Reads a single self-contained source file as-is.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleFileSource;

impl Flatten for SingleFileSource {
    fn flatten(&self, path: &Path) -> Result<String, VerifyError> {
        std::fs::read_to_string(path)
            .map_err(|source| VerifyError::Io { path: path.to_path_buf(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_source_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "contract Foo {{ }}").unwrap();
        let source = SingleFileSource.flatten(file.path()).unwrap();
        assert_eq!(source, "contract Foo { }");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SingleFileSource.flatten(Path::new("/definitely/not/here.sol")).unwrap_err();
        assert!(matches!(err, VerifyError::Io { .. }));
    }
}
