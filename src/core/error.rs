use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use libc::{EACCES, ENOENT, EPERM};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    NotFound,
    Permission,
    Io,
    Parse,
    Serialization,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    path: Option<PathBuf>,
    line: Option<usize>,
    column: Option<usize>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            path: None,
            line: None,
            column: None,
            source: None,
        }
    }

    /// Builds an error from an `io::Error`, classifying it into the I/O family.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        Self::new(io_error_kind(&err))
            .with_path(path)
            .with_source(err)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// True for every kind that stands for a filesystem failure.
    pub fn is_io(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Io | ErrorKind::NotFound | ErrorKind::Permission
        )
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 1-based line and column of a parse failure, when the decoder reported one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match (self.line, self.column) {
            (Some(line), Some(column)) => Some((line, column)),
            _ => None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some((line, column)) = self.position() {
            write!(f, " (line {line}, column {column})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub(crate) fn io_error_kind(err: &io::Error) -> ErrorKind {
    match err.raw_os_error() {
        Some(errno) if errno == EACCES || errno == EPERM => return ErrorKind::Permission,
        Some(errno) if errno == ENOENT => return ErrorKind::NotFound,
        _ => {}
    }
    match err.kind() {
        io::ErrorKind::NotFound => ErrorKind::NotFound,
        io::ErrorKind::PermissionDenied => ErrorKind::Permission,
        _ => ErrorKind::Io,
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::Permission => 4,
        ErrorKind::Io => 5,
        ErrorKind::Parse => 6,
        ErrorKind::Serialization => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, io_error_kind, to_exit_code};
    use std::error::Error as _;
    use std::path::Path;

    #[test]
    fn exit_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::NotFound, 3),
            (ErrorKind::Permission, 4),
            (ErrorKind::Io, 5),
            (ErrorKind::Parse, 6),
            (ErrorKind::Serialization, 7),
        ];

        for (kind, code) in cases {
            assert_eq!(to_exit_code(kind), code);
        }
    }

    #[test]
    fn io_errors_map_to_expected_kinds() {
        let err = std::io::Error::from_raw_os_error(libc::ENOENT);
        assert_eq!(io_error_kind(&err), ErrorKind::NotFound);

        let err = std::io::Error::from_raw_os_error(libc::EACCES);
        assert_eq!(io_error_kind(&err), ErrorKind::Permission);

        let err = std::io::Error::from_raw_os_error(libc::EPERM);
        assert_eq!(io_error_kind(&err), ErrorKind::Permission);

        let err = std::io::Error::from_raw_os_error(libc::ENOSPC);
        assert_eq!(io_error_kind(&err), ErrorKind::Io);

        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(io_error_kind(&err), ErrorKind::NotFound);
    }

    #[test]
    fn io_family_covers_filesystem_kinds_only() {
        assert!(Error::new(ErrorKind::Io).is_io());
        assert!(Error::new(ErrorKind::NotFound).is_io());
        assert!(Error::new(ErrorKind::Permission).is_io());
        assert!(!Error::new(ErrorKind::Parse).is_io());
        assert!(!Error::new(ErrorKind::Serialization).is_io());
    }

    #[test]
    fn display_includes_context_and_source_is_chained() {
        let io_err = std::io::Error::from_raw_os_error(libc::ENOENT);
        let err = Error::from_io(io_err, Path::new("/tmp/missing.json"))
            .with_message("failed to read file");
        let text = err.to_string();
        assert!(text.starts_with("NotFound: failed to read file"));
        assert!(text.contains("(path: /tmp/missing.json)"));
        assert!(err.source().is_some());

        let err = Error::new(ErrorKind::Parse).with_position(3, 7);
        assert_eq!(err.position(), Some((3, 7)));
        assert!(err.to_string().contains("(line 3, column 7)"));
    }
}
