use std::error::Error;
use std::fmt;

/// Broad category of a [`QuarryError`], independent of any region annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Format,
    Type,
    Contract,
}

#[derive(Debug)]
pub enum QuarryError {
    /// Short read/write, missing or uncreatable file.
    IoError(std::io::Error),
    /// Malformed lengths, unknown tag ids, unknown compression schemes.
    FormatError(String),
    /// Unsupported encode/decode type or conversion.
    TypeError(String),
    /// A value of the wrong shape was handed to the codec.
    ContractError(String),
    /// Failure inside a region file, with the chunk slot when one is involved.
    RegionError {
        x: i32,
        z: i32,
        chunk: Option<(i32, i32)>,
        source: Box<QuarryError>,
    },
}

impl QuarryError {
    pub fn format(msg: impl Into<String>) -> Self {
        QuarryError::FormatError(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        QuarryError::TypeError(msg.into())
    }

    pub fn contract(msg: impl Into<String>) -> Self {
        QuarryError::ContractError(msg.into())
    }

    /// Wraps `self` with region coordinates. An existing annotation is kept.
    pub fn in_region(self, x: i32, z: i32) -> Self {
        match self {
            QuarryError::RegionError { .. } => self,
            other => QuarryError::RegionError {
                x,
                z,
                chunk: None,
                source: Box::new(other),
            },
        }
    }

    /// Wraps `self` with region and chunk coordinates.
    pub fn in_chunk(self, x: i32, z: i32, cx: i32, cz: i32) -> Self {
        let source = match self {
            QuarryError::RegionError { source, .. } => source,
            other => Box::new(other),
        };

        QuarryError::RegionError {
            x,
            z,
            chunk: Some((cx, cz)),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            QuarryError::IoError(_) => ErrorKind::Io,
            QuarryError::FormatError(_) => ErrorKind::Format,
            QuarryError::TypeError(_) => ErrorKind::Type,
            QuarryError::ContractError(_) => ErrorKind::Contract,
            QuarryError::RegionError { source, .. } => source.kind(),
        }
    }

    /// Chunk coordinates this error was annotated with, if any.
    pub fn chunk(&self) -> Option<(i32, i32)> {
        match self {
            QuarryError::RegionError { chunk, .. } => *chunk,
            _ => None,
        }
    }
}

impl fmt::Display for QuarryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuarryError::IoError(err) => write!(f, "IO error: {}", err),
            QuarryError::FormatError(msg) => write!(f, "Format error: {}", msg),
            QuarryError::TypeError(msg) => write!(f, "Type error: {}", msg),
            QuarryError::ContractError(msg) => write!(f, "Contract error: {}", msg),
            QuarryError::RegionError {
                x,
                z,
                chunk: Some((cx, cz)),
                source,
            } => write!(f, "r({} {}) c({} {}): {}", x, z, cx, cz, source),
            QuarryError::RegionError {
                x,
                z,
                chunk: None,
                source,
            } => write!(f, "r({} {}): {}", x, z, source),
        }
    }
}

impl Error for QuarryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            QuarryError::IoError(err) => Some(err),
            QuarryError::RegionError { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for QuarryError {
    fn from(err: std::io::Error) -> Self {
        QuarryError::IoError(err)
    }
}

impl From<std::string::FromUtf8Error> for QuarryError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        QuarryError::FormatError(format!("invalid UTF-8 string: {}", err))
    }
}

// The codec reports through serde; messages raised by derived impls
// (missing variants, invalid lengths, ...) are type mismatches.
impl serde::ser::Error for QuarryError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        QuarryError::TypeError(msg.to_string())
    }
}

impl serde::de::Error for QuarryError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        QuarryError::TypeError(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io;

    #[test]
    fn test_display() {
        let err = QuarryError::format("String with size < 0");
        assert_eq!(err.to_string(), "Format error: String with size < 0");

        let err = QuarryError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert_eq!(err.to_string(), "IO error: eof");
    }

    #[test]
    fn test_region_annotation() {
        let err = QuarryError::format("unknown compression scheme 7").in_chunk(1, -2, 3, 4);
        assert_eq!(
            err.to_string(),
            "r(1 -2) c(3 4): Format error: unknown compression scheme 7"
        );
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.chunk(), Some((3, 4)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_region_annotation_is_not_nested() {
        let err = QuarryError::unsupported("bool")
            .in_region(0, 0)
            .in_region(5, 5);
        assert_matches!(err, QuarryError::RegionError { x: 0, z: 0, chunk: None, .. });

        let err = QuarryError::unsupported("bool")
            .in_region(0, 0)
            .in_chunk(0, 0, 9, 9);
        assert_matches!(&err, QuarryError::RegionError { source, .. } => {
            assert_matches!(**source, QuarryError::TypeError(_));
        });
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_serde_custom_is_type_error() {
        let err = <QuarryError as serde::de::Error>::missing_field("Level");
        assert_matches!(err, QuarryError::TypeError(_));
        assert_eq!(err.kind(), ErrorKind::Type);
    }
}
