use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Magic bytes at the start of a compiled program image.
pub const IMAGE_MAGIC: [u8; 4] = *b"FRDC";

/// Bumped whenever the serialized layout of [`Program`] changes.
pub const IMAGE_VERSION: u16 = 1;

/// One non-blank line of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    /// 1-based line number in the original source file.
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        SourceLine {
            number,
            text: text.into(),
        }
    }
}

/// A loaded program: the instruction stream, blank lines removed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Program {
    pub lines: Vec<SourceLine>,
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("not a compiled fardthon image (bad magic bytes)")]
    BadMagic,

    #[error("unsupported image version {found} (expected {expected})")]
    Version { found: u16, expected: u16 },

    #[error("malformed image: {0}")]
    Codec(#[from] postcard::Error),
}

#[derive(Serialize, Deserialize)]
struct ImageHeader {
    magic: [u8; 4],
    version: u16,
}

impl Program {
    /// Split source text into lines, dropping whitespace-only ones.
    ///
    /// Line order is preserved and every kept line remembers its original
    /// line number.
    pub fn from_source(source: &str) -> Self {
        let lines = source
            .lines()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(i, text)| SourceLine::new(i + 1, text))
            .collect();

        Program { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Serialize into a compiled image: header, then the postcard-encoded
    /// program.
    pub fn to_image(&self) -> Result<Vec<u8>, ImageError> {
        let header = ImageHeader {
            magic: IMAGE_MAGIC,
            version: IMAGE_VERSION,
        };
        let mut bytes = postcard::to_allocvec(&header)?;
        bytes.extend(postcard::to_allocvec(self)?);
        Ok(bytes)
    }

    pub fn from_image(bytes: &[u8]) -> Result<Self, ImageError> {
        let (header, rest): (ImageHeader, &[u8]) = postcard::take_from_bytes(bytes)?;
        if header.magic != IMAGE_MAGIC {
            return Err(ImageError::BadMagic);
        }
        if header.version != IMAGE_VERSION {
            return Err(ImageError::Version {
                found: header.version,
                expected: IMAGE_VERSION,
            });
        }
        Ok(postcard::from_bytes(rest)?)
    }
}
