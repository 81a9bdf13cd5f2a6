//! Upload metadata as seen by the analysis pipeline.

use serde::Serialize;
use thiserror::Error;

/// Errors raised when constructing a [`FileDescriptor`].
///
/// This is the only failure surface of the analysis core: once a descriptor
/// exists, every downstream operation is total.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),
}

/// Immutable metadata of one uploaded file.
///
/// The pipeline never reads audio content, only this descriptor. Created once
/// per upload and discarded at the end of the request.
#[derive(Debug, Clone, Serialize)]
pub struct FileDescriptor {
    name: String,
    size_bytes: u64,
    extension: String,
}

impl FileDescriptor {
    /// Build a descriptor from a client-supplied file name and payload size.
    ///
    /// An empty name is valid (keyword scans simply find nothing); names with
    /// embedded NUL bytes are rejected. The extension is derived from the
    /// name, lowercased, without the leading dot.
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Result<Self, DescriptorError> {
        let name = name.into();
        if name.contains('\0') {
            return Err(DescriptorError::InvalidName(name));
        }
        let extension = name
            .rsplit_once('.')
            .map(|(stem, ext)| if stem.is_empty() { "" } else { ext })
            .unwrap_or("")
            .to_lowercase();
        Ok(Self {
            name,
            size_bytes,
            extension,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The file name lowercased, the form all keyword scans run against.
    pub fn name_lower(&self) -> String {
        self.name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_derived_and_lowercased() {
        let d = FileDescriptor::new("Track.MP3", 1024).unwrap();
        assert_eq!(d.extension(), "mp3");
        assert_eq!(d.name(), "Track.MP3");
        assert_eq!(d.size_bytes(), 1024);
    }

    #[test]
    fn test_no_extension() {
        let d = FileDescriptor::new("track", 0).unwrap();
        assert_eq!(d.extension(), "");
    }

    #[test]
    fn test_hidden_file_has_no_extension() {
        // ".flac" is a bare dotfile name, not an extension carrier.
        let d = FileDescriptor::new(".flac", 0).unwrap();
        assert_eq!(d.extension(), "");
    }

    #[test]
    fn test_empty_name_is_valid() {
        let d = FileDescriptor::new("", 0).unwrap();
        assert_eq!(d.name(), "");
        assert_eq!(d.extension(), "");
    }

    #[test]
    fn test_nul_byte_rejected() {
        assert!(FileDescriptor::new("bad\0name.mp3", 10).is_err());
    }
}
