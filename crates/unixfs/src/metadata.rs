//! Metadata nodes: a MIME type nested inside a `Data{type=Metadata}` payload.
//!
//! The encoding has two layers. The outer `Data` carries the declared size of
//! the described content in `filesize`; the inner `Metadata` message carries
//! only the MIME type. Decoding recovers the MIME type alone. The size is
//! whatever the writer supplied and is neither re-derived nor checked.

use unixfs_config::log_metadata_debug;
use unixfs_pb::{self as pb, DataType};

use crate::error::{type_name, Result, UnixFsError};

/// Additional information about a node's content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub mime_type: String,
    /// Declared size of the described content; caller supplied
    pub size: u64,
}

impl Metadata {
    pub fn new(mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            mime_type: mime_type.into(),
            size,
        }
    }

    /// Decode a wrapped metadata payload (see [`Metadata::to_wrapped_bytes`]).
    ///
    /// `size` is left at 0: it lives in the outer envelope and is not part of
    /// what this path recovers.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let outer = pb::decode_data(bytes)?;
        if outer.data_type() != Some(DataType::Metadata) {
            let found = type_name(outer.r#type);
            log_metadata_debug!("Wrong node type for metadata", found = found.as_str());
            return Err(UnixFsError::IncorrectNodeType {
                expected: DataType::Metadata,
                found,
            });
        }

        let inner = pb::decode_metadata(outer.data.as_deref().unwrap_or_default())?;
        Ok(Self {
            mime_type: inner.mime_type.unwrap_or_default(),
            size: 0,
        })
    }

    /// Inner encoding: the `Metadata` message alone.
    pub fn bytes(&self) -> Vec<u8> {
        pb::encode_metadata(&pb::Metadata {
            mime_type: Some(self.mime_type.clone()),
        })
    }

    /// Outer encoding: a `Metadata` node with `filesize = self.size` and the
    /// inner encoding as its payload.
    pub fn to_wrapped_bytes(&self) -> Vec<u8> {
        let mut outer = pb::Data::with_type(DataType::Metadata);
        outer.filesize = Some(self.size);
        outer.data = Some(self.bytes());
        pb::encode_data(&outer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FsNode;

    #[test]
    fn test_mime_type_roundtrip() {
        let md = Metadata::new("text/plain", 42);
        let decoded = Metadata::from_bytes(&md.to_wrapped_bytes()).unwrap();
        assert_eq!(decoded.mime_type, "text/plain");
    }

    #[test]
    fn test_size_not_recovered() {
        let md = Metadata::new("image/png", 42);
        let wrapped = md.to_wrapped_bytes();

        let decoded = Metadata::from_bytes(&wrapped).unwrap();
        assert_eq!(decoded.size, 0);
        assert_ne!(decoded, md);

        // still present in the envelope
        let outer = pb::decode_data(&wrapped).unwrap();
        assert_eq!(outer.filesize, Some(42));
    }

    #[test]
    fn test_size_is_not_validated() {
        let md = Metadata::new("application/octet-stream", u64::MAX);
        assert!(Metadata::from_bytes(&md.to_wrapped_bytes()).is_ok());
    }

    #[test]
    fn test_wrong_type_rejected() {
        let file = FsNode::new(DataType::File).to_bytes();
        let err = Metadata::from_bytes(&file).unwrap_err();
        assert!(matches!(
            err,
            UnixFsError::IncorrectNodeType {
                expected: DataType::Metadata,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_inner_payload() {
        let mut outer = pb::Data::with_type(DataType::Metadata);
        outer.data = Some(vec![0x0a, 0x05, b'a']);
        let err = Metadata::from_bytes(&pb::encode_data(&outer)).unwrap_err();
        assert!(matches!(err, UnixFsError::MalformedFormat(_)));
    }

    #[test]
    fn test_missing_inner_payload_reads_empty() {
        let outer = pb::Data::with_type(DataType::Metadata);
        let md = Metadata::from_bytes(&pb::encode_data(&outer)).unwrap();
        assert_eq!(md.mime_type, "");
    }

    #[test]
    fn test_empty_mime_type_is_still_written() {
        let md = Metadata::new("", 0);
        assert_eq!(md.bytes(), vec![0x0a, 0x00]);
    }
}
