//! # unixfs-pb
//!
//! Wire schema for UnixFS node payloads.
//!
//! These messages are the byte-level contract shared by every producer and
//! consumer of UnixFS nodes. Field numbers, wire types and the proto2
//! optional/required labels MUST stay bit-compatible with the historical
//! schema:
//!
//! ```text
//! message Data {
//!     enum DataType { Raw = 0; Directory = 1; File = 2; Metadata = 3; Symlink = 4; HAMTShard = 5; }
//!     required DataType Type = 1;
//!     optional bytes Data = 2;
//!     optional uint64 filesize = 3;
//!     repeated uint64 blocksizes = 4;
//!     optional uint64 hashType = 5;
//!     optional uint64 fanout = 6;
//!     optional uint32 mode = 7;
//!     optional UnixTime mtime = 8;
//! }
//!
//! message Metadata { optional string MimeType = 1; }
//!
//! message UnixTime { required int64 Seconds = 1; optional fixed32 FractionalNanoseconds = 2; }
//! ```
//!
//! `Type` is modelled as optional so that a payload missing it can be
//! rejected on decode instead of silently reading as `Raw`.

use std::fmt;

use prost::Message;
use thiserror::Error;

pub use prost::DecodeError;

/// Errors that can occur while decoding wire payloads
#[derive(Error, Debug)]
pub enum PbError {
    #[error("malformed protobuf: {0}")]
    Decode(#[from] DecodeError),

    #[error("required field `{0}` not set")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, PbError>;

/// Node kind discriminator (field 1 of `Data`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum DataType {
    Raw = 0,
    Directory = 1,
    File = 2,
    Metadata = 3,
    Symlink = 4,
    HamtShard = 5,
}

impl DataType {
    /// Map a wire value to a known kind, `None` for values this crate does not know.
    pub fn from_wire(value: i32) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Name used by the historical schema.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Raw => "Raw",
            DataType::Directory => "Directory",
            DataType::File => "File",
            DataType::Metadata => "Metadata",
            DataType::Symlink => "Symlink",
            DataType::HamtShard => "HAMTShard",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// UnixFS node payload
#[derive(Clone, PartialEq, prost::Message)]
pub struct Data {
    #[prost(enumeration = "DataType", optional, tag = "1")]
    pub r#type: Option<i32>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub data: Option<Vec<u8>>,
    #[prost(uint64, optional, tag = "3")]
    pub filesize: Option<u64>,
    #[prost(uint64, repeated, packed = "false", tag = "4")]
    pub blocksizes: Vec<u64>,
    #[prost(uint64, optional, tag = "5")]
    pub hash_type: Option<u64>,
    #[prost(uint64, optional, tag = "6")]
    pub fanout: Option<u64>,
    #[prost(uint32, optional, tag = "7")]
    pub mode: Option<u32>,
    #[prost(message, optional, tag = "8")]
    pub mtime: Option<UnixTime>,
}

impl Data {
    /// Create a payload of the given kind with every other field absent.
    pub fn with_type(data_type: DataType) -> Self {
        Self {
            r#type: Some(data_type as i32),
            ..Default::default()
        }
    }

    /// Decoded kind, `None` when absent or not a known wire value.
    pub fn data_type(&self) -> Option<DataType> {
        self.r#type.and_then(DataType::from_wire)
    }
}

/// Modification time: seconds since the Unix epoch plus optional nanoseconds
#[derive(Clone, PartialEq, prost::Message)]
pub struct UnixTime {
    #[prost(int64, required, tag = "1")]
    pub seconds: i64,
    #[prost(fixed32, optional, tag = "2")]
    pub nanos: Option<u32>,
}

/// Inner payload of a `Metadata` node
#[derive(Clone, PartialEq, prost::Message)]
pub struct Metadata {
    #[prost(string, optional, tag = "1")]
    pub mime_type: Option<String>,
}

/// Decode a `Data` payload, rejecting payloads without a `Type`.
pub fn decode_data(bytes: &[u8]) -> Result<Data> {
    let data = Data::decode(bytes)?;
    if data.r#type.is_none() {
        return Err(PbError::MissingField("Type"));
    }
    Ok(data)
}

/// Encode a `Data` payload.
///
/// # Panics
///
/// Panics if `Type` is unset. Every constructor in this workspace sets it,
/// so reaching this is a programming error rather than a caller error.
pub fn encode_data(data: &Data) -> Vec<u8> {
    assert!(
        data.r#type.is_some(),
        "unixfs Data payload encoded without its required Type field"
    );
    data.encode_to_vec()
}

/// Decode the inner `Metadata` message.
pub fn decode_metadata(bytes: &[u8]) -> Result<Metadata> {
    Ok(Metadata::decode(bytes)?)
}

/// Encode the inner `Metadata` message.
pub fn encode_metadata(metadata: &Metadata) -> Vec<u8> {
    metadata.encode_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_directory_bytes() {
        let bytes = encode_data(&Data::with_type(DataType::Directory));
        assert_eq!(bytes, vec![0x08, 0x01]);
    }

    #[test]
    fn test_zero_filesize_is_encoded() {
        let mut data = Data::with_type(DataType::File);
        data.filesize = Some(0);
        assert_eq!(encode_data(&data), vec![0x08, 0x02, 0x18, 0x00]);
    }

    #[test]
    fn test_blocksizes_are_unpacked() {
        let mut data = Data::with_type(DataType::File);
        data.blocksizes = vec![10, 20];
        assert_eq!(encode_data(&data), vec![0x08, 0x02, 0x20, 0x0a, 0x20, 0x14]);
    }

    #[test]
    fn test_packed_blocksizes_still_decode() {
        // field 4, length-delimited, two varints
        let bytes = [0x08, 0x02, 0x22, 0x02, 0x0a, 0x14];
        let data = decode_data(&bytes).unwrap();
        assert_eq!(data.blocksizes, vec![10, 20]);
    }

    #[test]
    fn test_mtime_nanos_fixed32() {
        let mut data = Data::with_type(DataType::File);
        data.mtime = Some(UnixTime {
            seconds: 1,
            nanos: Some(5),
        });
        assert_eq!(
            encode_data(&data),
            vec![0x08, 0x02, 0x42, 0x07, 0x08, 0x01, 0x15, 0x05, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_missing_type_rejected() {
        // filesize only
        let err = decode_data(&[0x18, 0x05]).unwrap_err();
        assert!(matches!(err, PbError::MissingField("Type")));
    }

    #[test]
    fn test_malformed_rejected() {
        // length prefix runs past the end of the buffer
        let err = decode_data(&[0x08, 0x02, 0x12, 0x10, 0x01]).unwrap_err();
        assert!(matches!(err, PbError::Decode(_)));
    }

    #[test]
    fn test_unknown_type_decodes() {
        let data = decode_data(&[0x08, 0x09]).unwrap();
        assert_eq!(data.r#type, Some(9));
        assert_eq!(data.data_type(), None);
    }

    #[test]
    fn test_metadata_message() {
        let md = Metadata {
            mime_type: Some("text/plain".to_string()),
        };
        let bytes = encode_metadata(&md);
        assert_eq!(bytes[0], 0x0a);
        assert_eq!(decode_metadata(&bytes).unwrap(), md);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(DataType::HamtShard.to_string(), "HAMTShard");
        assert_eq!(DataType::from_wire(2), Some(DataType::File));
        assert_eq!(DataType::from_wire(6), None);
    }

    #[test]
    #[should_panic(expected = "required Type field")]
    fn test_encode_without_type_panics() {
        encode_data(&Data::default());
    }
}
