use thiserror::Error;
use unixfs_pb::{DataType, DecodeError, PbError};

/// Errors that can occur while decoding or inspecting UnixFS nodes
#[derive(Error, Debug)]
pub enum UnixFsError {
    #[error("malformed data in file format: {0}")]
    MalformedFormat(#[source] DecodeError),

    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("unrecognized node type: {0}")]
    UnrecognizedType(String),

    #[error("expected a structured node as internal node")]
    NotStructuredNode,

    #[error("found {0} node in unexpected place")]
    UnexpectedNodePlacement(String),

    #[error("can't get data size of {0} node")]
    NoSizeDefined(DataType),

    #[error("incorrect node type: expected {expected}, found {found}")]
    IncorrectNodeType { expected: DataType, found: String },

    #[error("block size index {index} out of range ({len} children)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("node has {links} links but {block_sizes} block sizes")]
    LinkCountMismatch { links: usize, block_sizes: usize },
}

pub type Result<T> = std::result::Result<T, UnixFsError>;

impl From<PbError> for UnixFsError {
    fn from(err: PbError) -> Self {
        match err {
            PbError::Decode(e) => UnixFsError::MalformedFormat(e),
            PbError::MissingField(field) => UnixFsError::MissingRequiredField(field),
        }
    }
}

/// Human-readable name for a wire type value, known or not.
pub(crate) fn type_name(raw: Option<i32>) -> String {
    match raw {
        Some(value) => match DataType::from_wire(value) {
            Some(t) => t.to_string(),
            None => format!("unknown({value})"),
        },
        None => "unset".to_string(),
    }
}
