//! # unixfs
//!
//! UnixFS node model for content-addressed filesystems.
//!
//! Every node of a UnixFS DAG carries a small `Data` payload describing what
//! it is (file, directory, symlink, HAMT shard, metadata, raw leaf) and how
//! big the content behind it is. This crate owns that payload:
//!
//! - [`FsNode`]: typed view that keeps `filesize` consistent with the embedded
//!   bytes and the per-child block sizes across mutation
//! - [`Metadata`]: MIME type nested inside a metadata node
//! - [`dispatch`]: recover leaf bytes or an `FsNode` from a [`DagNode`]
//! - [`builders`]: canonical payloads (empty directory, empty file, symlink,
//!   shard header)
//!
//! Hashing, link storage and persistence belong to the DAG layer; the types
//! in [`dag`] only carry the payload and the ordered link list.
//!
//! ## Example
//!
//! ```
//! use unixfs::{DataType, FsNode};
//!
//! let mut node = FsNode::new(DataType::File);
//! node.add_block_size(10);
//! node.add_block_size(20);
//! node.set_data(vec![1, 2, 3]);
//! assert_eq!(node.file_size().unwrap(), 33);
//!
//! let decoded = FsNode::from_bytes(&node.to_bytes()).unwrap();
//! assert_eq!(decoded.block_sizes(), &[10, 20]);
//! ```

pub mod builders;
pub mod dag;
pub mod dispatch;
mod error;
pub mod fsnode;
pub mod metadata;

pub use dag::{DagNode, Link, ProtoNode, RawNode};
pub use dispatch::{check_link_parity, extract_fs_node, read_unixfs_node_data};
pub use error::{Result, UnixFsError};
pub use fsnode::{data_size, unwrap_data, FsNode};
pub use metadata::Metadata;
pub use unixfs_pb::DataType;
