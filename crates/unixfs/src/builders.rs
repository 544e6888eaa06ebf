//! Ready-made payloads for the common node shapes.
//!
//! The encodings here are fixed by existing content: an empty directory is
//! always `08 01` and an empty file always `08 02 18 00`. Directory, symlink
//! and shard payloads carry no `filesize`; file and raw payloads always do.

use chrono::{DateTime, Utc};
use unixfs_config::ShardConfig;
use unixfs_pb::{self as pb, DataType};

use crate::dag::ProtoNode;
use crate::fsnode::FsNode;

/// File payload with an explicit total size.
///
/// `total_size` is the size of the whole file below this node (embedded bytes
/// plus every child), as computed by the chunker; it is stored verbatim.
pub fn file_data(data: Vec<u8>, total_size: u64) -> Vec<u8> {
    file_node(data, total_size).to_bytes()
}

/// [`file_data`] plus permission bits and modification time.
pub fn file_data_with_stat(
    data: Vec<u8>,
    total_size: u64,
    mode: u32,
    mtime: Option<DateTime<Utc>>,
) -> Vec<u8> {
    let mut node = file_node(data, total_size);
    add_stat(&mut node, mode, mtime);
    node.to_bytes()
}

fn file_node(data: Vec<u8>, total_size: u64) -> FsNode {
    let mut format = pb::Data::with_type(DataType::File);
    format.data = (!data.is_empty()).then_some(data);
    format.filesize = Some(total_size);
    FsNode::from_format(format)
}

/// Empty directory payload.
pub fn folder_data() -> Vec<u8> {
    pb::encode_data(&pb::Data::with_type(DataType::Directory))
}

/// Empty directory payload with permission bits and modification time.
pub fn folder_data_with_stat(mode: u32, mtime: Option<DateTime<Utc>>) -> Vec<u8> {
    let mut node = FsNode::from_format(pb::Data::with_type(DataType::Directory));
    add_stat(&mut node, mode, mtime);
    node.to_bytes()
}

fn add_stat(node: &mut FsNode, mode: u32, mtime: Option<DateTime<Utc>>) {
    node.set_mode(mode);
    node.set_mod_time(mtime);
}

/// Raw leaf payload: `bytes` with `filesize = len(bytes)`.
pub fn wrap_data(bytes: Vec<u8>) -> Vec<u8> {
    let mut node = FsNode::new(DataType::Raw);
    node.set_data(bytes);
    node.to_bytes()
}

/// Symlink payload pointing at `target`.
pub fn symlink_data(target: &str) -> Vec<u8> {
    let mut format = pb::Data::with_type(DataType::Symlink);
    format.data = Some(target.as_bytes().to_vec());
    pb::encode_data(&format)
}

/// HAMT shard header: occupancy bitfield `data` plus the shard parameters.
pub fn hamt_shard_data(data: Vec<u8>, fanout: u64, hash_type: u64) -> Vec<u8> {
    let mut format = pb::Data::with_type(DataType::HamtShard);
    format.data = Some(data);
    format.hash_type = Some(hash_type);
    format.fanout = Some(fanout);
    pb::encode_data(&format)
}

/// [`hamt_shard_data`] with parameters taken from configuration.
pub fn hamt_shard_data_with(config: &ShardConfig, data: Vec<u8>) -> Vec<u8> {
    hamt_shard_data(data, config.fanout, config.hash_type)
}

/// Structured node holding an empty directory.
pub fn empty_dir_node() -> ProtoNode {
    ProtoNode::with_data(folder_data())
}

pub fn empty_dir_node_with_stat(mode: u32, mtime: Option<DateTime<Utc>>) -> ProtoNode {
    ProtoNode::with_data(folder_data_with_stat(mode, mtime))
}

/// Structured node holding an empty file.
pub fn empty_file_node() -> ProtoNode {
    ProtoNode::with_data(file_data(Vec::new(), 0))
}
