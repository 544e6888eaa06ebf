//! Recover UnixFS content from DAG node handles.

use std::borrow::Cow;

use unixfs_config::{log_dispatch_debug, log_dispatch_warn};
use unixfs_pb::DataType;

use crate::dag::{DagNode, ProtoNode};
use crate::error::{type_name, Result, UnixFsError};
use crate::fsnode::FsNode;

/// File bytes held by a leaf node.
///
/// Raw nodes are returned as-is. Structured nodes are decoded and must be
/// `Raw` or `File`: leaves are meant to be `Raw`, but older writers used
/// `File` for leaves too, so both are accepted. Any other UnixFS type means
/// the node sits somewhere a leaf was expected.
pub fn read_unixfs_node_data(node: &DagNode) -> Result<Cow<'_, [u8]>> {
    match node {
        DagNode::Proto(proto) => {
            let fs_node = FsNode::from_bytes(proto.data())?;
            match fs_node.data_type() {
                Ok(DataType::File | DataType::Raw) => Ok(Cow::Owned(fs_node.into_data())),
                _ => {
                    let found = type_name(Some(fs_node.raw_type()));
                    log_dispatch_warn!("Non-leaf node in leaf position", node_type = found.as_str());
                    Err(UnixFsError::UnexpectedNodePlacement(found))
                }
            }
        }
        DagNode::Raw(raw) => Ok(Cow::Borrowed(raw.raw_data())),
        DagNode::Other { codec } => {
            log_dispatch_debug!("Unrecognized node codec", codec = *codec);
            Err(UnixFsError::UnrecognizedType(format!("codec {codec:#x}")))
        }
    }
}

/// Decode the UnixFS payload of a structured node.
pub fn extract_fs_node(node: &DagNode) -> Result<FsNode> {
    match node {
        DagNode::Proto(proto) => FsNode::from_bytes(proto.data()),
        DagNode::Raw(_) | DagNode::Other { .. } => Err(UnixFsError::NotStructuredNode),
    }
}

/// Check that `fs_node` declares one block size per link of `node`.
pub fn check_link_parity(node: &ProtoNode, fs_node: &FsNode) -> Result<()> {
    let links = node.links().len();
    let block_sizes = fs_node.num_children();
    if links != block_sizes {
        log_dispatch_warn!(
            "Link and block size counts differ",
            links = links,
            block_sizes = block_sizes
        );
        return Err(UnixFsError::LinkCountMismatch { links, block_sizes });
    }
    Ok(())
}
