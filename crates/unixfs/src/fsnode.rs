//! Typed, invariant-preserving view over one UnixFS `Data` payload.
//!
//! `FsNode` is the only way this crate mutates a payload. Every mutator that
//! touches the embedded bytes or the block size list moves `filesize` by the
//! exact delta, so for file nodes
//!
//! ```text
//! filesize == len(data) + sum(blocksizes)
//! ```
//!
//! holds after any sequence of calls starting from `FsNode::new`.
//!
//! The block size list runs parallel to the link list of the owning DAG node:
//! entry `i` is the logical size of the subtree behind link `i`. Keeping the
//! two in step is the caller's job (see `dispatch::check_link_parity`).

use chrono::{DateTime, Utc};
use unixfs_config::{log_codec_debug, log_codec_trace, log_node_debug, log_node_trace};
use unixfs_pb::{self as pb, DataType, UnixTime};

use crate::error::{type_name, Result, UnixFsError};

/// Low 12 bits of `mode`: rwx for user/group/other plus setuid, setgid, sticky
const PERMISSION_BITS: u32 = 0o7777;
/// High 20 bits of `mode`, carried opaquely
const EXTENDED_BITS: u32 = !PERMISSION_BITS;
const EXTENDED_SHIFT: u32 = 12;

const MAX_NANOS: u32 = 999_999_999;

const S_IFDIR: u32 = 0o040000;
const S_IFREG: u32 = 0o100000;
const S_IFLNK: u32 = 0o120000;

/// A filesystem object in UnixFS form.
///
/// Build one with [`FsNode::new`] (producer side) or [`FsNode::from_bytes`]
/// (consumer side); both guarantee the node type is set, which is what makes
/// [`FsNode::to_bytes`] infallible.
#[derive(Debug, Clone, PartialEq)]
pub struct FsNode {
    format: pb::Data,
}

impl FsNode {
    /// Create an empty node of the given type.
    ///
    /// `filesize` starts out present and zero rather than absent: nodes written
    /// before this crate existed always carried it, and dropping it would
    /// change the encoded bytes (and therefore the content address) of
    /// otherwise identical nodes.
    pub fn new(data_type: DataType) -> Self {
        let mut format = pb::Data::with_type(data_type);
        format.filesize = Some(0);
        Self { format }
    }

    /// Decode a serialized payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match pb::decode_data(bytes) {
            Ok(format) => {
                let node_type = type_name(format.r#type);
                log_codec_trace!(
                    "Decoded node payload",
                    len = bytes.len(),
                    node_type = node_type.as_str(),
                    children = format.blocksizes.len(),
                );
                Ok(Self { format })
            }
            Err(err) => {
                let reason = err.to_string();
                log_codec_debug!(
                    "Rejected node payload",
                    len = bytes.len(),
                    error = reason.as_str()
                );
                Err(err.into())
            }
        }
    }

    /// Wrap an already-typed payload. Callers inside the crate use this to
    /// reuse the stat helpers on payloads that must not carry `filesize`.
    pub(crate) fn from_format(format: pb::Data) -> Self {
        debug_assert!(format.r#type.is_some());
        Self { format }
    }

    /// Serialize the node.
    pub fn to_bytes(&self) -> Vec<u8> {
        pb::encode_data(&self.format)
    }

    /// Node type; fails for wire values this crate does not know.
    pub fn data_type(&self) -> Result<DataType> {
        self.format
            .data_type()
            .ok_or_else(|| UnixFsError::UnrecognizedType(type_name(self.format.r#type)))
    }

    /// Raw wire value of the node type.
    pub fn raw_type(&self) -> i32 {
        // from_bytes and new both guarantee presence
        self.format.r#type.unwrap_or_default()
    }

    /// Directories and HAMT shards.
    pub fn is_directory(&self) -> bool {
        matches!(
            self.format.data_type(),
            Some(DataType::Directory | DataType::HamtShard)
        )
    }

    /// HAMT hash function id, if stored.
    pub fn hash_type(&self) -> Option<u64> {
        self.format.hash_type
    }

    /// HAMT fanout, if stored.
    pub fn fanout(&self) -> Option<u64> {
        self.format.fanout
    }

    /// Embedded payload; empty when absent.
    pub fn data(&self) -> &[u8] {
        self.format.data.as_deref().unwrap_or_default()
    }

    pub fn into_data(self) -> Vec<u8> {
        self.format.data.unwrap_or_default()
    }

    /// Replace the embedded payload, moving `filesize` by the change in length.
    pub fn set_data(&mut self, data: Vec<u8>) {
        let old_len = self.data().len() as u64;
        self.adjust_filesize(data.len() as u64, old_len);
        self.format.data = Some(data);
    }

    /// Record the size of a newly appended child link.
    pub fn add_block_size(&mut self, size: u64) {
        self.adjust_filesize(size, 0);
        self.format.blocksizes.push(size);
    }

    /// Drop the size of child `index`, keeping the order of the rest.
    pub fn remove_block_size(&mut self, index: usize) -> Result<()> {
        let len = self.format.blocksizes.len();
        if index >= len {
            log_node_debug!("Block size index out of range", index = index, len = len);
            return Err(UnixFsError::IndexOutOfRange { index, len });
        }
        let removed = self.format.blocksizes.remove(index);
        self.adjust_filesize(0, removed);
        Ok(())
    }

    /// Drop every child size; the node now only accounts for its own bytes.
    pub fn remove_all_block_sizes(&mut self) {
        let dropped = self.format.blocksizes.len();
        log_node_trace!("Dropping all block sizes", children = dropped);
        self.format.blocksizes.clear();
        self.format.filesize = Some(self.data().len() as u64);
    }

    pub fn block_size(&self, index: usize) -> Option<u64> {
        self.format.blocksizes.get(index).copied()
    }

    pub fn block_sizes(&self) -> &[u64] {
        &self.format.blocksizes
    }

    pub fn num_children(&self) -> usize {
        self.format.blocksizes.len()
    }

    /// Logical size of the content this node stands for.
    ///
    /// Files and raw nodes report the stored `filesize`, symlinks the length
    /// of their target. Directories have no size and report an error rather
    /// than a misleading zero. Metadata nodes are not content at all and are
    /// rejected the same way as an unknown type.
    pub fn file_size(&self) -> Result<u64> {
        match self.data_type()? {
            DataType::File | DataType::Raw => Ok(self.format.filesize.unwrap_or(0)),
            DataType::Symlink => Ok(self.data().len() as u64),
            t @ (DataType::Directory | DataType::HamtShard) => Err(UnixFsError::NoSizeDefined(t)),
            DataType::Metadata => Err(UnixFsError::UnrecognizedType(
                DataType::Metadata.to_string(),
            )),
        }
    }

    // Wrapping keeps the arithmetic exact modulo 2^64 for payloads decoded
    // with an inconsistent filesize.
    fn adjust_filesize(&mut self, added: u64, removed: u64) {
        let current = self.format.filesize.unwrap_or(0);
        self.format.filesize = Some(current.wrapping_add(added).wrapping_sub(removed));
    }

    /// Stored permission bits (low 12 bits of `mode`), 0 when absent.
    pub fn mode(&self) -> u32 {
        self.format.mode.unwrap_or(0) & PERMISSION_BITS
    }

    /// Store permission bits, keeping the extended bits.
    ///
    /// Zero permissions with no extended bits clears `mode` altogether: an
    /// absent mode means "no stat info", which is how every node written
    /// before mode support reads.
    pub fn set_mode(&mut self, perms: u32) {
        let extended = self.format.mode.unwrap_or(0) & EXTENDED_BITS;
        self.store_mode(extended | (perms & PERMISSION_BITS));
    }

    /// Permissions combined with the file type bits implied by the node
    /// type, in `st_mode` layout. 0 when no permissions are stored.
    pub fn unix_mode(&self) -> u32 {
        let perms = self.mode();
        if perms == 0 {
            return 0;
        }
        let kind = match self.format.data_type() {
            Some(DataType::Directory | DataType::HamtShard) => S_IFDIR,
            Some(DataType::Symlink) => S_IFLNK,
            Some(DataType::File | DataType::Raw) => S_IFREG,
            _ => 0,
        };
        kind | perms
    }

    /// High 20 bits of `mode`, shifted down.
    pub fn extended_mode(&self) -> u32 {
        (self.format.mode.unwrap_or(0) & EXTENDED_BITS) >> EXTENDED_SHIFT
    }

    /// Store the extended bits; only the low 20 bits of `mode` are used.
    pub fn set_extended_mode(&mut self, mode: u32) {
        let perms = self.format.mode.unwrap_or(0) & PERMISSION_BITS;
        self.store_mode((mode << EXTENDED_SHIFT) | perms);
    }

    fn store_mode(&mut self, mode: u32) {
        self.format.mode = (mode != 0).then_some(mode);
    }

    /// Stored modification time.
    ///
    /// Nanoseconds outside 1..=999999999 were never valid on the wire, and
    /// seconds beyond the range `DateTime<Utc>` can hold have no value to map
    /// to. Either way the timestamp reads as absent instead of failing the
    /// whole node.
    pub fn mod_time(&self) -> Option<DateTime<Utc>> {
        let ts = self.format.mtime.as_ref()?;
        let nanos = match ts.nanos {
            None => 0,
            Some(n) if (1..=MAX_NANOS).contains(&n) => n,
            Some(_) => return None,
        };
        DateTime::<Utc>::from_timestamp(ts.seconds, nanos)
    }

    /// Store a modification time, or clear it with `None`.
    pub fn set_mod_time(&mut self, mtime: Option<DateTime<Utc>>) {
        let Some(mtime) = mtime else {
            self.format.mtime = None;
            return;
        };
        // chrono encodes leap seconds as nanos >= 1e9
        let nanos = mtime.timestamp_subsec_nanos().min(MAX_NANOS);
        self.format.mtime = Some(UnixTime {
            seconds: mtime.timestamp(),
            nanos: (nanos > 0).then_some(nanos),
        });
    }

    /// Copy permission bits and modification time from a filesystem stat.
    #[cfg(unix)]
    pub fn set_stat(&mut self, metadata: &std::fs::Metadata) {
        use std::os::unix::fs::PermissionsExt;

        self.set_mode(metadata.permissions().mode());
        self.set_mod_time(metadata.modified().ok().map(DateTime::<Utc>::from));
    }
}

/// Logical size of a serialized node, under the same rules as
/// [`FsNode::file_size`].
pub fn data_size(bytes: &[u8]) -> Result<u64> {
    FsNode::from_bytes(bytes)?.file_size()
}

/// Embedded payload of a serialized node.
pub fn unwrap_data(bytes: &[u8]) -> Result<Vec<u8>> {
    Ok(FsNode::from_bytes(bytes)?.into_data())
}
