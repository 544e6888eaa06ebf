//! Property tests: size accounting and encode/decode fidelity.

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use unixfs::{DataType, FsNode, UnixFsError};
use unixfs_pb as pb;

#[derive(Debug, Clone)]
enum Op {
    SetData(Vec<u8>),
    AddBlockSize(u64),
    RemoveBlockSize(usize),
    RemoveAllBlockSizes,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Op::SetData),
        (0u64..1 << 40).prop_map(Op::AddBlockSize),
        (0usize..12).prop_map(Op::RemoveBlockSize),
        Just(Op::RemoveAllBlockSizes),
    ]
}

fn expected_size(node: &FsNode) -> u64 {
    node.data().len() as u64 + node.block_sizes().iter().sum::<u64>()
}

fn data_type_strategy() -> impl Strategy<Value = DataType> {
    prop_oneof![
        Just(DataType::Raw),
        Just(DataType::Directory),
        Just(DataType::File),
        Just(DataType::Metadata),
        Just(DataType::Symlink),
        Just(DataType::HamtShard),
    ]
}

proptest! {
    #[test]
    fn filesize_tracks_data_and_children(ops in prop::collection::vec(op_strategy(), 0..48)) {
        let mut node = FsNode::new(DataType::File);
        prop_assert_eq!(node.file_size().unwrap(), 0);

        for op in ops {
            match op {
                Op::SetData(data) => node.set_data(data),
                Op::AddBlockSize(size) => node.add_block_size(size),
                Op::RemoveBlockSize(index) => {
                    let before = node.block_sizes().to_vec();
                    match node.remove_block_size(index) {
                        Ok(()) => {
                            let mut expected = before;
                            expected.remove(index);
                            prop_assert_eq!(node.block_sizes(), expected.as_slice());
                        }
                        Err(UnixFsError::IndexOutOfRange { index: i, len }) => {
                            prop_assert_eq!(i, index);
                            prop_assert_eq!(len, before.len());
                            prop_assert_eq!(node.block_sizes(), before.as_slice());
                        }
                        Err(other) => prop_assert!(false, "unexpected error: {}", other),
                    }
                }
                Op::RemoveAllBlockSizes => node.remove_all_block_sizes(),
            }
            prop_assert_eq!(node.file_size().unwrap(), expected_size(&node));
        }

        // the invariant survives the wire
        let decoded = FsNode::from_bytes(&node.to_bytes()).unwrap();
        prop_assert_eq!(decoded.file_size().unwrap(), expected_size(&decoded));
    }

    #[test]
    fn mode_bits_pack_independently(perms in any::<u32>(), extended in any::<u32>()) {
        let mut node = FsNode::new(DataType::File);
        node.set_extended_mode(extended);
        node.set_mode(perms);
        prop_assert_eq!(node.mode(), perms & 0o7777);
        prop_assert_eq!(node.extended_mode(), extended & 0xF_FFFF);

        let decoded = FsNode::from_bytes(&node.to_bytes()).unwrap();
        prop_assert_eq!(decoded.mode(), perms & 0o7777);
        prop_assert_eq!(decoded.extended_mode(), extended & 0xF_FFFF);

        // mode is absent exactly when no bit is set
        let mode_present = pb::decode_data(&node.to_bytes()).unwrap().mode.is_some();
        prop_assert_eq!(mode_present, perms & 0o7777 != 0 || extended & 0xF_FFFF != 0);
    }

    #[test]
    fn mtime_roundtrips(seconds in -10_000_000_000i64..10_000_000_000, nanos in 0u32..1_000_000_000) {
        let mtime = DateTime::<Utc>::from_timestamp(seconds, nanos).unwrap();
        let mut node = FsNode::new(DataType::Directory);
        node.set_mod_time(Some(mtime));

        let decoded = FsNode::from_bytes(&node.to_bytes()).unwrap();
        prop_assert_eq!(decoded.mod_time(), Some(mtime));
    }

    #[test]
    fn decode_encode_preserves_every_field(
        data_type in data_type_strategy(),
        data in prop::option::of(prop::collection::vec(any::<u8>(), 0..32)),
        filesize in prop::option::of(any::<u64>()),
        blocksizes in prop::collection::vec(any::<u64>(), 0..8),
        hash_type in prop::option::of(any::<u64>()),
        fanout in prop::option::of(any::<u64>()),
        mode in prop::option::of(any::<u32>()),
        mtime in prop::option::of((any::<i64>(), prop::option::of(any::<u32>()))),
    ) {
        let format = pb::Data {
            r#type: Some(data_type as i32),
            data,
            filesize,
            blocksizes,
            hash_type,
            fanout,
            mode,
            mtime: mtime.map(|(seconds, nanos)| pb::UnixTime { seconds, nanos }),
        };
        let bytes = pb::encode_data(&format);

        let node = FsNode::from_bytes(&bytes).unwrap();
        prop_assert_eq!(node.to_bytes(), bytes);
        prop_assert_eq!(node.data_type().unwrap(), data_type);
        prop_assert_eq!(node.block_sizes(), format.blocksizes.as_slice());
        prop_assert_eq!(node.hash_type(), format.hash_type);
        prop_assert_eq!(node.fanout(), format.fanout);
        prop_assert_eq!(node.data(), format.data.as_deref().unwrap_or_default());
    }
}
