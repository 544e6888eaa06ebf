//! Minimal DAG node handles.
//!
//! The DAG layer owns hashing, persistence and link storage. These types only
//! carry what the UnixFS codec reads and writes: a node's payload bytes and,
//! for structured nodes, its ordered child links with their declared sizes.

/// Opaque identifier of a link target (a content address owned by the DAG layer)
pub type LinkTarget = Vec<u8>;

/// Named, sized reference from a structured node to a child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Entry name (empty for file chunks)
    pub name: String,
    /// Size the DAG layer declares for the whole child subtree
    pub size: u64,
    /// Content address of the child
    pub target: LinkTarget,
}

impl Link {
    pub fn new(name: impl Into<String>, size: u64, target: LinkTarget) -> Self {
        Self {
            name: name.into(),
            size,
            target,
        }
    }
}

/// Structured node: a UnixFS `Data` payload plus an ordered link list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtoNode {
    data: Vec<u8>,
    links: Vec<Link>,
}

impl ProtoNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node carrying `data` as its payload and no links
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data,
            links: Vec::new(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Replace the payload (typically with `FsNode::to_bytes()`)
    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = data;
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Remove the link at `index`, keeping the order of the rest
    pub fn remove_link(&mut self, index: usize) -> Option<Link> {
        (index < self.links.len()).then(|| self.links.remove(index))
    }
}

/// Leaf node whose bytes are file content, with no UnixFS envelope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawNode {
    data: Vec<u8>,
}

impl RawNode {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }
}

/// Any node handed over by the DAG layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DagNode {
    Proto(ProtoNode),
    Raw(RawNode),
    /// A node kind this crate does not interpret, identified by its codec
    Other { codec: u64 },
}

impl From<ProtoNode> for DagNode {
    fn from(node: ProtoNode) -> Self {
        DagNode::Proto(node)
    }
}

impl From<RawNode> for DagNode {
    fn from(node: RawNode) -> Self {
        DagNode::Raw(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_keep_order() {
        let mut node = ProtoNode::with_data(vec![0x08, 0x02]);
        node.add_link(Link::new("", 10, vec![1]));
        node.add_link(Link::new("", 20, vec![2]));
        node.add_link(Link::new("", 30, vec![3]));

        let removed = node.remove_link(1).unwrap();
        assert_eq!(removed.size, 20);
        let sizes: Vec<u64> = node.links().iter().map(|l| l.size).collect();
        assert_eq!(sizes, vec![10, 30]);
        assert!(node.remove_link(5).is_none());
    }
}
