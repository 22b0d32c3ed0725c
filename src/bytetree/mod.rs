//! Canonical byte-tree codec.
//!
//! A byte tree is either a leaf holding bytes or a node holding an ordered
//! sequence of subtrees. The framing is one tag byte (1 = leaf, 0 = node)
//! followed by a 32-bit big-endian count (byte count for leaves, child
//! count for nodes) and the payload. Encoding is deterministic, which makes
//! a value's byte tree its canonical hash input for challenge derivation.

use crate::errors::ByteTreeError;

const NODE_TAG: u8 = 0;
const LEAF_TAG: u8 = 1;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ByteTree {
    Leaf(Vec<u8>),
    Node(Vec<ByteTree>),
}

impl ByteTree {
    pub fn leaf(bytes: Vec<u8>) -> Self {
        ByteTree::Leaf(bytes)
    }

    pub fn node(children: Vec<ByteTree>) -> Self {
        ByteTree::Node(children)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            ByteTree::Leaf(bytes) => {
                out.push(LEAF_TAG);
                out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
                out.extend_from_slice(bytes);
            }
            ByteTree::Node(children) => {
                out.push(NODE_TAG);
                out.extend_from_slice(&(children.len() as u32).to_be_bytes());
                for child in children {
                    child.write(out);
                }
            }
        }
    }

    /// Decodes a byte tree occupying the whole input.
    pub fn from_bytes(bytes: &[u8]) -> Result<ByteTree, ByteTreeError> {
        let mut pos = 0usize;
        let tree = Self::read(bytes, &mut pos)?;
        if pos != bytes.len() {
            return Err(ByteTreeError::TrailingBytes(bytes.len() - pos));
        }
        Ok(tree)
    }

    fn read(bytes: &[u8], pos: &mut usize) -> Result<ByteTree, ByteTreeError> {
        let tag = *bytes.get(*pos).ok_or(ByteTreeError::Truncated)?;
        *pos += 1;
        let header = bytes
            .get(*pos..*pos + 4)
            .ok_or(ByteTreeError::Truncated)?;
        let count = u32::from_be_bytes(header.try_into().unwrap()) as usize;
        *pos += 4;
        if count == 0 {
            return Err(ByteTreeError::NonPositiveLength);
        }
        match tag {
            LEAF_TAG => {
                let end = pos.checked_add(count).ok_or(ByteTreeError::Truncated)?;
                let payload = bytes.get(*pos..end).ok_or(ByteTreeError::Truncated)?;
                *pos = end;
                Ok(ByteTree::Leaf(payload.to_vec()))
            }
            NODE_TAG => {
                // A child occupies at least five bytes, so the remaining
                // input bounds the allocation regardless of the declared
                // count.
                let remaining = bytes.len().saturating_sub(*pos);
                let mut children = Vec::with_capacity(count.min(remaining / 5));
                for _ in 0..count {
                    children.push(Self::read(bytes, pos)?);
                }
                Ok(ByteTree::Node(children))
            }
            other => Err(ByteTreeError::UnknownTag(other)),
        }
    }
}

/// Accepts raw bytes as a leaf at proof boundaries.
impl From<&[u8]> for ByteTree {
    fn from(bytes: &[u8]) -> Self {
        ByteTree::Leaf(bytes.to_vec())
    }
}

impl From<Vec<u8>> for ByteTree {
    fn from(bytes: Vec<u8>) -> Self {
        ByteTree::Leaf(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ByteTree {
        ByteTree::node(vec![
            ByteTree::leaf(vec![1, 2, 3]),
            ByteTree::node(vec![
                ByteTree::leaf(vec![0xff]),
                ByteTree::leaf(vec![0; 40]),
            ]),
            ByteTree::leaf(vec![9]),
        ])
    }

    #[test]
    fn round_trip() {
        let tree = sample();
        let bytes = tree.to_bytes();
        assert_eq!(ByteTree::from_bytes(&bytes).unwrap(), tree);
    }

    #[test]
    fn framing_is_exact() {
        let bytes = ByteTree::leaf(vec![0xab, 0xcd]).to_bytes();
        assert_eq!(bytes, vec![1, 0, 0, 0, 2, 0xab, 0xcd]);
        let bytes = ByteTree::node(vec![ByteTree::leaf(vec![7])]).to_bytes();
        assert_eq!(bytes, vec![0, 0, 0, 0, 1, 1, 0, 0, 0, 1, 7]);
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!(
            ByteTree::from_bytes(&[2, 0, 0, 0, 1, 7]),
            Err(ByteTreeError::UnknownTag(2))
        );
    }

    #[test]
    fn rejects_zero_length() {
        assert_eq!(
            ByteTree::from_bytes(&[1, 0, 0, 0, 0]),
            Err(ByteTreeError::NonPositiveLength)
        );
        assert_eq!(
            ByteTree::from_bytes(&[0, 0, 0, 0, 0]),
            Err(ByteTreeError::NonPositiveLength)
        );
    }

    #[test]
    fn rejects_truncation() {
        let mut bytes = sample().to_bytes();
        bytes.pop();
        assert_eq!(ByteTree::from_bytes(&bytes), Err(ByteTreeError::Truncated));
        assert_eq!(ByteTree::from_bytes(&[1, 0, 0]), Err(ByteTreeError::Truncated));
        // Declared leaf length overruns the buffer.
        assert_eq!(
            ByteTree::from_bytes(&[1, 0, 0, 0, 9, 1, 2]),
            Err(ByteTreeError::Truncated)
        );
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = sample().to_bytes();
        bytes.push(0);
        assert_eq!(
            ByteTree::from_bytes(&bytes),
            Err(ByteTreeError::TrailingBytes(1))
        );
    }

    #[test]
    fn bytes_adapt_to_a_leaf() {
        let tree: ByteTree = vec![1u8, 2, 3].into();
        assert_eq!(tree, ByteTree::leaf(vec![1, 2, 3]));
    }
}
