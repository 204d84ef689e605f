//! Node identities: real block ids and locally generated temporary ids

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Prefix of every locally generated id. Remote block ids are UUIDs and never start with it.
pub const TMP_ID_PREFIX: &str = "tmp-";

/// Id of the synthetic root sentinel created by the tree builder.
pub const ROOT_NODE_ID: &str = "tmp-0000000000";

const TMP_ID_LEN: usize = 10;

/// Identity of a node in a block tree.
///
/// Equal to the wrapped block's id when the block has one, otherwise a temporary id
/// (see [`new_tmp_identifier`]). Assigned once when the node is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the root sentinel.
    pub fn root() -> Self {
        Self(ROOT_NODE_ID.to_string())
    }

    /// Use `block_id` if it is non-empty, otherwise generate a temporary id.
    pub fn from_block_id(block_id: &str) -> Self {
        if block_id.is_empty() {
            Self(new_tmp_identifier())
        } else {
            Self(block_id.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for ids generated locally (not yet persisted remotely), including the root sentinel.
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TMP_ID_PREFIX)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Generate a temporary identifier: `tmp-` followed by 10 symbols of `[a-zA-Z0-9]`.
///
/// No registry is kept, uniqueness is probabilistic.
pub fn new_tmp_identifier() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TMP_ID_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", TMP_ID_PREFIX, suffix)
}
