use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("key not found")]
    KeyNotFound,
    #[error("tree invariant violated at node {node}: {reason}")]
    Invariant { node: u32, reason: String },
}

impl Error {
    pub(crate) fn invariant(node: u32, reason: impl Into<String>) -> Self {
        Self::Invariant {
            node,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
