use thiserror::Error;

/// Errors from LeanIMT operations.
///
/// Every variant is raised before the tree is touched, so a failed call
/// leaves all levels unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeanImtError {
    /// A batch operation was given no leaves.
    #[error("there are no leaves to add")]
    NoLeaves,
    /// The index does not address an existing leaf.
    #[error("the leaf at index {index} does not exist in this tree (size {size})")]
    LeafNotFound {
        /// Requested leaf index.
        index: usize,
        /// Number of leaves in the tree.
        size: usize,
    },
    /// Index and leaf sequences of a batch update differ in length.
    #[error("{indices} indices given for {leaves} leaves")]
    LengthMismatch {
        /// Number of indices.
        indices: usize,
        /// Number of replacement leaves.
        leaves: usize,
    },
    /// A batch update names the same leaf more than once.
    #[error("index {0} appears more than once")]
    DuplicateIndex(usize),
    /// The proof is structurally malformed.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
    /// The exported node payload could not be turned back into a tree.
    #[error("invalid nodes: {0}")]
    InvalidNodes(String),
    /// Binary encoding or decoding failed.
    #[error("encoding error: {0}")]
    Encoding(String),
}
