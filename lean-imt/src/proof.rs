//! Membership proofs.
//!
//! A [`Proof`] records the leaf count of the tree it was generated from.
//! Whether a level combines or carries depends only on that count and the
//! leaf index, so the verifier recomputes the expected [`PathStep`]s and
//! refuses proofs whose recorded path disagrees, instead of guessing the
//! shape from the number of siblings.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::{
    LeanIMT, LeanImtError, Result,
    helper::{path_steps, step_at},
};

/// What happens to the path node at one level of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum PathStep {
    /// The path node is the left operand: `hash(node, sibling)`.
    Left,
    /// The path node is the right operand: `hash(sibling, node)`.
    Right,
    /// The path node has no partner and moves up unchanged.
    Carry,
}

impl PathStep {
    /// Returns `true` if this level consumes a sibling.
    pub fn is_combine(self) -> bool {
        !matches!(self, PathStep::Carry)
    }
}

/// A membership proof for one leaf.
///
/// `path` has one entry per level (leaf level first); `siblings` has one
/// entry per [`PathStep::Left`] or [`PathStep::Right`] in `path`, in the
/// same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(try_from = "ProofFields<T>")]
pub struct Proof<T> {
    /// Root of the tree at generation time.
    pub root: T,
    /// The proved leaf.
    pub leaf: T,
    /// Position of the leaf.
    pub index: usize,
    /// Number of leaves in the tree at generation time.
    pub size: usize,
    /// Sibling values, one per combining level.
    pub siblings: Vec<T>,
    /// Combine/carry decision at every level.
    pub path: Vec<PathStep>,
}

/// Serde form of a [`Proof`], structurally checked before conversion.
#[derive(Deserialize)]
struct ProofFields<T> {
    root: T,
    leaf: T,
    index: usize,
    size: usize,
    siblings: Vec<T>,
    path: Vec<PathStep>,
}

impl<T> TryFrom<ProofFields<T>> for Proof<T> {
    type Error = LeanImtError;

    fn try_from(fields: ProofFields<T>) -> Result<Self> {
        let proof = Proof {
            root: fields.root,
            leaf: fields.leaf,
            index: fields.index,
            size: fields.size,
            siblings: fields.siblings,
            path: fields.path,
        };
        proof.check_structure()?;
        Ok(proof)
    }
}

impl<T> Proof<T> {
    /// One entry per sibling: `1` when the path node is the right operand,
    /// `0` when it is the left one.
    pub fn path_indices(&self) -> Vec<u8> {
        self.path
            .iter()
            .filter_map(|step| match step {
                PathStep::Left => Some(0),
                PathStep::Right => Some(1),
                PathStep::Carry => None,
            })
            .collect()
    }

    /// [`path_indices`](Self::path_indices) packed into an integer, bit `i`
    /// belonging to sibling `i`.
    ///
    /// Returns [`LeanImtError::InvalidProof`] if the proof is structurally
    /// malformed.
    pub fn compressed_index(&self) -> Result<usize> {
        self.check_structure()?;
        self.path_indices()
            .iter()
            .enumerate()
            .try_fold(0usize, |acc, (i, bit)| {
                let shifted = (*bit as usize).checked_shl(i as u32).ok_or_else(|| {
                    LeanImtError::InvalidProof(format!("{} siblings do not fit a usize", i + 1))
                })?;
                Ok(acc | shifted)
            })
    }

    /// Check that `path` and `siblings` are consistent with `index` and
    /// `size`.
    fn check_structure(&self) -> Result<()> {
        let expected = path_steps(self.index, self.size).ok_or_else(|| {
            LeanImtError::InvalidProof(format!(
                "index {} is out of range (size={})",
                self.index, self.size
            ))
        })?;
        if self.path.len() != expected.len() {
            return Err(LeanImtError::InvalidProof(format!(
                "path has {} steps but a tree of {} leaves has depth {}",
                self.path.len(),
                self.size,
                expected.len()
            )));
        }
        if self.path != expected {
            return Err(LeanImtError::InvalidProof(format!(
                "path does not match leaf {} of a tree of {} leaves",
                self.index, self.size
            )));
        }
        let combines = expected.iter().filter(|step| step.is_combine()).count();
        if self.siblings.len() != combines {
            return Err(LeanImtError::InvalidProof(format!(
                "expected {} siblings, got {}",
                combines,
                self.siblings.len()
            )));
        }
        Ok(())
    }
}

impl<T: Clone + PartialEq> Proof<T> {
    /// Verify this proof with `hash`. See [`verify_proof`].
    pub fn verify<H>(&self, hash: H) -> Result<bool>
    where
        H: Fn(&T, &T) -> T,
    {
        verify_proof(self, hash)
    }
}

impl<T: Encode> Proof<T> {
    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| LeanImtError::Encoding(format!("encode error: {}", e)))
    }
}

impl<T: Decode<()>> Proof<T> {
    /// Decode from bytes using bincode.
    ///
    /// The decoded proof is checked for structural consistency, so a
    /// successfully decoded proof can only fail verification on its values.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 100 * 1024 * 1024 }>(); // 100MB limit
        let (proof, _): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| LeanImtError::Encoding(format!("decode error: {}", e)))?;
        proof.check_structure()?;
        Ok(proof)
    }
}

/// Verify `proof` by replaying its path with `hash`.
///
/// Starting from the leaf, every combining step applies `hash` with the path
/// node on the recorded side and every carry step passes the node through.
/// Returns whether the result equals `proof.root`.
///
/// A root mismatch is reported as `Ok(false)`. Only a structurally
/// malformed proof is an error ([`LeanImtError::InvalidProof`]).
pub fn verify_proof<T, H>(proof: &Proof<T>, hash: H) -> Result<bool>
where
    T: Clone + PartialEq,
    H: Fn(&T, &T) -> T,
{
    proof.check_structure()?;

    let mut siblings = proof.siblings.iter();
    let mut node = proof.leaf.clone();
    for step in &proof.path {
        node = match step {
            PathStep::Carry => node,
            PathStep::Left | PathStep::Right => {
                let sibling = siblings.next().ok_or_else(|| {
                    LeanImtError::InvalidProof("not enough siblings".into())
                })?;
                if *step == PathStep::Left {
                    hash(&node, sibling)
                } else {
                    hash(sibling, &node)
                }
            }
        };
    }
    Ok(node == proof.root)
}

impl<T: Clone, H> LeanIMT<T, H> {
    /// Generate a membership proof for the leaf at `index`.
    ///
    /// Returns [`LeanImtError::LeafNotFound`] if `index >= size`.
    pub fn generate_proof(&self, index: usize) -> Result<Proof<T>> {
        let size = self.size();
        if index >= size {
            return Err(LeanImtError::LeafNotFound { index, size });
        }
        let levels = self.levels();

        let mut path = Vec::with_capacity(self.depth());
        let mut siblings = Vec::with_capacity(self.depth());
        let mut node_index = index;
        for level in &levels[..self.depth()] {
            let step = step_at(node_index, level.len());
            match step {
                PathStep::Left => siblings.push(level[node_index + 1].clone()),
                PathStep::Right => siblings.push(level[node_index - 1].clone()),
                PathStep::Carry => {}
            }
            path.push(step);
            node_index >>= 1;
        }

        let root = self
            .root()
            .cloned()
            .ok_or(LeanImtError::LeafNotFound { index, size })?;
        Ok(Proof {
            root,
            leaf: levels[0][index].clone(),
            index,
            size,
            siblings,
            path,
        })
    }
}

impl<T, H> LeanIMT<T, H>
where
    T: Clone + PartialEq,
    H: Fn(&T, &T) -> T,
{
    /// Verify `proof` with this tree's hash function.
    ///
    /// Same algorithm as [`verify_proof`]; the proof does not have to come
    /// from this tree.
    pub fn verify_proof(&self, proof: &Proof<T>) -> Result<bool> {
        verify_proof(proof, self.hasher())
    }
}
