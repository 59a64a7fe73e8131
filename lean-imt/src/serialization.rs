//! JSON export/import of the node levels.
//!
//! The payload is the `levels` array verbatim: `[[leaves…], [level 1…], …,
//! [root]]`. Import trusts the node values (nothing is re-hashed) but
//! rejects any payload whose level lengths are not those of a LeanIMT.

use core::fmt::Display;

use log::{debug, warn};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{LeanIMT, LeanImtError, Result, helper::level_lengths};

impl<T: Serialize, H> LeanIMT<T, H> {
    /// Serialize every level, leaf level first, to a JSON string.
    ///
    /// An empty tree exports as `[[]]`.
    pub fn export(&self) -> Result<String> {
        let nodes = serde_json::to_string(self.levels())
            .map_err(|e| LeanImtError::Encoding(format!("export error: {}", e)))?;
        debug!(
            "exported {} levels ({} leaves, {} bytes)",
            self.levels().len(),
            self.size(),
            nodes.len()
        );
        Ok(nodes)
    }
}

impl<T, H> LeanIMT<T, H> {
    /// Rebuild a tree from [`export`](Self::export) output, deserializing
    /// each node directly as `T`.
    pub fn import(hash: H, nodes: &str) -> Result<Self>
    where
        T: DeserializeOwned,
    {
        Self::import_with(hash, nodes, serde_json::from_value::<T>)
    }

    /// Rebuild a tree from [`export`](Self::export) output, converting each
    /// raw JSON node with `map`.
    ///
    /// The level shape is checked before `map` is called on anything. The
    /// node values are taken as given: `hash` is stored for future
    /// mutations but not used to re-derive the imported levels.
    pub fn import_with<F, E>(hash: H, nodes: &str, mut map: F) -> Result<Self>
    where
        F: FnMut(Value) -> core::result::Result<T, E>,
        E: Display,
    {
        let raw: Vec<Vec<Value>> = serde_json::from_str(nodes).map_err(|e| {
            warn!("rejected nodes payload: {}", e);
            LeanImtError::InvalidNodes(format!("expected a list of levels: {}", e))
        })?;
        check_shape(&raw)?;

        let mut levels = Vec::with_capacity(raw.len());
        for (level, raw_nodes) in raw.into_iter().enumerate() {
            let mut converted = Vec::with_capacity(raw_nodes.len());
            for (position, value) in raw_nodes.into_iter().enumerate() {
                let node = map(value).map_err(|e| {
                    warn!(
                        "rejected node {} of level {} in nodes payload: {}",
                        position, level, e
                    );
                    LeanImtError::InvalidNodes(format!(
                        "node {} of level {}: {}",
                        position, level, e
                    ))
                })?;
                converted.push(node);
            }
            levels.push(converted);
        }

        let tree = LeanIMT::from_levels(hash, levels);
        debug!(
            "imported {} leaves (depth {})",
            tree.size(),
            tree.depth()
        );
        Ok(tree)
    }
}

/// Level `i + 1` must hold `ceil(len(i) / 2)` nodes and the last level at
/// most one.
fn check_shape(levels: &[Vec<Value>]) -> Result<()> {
    let lengths: Vec<usize> = levels.iter().map(Vec::len).collect();
    let Some(&size) = lengths.first() else {
        warn!("rejected nodes payload without levels");
        return Err(LeanImtError::InvalidNodes("payload has no levels".into()));
    };
    let expected = level_lengths(size);
    if lengths != expected {
        warn!("rejected nodes payload with level lengths {:?}", lengths);
        return Err(LeanImtError::InvalidNodes(format!(
            "level lengths {:?} do not match a tree of {} leaves (expected {:?})",
            lengths, size, expected
        )));
    }
    Ok(())
}
