use crate::grid::Grid;
use crate::kinds::{ID_ATTR, NAME_ATTR};
use crc32fast::Hasher;
use dashgrid_markup::NodeId;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter shared by every generator
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable seed for a grid, derived from its name using CRC32
pub fn get_grid_seed(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generates `{seed}-{n}` identifiers, `n` unique across the process
#[derive(Clone, Debug)]
pub struct IdGenerator {
    seed: String,
}

impl IdGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            seed: get_grid_seed(name),
        }
    }

    pub fn new_id(&self) -> String {
        format!("{}-{}", self.seed, NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Grid {
    /// Give an `id` to `node` and each of its descendants lacking one.
    /// Returns how many ids were assigned.
    ///
    /// Ids already used anywhere in the grid are skipped, so a grid saved by
    /// another process keeps unique ids when it grows.
    pub fn set_ids(&mut self, node: NodeId) -> usize {
        let generator = IdGenerator::new(&self.name().unwrap_or_default());
        let root = self.root();
        let tree = self.tree_mut();

        let mut taken: HashSet<String> = std::iter::once(root)
            .chain(tree.descendants(root))
            .filter_map(|n| tree.attr(n, ID_ATTR).map(|id| id.to_string()))
            .collect();

        let mut targets = vec![node];
        targets.extend(tree.descendants(node));

        let mut assigned = 0;
        for target in targets {
            if tree.has_attr(target, ID_ATTR) {
                continue;
            }
            let id = std::iter::repeat_with(|| generator.new_id())
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_default();
            taken.insert(id.clone());
            tree.set_attr(target, ID_ATTR, id);
            assigned += 1;
        }
        tracing::debug!(assigned, seed = generator.seed(), "assigned ids");
        assigned
    }
}
