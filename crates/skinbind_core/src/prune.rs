//! Skeleton pruning.
//!
//! Pruning keeps the subtree under a designated root bone plus an explicit
//! exception set, and removes every other bone.
//!
//! # Example
//!
//! ```ignore
//! use skinbind_core::prune::{compute_retention_set, prune_bones};
//!
//! let retention = compute_retention_set(&skeleton, "Root", ["IK_Foot_L"]);
//! let removed = prune_bones(&mut skeleton, &retention);
//! println!("Removed {} bones", removed.len());
//! ```

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::skeleton::Skeleton;

/// The set of bone names a prune keeps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RetentionSet {
    /// Retained names (sorted)
    pub names: BTreeSet<String>,

    /// Whether the root bone was present in the skeleton
    pub root_found: bool,

    /// Number of bones reached from the root
    pub reachable_count: usize,
}

impl RetentionSet {
    /// Check if a bone name is retained.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of retained names (including exceptions absent from the skeleton).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Compute the bones to keep: everything reachable from `root` through
/// child links, plus every exception name.
///
/// A missing root is not an error; only the exceptions are kept then.
/// Exception names are taken verbatim, even when the skeleton has no such bone.
pub fn compute_retention_set<I, S>(skeleton: &Skeleton, root: &str, exceptions: I) -> RetentionSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut names = BTreeSet::new();
    let root_found = skeleton.contains(root);

    if root_found {
        // Explicit stack; the visited set guards against a malformed
        // hierarchy that links back to an ancestor.
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack = vec![root];

        while let Some(name) = stack.pop() {
            if !visited.insert(name) {
                continue;
            }
            names.insert(name.to_string());

            for child in skeleton.children(name).iter().rev() {
                if !visited.contains(child.as_str()) {
                    stack.push(child.as_str());
                }
            }
        }
    } else {
        log::warn!(
            "Root bone '{}' not found in skeleton '{}', keeping exceptions only",
            root,
            skeleton.name
        );
    }

    let reachable_count = names.len();
    names.extend(exceptions.into_iter().map(Into::into));

    RetentionSet {
        names,
        root_found,
        reachable_count,
    }
}

/// Remove every bone that is not retained, in skeleton enumeration order.
///
/// Returns the removed names in removal order. A retained bone whose parent
/// was removed keeps its (now dangling) parent link.
pub fn prune_bones(skeleton: &mut Skeleton, retention: &RetentionSet) -> Vec<String> {
    let to_remove: Vec<String> = skeleton
        .bone_names()
        .filter(|name| !retention.contains(name))
        .map(str::to_string)
        .collect();

    for name in &to_remove {
        skeleton.remove_bone(name);
        log::debug!("Removed bone: {}", name);
    }

    to_remove
}
