//! Interactive skill-tree session
//!
//! Applies upgrades and downgrades by name or by pointer input, keeps
//! activation consistent across the tree, and produces tooltips.

use std::sync::Arc;

use termtree::Tree;
use tracing::{debug, info, instrument};

use crate::application::ApplicationResult;
use crate::domain::{
    badge, DomainError, LabelRegistry, Layout, MouseButton, NodeId, SkillTree, Vec2,
};

/// Result of a single upgrade or downgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub leaf: String,
    /// Points actually added (positive) or removed (negative) on the leaf
    pub applied: i32,
    /// Points lost by dependents that were deactivated, zero or negative
    pub discarded: i32,
}

impl Outcome {
    pub fn is_noop(&self) -> bool {
        self.applied == 0 && self.discarded == 0
    }
}

pub struct SkillSession {
    tree: SkillTree,
    layout: Layout,
    labels: Arc<LabelRegistry>,
}

impl SkillSession {
    /// Wraps `tree` and settles activation from the roots down.
    pub fn new(mut tree: SkillTree, layout: Layout, labels: Arc<LabelRegistry>) -> Self {
        let discarded = tree.refresh_all();
        if discarded != 0 {
            debug!("initial refresh discarded {} points", -discarded);
        }
        Self {
            tree,
            layout,
            labels,
        }
    }

    pub fn tree(&self) -> &SkillTree {
        &self.tree
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Points currently allocated across all leaves.
    pub fn spent(&self) -> i32 {
        self.tree.leaves().map(|leaf| leaf.points()).sum()
    }

    /// Adds up to `points` to an active leaf.
    #[instrument(level = "debug", skip(self))]
    pub fn upgrade(&mut self, name: &str, points: i32) -> ApplicationResult<Outcome> {
        let id = self.tree.id_of(name)?;
        if !self.is_active(id) {
            return Err(DomainError::LeafInactive(name.to_string()).into());
        }
        Ok(self.apply(id, points))
    }

    /// Removes up to `points` from a leaf; dependents may lose activation.
    #[instrument(level = "debug", skip(self))]
    pub fn downgrade(&mut self, name: &str, points: i32) -> ApplicationResult<Outcome> {
        let id = self.tree.id_of(name)?;
        Ok(self.apply(id, points.saturating_neg()))
    }

    /// Left click upgrades, right click downgrades, by one point.
    ///
    /// Returns `None` when no icon is under `point`. Clicking an inactive
    /// leaf is a no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn click(&mut self, point: Vec2, button: MouseButton) -> Option<Outcome> {
        let id = self.layout.hit_test(point)?;
        let delta = match button {
            MouseButton::Left if self.is_active(id) => 1,
            MouseButton::Left => 0,
            MouseButton::Right => -1,
        };
        Some(self.apply(id, delta))
    }

    /// Tooltip of the leaf under `point`.
    pub fn hover(&self, point: Vec2) -> ApplicationResult<Option<String>> {
        match self.layout.hit_test(point).and_then(|id| self.tree.leaf(id)) {
            Some(leaf) => Ok(self.labels.tooltip(leaf)?),
            None => Ok(None),
        }
    }

    pub fn tooltip(&self, name: &str) -> ApplicationResult<Option<String>> {
        let leaf = self
            .tree
            .leaf_by_name(name)
            .ok_or_else(|| DomainError::UnknownLeaf(name.to_string()))?;
        Ok(self.labels.tooltip(leaf)?)
    }

    /// Leaf names along the branch path `from -> to`, `None` if unreachable.
    pub fn route(&self, from: &str, to: &str) -> ApplicationResult<Option<Vec<String>>> {
        let a = self.tree.id_of(from)?;
        let b = self.tree.id_of(to)?;
        Ok(self.tree.graph().path(a, b).map(|path| {
            path.into_iter()
                .filter_map(|id| self.tree.leaf(id).map(|l| l.name().to_string()))
                .collect()
        }))
    }

    /// Renders the tree from its roots; shared dependents appear under every
    /// parent.
    pub fn render_tree(&self) -> String {
        let mut top = Tree::new(format!("skills ({} points spent)", self.spent()));
        for root in self.tree.roots() {
            top.push(self.subtree(root, None));
        }
        top.to_string()
    }

    fn subtree(&self, id: NodeId, via: Option<String>) -> Tree<String> {
        let label = match (self.tree.leaf(id), via) {
            (Some(leaf), Some(mode)) => format!("{} [{}] <{}>", leaf.name(), badge(leaf), mode),
            (Some(leaf), None) => format!("{} [{}]", leaf.name(), badge(leaf)),
            (None, _) => id.to_string(),
        };
        Tree::new(label).with_leaves(
            self.tree
                .children(id)
                .into_iter()
                .map(|(child, branch)| self.subtree(child, Some(branch.mode().to_string()))),
        )
    }

    fn is_active(&self, id: NodeId) -> bool {
        self.tree.leaf(id).map(|l| l.is_active()).unwrap_or(false)
    }

    fn apply(&mut self, id: NodeId, delta: i32) -> Outcome {
        let (leaf, applied) = match self.tree.leaf_mut(id) {
            Some(leaf) => {
                let applied = leaf.upgrade(delta);
                (leaf.name().to_string(), applied)
            }
            None => (id.to_string(), 0),
        };
        let discarded = if applied != 0 {
            self.tree.refresh_leaf(id)
        } else {
            0
        };
        info!("{}: {:+} (discarded {})", leaf, applied, discarded);
        Outcome {
            leaf,
            applied,
            discarded,
        }
    }
}
