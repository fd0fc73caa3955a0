//! Skill tree: leaves (skills) connected by branches (progress requirements).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::DomainError;
use crate::domain::graph::{EdgeId, Graph, NodeId};

/// How progress propagates across a branch or into a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
    /// Branch: open as soon as its source leaf is active.
    /// Leaf: active when any incoming branch is open.
    #[default]
    Any,
    /// Branch: open once its source leaf has at least one point.
    /// Leaf: same as `Any`.
    Minimum,
    /// Branch: open once its source leaf is at max points.
    /// Leaf: active only when every incoming branch is open.
    Maximum,
}

impl fmt::Display for ProgressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProgressMode::Any => "any",
            ProgressMode::Minimum => "minimum",
            ProgressMode::Maximum => "maximum",
        };
        f.write_str(s)
    }
}

/// State of a single skill.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkillInfo {
    pub points: i32,
    pub max_points: i32,
    pub active: bool,
    pub mode: ProgressMode,
    pub name: String,
    /// Tooltip binding, empty when the skill has none
    pub bind: String,
}

impl SkillInfo {
    pub fn new(name: impl Into<String>, max_points: i32) -> Self {
        Self {
            name: name.into(),
            max_points,
            ..Self::default()
        }
    }

    pub fn with_points(mut self, points: i32) -> Self {
        self.points = points;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_mode(mut self, mode: ProgressMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    id: NodeId,
    info: SkillInfo,
}

impl Leaf {
    pub fn new(id: NodeId, info: SkillInfo) -> Self {
        Self { id, info }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn info(&self) -> &SkillInfo {
        &self.info
    }

    pub fn mode(&self) -> ProgressMode {
        self.info.mode
    }

    pub fn is_active(&self) -> bool {
        self.info.active
    }

    pub fn points(&self) -> i32 {
        self.info.points
    }

    pub fn max_points(&self) -> i32 {
        self.info.max_points
    }

    pub fn is_maxed(&self) -> bool {
        self.info.points >= self.info.max_points
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn bind(&self) -> &str {
        &self.info.bind
    }

    pub fn has_bind(&self) -> bool {
        !self.info.bind.is_empty()
    }

    /// Sets the active flag. Deactivation discards every point.
    ///
    /// Returns the point change, zero or negative.
    pub fn set_active(&mut self, active: bool) -> i32 {
        self.info.active = active;
        if !active {
            return self.downgrade(self.points());
        }
        0
    }

    pub fn activate(&mut self) {
        self.set_active(true);
    }

    /// Adds points, clamped to `0..=max_points`. Does not check the active
    /// flag; callers validate that first.
    ///
    /// Returns the change actually applied.
    pub fn upgrade(&mut self, points: i32) -> i32 {
        let before = self.info.points;
        self.info.points = self
            .info
            .points
            .saturating_add(points)
            .clamp(0, self.info.max_points.max(0));
        self.info.points - before
    }

    /// Removes points. Returns the change actually applied, zero or negative.
    pub fn downgrade(&mut self, points: i32) -> i32 {
        self.upgrade(points.saturating_neg())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    id: EdgeId,
    mode: ProgressMode,
}

impl Branch {
    pub fn new(id: EdgeId, mode: ProgressMode) -> Self {
        Self { id, mode }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn mode(&self) -> ProgressMode {
        self.mode
    }

    /// Whether progress flows through this branch given its source leaf.
    pub fn is_active(&self, source: &Leaf) -> bool {
        if !source.is_active() {
            return false;
        }
        match self.mode {
            ProgressMode::Any => true,
            ProgressMode::Minimum => source.points() > 0,
            ProgressMode::Maximum => source.is_maxed(),
        }
    }
}

/// Skills on top of a routed graph.
///
/// Leaves are graph nodes, branches are directed graph edges. The tree is
/// kept acyclic: a branch that would close a loop is rejected.
#[derive(Debug, Default)]
pub struct SkillTree {
    graph: Graph,
    leaves: HashMap<NodeId, Leaf>,
    branches: HashMap<EdgeId, Branch>,
    order: Vec<NodeId>,
    names: HashMap<String, NodeId>,
}

impl SkillTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.leaves.clear();
        self.branches.clear();
        self.order.clear();
        self.names.clear();
        self.graph.clear();
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[instrument(level = "debug", skip(self, info), fields(name = %info.name))]
    pub fn add_leaf(&mut self, info: SkillInfo) -> Result<NodeId, DomainError> {
        if self.names.contains_key(&info.name) {
            return Err(DomainError::DuplicateLeaf(info.name));
        }
        if info.max_points < 0 || info.points < 0 || info.points > info.max_points {
            return Err(DomainError::InvalidPoints {
                name: info.name,
                points: info.points,
                max_points: info.max_points,
            });
        }

        let id = self.graph.add_node();
        self.names.insert(info.name.clone(), id);
        self.order.push(id);
        self.leaves.insert(id, Leaf::new(id, info));
        Ok(id)
    }

    /// Connects `a -> b`: progress in `a` unlocks `b`.
    #[instrument(level = "debug", skip(self))]
    pub fn add_branch(
        &mut self,
        a: NodeId,
        b: NodeId,
        mode: ProgressMode,
    ) -> Result<EdgeId, DomainError> {
        let name_a = self.leaf_name(a)?;
        let name_b = self.leaf_name(b)?;
        if a == b {
            return Err(DomainError::SelfLoop(name_a));
        }
        if self.graph.route(b, a).is_some() {
            return Err(DomainError::CycleDetected {
                from: name_a,
                to: name_b,
            });
        }

        let id = self.graph.add_edge(a, b, 1)?;
        self.branches.insert(id, Branch::new(id, mode));
        Ok(id)
    }

    fn leaf_name(&self, id: NodeId) -> Result<String, DomainError> {
        self.leaf(id)
            .map(|leaf| leaf.name().to_string())
            .ok_or_else(|| DomainError::UnknownNode(id.to_string()))
    }

    pub fn leaf(&self, id: NodeId) -> Option<&Leaf> {
        self.leaves.get(&id)
    }

    pub fn leaf_mut(&mut self, id: NodeId) -> Option<&mut Leaf> {
        self.leaves.get_mut(&id)
    }

    pub fn leaf_by_name(&self, name: &str) -> Option<&Leaf> {
        self.names.get(name).and_then(|id| self.leaves.get(id))
    }

    pub fn id_of(&self, name: &str) -> Result<NodeId, DomainError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| DomainError::UnknownLeaf(name.to_string()))
    }

    pub fn branch(&self, id: EdgeId) -> Option<&Branch> {
        self.branches.get(&id)
    }

    /// Leaves in insertion order.
    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> + '_ {
        self.order.iter().filter_map(|id| self.leaves.get(id))
    }

    /// Branches as `(source, target, branch)` in insertion order of sources.
    pub fn branches(&self) -> Vec<(NodeId, NodeId, Branch)> {
        self.order
            .iter()
            .flat_map(|&id| self.graph.outgoing(id))
            .filter_map(|(eid, edge)| self.branches.get(&eid).map(|b| (edge.a, edge.b, *b)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Leaves without incoming branches.
    pub fn roots(&self) -> Vec<NodeId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| self.graph.incoming(id).is_empty())
            .collect()
    }

    /// Direct dependents of `id` with the branch leading to each.
    pub fn children(&self, id: NodeId) -> Vec<(NodeId, Branch)> {
        self.graph
            .outgoing(id)
            .into_iter()
            .filter_map(|(eid, edge)| self.branches.get(&eid).map(|b| (edge.b, *b)))
            .collect()
    }

    /// Recomputes the active state of `id` from its incoming branches, then
    /// refreshes every dependent. Call after any upgrade or downgrade.
    ///
    /// Leaves without incoming branches keep their current state.
    /// Returns the points discarded by deactivation, zero or negative.
    #[instrument(level = "debug", skip(self))]
    pub fn refresh_leaf(&mut self, id: NodeId) -> i32 {
        let incoming = self.graph.incoming(id);
        let mut delta = 0;

        if !incoming.is_empty() {
            let total = incoming.len();
            let open = incoming
                .iter()
                .filter(|(eid, edge)| {
                    match (self.branches.get(eid), self.leaves.get(&edge.a)) {
                        (Some(branch), Some(source)) => branch.is_active(source),
                        _ => false,
                    }
                })
                .count();

            if let Some(leaf) = self.leaves.get_mut(&id) {
                let active = match leaf.mode() {
                    ProgressMode::Any | ProgressMode::Minimum => open > 0,
                    ProgressMode::Maximum => open >= total,
                };
                if active != leaf.is_active() {
                    debug!("{}: active {} -> {}", leaf.name(), leaf.is_active(), active);
                }
                delta += leaf.set_active(active);
            }
        }

        for (_, edge) in self.graph.outgoing(id) {
            delta += self.refresh_leaf(edge.b);
        }

        delta
    }

    /// Refreshes every root and, through them, the whole tree.
    pub fn refresh_all(&mut self) -> i32 {
        self.roots()
            .into_iter()
            .map(|root| self.refresh_leaf(root))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(mode: ProgressMode) -> (SkillTree, NodeId, NodeId) {
        let mut tree = SkillTree::new();
        let a = tree
            .add_leaf(SkillInfo::new("a", 5).with_active(true))
            .unwrap();
        let b = tree.add_leaf(SkillInfo::new("b", 5)).unwrap();
        tree.add_branch(a, b, mode).unwrap();
        (tree, a, b)
    }

    #[test]
    fn given_leaf_when_upgrading_past_max_then_clamps() {
        let (mut tree, a, _) = chain(ProgressMode::Any);
        let leaf = tree.leaf_mut(a).unwrap();
        assert_eq!(leaf.upgrade(3), 3);
        assert_eq!(leaf.upgrade(3), 2);
        assert_eq!(leaf.points(), 5);
        assert_eq!(leaf.downgrade(7), -5);
        assert_eq!(leaf.points(), 0);
    }

    #[test]
    fn given_leaf_when_deactivated_then_points_are_discarded() {
        let (mut tree, a, _) = chain(ProgressMode::Any);
        let leaf = tree.leaf_mut(a).unwrap();
        leaf.upgrade(4);
        assert_eq!(leaf.set_active(false), -4);
        assert_eq!(leaf.points(), 0);
        assert!(!leaf.is_active());
    }

    #[test]
    fn given_minimum_branch_when_source_gets_point_then_target_activates() {
        let (mut tree, a, b) = chain(ProgressMode::Minimum);
        tree.refresh_leaf(a);
        assert!(!tree.leaf(b).unwrap().is_active());

        tree.leaf_mut(a).unwrap().upgrade(1);
        tree.refresh_leaf(a);
        assert!(tree.leaf(b).unwrap().is_active());
    }

    #[test]
    fn given_maximum_branch_when_source_drops_below_max_then_target_loses_points() {
        let (mut tree, a, b) = chain(ProgressMode::Maximum);
        tree.leaf_mut(a).unwrap().upgrade(5);
        tree.refresh_leaf(a);
        tree.leaf_mut(b).unwrap().upgrade(2);

        tree.leaf_mut(a).unwrap().downgrade(1);
        assert_eq!(tree.refresh_leaf(a), -2);
        assert!(!tree.leaf(b).unwrap().is_active());
    }

    #[test]
    fn given_root_when_refreshing_then_keeps_active_state() {
        let (mut tree, a, _) = chain(ProgressMode::Any);
        tree.refresh_all();
        assert!(tree.leaf(a).unwrap().is_active());
    }

    #[test]
    fn given_back_edge_when_adding_branch_then_rejects_cycle() {
        let (mut tree, a, b) = chain(ProgressMode::Any);
        assert!(matches!(
            tree.add_branch(b, a, ProgressMode::Any),
            Err(DomainError::CycleDetected { .. })
        ));
        assert!(matches!(
            tree.add_branch(a, a, ProgressMode::Any),
            Err(DomainError::SelfLoop(_))
        ));
    }

    #[test]
    fn given_duplicate_name_when_adding_leaf_then_errors() {
        let (mut tree, _, _) = chain(ProgressMode::Any);
        assert_eq!(
            tree.add_leaf(SkillInfo::new("a", 1)),
            Err(DomainError::DuplicateLeaf("a".to_string()))
        );
    }
}
