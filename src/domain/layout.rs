//! Icon placement and pointer hit testing.

use crate::domain::graph::NodeId;
use crate::domain::skilltree::SkillTree;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Edges are inclusive.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Upgrade
    Left,
    /// Downgrade
    Right,
}

/// Square icon of one leaf, positioned relative to the layout origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Icon {
    pub leaf: NodeId,
    pub pos: Vec2,
}

impl Icon {
    pub fn rect(&self, origin: Vec2, size: f32) -> Rect {
        Rect {
            x: origin.x + self.pos.x,
            y: origin.y + self.pos.y,
            width: size,
            height: size,
        }
    }

    pub fn center(&self, origin: Vec2, size: f32) -> Vec2 {
        self.rect(origin, size).center()
    }
}

/// Grid of icons.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub origin: Vec2,
    pub icon_size: f32,
    pub gap: f32,
    icons: Vec<Icon>,
}

impl Layout {
    pub fn new(origin: Vec2, icon_size: f32, gap: f32) -> Self {
        Self {
            origin,
            icon_size,
            gap,
            icons: Vec::new(),
        }
    }

    /// Places `leaf` on grid cell `(col, row)`, replacing an earlier icon of
    /// the same leaf.
    pub fn place(&mut self, leaf: NodeId, col: i32, row: i32) {
        let cell = self.icon_size + self.gap;
        let pos = Vec2::new(cell * col as f32, cell * row as f32);
        self.icons.retain(|icon| icon.leaf != leaf);
        self.icons.push(Icon { leaf, pos });
    }

    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    pub fn icon(&self, leaf: NodeId) -> Option<&Icon> {
        self.icons.iter().find(|icon| icon.leaf == leaf)
    }

    pub fn rect(&self, leaf: NodeId) -> Option<Rect> {
        self.icon(leaf).map(|icon| icon.rect(self.origin, self.icon_size))
    }

    /// Leaf whose icon contains `point`. Later icons win on overlap.
    pub fn hit_test(&self, point: Vec2) -> Option<NodeId> {
        self.icons
            .iter()
            .rev()
            .find(|icon| icon.rect(self.origin, self.icon_size).contains(point))
            .map(|icon| icon.leaf)
    }

    /// Center-to-center segments for every branch of `tree` whose endpoints
    /// are both placed, with the branch's open state.
    pub fn edges(&self, tree: &SkillTree) -> Vec<(Vec2, Vec2, bool)> {
        tree.branches()
            .into_iter()
            .filter_map(|(a, b, branch)| {
                let from = self.icon(a)?.center(self.origin, self.icon_size);
                let to = self.icon(b)?.center(self.origin, self.icon_size);
                let open = tree.leaf(a).map(|l| branch.is_active(l)).unwrap_or(false);
                Some((from, to, open))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::skilltree::{ProgressMode, SkillInfo};

    #[test]
    fn given_grid_when_hit_testing_then_finds_icon_under_point() {
        let mut tree = SkillTree::new();
        let a = tree.add_leaf(SkillInfo::new("a", 5)).unwrap();
        let b = tree.add_leaf(SkillInfo::new("b", 5)).unwrap();
        let mut layout = Layout::new(Vec2::new(16.0, 16.0), 128.0, 16.0);
        layout.place(a, 0, 0);
        layout.place(b, 1, 0);

        assert_eq!(layout.hit_test(Vec2::new(20.0, 20.0)), Some(a));
        assert_eq!(layout.hit_test(Vec2::new(16.0 + 144.0 + 1.0, 50.0)), Some(b));
        // right and bottom borders are inside the icon
        assert_eq!(layout.hit_test(Vec2::new(16.0 + 128.0, 16.0 + 128.0)), Some(a));
        // gap between the icons
        assert_eq!(layout.hit_test(Vec2::new(16.0 + 136.0, 50.0)), None);
    }

    #[test]
    fn given_icon_when_centering_then_offsets_by_origin() {
        let mut tree = SkillTree::new();
        let leaf = tree.add_leaf(SkillInfo::new("a", 5)).unwrap();
        let icon = Icon {
            leaf,
            pos: Vec2::new(144.0, 0.0),
        };
        let center = icon.center(Vec2::new(16.0, 16.0), 128.0);
        assert_eq!(center, Vec2::new(224.0, 80.0));
    }

    #[test]
    fn given_branch_when_listing_edges_then_reports_open_state() {
        let mut tree = SkillTree::new();
        let a = tree
            .add_leaf(SkillInfo::new("a", 5).with_active(true))
            .unwrap();
        let b = tree.add_leaf(SkillInfo::new("b", 5)).unwrap();
        tree.add_branch(a, b, ProgressMode::Any).unwrap();
        let mut layout = Layout::new(Vec2::default(), 10.0, 0.0);
        layout.place(a, 0, 0);
        layout.place(b, 0, 1);

        let edges = layout.edges(&tree);
        assert_eq!(edges, vec![(Vec2::new(5.0, 5.0), Vec2::new(5.0, 15.0), true)]);
    }
}
