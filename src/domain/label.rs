//! Tooltip and badge text for skill-tree leaves.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::error::DomainError;
use crate::domain::skilltree::{Leaf, SkillInfo};

/// Binding name of the root tooltip.
pub const ROOT_BINDING: &str = "leaf_01";

/// Formats the root node tooltip.
///
/// Three newline-terminated lines: a fixed header, `points/max_points`, and a
/// hint picked by exact match on `points`. Values are rendered as given; no
/// range checks.
///
/// ```
/// use skilltree::domain::describe_skill_node;
///
/// assert_eq!(
///     describe_skill_node(0, 5),
///     "Tree. Root. \n0/5\nLeft click to upgrade\n"
/// );
/// ```
pub fn describe_skill_node(points: i64, max_points: i64) -> String {
    let hint = match points {
        0 => "Left click to upgrade",
        1 => "Right click to downgrade",
        _ => ":)",
    };
    format!("Tree. Root. \n{}/{}\n{}\n", points, max_points, hint)
}

/// Short status drawn on the icon: `points/max` when active, `---` otherwise.
pub fn badge(leaf: &Leaf) -> String {
    if leaf.is_active() {
        format!("{}/{}", leaf.points(), leaf.max_points())
    } else {
        "---".to_string()
    }
}

/// Produces tooltip text for a skill.
pub trait Describer: Send + Sync {
    fn describe(&self, info: &SkillInfo) -> String;
}

impl<F> Describer for F
where
    F: Fn(&SkillInfo) -> String + Send + Sync,
{
    fn describe(&self, info: &SkillInfo) -> String {
        self(info)
    }
}

/// Tooltip bindings by name.
#[derive(Default)]
pub struct LabelRegistry {
    describers: BTreeMap<String, Box<dyn Describer>>,
}

impl fmt::Debug for LabelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelRegistry")
            .field("bindings", &self.describers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ROOT_BINDING, |info: &SkillInfo| {
            describe_skill_node(i64::from(info.points), i64::from(info.max_points))
        });
        registry
    }

    /// Registers `describer` under `bind`, replacing any previous one.
    pub fn register(&mut self, bind: impl Into<String>, describer: impl Describer + 'static) {
        self.describers.insert(bind.into(), Box::new(describer));
    }

    pub fn contains(&self, bind: &str) -> bool {
        self.describers.contains_key(bind)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &str> {
        self.describers.keys().map(String::as_str)
    }

    /// Tooltip of `leaf`; `None` when the leaf has no binding.
    pub fn tooltip(&self, leaf: &Leaf) -> Result<Option<String>, DomainError> {
        if !leaf.has_bind() {
            return Ok(None);
        }
        self.describers
            .get(leaf.bind())
            .map(|d| Some(d.describe(leaf.info())))
            .ok_or_else(|| DomainError::UnknownBinding {
                name: leaf.name().to_string(),
                bind: leaf.bind().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::skilltree::SkillTree;
    use rstest::rstest;

    #[rstest]
    #[case(0, 5, "Tree. Root. \n0/5\nLeft click to upgrade\n")]
    #[case(1, 5, "Tree. Root. \n1/5\nRight click to downgrade\n")]
    #[case(2, 5, "Tree. Root. \n2/5\n:)\n")]
    #[case(5, 5, "Tree. Root. \n5/5\n:)\n")]
    #[case(-3, 5, "Tree. Root. \n-3/5\n:)\n")]
    fn given_points_when_describing_then_matches_expected(
        #[case] points: i64,
        #[case] max_points: i64,
        #[case] expected: &str,
    ) {
        assert_eq!(describe_skill_node(points, max_points), expected);
    }

    #[test]
    fn given_unbound_leaf_when_tooltip_then_none() {
        let mut tree = SkillTree::new();
        let id = tree.add_leaf(SkillInfo::new("plain", 3)).unwrap();
        let registry = LabelRegistry::with_builtins();
        assert_eq!(registry.tooltip(tree.leaf(id).unwrap()), Ok(None));
    }

    #[test]
    fn given_unknown_binding_when_tooltip_then_errors() {
        let mut tree = SkillTree::new();
        let id = tree
            .add_leaf(SkillInfo::new("odd", 3).with_bind("leaf_99"))
            .unwrap();
        let registry = LabelRegistry::with_builtins();
        assert!(matches!(
            registry.tooltip(tree.leaf(id).unwrap()),
            Err(DomainError::UnknownBinding { .. })
        ));
    }

    #[test]
    fn given_inactive_leaf_when_badge_then_dashes() {
        let mut tree = SkillTree::new();
        let id = tree
            .add_leaf(SkillInfo::new("x", 5).with_points(2))
            .unwrap();
        assert_eq!(badge(tree.leaf(id).unwrap()), "---");
        tree.leaf_mut(id).unwrap().activate();
        assert_eq!(badge(tree.leaf(id).unwrap()), "2/5");
    }
}
