//! Tests for the root tooltip formatter and tooltip bindings

use rstest::rstest;

use skilltree::domain::{describe_skill_node, LabelRegistry, SkillInfo, SkillTree, ROOT_BINDING};

#[test]
fn given_zero_points_when_describing_then_hints_upgrade() {
    assert_eq!(
        describe_skill_node(0, 5),
        "Tree. Root. \n0/5\nLeft click to upgrade\n"
    );
}

#[test]
fn given_one_point_when_describing_then_hints_downgrade() {
    assert_eq!(
        describe_skill_node(1, 5),
        "Tree. Root. \n1/5\nRight click to downgrade\n"
    );
}

#[rstest]
#[case(2, 5)]
#[case(5, 5)]
#[case(99, 5)]
fn given_other_points_when_describing_then_smiles(#[case] points: i64, #[case] max_points: i64) {
    let label = describe_skill_node(points, max_points);
    assert_eq!(
        label,
        format!("Tree. Root. \n{}/{}\n:)\n", points, max_points)
    );
}

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(-1, 5)]
#[case(7, -2)]
#[case(i64::MIN, i64::MAX)]
fn given_any_input_when_describing_then_three_terminated_lines(
    #[case] points: i64,
    #[case] max_points: i64,
) {
    let label = describe_skill_node(points, max_points);
    assert!(label.ends_with('\n'));
    assert_eq!(label.matches('\n').count(), 3);
    let lines: Vec<&str> = label.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Tree. Root. ");
    assert_eq!(lines[1], format!("{}/{}", points, max_points));
}

#[test]
fn given_same_input_when_describing_twice_then_identical() {
    assert_eq!(describe_skill_node(3, 4), describe_skill_node(3, 4));
}

#[test]
fn given_root_binding_when_tooltip_then_uses_leaf_points() {
    let mut tree = SkillTree::new();
    let id = tree
        .add_leaf(
            SkillInfo::new("SGI_01", 5)
                .with_points(1)
                .with_active(true)
                .with_bind(ROOT_BINDING),
        )
        .unwrap();
    let registry = LabelRegistry::with_builtins();

    let tooltip = registry.tooltip(tree.leaf(id).unwrap()).unwrap();

    assert_eq!(
        tooltip.as_deref(),
        Some("Tree. Root. \n1/5\nRight click to downgrade\n")
    );
}

#[test]
fn given_custom_describer_when_registered_then_resolves_binding() {
    let mut tree = SkillTree::new();
    let id = tree
        .add_leaf(SkillInfo::new("fireball", 3).with_bind("spell"))
        .unwrap();
    let mut registry = LabelRegistry::with_builtins();
    registry.register("spell", |info: &SkillInfo| {
        format!("{} ({} of {})\n", info.name, info.points, info.max_points)
    });

    assert!(registry.contains("spell"));
    assert_eq!(
        registry.bindings().collect::<Vec<_>>(),
        vec![ROOT_BINDING, "spell"]
    );
    assert_eq!(
        registry.tooltip(tree.leaf(id).unwrap()).unwrap().as_deref(),
        Some("fireball (0 of 3)\n")
    );
}
