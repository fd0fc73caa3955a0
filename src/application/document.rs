//! Skill document: serialized definition of a skill tree
//!
//! Documents are JSON or TOML, picked by file extension:
//!
//! ```json
//! {
//!   "leaves":   [{ "name": "SGI_01", "max_points": 5, "active": true, "cell": [0, 0] }],
//!   "branches": [{ "from": "SGI_01", "to": "SGI_02", "mode": "minimum" }]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, Layout, ProgressMode, SkillInfo, SkillTree, ROOT_BINDING};

/// One skill entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeafSpec {
    pub name: String,
    #[serde(default)]
    pub points: i32,
    /// Falls back to `Settings::default_max_points`
    #[serde(default)]
    pub max_points: Option<i32>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub mode: ProgressMode,
    #[serde(default)]
    pub bind: String,
    /// Grid cell as `[col, row]`
    #[serde(default)]
    pub cell: [i32; 2],
}

/// One branch entry, `from -> to` by leaf name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchSpec {
    pub from: String,
    pub to: String,
    #[serde(default = "default_branch_mode")]
    pub mode: ProgressMode,
}

fn default_branch_mode() -> ProgressMode {
    ProgressMode::Maximum
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SkillDocument {
    #[serde(default)]
    pub leaves: Vec<LeafSpec>,
    #[serde(default)]
    pub branches: Vec<BranchSpec>,
}

impl SkillDocument {
    /// Parse `content`, choosing the format from the extension of `path`.
    pub fn parse(path: &Path, content: &str) -> ApplicationResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let parsed = match ext.as_deref() {
            Some("json") => serde_json::from_str(content).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(content).map_err(|e| e.to_string()),
            _ => return Err(ApplicationError::UnsupportedFormat(path.to_path_buf())),
        };
        parsed.map_err(|message| ApplicationError::Document {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Builds the tree and places every leaf into `layout`.
    #[instrument(level = "debug", skip(self, layout))]
    pub fn build(
        &self,
        default_max_points: i32,
        mut layout: Layout,
    ) -> Result<(SkillTree, Layout), DomainError> {
        let mut tree = SkillTree::new();

        for spec in &self.leaves {
            let info = SkillInfo::new(
                spec.name.clone(),
                spec.max_points.unwrap_or(default_max_points),
            )
            .with_points(spec.points)
            .with_active(spec.active)
            .with_mode(spec.mode)
            .with_bind(spec.bind.clone());
            let id = tree.add_leaf(info)?;
            layout.place(id, spec.cell[0], spec.cell[1]);
        }

        for spec in &self.branches {
            let from = tree.id_of(&spec.from)?;
            let to = tree.id_of(&spec.to)?;
            tree.add_branch(from, to, spec.mode)?;
        }

        debug!(
            "built skill tree: {} leaves, {} branches",
            tree.len(),
            self.branches.len()
        );
        Ok((tree, layout))
    }

    /// The nine-skill sample tree.
    pub fn demo() -> Self {
        fn leaf(name: &str, active: bool, mode: ProgressMode, col: i32, row: i32) -> LeafSpec {
            LeafSpec {
                name: name.to_string(),
                points: 0,
                max_points: Some(5),
                active,
                mode,
                bind: String::new(),
                cell: [col, row],
            }
        }
        fn branch(from: &str, to: &str, mode: ProgressMode) -> BranchSpec {
            BranchSpec {
                from: from.to_string(),
                to: to.to_string(),
                mode,
            }
        }
        use ProgressMode::{Any, Maximum, Minimum};

        let mut root = leaf("SGI_01", true, Any, 0, 0);
        root.bind = ROOT_BINDING.to_string();

        Self {
            leaves: vec![
                root,
                leaf("SGI_02", true, Any, 1, 0),
                leaf("SGI_03", false, Any, 2, 0),
                leaf("SGI_04", false, Any, 2, 1),
                leaf("SGI_05", false, Any, 1, 1),
                leaf("SGI_06", false, Maximum, 1, 2),
                leaf("SGI_07", false, Any, 3, 2),
                leaf("SGI_08", false, Any, 3, 0),
                leaf("SGI_09", false, Maximum, 4, 1),
            ],
            branches: vec![
                branch("SGI_02", "SGI_03", Minimum),
                branch("SGI_03", "SGI_04", Maximum),
                branch("SGI_02", "SGI_05", Maximum),
                branch("SGI_05", "SGI_06", Maximum),
                branch("SGI_04", "SGI_07", Maximum),
                branch("SGI_04", "SGI_06", Maximum),
                branch("SGI_03", "SGI_08", Any),
                branch("SGI_07", "SGI_09", Maximum),
                branch("SGI_08", "SGI_09", Minimum),
            ],
        }
    }
}
