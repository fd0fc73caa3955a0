//! Domain layer: skill-tree rules, routing and tooltip text
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod graph;
pub mod label;
pub mod layout;
pub mod skilltree;

pub use error::DomainError;
pub use graph::{Edge, EdgeId, Graph, Node, NodeId, Route};
pub use label::{badge, describe_skill_node, Describer, LabelRegistry, ROOT_BINDING};
pub use layout::{Icon, Layout, MouseButton, Rect, Vec2};
pub use skilltree::{Branch, Leaf, ProgressMode, SkillInfo, SkillTree};
