//! Skill tree engine.
//!
//! Leaves (skills) are connected by branches whose progress mode decides
//! when a dependent skill unlocks. The crate covers the tree rules, routed
//! graph underneath, tooltip text, icon hit testing, document loading and
//! the `skilltree` CLI.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::describe_skill_node;
