//! Loading skill documents into sessions

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::document::SkillDocument;
use crate::application::services::SkillSession;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{LabelRegistry, Layout, Vec2};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::is_skill_document;

/// Reads skill documents and turns them into ready-to-use sessions.
pub struct TreeLoader {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
    labels: Arc<LabelRegistry>,
}

impl TreeLoader {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        settings: Arc<Settings>,
        labels: Arc<LabelRegistry>,
    ) -> Self {
        Self {
            fs,
            settings,
            labels,
        }
    }

    /// Read and parse a document.
    #[instrument(level = "debug", skip(self))]
    pub fn load_document(&self, path: &Path) -> ApplicationResult<SkillDocument> {
        if !is_skill_document(path) {
            return Err(ApplicationError::UnsupportedFormat(path.to_path_buf()));
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::Document {
                path: path.to_path_buf(),
                message: "file not found".to_string(),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read skill document", path)?;
        SkillDocument::parse(path, &content)
    }

    /// Open a session for `path`, falling back to the configured
    /// `skills_file` and then to the built-in demo tree.
    pub fn open(&self, path: Option<&Path>) -> ApplicationResult<SkillSession> {
        let source: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| self.settings.skills_file.clone());
        let document = match source {
            Some(path) => {
                debug!("loading skills from {}", path.display());
                self.load_document(&path)?
            }
            None => {
                debug!("no skill document given, using demo tree");
                SkillDocument::demo()
            }
        };
        self.session(&document)
    }

    /// Build a session from an already parsed document.
    pub fn session(&self, document: &SkillDocument) -> ApplicationResult<SkillSession> {
        let layout_cfg = &self.settings.layout;
        let layout = Layout::new(
            Vec2::new(layout_cfg.padding, layout_cfg.padding),
            layout_cfg.icon_size,
            layout_cfg.gap,
        );
        let (tree, layout) = document.build(self.settings.default_max_points, layout)?;
        Ok(SkillSession::new(tree, layout, Arc::clone(&self.labels)))
    }
}
