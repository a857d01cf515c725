use crate::error::Result;
use crate::naming::{self, FilenameStyle};
use std::path::{Path, PathBuf};

/// Output folder holding one text file per captured page
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
    style: FilenameStyle,
}

impl PageStore {
    /// Open the store, creating the folder if it does not exist yet
    pub async fn open(root: impl Into<PathBuf>, style: FilenameStyle) -> Result<Self> {
        let root = root.into();
        if !tokio::fs::try_exists(&root).await? {
            ::log::info!("Creating output folder {}", root.display());
        }
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root, style })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the body of `url` is written to
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.root.join(naming::derive_filename(url, self.style))
    }

    /// Write `body` for `url`, replacing any earlier file with the same name
    pub async fn save(&self, url: &str, body: &str) -> Result<PathBuf> {
        let path = self.path_for(url);
        tokio::fs::write(&path, body.as_bytes()).await?;
        Ok(path)
    }
}
