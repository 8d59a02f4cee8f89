//! File-backed catalog persistence.

use crate::codec;
use crate::configuration::Configuration;
use crate::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration for a [`Store`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the catalog document.
    pub path: PathBuf,

    /// Gzip generated form code when writing.
    pub compress_blobs: bool,

    /// Write indented JSON.
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./Configuration.json"),
            compress_blobs: true,
            pretty: true,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set blob compression.
    pub fn with_compress_blobs(mut self, compress: bool) -> Self {
        self.compress_blobs = compress;
        self
    }

    /// Set pretty printing.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Loads and saves one catalog document.
#[derive(Debug, Clone)]
pub struct Store {
    config: StoreConfig,
}

impl Store {
    /// Create a store over the given settings.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Store settings.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the catalog document.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Load the catalog, first writing the default catalog if the document
    /// does not exist yet.
    pub fn load(&self) -> Result<Configuration, Error> {
        if !self.path().exists() {
            info!(path = %self.path().display(), "creating default catalog");
            let mut conf = Configuration::empty_default();
            self.save(&mut conf)?;
            return Ok(conf);
        }
        self.load_existing()
    }

    /// Load the catalog. Fails with [`Error::FileNotFound`] if the document
    /// does not exist.
    pub fn load_existing(&self) -> Result<Configuration, Error> {
        let path = self.path();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let conf = codec::from_str(&text)?;
        info!(
            path = %path.display(),
            catalogs = conf.catalogs.len(),
            documents = conf.documents.len(),
            "loaded catalog"
        );
        Ok(conf)
    }

    /// Save the catalog.
    ///
    /// Document spend lists are recalculated first. The document is written
    /// to a sibling temporary file and renamed over the target, so readers
    /// never see a partial document.
    pub fn save(&self, conf: &mut Configuration) -> Result<(), Error> {
        conf.calculate_allow_document_spend();
        let text = codec::to_string(conf, self.config.compress_blobs, self.config.pretty)?;

        let path = self.path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, text.as_bytes())?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(path = %path.display(), bytes = text.len(), "saved catalog");
        Ok(())
    }
}
