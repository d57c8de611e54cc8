use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bundle::DefaultBundle;
use crate::category::Category;
use crate::document::{self, ConfigDocument};
use crate::error::{ConfigError, Result};
use crate::marker::{self, MarkerState, VersionMarker, MARKER_FILE};

/// Directory name of the config root under the application config directory.
pub const CONFIG_DIR_NAME: &str = "compactores";

/// The main entry point for the configuration store.
/// Opens the config root, runs the bootstrap / version-check / regenerate
/// lifecycle, and bulk-loads every document of both categories.
#[derive(Debug)]
pub struct ConfigStore {
    root: PathBuf,
    active_version: String,
    bundle: DefaultBundle,
    marker: VersionMarker,
    documents: HashMap<Category, HashMap<String, ConfigDocument>>,
    pending_update: Option<PendingUpdate>,
}

impl ConfigStore {
    /// Open the store rooted at `<config_dir>/compactores` using the
    /// defaults shipped with this build.
    pub fn open(config_dir: &Path, active_version: &str) -> Result<Self> {
        Self::open_with_bundle(config_dir, active_version, DefaultBundle::builtin())
    }

    /// Open the store with an explicit default bundle.
    ///
    /// Lifecycle: ensure the directory tree exists, validate the version
    /// marker (any structural deviation means "regenerate"), regenerate the
    /// defaults if needed, surface a pending update decision when the
    /// marker is valid but stale, then load all documents of both
    /// categories.
    pub fn open_with_bundle(
        config_dir: &Path,
        active_version: &str,
        bundle: DefaultBundle,
    ) -> Result<Self> {
        let root = config_dir.join(CONFIG_DIR_NAME);
        ensure_directory(&root)?;
        for category in Category::ALL {
            ensure_directory(&root.join(category.dir_name()))?;
        }

        let marker_path = root.join(MARKER_FILE);
        let marker = match marker::load_marker(&marker_path) {
            MarkerState::Valid(marker) => marker,
            MarkerState::Invalid => {
                log::info!("No valid configuration was found - generating new default configuration...");
                regenerate(&root, &bundle, active_version)?;
                log::info!("Configuration generated!");
                VersionMarker {
                    created: active_version.to_string(),
                    updated: active_version.to_string(),
                }
            }
        };

        let pending_update = if marker.is_stale(active_version) {
            log::warn!("WARNING");
            log::warn!("~~~~~~~");
            log::warn!("The current configuration is based on an outdated version of the");
            log::warn!("default configuration. Consider regenerating it by accepting the");
            log::warn!("pending update, or by deleting the {CONFIG_DIR_NAME} directory.");
            log::warn!(
                "config version: {}      application version: {}",
                marker.created,
                active_version
            );
            Some(PendingUpdate {
                root: root.clone(),
                marker: marker.clone(),
                active: active_version.to_string(),
            })
        } else {
            None
        };

        log::info!("Loading configuration files...");
        let mut documents = HashMap::new();
        for category in Category::ALL {
            let docs = load_all(&root.join(category.dir_name()))?;
            log::info!("Loaded {} {} files", docs.len(), category);
            documents.insert(category, docs);
        }
        log::info!("Configuration files loaded successfully!");

        Ok(ConfigStore {
            root,
            active_version: active_version.to_string(),
            bundle,
            marker,
            documents,
            pending_update,
        })
    }

    /// The config root directory (`.../compactores`).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Marker values as of open, before any pending decision is resolved.
    pub fn marker(&self) -> &VersionMarker {
        &self.marker
    }

    /// The bundled defaults this store regenerates from.
    pub fn bundle(&self) -> &DefaultBundle {
        &self.bundle
    }

    /// The staleness decision surfaced by `open`, if any.
    pub fn pending_update(&self) -> Option<&PendingUpdate> {
        self.pending_update.as_ref()
    }

    /// Loaded documents for one category, keyed by document id.
    pub fn documents(&self, category: Category) -> &HashMap<String, ConfigDocument> {
        &self.documents[&category]
    }

    pub fn definitions(&self) -> &HashMap<String, ConfigDocument> {
        self.documents(Category::Definitions)
    }

    pub fn customizations(&self) -> &HashMap<String, ConfigDocument> {
        self.documents(Category::Customizations)
    }

    /// Marker versions, staleness, and per-category document counts.
    pub fn status(&self) -> serde_json::Value {
        let mut counts = serde_json::Map::new();
        for category in Category::ALL {
            counts.insert(
                category.dir_name().to_string(),
                serde_json::json!(self.documents[&category].len()),
            );
        }
        serde_json::json!({
            "root": self.root.display().to_string(),
            "versions": {
                "created": self.marker.created,
                "updated": self.marker.updated,
            },
            "active_version": self.active_version,
            "stale": self.pending_update.is_some(),
            "documents": counts,
        })
    }

    /// Entry point for downstream consumers whose semantic validation of
    /// the loaded documents failed. Logs the cause and hands back the error
    /// for the caller to resolve: abort, or `reset_to_defaults` followed by
    /// a restart.
    pub fn report_load_failure(&self, cause: &str) -> ConfigError {
        log::error!("Config loading failed: {cause}");
        ConfigError::SemanticLoadFailure(cause.to_string())
    }

    /// Reset path of the failure recovery handler: wipe both categories,
    /// re-export the bundled defaults, and rewrite the version marker. The
    /// resulting state is identical to a fresh regeneration; the caller is
    /// expected to restart afterwards.
    pub fn reset_to_defaults(&self) -> Result<()> {
        log::info!("Resetting configuration...");
        regenerate(&self.root, &self.bundle, &self.active_version)
    }
}

/// A staleness decision surfaced by `ConfigStore::open`. Carries only the
/// config root path and the version strings involved; resolving it reopens
/// and rewrites the marker file itself.
#[derive(Debug, Clone)]
pub struct PendingUpdate {
    root: PathBuf,
    marker: VersionMarker,
    active: String,
}

impl PendingUpdate {
    /// Version that generated the existing config set.
    pub fn created(&self) -> &str {
        &self.marker.created
    }

    /// Most recently acknowledged version.
    pub fn updated(&self) -> &str {
        &self.marker.updated
    }

    /// The running application version the marker was compared against.
    pub fn active_version(&self) -> &str {
        &self.active
    }

    /// Accept the update: wipe both categories, re-export the bundled
    /// defaults, and remark with `created = updated = active`. The caller
    /// restarts afterwards so consumers pick up the regenerated set.
    pub fn accept(&self, bundle: &DefaultBundle) -> Result<()> {
        log::info!("Updating configuration...");
        regenerate(&self.root, bundle, &self.active)
    }

    /// Decline the update: leave every document untouched and record
    /// `updated = active` in the marker so the same version does not prompt
    /// again on the next launch.
    pub fn decline(&self, bundle: &DefaultBundle) -> Result<()> {
        log::info!("Not updating configuration - recording new version in version marker...");
        marker::write_declined(
            &self.root.join(MARKER_FILE),
            &self.marker,
            &self.active,
            bundle.readme(),
        )
    }
}

/// Create `path` if it does not exist; fail if another kind of object
/// already occupies it. Idempotent, safe to call on every startup.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(ConfigError::StructuralConflict {
                path: path.to_path_buf(),
            });
        }
        return Ok(());
    }
    fs::create_dir_all(path)?;
    Ok(())
}

/// Load every config document in `dir` into a map keyed by document id.
/// A failure loading any single document fails the whole operation -
/// downstream consumers assume the set is complete.
pub fn load_all(dir: &Path) -> Result<HashMap<String, ConfigDocument>> {
    let mut documents = HashMap::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() || !document::has_config_extension(&path) {
            continue;
        }
        let doc = document::read_document(&path)?;
        documents.insert(doc.id.clone(), doc);
    }
    Ok(documents)
}

/// Wipe both category directories and rebuild them from the bundled
/// defaults. The version marker is written after every other file: a crash
/// mid-sequence leaves no valid marker, and the next launch regenerates
/// instead of trusting a half-written config set.
fn regenerate(root: &Path, bundle: &DefaultBundle, version: &str) -> Result<()> {
    for category in Category::ALL {
        clean_documents(&root.join(category.dir_name()))?;
    }
    export_defaults(root, bundle)?;
    marker::write_marker(&root.join(MARKER_FILE), version, bundle.readme())
}

/// Delete every config document in `dir`, leaving other files alone.
fn clean_documents(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && document::has_config_extension(&path) {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Export every bundled default document into both category directories.
/// Documents are staged into a temporary directory under the config root
/// and only renamed into place once every resource has been written, so a
/// missing resource or failed write leaves the category directories
/// untouched.
fn export_defaults(root: &Path, bundle: &DefaultBundle) -> Result<()> {
    let staging = tempfile::Builder::new()
        .prefix(".export-")
        .tempdir_in(root)
        .map_err(|e| ConfigError::Export(format!("Failed to create staging directory: {e}")))?;

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();
    for category in Category::ALL {
        let stage_dir = staging.path().join(category.dir_name());
        fs::create_dir(&stage_dir)
            .map_err(|e| ConfigError::Export(format!("Failed to create staging directory: {e}")))?;
        let target_dir = root.join(category.dir_name());

        for id in bundle.manifest() {
            let text = bundle.resource(category, id)?;
            let file_name = format!("{id}.{}", document::FILE_EXTENSION);
            let staged_file = stage_dir.join(&file_name);
            fs::write(&staged_file, text).map_err(|e| {
                ConfigError::Export(format!(
                    "Failed to write {}: {e}",
                    staged_file.display()
                ))
            })?;
            staged.push((staged_file, target_dir.join(&file_name)));
        }
    }

    for (from, to) in staged {
        log::debug!("Exporting default config file: {}", to.display());
        fs::rename(&from, &to).map_err(|e| {
            ConfigError::Export(format!("Failed to move {} into place: {e}", to.display()))
        })?;
    }
    Ok(())
}
