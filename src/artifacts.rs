//! Artifact store: locates the schema and model files on disk, loads them into
//! an [`Estimator`], and publishes it behind an atomically swappable pointer.
//!
//! Loading builds a complete new estimator before anything is published, so a
//! failed (re)load leaves the previous estimator untouched.

use arc_swap::ArcSwap;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info};

use crate::{
    config::ArtifactsConfig,
    estimator::{Estimator, ShapeMismatch},
    model::{LinearModel, ModelError},
    schema::{FeatureSchema, SchemaDocument, SchemaError},
};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// Neither the preferred nor the legacy directory exists
    #[error("could not find an artifact directory (tried {tried:?})")]
    DirectoryNotFound { tried: Vec<PathBuf> },

    /// No candidate name and no prefix match inside the artifact directory
    #[error("could not locate any of {candidates:?} inside {}", .dir.display())]
    FileNotFound {
        dir: PathBuf,
        candidates: Vec<String>,
    },

    /// A file was found but could not be read or deserialized
    #[error("failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadFailure,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadFailure {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid schema document: {0}")]
    SchemaDocument(#[from] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Shape(#[from] ShapeMismatch),
}

/// Files an estimator was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub columns: PathBuf,
    pub model: PathBuf,
}

/// Find the artifact directory: preferred name first, then the legacy name
pub fn resolve_directory(layout: &ArtifactsConfig) -> Result<PathBuf, ArtifactError> {
    let mut tried = Vec::new();

    for name in [&layout.preferred_dir, &layout.legacy_dir] {
        if name.is_empty() {
            continue;
        }
        let candidate = layout.root.join(name);
        if candidate.is_dir() {
            debug!(dir = %candidate.display(), "Resolved artifact directory");
            return Ok(candidate);
        }
        tried.push(candidate);
    }

    Err(ArtifactError::DirectoryNotFound { tried })
}

/// First existing file among `candidates`, else the first entry (by name)
/// starting with `prefix`
pub fn resolve_file(
    dir: &Path,
    candidates: &[String],
    prefix: Option<&str>,
) -> Result<PathBuf, ArtifactError> {
    for name in candidates {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    let not_found = || ArtifactError::FileNotFound {
        dir: dir.to_path_buf(),
        candidates: candidates.to_vec(),
    };

    let Some(prefix) = prefix else {
        return Err(not_found());
    };

    let entries = fs::read_dir(dir).map_err(|_| not_found())?;
    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    // read_dir order is platform-defined
    matches.sort();

    matches.into_iter().next().ok_or_else(not_found)
}

/// Resolve both artifact files for a layout
pub fn resolve_paths(layout: &ArtifactsConfig) -> Result<ArtifactPaths, ArtifactError> {
    let dir = resolve_directory(layout)?;
    let columns = resolve_file(&dir, &layout.columns_files, layout.columns_prefix.as_deref())?;
    let model = resolve_file(&dir, &layout.model_files, layout.model_prefix.as_deref())?;
    Ok(ArtifactPaths { dir, columns, model })
}

fn load_error(path: &Path, source: impl Into<LoadFailure>) -> ArtifactError {
    ArtifactError::Load {
        path: path.to_path_buf(),
        source: source.into(),
    }
}

pub fn read_schema(path: &Path) -> Result<FeatureSchema, ArtifactError> {
    let bytes = fs::read(path).map_err(|e| load_error(path, e))?;
    let document: SchemaDocument =
        serde_json::from_slice(&bytes).map_err(|e| load_error(path, e))?;
    FeatureSchema::from_document(document).map_err(|e| load_error(path, e))
}

pub fn read_model(path: &Path) -> Result<LinearModel, ArtifactError> {
    let bytes = fs::read(path).map_err(|e| load_error(path, e))?;
    LinearModel::from_slice(&bytes).map_err(|e| load_error(path, e))
}

/// Load a complete estimator from resolved paths
pub fn load_from_paths(paths: &ArtifactPaths) -> Result<Estimator, ArtifactError> {
    let schema = read_schema(&paths.columns)?;
    let model = read_model(&paths.model)?;

    info!(
        columns = schema.len(),
        locations = schema.locations().len(),
        model_format_version = model.source_version(),
        "Artifacts parsed"
    );

    Estimator::new(schema, model).map_err(|e| load_error(&paths.model, e))
}

/// Resolve and load a complete estimator for a layout
pub fn load(layout: &ArtifactsConfig) -> Result<(Estimator, ArtifactPaths), ArtifactError> {
    info!("Loading saved artifacts...");
    let paths = resolve_paths(layout)?;
    info!(
        columns = %paths.columns.display(),
        model = %paths.model.display(),
        "Resolved artifact files"
    );
    let estimator = load_from_paths(&paths)?;
    info!("Loading saved artifacts... done");
    Ok((estimator, paths))
}

/// One consistently loaded estimator and the files it came from
#[derive(Debug)]
struct Snapshot {
    estimator: Arc<Estimator>,
    paths: ArtifactPaths,
}

/// Holds the current estimator and reloads it on demand
pub struct ArtifactStore {
    layout: ArtifactsConfig,
    current: ArcSwap<Snapshot>,
}

impl ArtifactStore {
    /// Load artifacts for `layout`; fails if they cannot be loaded
    pub fn open(layout: ArtifactsConfig) -> Result<Self, ArtifactError> {
        let (estimator, paths) = load(&layout)?;
        Ok(Self::from_estimator(layout, estimator, paths))
    }

    /// Store around an already-built estimator
    pub fn from_estimator(
        layout: ArtifactsConfig,
        estimator: Estimator,
        paths: ArtifactPaths,
    ) -> Self {
        Self {
            layout,
            current: ArcSwap::from_pointee(Snapshot {
                estimator: Arc::new(estimator),
                paths,
            }),
        }
    }

    /// Re-resolve and re-read the artifacts, then swap them in.
    ///
    /// On error the previously loaded estimator stays current.
    pub fn reload(&self) -> Result<Arc<Estimator>, ArtifactError> {
        let (estimator, paths) = load(&self.layout)?;
        let estimator = Arc::new(estimator);
        self.current.store(Arc::new(Snapshot {
            estimator: estimator.clone(),
            paths,
        }));
        Ok(estimator)
    }

    /// Snapshot of the current estimator
    pub fn current(&self) -> Arc<Estimator> {
        self.current.load().estimator.clone()
    }

    /// Files the current estimator was loaded from
    pub fn paths(&self) -> ArtifactPaths {
        self.current.load().paths.clone()
    }
}
