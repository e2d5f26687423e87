//! Builder for creating and configuring TrainingPlanner instances.

use std::path::{Path, PathBuf};

use log::debug;
use rand::{rngs::StdRng, SeedableRng};
use tokio::task;

use super::TrainingPlanner;
use crate::{
    catalog::ActivityCatalog,
    config::EngineConfig,
    db::Database,
    error::{EngineError, Result},
};

/// Builder for creating and configuring [`TrainingPlanner`] instances.
#[derive(Debug, Clone, Default)]
pub struct TrainingPlannerBuilder {
    database_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    config: Option<EngineConfig>,
    catalog_path: Option<PathBuf>,
    catalog: Option<ActivityCatalog>,
    seed: Option<u64>,
}

impl TrainingPlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses the XDG data directory:
    /// `$XDG_DATA_HOME/drillbook/drillbook.db` or
    /// `~/.local/share/drillbook/drillbook.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Reads the engine configuration from this file instead of the XDG
    /// config directory.
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.config_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses an already-built configuration. Takes precedence over
    /// `with_config_path`.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Loads the activity catalog from a JSON file at build time.
    pub fn with_catalog_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.catalog_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses an already-loaded catalog. Takes precedence over
    /// `with_catalog_path`.
    pub fn with_catalog(mut self, catalog: ActivityCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Seeds the random jitter so plan generation is reproducible.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the configured planner instance.
    ///
    /// Without a catalog the planner still serves workload and usage
    /// operations; plan generation then reports every stage as not found.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::FileSystem` if the database or catalog path is
    /// invalid, `EngineError::Database` if database initialization fails,
    /// and `EngineError::Setting` for an out-of-range configuration.
    pub async fn build(self) -> Result<TrainingPlanner> {
        let config = match self.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => EngineConfig::discover(self.config_path.as_deref())?,
        };

        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(EngineError::file_system(parent))?;
        }

        let catalog = match (self.catalog, self.catalog_path) {
            (Some(catalog), _) => catalog,
            (None, Some(path)) => {
                let table = config.stage_keywords.clone();
                task::spawn_blocking(move || ActivityCatalog::load(&path, &table)).await??
            }
            (None, None) => ActivityCatalog::default(),
        };

        let db_path_clone = db_path.clone();
        let usage = task::spawn_blocking(move || {
            let db = Database::new(&db_path_clone)?;
            db.load_usage()
        })
        .await??;

        debug!(
            "Planner ready: {} activities, {} usage counters, database {}",
            catalog.len(),
            usage.len(),
            db_path.display()
        );

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(TrainingPlanner::new(db_path, config, catalog, usage, rng))
    }

    /// Returns the default database path in the XDG data directory.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("drillbook")
            .place_data_file("drillbook.db")
            .map_err(|e| EngineError::XdgDirectory(e.to_string()))
    }
}
