//! # Application State
//!
//! Shared state passed to all route handlers via the `State` extractor:
//! the compliance store behind a `parking_lot::RwLock`, the impact
//! resolver, and configuration.
//!
//! Handlers never hold the store lock across `.await`. The only handler
//! that awaits is impact resolution, which goes through
//! [`regtrace_state::resolve_requirement`].

use std::sync::Arc;

use regtrace_advisor_client::{AdvisorClient, AdvisorConfig, AdvisorError};
use regtrace_impact::ImpactResolver;
use regtrace_ingest::sample_dataset;
use regtrace_state::{shared, ComplianceStore, SharedStore, StoreError};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind.
    pub port: u16,
    /// Load the sample dataset at startup.
    pub seed_sample: bool,
    /// Resolve impacts from keyword rules only.
    pub advisor_disabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            seed_sample: false,
            advisor_disabled: true,
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `REGTRACE_SEED_SAMPLE` and `REGTRACE_ADVISOR_DISABLED`.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let seed_sample = std::env::var("REGTRACE_SEED_SAMPLE")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self {
            port,
            seed_sample,
            advisor_disabled: AdvisorConfig::disabled_by_env(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The compliance store.
    pub store: SharedStore,
    /// Impact resolver, with or without a remote advisor.
    pub resolver: ImpactResolver,
    /// Runtime configuration.
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("advisor", &self.resolver.advisor_name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Empty store, keyword-only resolution.
    pub fn new() -> Self {
        Self::with_parts(
            ComplianceStore::new(),
            ImpactResolver::keyword_only(),
            AppConfig::default(),
        )
    }

    /// State from explicit parts.
    pub fn with_parts(store: ComplianceStore, resolver: ImpactResolver, config: AppConfig) -> Self {
        Self {
            store: shared(store),
            resolver,
            config: Arc::new(config),
        }
    }

    /// Store loaded with the sample dataset, keyword-only resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample dataset is inconsistent.
    pub fn with_sample() -> Result<Self, StoreError> {
        Ok(Self::with_parts(
            ComplianceStore::from_dataset(sample_dataset()?)?,
            ImpactResolver::keyword_only(),
            AppConfig {
                seed_sample: true,
                ..AppConfig::default()
            },
        ))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors assembling state at startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The advisor client could not be configured.
    #[error("advisor configuration: {0}")]
    Advisor(#[from] AdvisorError),

    /// The sample dataset could not be loaded.
    #[error("sample dataset: {0}")]
    Store(#[from] StoreError),
}

/// Build state from configuration: seed the store if requested and wire
/// the advisor client unless disabled.
///
/// # Errors
///
/// Returns [`BootstrapError`] on advisor misconfiguration or a bad sample.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let store = if config.seed_sample {
        let store = ComplianceStore::from_dataset(sample_dataset().map_err(StoreError::from)?)?;
        tracing::info!(
            regulations = store.list_regulations().len(),
            requirements = store.requirements().count(),
            "sample dataset loaded"
        );
        store
    } else {
        ComplianceStore::new()
    };

    let resolver = if config.advisor_disabled {
        tracing::info!("advisor disabled, resolving from keyword rules only");
        ImpactResolver::keyword_only()
    } else {
        let advisor_config = AdvisorConfig::from_env().map_err(AdvisorError::from)?;
        tracing::info!(url = %advisor_config.url, model = %advisor_config.model, "advisor configured");
        ImpactResolver::new(Arc::new(AdvisorClient::new(advisor_config)?))
    };

    Ok(AppState::with_parts(store, resolver, config))
}
