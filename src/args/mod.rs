//! Command-line parsing and the handlers behind each subcommand.

use std::path::Path;

use lanprefill::app::FreshnessStore;
use lanprefill::config::{Paths, PrefillConfig, Settings, load_settings, resolve_config_dir};
use lanprefill::error::PrefillError;
use lanprefill::logic::PrefillPipeline;
use lanprefill::sources::{CacheTransfer, HttpCatalog, HttpManifestSource, build_http_client};

pub mod cache;
pub mod definition;
pub mod prefill;
pub mod select;
pub mod status;
pub mod utils;

pub use definition::{Args, Commands};
pub use utils::determine_log_level;

/// Pipeline wired to the HTTP collaborators and the on-disk freshness store.
pub type HttpPipeline = PrefillPipeline<HttpManifestSource, FreshnessStore, CacheTransfer>;

/// Resolved directories and settings shared by every handler.
pub struct Context {
    /// Config, log and state locations.
    pub paths: Paths,
    /// Parsed `settings.conf`.
    pub settings: Settings,
}

impl Context {
    /// What: Resolve the config directory, create its layout and load settings.
    ///
    /// Inputs:
    /// - `config_dir`: `--config-dir` override
    ///
    /// Details:
    /// - A missing `settings.conf` is created from the skeleton.
    pub fn load(config_dir: Option<&Path>) -> Self {
        let paths = Paths::new(resolve_config_dir(config_dir));
        if let Err(e) = paths.ensure() {
            tracing::warn!(root = %paths.root().display(), error = %e, "[Config] Failed to create config directories");
        }
        let settings = load_settings(&paths.settings_file());
        Self { paths, settings }
    }

    /// What: Build the shared HTTP client from settings.
    ///
    /// # Errors
    /// - `PrefillError::Setup` when the client cannot be constructed.
    pub fn http_client(&self) -> Result<reqwest::Client, PrefillError> {
        build_http_client(self.settings.request_timeout).map_err(PrefillError::Setup)
    }

    /// Catalog collaborator rooted at the configured catalog URL.
    pub fn catalog(&self, client: &reqwest::Client) -> HttpCatalog {
        HttpCatalog::new(client.clone(), self.settings.catalog_url.clone())
    }

    /// What: Assemble the prefill pipeline with the HTTP collaborators.
    ///
    /// Inputs:
    /// - `client`: Shared HTTP client
    /// - `config`: Run options
    pub fn pipeline(&self, client: &reqwest::Client, config: PrefillConfig) -> HttpPipeline {
        PrefillPipeline::new(
            config,
            HttpManifestSource::new(client.clone(), self.settings.catalog_url.clone()),
            FreshnessStore::open(self.paths.freshness_file()),
            CacheTransfer::new(
                client.clone(),
                self.settings.cache_server.clone(),
                self.settings.max_concurrent_requests,
            ),
        )
    }
}

/// What: Dispatch the parsed subcommand.
///
/// Inputs:
/// - `args`: Parsed command line
/// - `ctx`: Loaded directories and settings
///
/// # Errors
/// - Whatever the handler returns; `main` maps it to an exit status.
pub async fn process_args(args: &Args, ctx: &Context) -> Result<(), PrefillError> {
    match &args.command {
        Commands::SelectApps { no_color } => {
            select::handle_select_apps(ctx, *no_color, args.verbose).await
        }
        Commands::Prefill { all, force, apps } => {
            prefill::handle_prefill(ctx, *all, *force, args.verbose, apps).await
        }
        Commands::ClearCache => cache::handle_clear_cache(ctx),
        Commands::Status => status::handle_status(ctx).await,
    }
}
