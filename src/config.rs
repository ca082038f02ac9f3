//! Command line and environment configuration for the binary.

use std::path::PathBuf;

use clap::Parser;
use dataset::SyntheticProvider;
use render::EngineConfig;
use server::ServerConfig;

/// Live Plot - interactive server-rendered plots
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "live-plot")]
#[command(about = "Serve interactive, server-rendered plots of tabular data")]
#[command(version)]
pub struct Args {
    /// Host to bind to
    #[arg(long, env = "PLOT_SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PLOT_SERVER_PORT", default_value_t = server::app::DEFAULT_PORT)]
    pub port: u16,

    /// Directory served under /_static
    #[arg(long, env = "PLOT_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Rows per synthetic dataset
    #[arg(long, env = "PLOT_DATASET_ROWS", default_value_t = dataset::provider::DEFAULT_ROWS)]
    pub rows: usize,

    /// Seed for synthetic datasets (random when absent)
    #[arg(long, env = "PLOT_DATASET_SEED")]
    pub seed: Option<u64>,

    /// Figure width in pixels
    #[arg(long, env = "PLOT_WIDTH", default_value_t = 640)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, env = "PLOT_HEIGHT", default_value_t = 480)]
    pub height: u32,
}

impl Args {
    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            width: self.width,
            height: self.height,
            static_dir: self.static_dir.clone(),
        }
    }

    pub fn provider(&self) -> SyntheticProvider {
        let provider = SyntheticProvider::new().rows(self.rows);
        match self.seed {
            Some(seed) => provider.seed(seed),
            None => provider,
        }
    }
}
