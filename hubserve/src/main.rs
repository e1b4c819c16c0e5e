//! Hubserve - serve a local directory over HTTP
//!
//! This is the main entry point for the Hubserve CLI.

mod banner;

use clap::Parser;
use hubserve_core::config::{ConfigLoader, HubserveConfig};
use hubserve_core::Error;
use hubserve_server::{Server, ShutdownSignal};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[cfg(target_os = "linux")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Hubserve - local static file server with gzip, caching and CORS headers
#[derive(Parser)]
#[command(name = "hubserve")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to run server on (default: 3000)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (default: 0.0.0.0)
    #[arg(long)]
    host: Option<String>,

    /// Directory to serve (default: current directory)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Configuration file (.json or .toml); flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not open browser automatically
    #[arg(long)]
    no_browser: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags
    fn into_config(self) -> hubserve_core::Result<HubserveConfig> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load(path)?,
            None => HubserveConfig::default(),
        };

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(root) = self.root {
            config.root = root;
        }
        if self.no_browser {
            config.open_browser = false;
        }
        if self.verbose {
            config.logging.level = Some("debug".to_string());
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.into_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let code = runtime.block_on(run(config));
    drop(runtime);

    std::process::exit(code);
}

fn init_tracing(config: &HubserveConfig) {
    let fallback = config.logging.level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

/// Serve until a signal arrives. Returns the process exit code.
async fn run(config: HubserveConfig) -> i32 {
    let server = match Server::bind(&config) {
        Ok(s) => s,
        Err(e) => {
            report_startup_error(&config, &e);
            return 1;
        }
    };

    let shutdown = match ShutdownSignal::with_os_signals() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("❌ Failed to install signal handlers: {}", e);
            eprintln!("\n❌ Unexpected error: {}\n", e);
            return 1;
        }
    };

    let port = server.local_addr().port();
    banner::print(&server);
    if config.open_browser {
        banner::open_browser(&format!("http://localhost:{}/index.html", port));
    }

    let serving = tokio::spawn(server.run(shutdown.clone()));

    shutdown.recv().await;
    println!("\n\n🛑 Shutting down server...");

    match serving.await {
        Ok(Ok(())) => {
            println!("✅ Server stopped successfully.\n");
            0
        }
        Ok(Err(e)) => {
            // Teardown problems do not change the outcome of a requested shutdown
            tracing::warn!("⚠️ {}", e);
            println!("⚠️  Error during shutdown: {}\n", e);
            0
        }
        Err(e) => {
            tracing::error!("❌ Server task failed: {}", e);
            eprintln!("\n❌ Unexpected error: {}\n", e);
            1
        }
    }
}

fn report_startup_error(config: &HubserveConfig, error: &Error) {
    tracing::error!("❌ Startup failed: {}", error);
    match error {
        Error::AddrInUse { .. } => {
            eprintln!("\n❌ Error: Port {} is already in use!", config.port);
            eprintln!(
                "   Try a different port or stop the process using port {}",
                config.port
            );
            eprintln!("   To use a different port: hubserve --port 8081\n");
        }
        Error::RootMissing(root) => {
            eprintln!("\n❌ Error: Directory {} does not exist!\n", root.display());
        }
        other => {
            eprintln!("\n❌ Error starting server: {}\n", other);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from(["hubserve", "-p", "8081", "--host", "127.0.0.1", "--no-browser"]);
        let config = cli.into_config().unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.host, "127.0.0.1");
        assert!(!config.open_browser);
        assert_eq!(config.root, PathBuf::from("."));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hubserve.json");
        std::fs::write(&path, r#"{"port": 4000, "host": "127.0.0.1", "open_browser": false}"#).unwrap();

        let cli = Cli::parse_from(["hubserve", "--config", path.to_str().unwrap(), "--port", "5000"]);
        let config = cli.into_config().unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "127.0.0.1");
        assert!(!config.open_browser);
    }
}
