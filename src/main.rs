use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use tokio::sync::watch;

use blogd::{repo, server};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Blog content service with a gRPC API and an HTTP/JSON gateway.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Port of the gRPC server
    #[arg(long, default_value_t = 9090)]
    grpc_port: u16,

    /// Port of the HTTP/JSON gateway
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Full database connection string, takes precedence over the discrete settings
    #[arg(long, env = "DATABASE_URL")]
    db_url: Option<String>,

    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    db_host: String,

    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    db_port: u16,

    #[arg(long, env = "DB_USER", default_value = "postgres")]
    db_user: String,

    #[arg(long, env = "DB_PASSWORD", default_value = "postgres", hide_env_values = true)]
    db_password: String,

    #[arg(long, env = "DB_NAME", default_value = "blog")]
    db_name: String,

    /// One of disable, allow, prefer, require, verify-ca, verify-full
    #[arg(long, env = "DB_SSLMODE", default_value = "disable")]
    db_sslmode: String,

    /// Maximum number of open connections
    #[arg(long, default_value_t = 10)]
    db_max_open: u32,

    /// Number of connections kept open when idle
    #[arg(long, default_value_t = 5)]
    db_max_idle: u32,

    /// Maximum lifetime of a connection, in seconds
    #[arg(long, default_value_t = 300)]
    db_conn_max_life: u64,
}

impl Args {
    fn repo_config(&self) -> repo::Config {
        let config = repo::Config::default()
            .with_host(&self.db_host)
            .with_port(self.db_port)
            .with_credentials(&self.db_user, &self.db_password)
            .with_database(&self.db_name)
            .with_ssl_mode(&self.db_sslmode)
            .with_pool_limits(
                self.db_max_open,
                self.db_max_idle,
                Duration::from_secs(self.db_conn_max_life),
            );

        match &self.db_url {
            Some(url) => config.with_url(url),
            None => config,
        }
    }
}

fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!("unable to start runtime :: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(args)) {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let (stop_tx, stop_rx) = watch::channel(false);
    watch_signals(stop_tx)?;

    let repo = repo::Repository::try_new(&args.repo_config()).await?;
    let store = Arc::new(repo::FacadeBlog::new(repo.clone()));

    let server = server::Server::new(
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, args.grpc_port)),
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, args.http_port)),
    );
    let result = server.start(store, stop_rx).await;

    repo.close().await;
    info!("bye");

    Ok(result?)
}

/// Forwards SIGINT/SIGTERM to the shutdown channel.
fn watch_signals(stop: watch::Sender<bool>) -> std::io::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    std::thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            warn!("received signal {}, shutting down", sig);
            stop.send_replace(true);
        }
    });

    Ok(())
}
