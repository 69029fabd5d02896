//! Vaultwire server binary.
//!
//! # Usage
//!
//! ```bash
//! vaultwire-server --root /srv/vaultwire --port-file port.info
//! ```

use clap::Parser;
use mio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vaultwire_server::{
    config::{read_port, Args},
    dispatcher, storage::RedbRepository, system_env::SystemEnv, ServerError,
};

fn main() -> Result<(), ServerError> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("vaultwire server starting");

    let port_file =
        if args.port_file.is_absolute() { args.port_file.clone() } else { args.root.join(&args.port_file) };
    let port = read_port(&port_file);
    tracing::info!(port, "resolved listen port");

    let db_path = args.root.join("vaultwire.redb");
    let repository = RedbRepository::open(&db_path)?;
    let env = SystemEnv::new();
    let state = vaultwire_core::ServerState::new(repository, env, args.root.clone())?;

    let addr = format!("0.0.0.0:{port}")
        .parse()
        .map_err(|err| ServerError::Config(format!("invalid bind address: {err}")))?;
    let listener = TcpListener::bind(addr)?;
    tracing::info!(%addr, "listening");

    dispatcher::run(state, listener)?;
    Ok(())
}
