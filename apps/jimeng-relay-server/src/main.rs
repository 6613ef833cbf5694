//! Jimeng Relay Server - signing relay for the Jimeng image-to-video API.
//!
//! Accepts unauthenticated JSON requests, wraps them in the provider's
//! request shape, signs them with the configured Volcengine credentials and
//! forwards them to the visual API.
//!
//! # Usage
//!
//! ```text
//! ACCESS_KEY=AKLT... SECRET_KEY=... jimeng-relay-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ACCESS_KEY` | *(required)* | Volcengine access key |
//! | `SECRET_KEY` | *(required)* | Volcengine secret key |
//! | `LISTEN_HOST` | `0.0.0.0` | Bind host |
//! | `PORT` | `5000` | Bind port |
//! | `UPSTREAM_ENDPOINT` | `https://visual.volcengineapi.com` | Outbound base URL |
//! | `UPSTREAM_TIMEOUT_SECS` | `30` | Outbound request timeout |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use jimeng_core::{HttpUpstream, JimengRelay, JimengRelayHandler, RelayConfig};
use jimeng_http::{RelayHttpConfig, RelayHttpService};

/// Server version reported in health check responses.
const VERSION: &str = env!("CARGO_PKG_VERSION");

type RelayService = RelayHttpService<JimengRelayHandler<HttpUpstream>>;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Wire the upstream client, provider, and handler into the HTTP service.
fn build_service(config: RelayConfig) -> Result<RelayService> {
    let upstream = HttpUpstream::new(config.upstream_timeout)
        .context("failed to build upstream HTTP client")?;
    let relay = JimengRelay::new(Arc::new(config), upstream);
    let handler = JimengRelayHandler::new(Arc::new(relay));

    let http_config = RelayHttpConfig {
        version: VERSION.to_owned(),
        ..RelayHttpConfig::default()
    };

    Ok(RelayHttpService::new(Arc::new(handler), http_config))
}

async fn serve(listener: TcpListener, service: RelayService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Probe `GET /health` on `addr` with a raw HTTP/1.1 request.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    // No half-close: the server drops the connection on read EOF.
    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if is_healthy_response(&response) {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

fn is_healthy_response(response: &str) -> bool {
    response.starts_with("HTTP/1.1 200") && response.contains("\"running\"")
}

/// The address the health probe connects to.
///
/// Reads only `LISTEN_HOST` / `PORT`, so the probe works without credentials.
/// An unspecified bind address maps to the loopback of the same family.
fn probe_addr(lookup: impl Fn(&str) -> Option<String>) -> String {
    let host = lookup("LISTEN_HOST")
        .and_then(|v| v.trim().parse::<IpAddr>().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let port = lookup("PORT")
        .and_then(|v| v.trim().parse::<u16>().ok())
        .unwrap_or(5000);

    let host = match host {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(host, port).to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let addr = probe_addr(|key| std::env::var(key).ok());
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let config = RelayConfig::from_env().context("failed to load relay configuration")?;
    init_tracing(&config.log_level)?;

    info!(
        endpoint = %config.endpoint,
        host = %config.host,
        region = %config.region,
        timeout_secs = config.upstream_timeout.as_secs(),
        "initializing Jimeng relay",
    );

    let addr = config.listen_addr();
    let service = build_service(config)?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, version = VERSION, "starting Jimeng Relay Server");

    serve(listener, service).await
}
