//! Minimal proxyfix example — a two-route JSON service behind a
//! prefix-stripping reverse proxy.
//!
//! Run with:
//!   REVERSE_PROXY_PATH=/some-service/v1 RUST_LOG=debug \
//!     cargo run --example behind_proxy
//!
//! Try (as the proxy would send it, prefix intact):
//!   curl http://localhost:3000/some-service/v1/users/42 \
//!        -H 'x-forwarded-proto: https' \
//!        -H 'x-forwarded-host: example.com' \
//!        -H 'x-forwarded-for: 203.0.113.9'
//!
//! The `self` link in the response carries the full external prefix even
//! though the route matched the stripped path `/users/42`.

use std::convert::Infallible;

use bytes::Bytes;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use proxyfix::{ClientAddr, Config, ReverseProxyPrefix, external_href, href};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Prefix comes from REVERSE_PROXY_PATH; unset means plain pass-through.
    let config = Config::from_env();
    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    info!("listening on 0.0.0.0:3000");

    loop {
        let (stream, peer) = listener.accept().await?;
        let config = config.clone();

        tokio::spawn(async move {
            // Explicit install: the wrapped service IS the entry point for
            // this connection. Nothing reaches `handle` except through it.
            let svc = ReverseProxyPrefix::wrap(service_fn(handle), config);
            let io = TokioIo::new(stream);

            if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                .serve_connection(io, svc)
                .await
            {
                error!(peer = %peer, "connection error: {e}");
            }
        });
    }
}

async fn handle(
    req: http::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    // Routes match the stripped path.
    let res = match req.uri().path() {
        "/users/42" => {
            let this = href(&req, "/users/42");
            let external = external_href(&req, "/users/42");
            let client = req
                .extensions()
                .get::<ClientAddr>()
                .map(|a| a.0.to_string())
                .unwrap_or_else(|| "unknown".to_owned());
            let body = format!(
                r#"{{"id":"42","self":"{this}","href":"{external}","client":"{client}"}}"#,
            );
            json(http::StatusCode::OK, body)
        }
        "/healthz" => json(http::StatusCode::OK, r#"{"status":"ok"}"#.to_owned()),
        _ => json(http::StatusCode::NOT_FOUND, r#"{"error":"not found"}"#.to_owned()),
    };
    Ok(res)
}

fn json(status: http::StatusCode, body: String) -> http::Response<Full<Bytes>> {
    http::Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .expect("static response parts are valid")
}
