use std::time::Duration;

use clap::Parser;
use http::{Method, Uri};

use wireget_web::{Client, ClientConfig, Request};

#[derive(Debug, Parser)]
#[command(name = "wireget")]
struct Cli {
    host: String,
    #[arg(long, default_value_t = 80)]
    port: u16,
    #[arg(long, default_value = "/")]
    path: String,
    #[arg(long, default_value = "GET")]
    method: String,
    #[arg(long = "http-version", default_value = "1.0")]
    http_version: String,
    #[arg(long = "timeout-secs", default_value_t = 30)]
    timeout_secs: u64,
    #[arg(long = "preview-bytes", default_value_t = 100)]
    preview_bytes: usize,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    env_logger::init();
    let cli = Cli::parse();

    let path = if cli.path.starts_with('/') {
        cli.path.clone()
    } else {
        format!("/{}", cli.path)
    };
    let uri: Uri = format!("http://{}:{}{}", cli.host, cli.port, path)
        .parse()
        .map_err(|err| format!("invalid target: {err}"))?;
    let method: Method = cli
        .method
        .parse()
        .map_err(|_| format!("invalid method: {}", cli.method))?;
    let http_version = match cli.http_version.as_str() {
        "1.0" => "HTTP/1.0",
        "1.1" => "HTTP/1.1",
        other => return Err(format!("unsupported HTTP version: {other}")),
    };

    let request = Request::builder(uri)
        .method(method)
        .http_version(http_version)
        .build();
    let client = Client::new(ClientConfig {
        timeout: Duration::from_secs(cli.timeout_secs),
        ..ClientConfig::default()
    });

    log::debug!("fetching {}:{}{}", cli.host, cli.port, path);
    let result = client.fetch(request).await.map_err(|err| err.to_string())?;

    for warning in &result.warnings {
        log::warn!("non-conformant response: {warning:?}");
    }

    println!("headers: {}", result.content_type().unwrap_or(""));
    println!(
        "resp: code={}, len={}, body={}",
        result.status(),
        result.body().len(),
        result.body_preview(cli.preview_bytes)
    );

    Ok(())
}
