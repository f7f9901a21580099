// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use compute_client::types::{encode, ProvisionRequest};
use compute_client::Client;
use compute_config_toml::{Config, Endpoint};
use serde::Serialize;
use slog::{debug, o, Drain, Level, Logger};

#[derive(Debug, Parser)]
#[clap(about, version)]
/// A simple CLI tool to provision servers through the compute API
struct Opt {
    /// Configuration file with the endpoint and server definitions
    #[clap(short, long, action)]
    config: Option<PathBuf>,

    /// Compute endpoint URL, overriding the configuration file
    #[clap(long, env = "COMPUTE_URL", action)]
    compute_url: Option<String>,

    /// Tenant ID, overriding the configuration file
    #[clap(long, env = "COMPUTE_TENANT", action)]
    tenant: Option<String>,

    /// Enable debugging
    #[clap(short, long, action)]
    debug: bool,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the create-server request body for a configured server
    Encode {
        /// Server definition in the configuration file
        #[clap(action)]
        server: String,
    },

    /// Create a configured server
    Create {
        /// Server definition in the configuration file
        #[clap(action)]
        server: String,
    },

    /// Delete a server
    Delete {
        #[clap(action)]
        id: String,
    },

    /// Hard-reboot a server
    Reboot {
        #[clap(action)]
        id: String,
    },

    /// List available flavors
    Flavors,

    /// List available images
    Images,

    /// Show the details of an image
    Image {
        #[clap(action)]
        id: String,
    },

    /// Delete an image
    DeleteImage {
        #[clap(action)]
        id: String,
    },
}

/// Create a top-level logger that outputs to stderr
fn create_logger(opt: &Opt) -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let level = if opt.debug { Level::Debug } else { Level::Info };
    let drain = slog::LevelFilter(drain, level).fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(drain, o!())
}

/// Picks the endpoint from the command line, falling back to the
/// configuration file for whatever was not given.
fn resolve_endpoint(
    compute_url: Option<String>,
    tenant: Option<String>,
    config: &Config,
) -> anyhow::Result<Endpoint> {
    let configured = config.endpoint.as_ref();
    let compute_url = compute_url
        .or_else(|| configured.map(|e| e.compute_url.clone()))
        .ok_or_else(|| anyhow!("no compute URL given or configured"))?;
    let tenant_id = tenant
        .or_else(|| configured.map(|e| e.tenant_id.clone()))
        .ok_or_else(|| anyhow!("no tenant given or configured"))?;
    Ok(Endpoint { compute_url, tenant_id })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn server_request(
    config: &Config,
    server: &str,
) -> anyhow::Result<ProvisionRequest> {
    config
        .server_request(server)
        .with_context(|| anyhow!("failed to load server definition {server}"))
}

fn print_encoded(config: &Config, server: &str) -> anyhow::Result<()> {
    let request = server_request(config, server)?;
    let payload = encode(&request)
        .with_context(|| anyhow!("invalid server definition {server}"))?;
    println!("{}", payload.as_str());
    Ok(())
}

async fn run(
    client: &Client,
    config: &Config,
    cmd: Command,
) -> anyhow::Result<()> {
    match cmd {
        Command::Encode { server } => print_encoded(config, &server)?,
        Command::Create { server } => {
            let request = server_request(config, &server)?;
            let response = client
                .create_server(&request)
                .await
                .with_context(|| anyhow!("failed to create server {server}"))?;
            print_json(&response)?;
        }
        Command::Delete { id } => client
            .delete_server(&id)
            .await
            .with_context(|| anyhow!("failed to delete server {id}"))?,
        Command::Reboot { id } => client
            .reboot_server(&id)
            .await
            .with_context(|| anyhow!("failed to reboot server {id}"))?,
        Command::Flavors => print_json(
            &client
                .list_flavors()
                .await
                .with_context(|| anyhow!("failed to list flavors"))?,
        )?,
        Command::Images => print_json(
            &client
                .list_images()
                .await
                .with_context(|| anyhow!("failed to list images"))?,
        )?,
        Command::Image { id } => print_json(
            &client
                .get_image(&id)
                .await
                .with_context(|| anyhow!("failed to get image {id}"))?,
        )?,
        Command::DeleteImage { id } => client
            .delete_image(&id)
            .await
            .with_context(|| anyhow!("failed to delete image {id}"))?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();
    let log = create_logger(&opt);
    let Opt { config, compute_url, tenant, cmd, .. } = opt;

    let config = match config {
        Some(path) => compute_config_toml::parse(&path).with_context(|| {
            format!("failed to parse config {}", path.display())
        })?,
        None => Config::default(),
    };

    // Encoding never talks to the provider, so it works without an endpoint.
    if let Command::Encode { server } = &cmd {
        return print_encoded(&config, server);
    }

    let endpoint = resolve_endpoint(compute_url, tenant, &config)?;
    debug!(log, "using compute endpoint";
        "url" => &endpoint.compute_url,
        "tenant" => &endpoint.tenant_id);
    let client =
        Client::new_http(&endpoint.compute_url, &endpoint.tenant_id, log);

    run(&client, &config, cmd).await
}
