use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use eks_connect::{Command, Config, EksConnectCli, ExecCredential, Kubeconfig};
use eks_credentials::TokenGenerator;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
pub async fn main() -> Result<()> {
    // stdout carries the credential document, so logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = EksConnectCli::parse();

    let mut config = Config::from_env().context("Failed to resolve AWS configuration")?;
    if let Some(region) = cli.region {
        config = config.with_region(region)?;
    }

    let cancel = CancellationToken::new();
    if let Some(seconds) = cli.timeout {
        let deadline = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            tracing::warn!(seconds, "Timed out, canceling");
            deadline.cancel();
        });
    }

    let document = match cli.command {
        Command::Token { cluster_id } => {
            let generator = TokenGenerator::new(config.presigner());
            let token = generator
                .generate_token(&cluster_id, &cancel)
                .await
                .with_context(|| format!("Failed to generate token for {}", cluster_id))?;

            ExecCredential::new(&token).to_json()?
        }
        Command::Profile { cluster } => {
            let builder = config.profile_builder()?;
            let profile = builder
                .build_profile(&cluster, &cancel)
                .await
                .with_context(|| format!("Failed to build connection profile for {}", cluster))?;

            tracing::info!(%cluster, host = %profile.host(), "Built connection profile");
            Kubeconfig::new(&cluster, &profile).to_json()?
        }
    };

    println!("{document}");
    Ok(())
}
