// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use hf_hub::api::tokio::ApiBuilder;
use hf_hub::{Repo, RepoType};
use tracing::info;

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Hugging Face model repository (owner/name)
    #[arg(long, env = "MODEL_REPO")]
    pub repo: String,

    /// ONNX file inside the repository
    #[arg(long, env = "MODEL_FILE")]
    pub file: String,

    /// Branch, tag or commit
    #[arg(long, default_value = "main")]
    pub revision: String,
}

/// Fetch the model into the local Hugging Face cache and print its path
pub async fn run_download(args: DownloadArgs) -> Result<()> {
    info!(
        "Downloading {} from {} ({})",
        args.file, args.repo, args.revision
    );

    let api = ApiBuilder::new()
        .with_progress(true)
        .build()
        .context("Failed to initialize Hugging Face client")?;

    let repo = api.repo(Repo::with_revision(
        args.repo.clone(),
        RepoType::Model,
        args.revision.clone(),
    ));

    let path = repo
        .get(&args.file)
        .await
        .with_context(|| format!("Failed to download {} from {}", args.file, args.repo))?;

    info!("✅ Model available at {}", path.display());
    println!("{}", path.display());

    Ok(())
}
