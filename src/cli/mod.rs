// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod detect;
pub mod download;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Spotter CLI
#[derive(Parser, Debug)]
#[command(name = "spotter-cli")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "CLI tools for the Spotter amenity detection service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect amenities in images and print the JSON response
    Detect(detect::DetectArgs),

    /// Download a detection model into the Hugging Face cache
    Download(download::DownloadArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Detect(args) => detect::run_detect(args).await,
        Commands::Download(args) => download::run_download(args).await,
    }
}
