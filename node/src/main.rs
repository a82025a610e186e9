// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Doctorium Host
//!
//! Entry point for the `doctoriumd` binary. Parses CLI arguments,
//! initializes logging, opens the ledger under `--home`, and runs one
//! command against it.
//!
//! - `init`             — create the ledger and load genesis
//! - `validate-genesis` — check a genesis file offline
//! - `upload`           — register a file hash (one message per block)
//! - `files` / `file`   — registry queries
//! - `balance`          — bank balance of an account
//! - `export`           — dump the registry as genesis JSON
//! - `version`          — print build version information
//!
//! Command output goes to stdout as JSON; logs go to stderr.

mod app;
mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;

use doctorium_filehash::genesis::validate_genesis_json;
use doctorium_filehash::{
    Msg, MsgUploadFile, PageRequest, Query, QueryFileListRequest, QueryGetFileRequest,
};
use doctorium_protocol::identity::AccAddress;

use app::App;
use cli::{Commands, DoctoriumCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = DoctoriumCli::parse();
    logging::init_logging(&cli.log_level, LogFormat::from_str_lossy(&cli.log_format));

    match cli.command {
        Commands::Init(args) => init_chain(&cli.home, args),
        Commands::ValidateGenesis(args) => validate_genesis_file(&args.path),
        Commands::Upload(args) => upload(&cli.home, args),
        Commands::Files(args) => list_files(&cli.home, args),
        Commands::File(args) => {
            let app = App::open(&cli.home)?;
            let query = Query::GetFile(QueryGetFileRequest {
                file_hash: args.hash,
            });
            print_json(&app.query(&query)?)
        }
        Commands::Balance(args) => {
            let address = AccAddress::from_bech32(&args.address)
                .with_context(|| format!("invalid address: {}", args.address))?;
            let app = App::open(&cli.home)?;
            let amount = app.balance(&address, &args.denom)?;
            print_json(&serde_json::json!({
                "address": args.address,
                "denom": args.denom,
                "amount": amount,
            }))
        }
        Commands::Export(args) => export(&cli.home, args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Creates the ledger and loads the genesis file, or an empty registry.
fn init_chain(home: &Path, args: cli::InitArgs) -> Result<()> {
    let genesis = match &args.genesis {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read genesis file {}", path.display()))?,
        None => br#"{"files":[]}"#.to_vec(),
    };

    tracing::info!(home = %home.display(), chain_id = %args.chain_id, "initializing ledger");
    let app = App::open(home)?;
    let loaded = app.init_chain(&args.chain_id, &genesis)?;

    println!("Ledger initialized successfully.");
    println!("  Home     : {}", home.display());
    println!("  Chain ID : {}", args.chain_id);
    println!("  Files    : {}", loaded);
    Ok(())
}

fn validate_genesis_file(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read genesis file {}", path.display()))?;
    let genesis = validate_genesis_json(&bytes)
        .with_context(|| format!("genesis file {} is invalid", path.display()))?;
    println!(
        "Genesis file {} is valid ({} files).",
        path.display(),
        genesis.files.len()
    );
    Ok(())
}

fn upload(home: &Path, args: cli::UploadArgs) -> Result<()> {
    let file_hash = match (args.hash, args.file) {
        (Some(hash), _) => hash,
        (None, Some(path)) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            hex::encode(Sha256::digest(&bytes))
        }
        (None, None) => bail!("either --hash or --file is required"),
    };

    let app = App::open(home)?;
    let msg = Msg::UploadFile(MsgUploadFile::new(args.creator, file_hash));
    let result = app.deliver(&msg)?;
    print_json(&result)?;

    if !result.is_ok() {
        bail!("upload rejected: {}", result.log);
    }
    Ok(())
}

fn list_files(home: &Path, args: cli::FilesArgs) -> Result<()> {
    let pagination = match args.cursor {
        Some(cursor) => {
            let bytes = hex::decode(&cursor).context("cursor must be hex")?;
            PageRequest::after(bytes, args.limit)
        }
        None => PageRequest::first(args.limit),
    };

    let app = App::open(home)?;
    let response = app.query(&Query::FileList(QueryFileListRequest { pagination }))?;
    print_json(&response)
}

fn export(home: &Path, args: cli::ExportArgs) -> Result<()> {
    let app = App::open(home)?;
    let json = app.export()?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "genesis exported");
        }
        None => println!("{}", String::from_utf8_lossy(&json)),
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("doctoriumd {}", env!("CARGO_PKG_VERSION"));
    println!("rustc      {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
