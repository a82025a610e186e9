//! # CLI Interface
//!
//! Defines the command-line argument structure for `doctoriumd` using
//! `clap` derive. Every subcommand operates on the ledger stored under
//! `--home`; there is no long-running process.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Doctorium ledger host.
///
/// Loads genesis, applies file registrations, and answers registry and
/// balance queries against a local on-disk ledger.
#[derive(Parser, Debug)]
#[command(
    name = "doctoriumd",
    about = "Doctorium file-hash registry host",
    version,
    propagate_version = true
)]
pub struct DoctoriumCli {
    /// Ledger home directory. The database lives in `<home>/data`.
    #[arg(long, global = true, env = "DOCTORIUM_HOME", default_value = ".doctorium")]
    pub home: PathBuf,

    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, env = "DOCTORIUM_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Default log filter when `RUST_LOG` is not set.
    #[arg(
        long,
        global = true,
        default_value = "doctoriumd=info,doctorium_filehash=info,doctorium_protocol=warn"
    )]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `doctoriumd` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a ledger and load its genesis state.
    Init(InitArgs),
    /// Check a genesis file without touching any ledger.
    ValidateGenesis(ValidateGenesisArgs),
    /// Register a file hash and pay the upload reward.
    Upload(UploadArgs),
    /// List registered files, one page at a time.
    Files(FilesArgs),
    /// Show who registered a file hash.
    File(FileArgs),
    /// Show an account balance.
    Balance(BalanceArgs),
    /// Write the registry as a genesis document.
    Export(ExportArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `init` subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Chain identifier recorded in the ledger.
    #[arg(long, default_value = "doctorium-1")]
    pub chain_id: String,

    /// Genesis file (`{"files": [...]}`). An empty registry when omitted.
    #[arg(long)]
    pub genesis: Option<PathBuf>,
}

/// Arguments for the `validate-genesis` subcommand.
#[derive(Args, Debug)]
pub struct ValidateGenesisArgs {
    /// Genesis file to check.
    pub path: PathBuf,
}

/// Arguments for the `upload` subcommand.
#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("content").required(true).args(["hash", "file"])))]
pub struct UploadArgs {
    /// Bech32 address of the uploader.
    #[arg(long)]
    pub creator: String,

    /// Content hash to register, as given.
    #[arg(long)]
    pub hash: Option<String>,

    /// Local file whose SHA-256 (lowercase hex) is registered.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Arguments for the `files` subcommand.
#[derive(Args, Debug)]
pub struct FilesArgs {
    /// Hex `next_cursor` from a previous page.
    #[arg(long)]
    pub cursor: Option<String>,

    /// Page size. 0 selects the default; values above 1000 are clamped.
    #[arg(long, default_value_t = 0)]
    pub limit: u64,
}

/// Arguments for the `file` subcommand.
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Content hash to look up.
    pub hash: String,
}

/// Arguments for the `balance` subcommand.
#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Bech32 account address.
    pub address: String,

    /// Denomination to report.
    #[arg(long, default_value = "drt")]
    pub denom: String,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}
