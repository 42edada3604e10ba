//! `plan-share` command-line front end.
//!
//! Provides the logic behind the binary entry point:
//! - `encode`     : JSON plan (stdin) → shareable token
//! - `decode`     : shareable token (stdin) → JSON plan
//! - `url <base>` : JSON plan (stdin) → share URL
//! - `save`, `load`, `clear`, `compression on|off`: persistence in a
//!   directory-backed store (`--dir <path>`, optional `--config <toml>`)
//!
//! Input JSON may contain ISO-8601 millisecond strings or tagged date records;
//! both become dates. Output JSON uses tagged date records.

use std::path::PathBuf;

use plan_share_codec::structured::{self, encode_value};
use plan_share_codec::{DecodeError, EncodeError};
use thiserror::Error;

use crate::config::StoreConfig;
use crate::error::{ConfigError, ShareError, StorageError};
use crate::share::{from_shareable_token, share_url, to_shareable_token};
use crate::storage::FileStore;
use crate::store::PlanStore;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("invalid input: {0}")]
    Input(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Share(#[from] ShareError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no usable plan data")]
    NoData,
    #[error("plan could not be saved")]
    SaveFailed,
}

pub const USAGE: &str = "\
usage: plan-share encode | decode | url <base>
       plan-share save | load | clear --dir <path> [--config <toml>]
       plan-share compression on|off --dir <path> [--config <toml>]";

// ── Arguments ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreArgs {
    pub dir: PathBuf,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Encode,
    Decode,
    Url { base: String },
    Save(StoreArgs),
    Load(StoreArgs),
    Clear(StoreArgs),
    Compression { store: StoreArgs, enabled: bool },
}

impl Command {
    /// Whether the command consumes stdin.
    pub fn reads_input(&self) -> bool {
        matches!(
            self,
            Command::Encode | Command::Decode | Command::Url { .. } | Command::Save(_)
        )
    }
}

/// Parses arguments, excluding the program name.
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let mut positional = Vec::new();
    let mut dir = None;
    let mut config = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--dir" => {
                i += 1;
                dir = Some(PathBuf::from(flag_value(args, i, "--dir")?));
            }
            "--config" => {
                i += 1;
                config = Some(PathBuf::from(flag_value(args, i, "--config")?));
            }
            other if other.starts_with("--") => {
                return Err(CliError::Usage(format!("unknown flag {other}")));
            }
            other => positional.push(other),
        }
        i += 1;
    }

    let store_args = || -> Result<StoreArgs, CliError> {
        let dir = dir
            .clone()
            .ok_or_else(|| CliError::Usage("--dir is required".to_owned()))?;
        Ok(StoreArgs {
            dir,
            config: config.clone(),
        })
    };

    match positional.as_slice() {
        ["encode"] => Ok(Command::Encode),
        ["decode"] => Ok(Command::Decode),
        ["url", base] => Ok(Command::Url {
            base: (*base).to_owned(),
        }),
        ["save"] => Ok(Command::Save(store_args()?)),
        ["load"] => Ok(Command::Load(store_args()?)),
        ["clear"] => Ok(Command::Clear(store_args()?)),
        ["compression", "on"] => Ok(Command::Compression {
            store: store_args()?,
            enabled: true,
        }),
        ["compression", "off"] => Ok(Command::Compression {
            store: store_args()?,
            enabled: false,
        }),
        _ => Err(CliError::Usage(USAGE.to_owned())),
    }
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, CliError> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("{flag} needs a value")))
}

// ── Commands ──────────────────────────────────────────────────────────────

/// Runs `command` with `input` as its stdin; returns what to print.
pub fn run(command: &Command, input: &str) -> Result<String, CliError> {
    match command {
        Command::Encode => encode_plan(input),
        Command::Decode => decode_token(input),
        Command::Url { base } => Ok(share_url(base, &encode_plan(input)?)),
        Command::Save(args) => {
            let mut store = open_store(args)?;
            let doc = structured::decode(input.trim())?;
            if !store.save(&doc.graph, &doc.root) {
                return Err(CliError::SaveFailed);
            }
            Ok(String::new())
        }
        Command::Load(args) => {
            let doc = open_store(args)?.load().ok_or(CliError::NoData)?;
            Ok(serde_json::to_string_pretty(&encode_value(&doc.graph, &doc.root)?)?)
        }
        Command::Clear(args) => {
            open_store(args)?.clear();
            Ok(String::new())
        }
        Command::Compression { store, enabled } => {
            if !open_store(store)?.set_compression(*enabled) {
                return Err(CliError::SaveFailed);
            }
            Ok(String::new())
        }
    }
}

/// JSON plan → shareable token.
pub fn encode_plan(json: &str) -> Result<String, CliError> {
    let doc = structured::decode(json.trim())?;
    Ok(to_shareable_token(&doc.graph, &doc.root)?)
}

/// Shareable token → pretty JSON plan.
pub fn decode_token(token: &str) -> Result<String, CliError> {
    let doc = from_shareable_token(token.trim()).ok_or(CliError::NoData)?;
    Ok(serde_json::to_string_pretty(&encode_value(&doc.graph, &doc.root)?)?)
}

fn open_store(args: &StoreArgs) -> Result<PlanStore<FileStore>, CliError> {
    let config = match &args.config {
        Some(path) => StoreConfig::from_path(path)?,
        None => StoreConfig::default(),
    };
    Ok(PlanStore::with_config(FileStore::open(args.dir.clone())?, config))
}
