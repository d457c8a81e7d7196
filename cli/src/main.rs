//! `drrp` - classify DRRP ownership records from the command line.
//!
//! Every subcommand prints pretty JSON on stdout. Logs go to stderr so the
//! output stays machine readable.
//!
//! ```text
//! drrp sum "1/2" "1/4+1/4"
//! drrp validate set.json
//! drrp classify set.json --subject 1234567890
//! drrp owners set.json
//! drrp assess 2000000000001 --subject 1234567890 [--fixtures dir]
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use drrp_config::DrrpConfig;
use drrp_core::{
    classify_ownership, extract_individual_owners, sum_expressions, validate_ownership_set,
};
use drrp_engine::fixture_assessor;
use drrp_types::{CommonKind, OwnershipType, PropertyOwnerInfo, PropertyOwnershipSet, RealtyId};

#[derive(Parser)]
#[command(name = "drrp", about = "Classify real-estate ownership from DRRP registry records")]
struct Cli {
    /// Config file to use instead of ~/.drrp/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sum share-size expressions exactly.
    Sum {
        #[arg(required = true)]
        expressions: Vec<String>,
    },
    /// Run the data-integrity checks on an ownership set.
    Validate { file: PathBuf },
    /// Decide a subject's ownership type in an ownership set.
    Classify {
        file: PathBuf,
        /// Taxpayer code of the inquiring subject.
        #[arg(long)]
        subject: String,
    },
    /// List identified individual owners.
    Owners { file: PathBuf },
    /// Look a property up in the fixture registry and assess it.
    Assess {
        realty_id: String,
        #[arg(long)]
        subject: String,
        /// Fixture directory; overrides `[registry] fixtures_dir`.
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Classification {
    ownership: OwnershipType,
    label: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LabelledOwner<'a> {
    #[serde(flatten)]
    owner: &'a PropertyOwnerInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    common_kind_label: Option<&'static str>,
}

impl<'a> From<&'a PropertyOwnerInfo> for LabelledOwner<'a> {
    fn from(owner: &'a PropertyOwnerInfo) -> Self {
        Self {
            owner,
            common_kind_label: owner.common_kind.map(CommonKind::registry_label),
        }
    }
}

fn init_tracing(config: &DrrpConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| {
            let directive = config.log_filter()?;
            EnvFilter::try_new(directive).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn load_config(path: Option<&Path>) -> (DrrpConfig, Option<String>) {
    let loaded = match path {
        Some(path) => DrrpConfig::load_from(path),
        None => DrrpConfig::load(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(err) => (DrrpConfig::default(), Some(err.to_string())),
    }
}

fn read_set(path: &Path) -> Result<PropertyOwnershipSet> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to decode ownership set in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{json}");
    Ok(())
}

fn run(command: Command, config: &DrrpConfig) -> Result<()> {
    match command {
        Command::Sum { expressions } => {
            let sum = sum_expressions(expressions.iter().map(|expr| Some(expr.as_str())))?;
            print_json(&serde_json::json!({ "sum": sum }))
        }
        Command::Validate { file } => {
            let set = read_set(&file)?;
            let verdict = validate_ownership_set(&set)?;
            if let Some(reason) = verdict.reason() {
                tracing::info!(code = reason.code(), "Invalid DRRP data: {reason}");
            }
            print_json(&verdict)
        }
        Command::Classify { file, subject } => {
            let set = read_set(&file)?;
            let ownership = classify_ownership(&set, &subject)?;
            tracing::debug!(ownership = ownership.as_str(), "Classified ownership");
            print_json(&Classification {
                ownership,
                label: ownership.label(),
            })
        }
        Command::Owners { file } => {
            let set = read_set(&file)?;
            let owners = extract_individual_owners(&set);
            let labelled: Vec<LabelledOwner<'_>> =
                owners.iter().map(LabelledOwner::from).collect();
            print_json(&labelled)
        }
        Command::Assess {
            realty_id,
            subject,
            fixtures,
        } => {
            let realty_id = RealtyId::new(realty_id)?;
            let Some(assessor) = fixture_assessor(config, fixtures) else {
                bail!("no fixture directory: pass --fixtures or set [registry] fixtures_dir");
            };
            let assessment = assessor.assess(&realty_id, &subject).map_err(|err| {
                let context = match err.process_code() {
                    Some(code) => format!("assessment failed (process code {code})"),
                    None => "assessment failed".to_string(),
                };
                anyhow::Error::new(err).context(context)
            })?;
            print_json(&assessment)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_warning) = load_config(cli.config.as_deref());
    init_tracing(&config);
    if let Some(warning) = config_warning {
        tracing::warn!("Using default config: {warning}");
    }

    run(cli.command, &config)
}
