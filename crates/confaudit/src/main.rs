use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use confaudit_core::audit::{run_audit, AuditReport};
use confaudit_core::detect::DeviceClassifier;
use confaudit_core::normalize::normalize_config;
use confaudit_core::rule::{Risk, Rule};
use confaudit_core::ruleset::{load_rules, load_rules_str, RulesetKind};
use confaudit_report::{csv, html, json, text};

mod settings;
use settings::Settings;

#[derive(Parser)]
#[command(name = "confaudit")]
#[command(about = "Audit network device configuration exports against CIS-style benchmarks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a configuration export and print a full report
    Audit {
        /// Path to the configuration export (.txt / .cfg / .conf)
        path: PathBuf,
        /// Ruleset file overriding device-type selection
        #[arg(short, long)]
        rules: Option<PathBuf>,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
        /// Also write the findings table as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Also write a self-contained HTML report to this path
        #[arg(long)]
        html: Option<PathBuf>,
        /// Config file path (defaults to .confaudit.toml search)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Classify the device type without evaluating rules
    Detect {
        /// Path to the configuration export
        path: PathBuf,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Audit and exit with code 0 (pass) or 1 (fail)
    Check {
        /// Path to the configuration export
        path: PathBuf,
        /// Minimum risk of a FAIL finding to cause failure
        #[arg(long)]
        fail_risk: Option<String>,
        /// Ruleset file overriding device-type selection
        #[arg(short, long)]
        rules: Option<PathBuf>,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Create a default .confaudit.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Audit {
            path,
            rules,
            format,
            csv,
            html,
            config,
        } => cmd_audit(
            &path,
            rules.as_deref(),
            &format,
            csv.as_deref(),
            html.as_deref(),
            config.as_deref(),
        ),
        Commands::Detect { path, format } => cmd_detect(&path, &format),
        Commands::Check {
            path,
            fail_risk,
            rules,
            format,
            config,
        } => cmd_check(
            &path,
            fail_risk.as_deref(),
            rules.as_deref(),
            &format,
            config.as_deref(),
        ),
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn cmd_audit(
    path: &Path,
    rules_path: Option<&Path>,
    format: &str,
    csv_path: Option<&Path>,
    html_path: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let settings = load_settings(path, config_path)?;
    let report = build_report(path, rules_path, &settings)?;

    match format {
        "json" => println!("{}", json::format_report(&report, false)),
        "text" => print!("{}", text::format_report(&report)),
        other => anyhow::bail!("unknown format '{other}' (expected 'text' or 'json')"),
    }

    if let Some(out) = csv_path {
        let rendered = csv::format_report(&report)?;
        std::fs::write(out, rendered)
            .with_context(|| format!("failed to write CSV report to '{}'", out.display()))?;
        tracing::info!("wrote CSV report to {}", out.display());
    }

    if let Some(out) = html_path {
        std::fs::write(out, html::format_report(&report))
            .with_context(|| format!("failed to write HTML report to '{}'", out.display()))?;
        tracing::info!("wrote HTML report to {}", out.display());
    }

    Ok(())
}

fn cmd_detect(path: &Path, format: &str) -> Result<()> {
    let cfg = normalize_config(&read_lossy(path)?);
    let detection = DeviceClassifier::new().classify(&cfg);

    match format {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&detection).expect("DetectionResult should be serializable")
        ),
        "text" => {
            println!(
                "{}: {} (confidence: {})",
                path.display(),
                detection.device_type,
                detection.confidence
            );
            println!(
                "scores: router={} switch={} l3={}",
                detection.scores.router, detection.scores.switch, detection.scores.l3
            );
            for indicator in &detection.indicators {
                println!("  - {indicator}");
            }
        }
        other => anyhow::bail!("unknown format '{other}' (expected 'text' or 'json')"),
    }

    Ok(())
}

fn cmd_check(
    path: &Path,
    fail_risk: Option<&str>,
    rules_path: Option<&Path>,
    format: &str,
    config_path: Option<&Path>,
) -> Result<()> {
    let settings = load_settings(path, config_path)?;
    let fail_risk = match fail_risk {
        Some(s) => s.parse::<Risk>().map_err(anyhow::Error::msg)?,
        None => settings.check.fail_risk,
    };

    let report = build_report(path, rules_path, &settings)?;
    let (rendered, passed) = match format {
        "json" => {
            let (out, passed) = json::format_check(&report, fail_risk, false);
            (format!("{out}\n"), passed)
        }
        "text" => text::format_check(&report, fail_risk),
        other => anyhow::bail!("unknown format '{other}' (expected 'text' or 'json')"),
    };
    print!("{rendered}");

    if !passed {
        process::exit(1);
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from(".confaudit.toml");
    if target.exists() && !force {
        anyhow::bail!(".confaudit.toml already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Settings::default_toml())?;
    println!("Created .confaudit.toml with default configuration.");
    Ok(())
}

fn load_settings(input: &Path, config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(p) => Settings::load(p),
        None => {
            let dir = input.parent().unwrap_or(Path::new("."));
            Ok(Settings::load_or_default(dir))
        }
    }
}

/// Read a configuration export, tolerating invalid UTF-8 byte sequences the
/// way device exports sometimes carry them.
fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read configuration file '{}'", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Classify the device, pick the matching ruleset (explicit file, config
/// override, or embedded benchmark), and run the audit.
fn build_report(path: &Path, rules_path: Option<&Path>, settings: &Settings) -> Result<AuditReport> {
    let raw = read_lossy(path)?;
    let cfg = normalize_config(&raw);
    let detection = DeviceClassifier::new().classify(&cfg);
    let kind = RulesetKind::for_device(detection.device_type);

    let (rules, ruleset_name) = select_rules(rules_path, kind, settings)?;

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(run_audit(&source, &raw, &rules, &ruleset_name))
}

fn select_rules(
    rules_path: Option<&Path>,
    kind: RulesetKind,
    settings: &Settings,
) -> Result<(Vec<Rule>, String)> {
    if let Some(path) = rules_path {
        let rules = load_rules(path)
            .with_context(|| format!("failed to load ruleset '{}'", path.display()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        return Ok((rules, name));
    }

    if let Some(path) = settings.rulesets.for_kind(kind) {
        let rules = load_rules(path)
            .with_context(|| format!("failed to load configured ruleset '{}'", path.display()))?;
        return Ok((rules, kind.name().to_string()));
    }

    let rules = load_rules_str(builtin_rules(kind))
        .context("embedded ruleset is malformed; this is a bug")?;
    Ok((rules, kind.name().to_string()))
}

fn builtin_rules(kind: RulesetKind) -> &'static str {
    match kind {
        RulesetKind::Router => include_str!("../rulesets/cisco_router.json"),
        RulesetKind::SwitchL2 => include_str!("../rulesets/switch_l2.json"),
        RulesetKind::SwitchL3 => include_str!("../rulesets/switch_l3.json"),
    }
}
