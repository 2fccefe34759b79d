use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing_subscriber::EnvFilter;

use crate::cli::args::{CliArgs, Command, CreateArgs, ListArgs};
use crate::cli::validation;
use crate::client::{ClientOptions, PatientClient, DEFAULT_BASE_URL};
use crate::config::{self, ConfigFile};
use crate::creation::{FixedStatus, PatientForm, RandomStatus, StatusAssigner};
use crate::dashboard::Dashboard;
use crate::output::{self, OutputFormat, RowBuffer, TerminalTable};

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn notice(tag: &str, message: &str) {
    let tag = match tag {
        "ERR" => tag.bold().red(),
        "WRN" => tag.bold().yellow(),
        _ => tag.bold().green(),
    };
    eprintln!(
        "{}{}{} {}",
        "[".bold().white(),
        tag,
        "]".bold().white(),
        message.bold().white()
    );
}

#[derive(Clone, Debug)]
struct RunConfig {
    client: ClientOptions,
    no_color: bool,
    verbose: u8,
    config_path: Option<std::path::PathBuf>,
    command: Command,
    output: Option<String>,
    output_format: Option<String>,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let base_url = args
        .base_url
        .or(cfg.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    reqwest::Url::parse(&base_url).map_err(|e| format!("invalid base_url '{base_url}': {e}"))?;
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }

    let (output, output_format) = match &args.command {
        Command::List(list) => (
            list.output.clone().or(cfg.output),
            list.output_format.clone().or(cfg.output_format),
        ),
        _ => (None, None),
    };
    if let Some(raw) = output_format.as_deref() {
        OutputFormat::parse(raw).ok_or_else(|| format!("invalid output_format '{raw}'"))?;
    }

    Ok(RunConfig {
        client: ClientOptions {
            base_url,
            timeout_seconds: timeout,
            proxy: args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty()),
            header: args.header.or(cfg.header).filter(|h| !h.trim().is_empty()),
        },
        no_color,
        verbose: args.verbose,
        config_path: args.config.as_deref().map(config::expand_tilde),
        command: args.command,
        output,
        output_format,
    })
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "patientdesk=warn",
        1 => "patientdesk=info",
        _ => "patientdesk=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn fetch_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("loading patients");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn run_list(run: &RunConfig, list: &ListArgs) -> Result<(), String> {
    let client = PatientClient::new(&run.client).map_err(|e| e.to_string())?;
    let mut dashboard = Dashboard::new(client, RowBuffer::new(), RandomStatus);

    let spinner = fetch_spinner();
    let loaded = dashboard.reload().await;
    spinner.finish_and_clear();
    if loaded.is_err() {
        notice("WRN", "patient list unavailable, showing an empty list");
    }

    let status = match list.status.as_deref() {
        Some(raw) => Some(validation::parse_status(raw)?),
        None => None,
    };
    dashboard.apply_filter(
        list.query.as_deref().unwrap_or_default(),
        status.map(|s| s.label()),
    );

    let rows = dashboard.surface().rows();
    match run.output.as_deref() {
        Some(outfile_path) => {
            let output_format = run
                .output_format
                .as_deref()
                .and_then(OutputFormat::parse)
                .or_else(|| output::infer_format_from_path(outfile_path))
                .unwrap_or(OutputFormat::Text);
            if output_format == OutputFormat::Text {
                colored::control::set_override(false);
            }
            let rendered = match output_format {
                OutputFormat::Text => output::render_text(rows),
                OutputFormat::Json => output::render_json(rows),
                OutputFormat::Html => output::render_html(rows, &dashboard.store().summary()),
            };
            tokio::fs::write(outfile_path, rendered)
                .await
                .map_err(|e| format!("failed to write output file '{outfile_path}': {e}"))?;
            format_kv_line("Output", outfile_path);
            format_kv_line("Patients", &rows.len().to_string());
        }
        None => {
            let rendered = match run
                .output_format
                .as_deref()
                .and_then(OutputFormat::parse)
                .unwrap_or(OutputFormat::Text)
            {
                OutputFormat::Text => output::render_text(rows),
                OutputFormat::Json => output::render_json(rows),
                OutputFormat::Html => output::render_html(rows, &dashboard.store().summary()),
            };
            print!("{}", String::from_utf8_lossy(&rendered));
        }
    }
    Ok(())
}

async fn run_create(run: &RunConfig, create: &CreateArgs) -> Result<(), String> {
    let client = PatientClient::new(&run.client).map_err(|e| e.to_string())?;
    let assigner: Box<dyn StatusAssigner> = match create.status.as_deref() {
        Some(raw) => Box::new(FixedStatus(validation::parse_status(raw)?)),
        None => Box::new(RandomStatus),
    };
    let mut dashboard = Dashboard::new(client, TerminalTable::new(), assigner);

    let mut form = PatientForm {
        name: create.name.clone(),
        gender: create.gender.clone(),
        date_of_birth: create.date_of_birth.clone(),
        cpf: create.cpf.clone(),
        card_number: create.card_number.clone(),
    };

    match dashboard.submit(&mut form).await {
        Ok(patient) => {
            notice(
                "INF",
                &format!(
                    "patient '{}' registered with status {}",
                    patient.name, patient.status
                ),
            );
            print!("{}", dashboard.surface().to_text());
            Ok(())
        }
        Err(e) => {
            notice("ERR", "failed to register patient");
            Err(e.to_string())
        }
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    match &run.command {
        Command::List(list) => run_list(&run, list).await,
        Command::Create(create) => run_create(&run, create).await,
        Command::Shell => {
            format_kv_line("Backend", &run.client.base_url);
            let client = PatientClient::new(&run.client).map_err(|e| e.to_string())?;
            let mut dashboard = Dashboard::new(client, TerminalTable::new(), RandomStatus);
            crate::shell::run_shell(&mut dashboard).await
        }
        Command::InitConfig => {
            let path = run
                .config_path
                .clone()
                .or_else(config::default_config_path)
                .ok_or_else(|| "could not determine home directory".to_string())?;
            if config::ensure_default_config_file(&path)? {
                format_kv_line("Config", &format!("written to {}", path.display()));
            } else {
                format_kv_line("Config", &format!("{} already exists", path.display()));
            }
            Ok(())
        }
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                print!("{e}");
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    let cfg = match (&args.command, args.config.as_deref()) {
        (Command::InitConfig, _) => ConfigFile::default(),
        (_, Some(path)) => config::load_config(&config::expand_tilde(path), false)?,
        (_, None) => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    tracing::debug!(verbose = run.verbose, base_url = %run.client.base_url, "configuration loaded");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
