use crate::cli::args::{CliArgs, Command};
use crate::output::OutputFormat;
use crate::patient::StatusTag;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.base_url.as_deref() {
        reqwest::Url::parse(raw).map_err(|e| format!("invalid --url '{raw}': {e}"))?;
    }
    if let Some(raw) = args.header.as_deref() {
        if raw.split_once(':').is_none() {
            return Err(format!("invalid --header '{raw}', expected 'Key: Value'"));
        }
    }
    match &args.command {
        Command::List(list) => {
            if let Some(raw) = list.status.as_deref() {
                parse_status(raw)?;
            }
            if let Some(raw) = list.output_format.as_deref() {
                OutputFormat::parse(raw)
                    .ok_or_else(|| format!("invalid --output-format '{raw}'"))?;
            }
        }
        Command::Create(create) => {
            if create.name.trim().is_empty() {
                return Err("--name must not be empty".to_string());
            }
            if let Some(raw) = create.status.as_deref() {
                parse_status(raw)?;
            }
            crate::creation::format_date(&create.date_of_birth)
                .map_err(|e| format!("invalid --dob: {e}"))?;
        }
        Command::Shell | Command::InitConfig => {}
    }
    Ok(())
}

pub fn parse_status(raw: &str) -> Result<StatusTag, String> {
    StatusTag::parse(raw).ok_or_else(|| {
        format!("invalid status '{raw}', expected low/baixa, medium/média or high/alta")
    })
}
