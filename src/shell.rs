//! Line-driven interactive session: each input line is one dashboard event.

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};

use crate::creation::{PatientForm, StatusAssigner};
use crate::dashboard::Dashboard;
use crate::output::TerminalTable;
use crate::patient::StatusTag;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellEvent {
    /// Free text typed in the search box.
    Search(String),
    /// A status card; `None` is the "all patients" card.
    StatusCard(Option<StatusTag>),
    Reload,
    NewPatient,
    Retry,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_shell_line(line: &str) -> ShellEvent {
    let Some(command) = line.trim().strip_prefix('/') else {
        return ShellEvent::Search(line.to_string());
    };
    match command.trim().to_lowercase().as_str() {
        "all" => ShellEvent::StatusCard(None),
        "reload" | "r" => ShellEvent::Reload,
        "new" => ShellEvent::NewPatient,
        "retry" => ShellEvent::Retry,
        "help" | "h" | "?" => ShellEvent::Help,
        "quit" | "q" | "exit" => ShellEvent::Quit,
        other => match StatusTag::parse(other) {
            Some(tag) => ShellEvent::StatusCard(Some(tag)),
            None => ShellEvent::Unknown(command.to_string()),
        },
    }
}

const HELP: &str = "\
  <text>    search name, age and gender
  /all      show every patient
  /low      only status Baixa
  /medium   only status Média
  /high     only status Alta
  /reload   fetch the list again
  /new      register a patient
  /retry    resend the last form that failed
  /quit     leave
";

fn print_table<A: StatusAssigner>(dashboard: &Dashboard<TerminalTable, A>) {
    print!("{}", dashboard.surface().to_text());
    println!(
        ":: {} of {} patients",
        dashboard.surface().rows().len(),
        dashboard.store().len()
    );
}

async fn prompt<R>(lines: &mut Lines<R>, label: &str) -> Result<Option<String>, String>
where
    R: AsyncBufRead + Unpin,
{
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{label}: ").as_bytes())
        .await
        .map_err(|e| format!("failed to write prompt: {e}"))?;
    stdout
        .flush()
        .await
        .map_err(|e| format!("failed to flush stdout: {e}"))?;
    lines
        .next_line()
        .await
        .map_err(|e| format!("failed to read input: {e}"))
}

async fn read_form<R>(lines: &mut Lines<R>) -> Result<Option<PatientForm>, String>
where
    R: AsyncBufRead + Unpin,
{
    let Some(name) = prompt(lines, "name").await? else {
        return Ok(None);
    };
    let Some(gender) = prompt(lines, "gender").await? else {
        return Ok(None);
    };
    let Some(date_of_birth) = prompt(lines, "date of birth (DD/MM/YYYY)").await? else {
        return Ok(None);
    };
    let Some(cpf) = prompt(lines, "cpf").await? else {
        return Ok(None);
    };
    let Some(card_number) = prompt(lines, "card number").await? else {
        return Ok(None);
    };
    Ok(Some(PatientForm {
        name,
        gender,
        date_of_birth,
        cpf,
        card_number,
    }))
}

async fn submit<A: StatusAssigner>(
    dashboard: &mut Dashboard<TerminalTable, A>,
    form: &mut PatientForm,
) {
    match dashboard.submit(form).await {
        Ok(patient) => {
            println!(
                "{}{}{} patient registered with status {}",
                "[".bold().white(),
                "INF".bold().green(),
                "]".bold().white(),
                patient.status
            );
            print_table(dashboard);
        }
        Err(e) => {
            println!(
                "{}{}{} {} (type /retry to send it again)",
                "[".bold().white(),
                "ERR".bold().red(),
                "]".bold().white(),
                e
            );
        }
    }
}

/// Whether the session keeps reading input after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies one event to the dashboard. `form` holds the last submitted form
/// until the backend accepts it, so `/retry` can resend it.
pub async fn handle_event<A, R>(
    dashboard: &mut Dashboard<TerminalTable, A>,
    form: &mut PatientForm,
    event: ShellEvent,
    lines: &mut Lines<R>,
) -> Result<Flow, String>
where
    A: StatusAssigner,
    R: AsyncBufRead + Unpin,
{
    match event {
        ShellEvent::Search(text) => {
            dashboard.apply_filter(&text, None);
            print_table(dashboard);
        }
        ShellEvent::StatusCard(tag) => {
            dashboard.apply_filter("", tag.map(StatusTag::label));
            print_table(dashboard);
        }
        ShellEvent::Reload => {
            let _ = dashboard.reload().await;
            print_table(dashboard);
        }
        ShellEvent::NewPatient => {
            let Some(input) = read_form(lines).await? else {
                return Ok(Flow::Quit);
            };
            *form = input;
            submit(dashboard, form).await;
        }
        ShellEvent::Retry => {
            if *form == PatientForm::default() {
                println!(":: nothing to retry");
            } else {
                submit(dashboard, form).await;
            }
        }
        ShellEvent::Help => print!("{HELP}"),
        ShellEvent::Quit => return Ok(Flow::Quit),
        ShellEvent::Unknown(command) => {
            println!(":: unknown command '/{command}', type /help");
        }
    }
    Ok(Flow::Continue)
}

/// Reads events from `lines` until `/quit` or end of input. Read and write
/// failures end the session with an error.
pub async fn run_session<A, R>(
    dashboard: &mut Dashboard<TerminalTable, A>,
    lines: &mut Lines<R>,
) -> Result<(), String>
where
    A: StatusAssigner,
    R: AsyncBufRead + Unpin,
{
    let mut form = PatientForm::default();

    let _ = dashboard.reload().await;
    print_table(dashboard);
    println!(":: type /help for commands");

    while let Some(line) = prompt(lines, "search").await? {
        let event = parse_shell_line(&line);
        if handle_event(dashboard, &mut form, event, lines).await? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

pub async fn run_shell<A: StatusAssigner>(
    dashboard: &mut Dashboard<TerminalTable, A>,
) -> Result<(), String> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    run_session(dashboard, &mut lines).await
}
