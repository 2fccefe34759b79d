use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "patientdesk",
    version,
    about = "terminal dashboard for a patient-management backend",
    long_about = "patientdesk lists, searches and registers patients against a REST backend exposing GET/POST /user.\n\nExamples:\n  patientdesk list\n  patientdesk list -q ana --status high\n  patientdesk list -o patients.html\n  patientdesk create --name Ana --gender F --dob 15/03/2000 --cpf 123 --card 456\n  patientdesk shell\n\nTip: Use --config to persist the backend URL and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.patientdesk/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'u',
        long = "url",
        visible_alias = "base-url",
        value_name = "URL",
        global = true,
        help_heading = "HTTP",
        help = "Backend base URL (default http://localhost:8080)."
    )]
    pub base_url: Option<String>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        global = true,
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'H',
        long = "hdr",
        visible_alias = "header",
        value_name = "HEADER",
        global = true,
        help_heading = "HTTP",
        help = "Add a header to all requests (format: 'Key: Value')."
    )]
    pub header: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch the patient list, filter it and print it.
    List(ListArgs),
    /// Register a new patient, then print the refreshed list.
    Create(CreateArgs),
    /// Interactive search over the patient list.
    Shell,
    /// Write a default config file if none exists.
    InitConfig,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(
        short = 'q',
        long = "query",
        visible_alias = "search",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Case-insensitive search over name, age and gender."
    )]
    pub query: Option<String>,

    #[arg(
        short = 's',
        long = "status",
        value_name = "STATUS",
        help_heading = "Filters",
        help = "Only show one status (low/baixa, medium/média, high/alta)."
    )]
    pub status: Option<String>,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the table to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text, json, html)."
    )]
    pub output_format: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    #[arg(long = "name", value_name = "NAME", help = "Patient name.")]
    pub name: String,

    #[arg(long = "gender", value_name = "GENDER", help = "Patient gender.")]
    pub gender: String,

    #[arg(
        long = "dob",
        visible_alias = "date-of-birth",
        value_name = "DD/MM/YYYY",
        help = "Date of birth."
    )]
    pub date_of_birth: String,

    #[arg(long = "cpf", value_name = "CPF", default_value = "", help = "CPF number.")]
    pub cpf: String,

    #[arg(
        long = "card",
        visible_alias = "card-number",
        value_name = "NUMBER",
        default_value = "",
        help = "Health card number."
    )]
    pub card_number: String,

    #[arg(
        long = "status",
        value_name = "STATUS",
        help = "Use this status instead of a random one."
    )]
    pub status: Option<String>,
}
