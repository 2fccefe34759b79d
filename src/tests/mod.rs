
use chrono::NaiveDate;

use crate::creation::{FixedStatus, FormError, PatientForm, StatusAssigner};
use crate::filter::{filter_patients, PatientQuery};
use crate::output::{HtmlTableBody, OutputFormat, RowBuffer, TerminalTable};
use crate::patient::{BirthDate, PatientRecord, StatusTag};
use crate::render::{DisplaySurface, StatusClass};
use crate::shell::ShellEvent;
use crate::store::PatientStore;

fn patient(name: &str, age: &str, gender: &str, status: &str) -> PatientRecord {
    PatientRecord {
        name: name.to_string(),
        gender: gender.to_string(),
        date_of_birth: None,
        cpf: None,
        card_number: None,
        age: Some(age.to_string()),
        status: status.to_string(),
    }
}

fn ward() -> Vec<PatientRecord> {
    vec![
        patient("Ana", "30", "F", "Baixa"),
        patient("Bob", "45", "M", "Alta"),
        patient("Carla", "61", "F", "Média"),
        patient("Diana", "34", "F", "Alta"),
        patient("Eduardo", "23", "M", "Baixa"),
    ]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn names(records: &[PatientRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn search_matches_name_case_insensitively() {
    let records = vec![
        patient("Ana", "30", "F", "Baixa"),
        patient("Bob", "45", "M", "Alta"),
    ];
    assert_eq!(names(&filter_patients(&records, "an", None)), vec!["Ana"]);
    assert_eq!(names(&filter_patients(&records, "AN", None)), vec!["Ana"]);
    assert_eq!(names(&filter_patients(&records, "", Some("Alta"))), vec!["Bob"]);
}

#[test]
fn empty_query_keeps_every_record_in_order() {
    let records = ward();
    assert_eq!(filter_patients(&records, "", None), records);
}

#[test]
fn search_matches_age_or_gender() {
    let records = ward();
    assert_eq!(names(&filter_patients(&records, "4", None)), vec!["Bob", "Diana"]);
    assert_eq!(
        names(&filter_patients(&records, "m", None)),
        vec!["Bob", "Eduardo"]
    );
}

#[test]
fn search_ignores_status_label() {
    let records = ward();
    assert!(filter_patients(&records, "alta", None).is_empty());
    assert!(filter_patients(&records, "baixa", None).is_empty());
}

#[test]
fn status_filter_is_exact_and_keeps_order() {
    let records = ward();
    assert_eq!(
        names(&filter_patients(&records, "", Some("Alta"))),
        vec!["Bob", "Diana"]
    );
    assert!(filter_patients(&records, "", Some("alta")).is_empty());
    assert_eq!(
        names(&filter_patients(&records, "d", Some("Alta"))),
        vec!["Diana"]
    );
}

#[test]
fn filtering_twice_gives_the_same_result() {
    let records = ward();
    let query = PatientQuery::new("A", Some("Baixa"));
    let once = query.apply(&records);
    assert_eq!(query.apply(&once), once);
}

#[test]
fn record_without_age_only_matches_on_name_or_gender() {
    let mut records = ward();
    records[0].age = None;
    assert!(filter_patients(&records[..1], "30", None).is_empty());
    assert_eq!(names(&filter_patients(&records[..1], "ana", None)), vec!["Ana"]);
}

#[test]
fn age_before_and_on_birthday() {
    let birth = BirthDate::parse("2000-03-15").unwrap();
    assert_eq!(crate::render::calculate_age(birth, date(2024, 3, 14)), 23);
    assert_eq!(crate::render::calculate_age(birth, date(2024, 3, 15)), 24);
    assert_eq!(crate::render::calculate_age(birth, date(2024, 2, 20)), 23);
    assert_eq!(crate::render::calculate_age(birth, date(2024, 12, 1)), 24);
}

#[test]
fn birth_date_parse_ignores_time_and_calendar() {
    assert_eq!(
        BirthDate::parse("1990-07-04T00:00:00.000Z"),
        Some(BirthDate {
            year: 1990,
            month: 7,
            day: 4
        })
    );
    assert_eq!(
        BirthDate::parse("2024-02-31"),
        Some(BirthDate {
            year: 2024,
            month: 2,
            day: 31
        })
    );
    assert_eq!(BirthDate::parse("04/07/1990"), None);
    assert_eq!(BirthDate::parse(""), None);
}

#[test]
fn status_class_falls_back_to_default() {
    assert_eq!(crate::render::status_class("Baixa"), StatusClass::Delivered);
    assert_eq!(crate::render::status_class("Média"), StatusClass::Pending);
    assert_eq!(crate::render::status_class("Alta"), StatusClass::Return);
    assert_eq!(crate::render::status_class("Unknown"), StatusClass::Default);
    assert_eq!(crate::render::status_class(""), StatusClass::Default);
    assert_eq!(StatusClass::Default.css_class(), "default");
}

#[test]
fn render_derives_age_from_birth_date() {
    let mut record = patient("Ana", "99", "F", "Baixa");
    record.date_of_birth = Some("2000-03-15".to_string());
    let mut surface = RowBuffer::new();
    crate::render::render(&[record], date(2024, 3, 14), &mut surface);

    let row = &surface.rows()[0];
    assert_eq!(row.age, Some(23));
    assert_eq!(row.status_class, StatusClass::Delivered);
}

#[test]
fn render_replaces_previous_rows() {
    let records = ward();
    let mut surface = RowBuffer::new();
    crate::render::render(&records, date(2024, 1, 1), &mut surface);
    assert_eq!(surface.rows().len(), 5);

    crate::render::render(&records[3..], date(2024, 1, 1), &mut surface);
    let rendered: Vec<_> = surface.rows().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(rendered, vec!["Diana", "Eduardo"]);
}

#[test]
fn unparseable_birth_date_renders_empty_age() {
    let mut record = patient("Ana", "30", "F", "Baixa");
    record.date_of_birth = Some("soon".to_string());
    let rows = crate::render::compute_rows(&[record], date(2024, 1, 1));
    assert_eq!(rows[0].age, None);
    assert_eq!(rows[0].age_text(), "");
}

#[test]
fn html_body_marks_status_class_and_escapes() {
    let mut body = HtmlTableBody::new();
    let mut record = patient("<b>Ana</b>", "30", "F", "Crítica");
    record.date_of_birth = Some("1994-01-01".to_string());
    crate::render::render(&[record], date(2024, 6, 1), &mut body);

    assert_eq!(body.len(), 1);
    assert!(body.as_str().contains("&lt;b&gt;Ana&lt;/b&gt;"));
    assert!(body.as_str().contains("<td>30</td>"));
    assert!(body
        .as_str()
        .contains("<span class=\"status default\">Crítica</span>"));

    body.clear();
    assert!(body.is_empty());
}

#[test]
fn terminal_table_lists_rows_in_order() {
    colored::control::set_override(false);
    let mut table = TerminalTable::new();
    crate::render::render(&ward()[..2], date(2024, 1, 1), &mut table);
    let text = table.to_text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("NAME"));
    assert!(lines[1].starts_with("Ana"));
    assert!(lines[2].starts_with("Bob"));
    assert!(lines[2].ends_with("Alta"));
}

#[test]
fn store_summary_counts_known_statuses() {
    let mut records = ward();
    records.push(patient("Fabio", "50", "M", "Legacy"));
    let store = PatientStore::with_records(records);
    let summary = store.summary();
    assert_eq!(summary.total, 6);
    assert_eq!(summary.low, 2);
    assert_eq!(summary.medium, 1);
    assert_eq!(summary.high, 2);
}

#[test]
fn store_replace_swaps_the_whole_list() {
    let mut store = PatientStore::with_records(ward());
    store.replace(vec![patient("Zeca", "70", "M", "Alta")]);
    assert_eq!(store.len(), 1);
    assert_eq!(names(store.records()), vec!["Zeca"]);
    assert_eq!(store.filter(&PatientQuery::new("ana", None)).len(), 0);
}

#[test]
fn decode_accepts_numeric_and_text_age() {
    let body = br#"{"data":[
        {"name":"Ana","gender":"F","age":30,"status":"Baixa","dateOfBirth":"1994-01-01","cpf":"1","cardNumber":"2"},
        {"name":"Bob","gender":"M","age":"45","status":"Alta"},
        {"name":"Caio","gender":"M","age":null}
    ]}"#;
    let decoded = crate::patient::decode_patient_list(body).unwrap();
    assert_eq!(decoded.skipped, 0);
    assert_eq!(decoded.records[0].age.as_deref(), Some("30"));
    assert_eq!(decoded.records[0].card_number.as_deref(), Some("2"));
    assert_eq!(decoded.records[1].age.as_deref(), Some("45"));
    assert_eq!(decoded.records[2].age, None);
    assert_eq!(decoded.records[2].status, "");
}

#[test]
fn decode_skips_records_missing_required_fields() {
    let body = br#"{"data":[{"gender":"F"},{"name":"Bob","gender":"M","age":45},{"name":"Eve"}]}"#;
    let decoded = crate::patient::decode_patient_list(body).unwrap();
    assert_eq!(decoded.skipped, 2);
    assert_eq!(names(&decoded.records), vec!["Bob"]);
}

#[test]
fn decode_keeps_records_with_null_or_non_text_status() {
    let body = br#"{"data":[
        {"name":"Ana","gender":"F","age":30,"status":null,"dateOfBirth":"1994-01-01"},
        {"name":"Bob","gender":"M","age":45,"status":2},
        {"name":"Caio","gender":"M","status":true}
    ]}"#;
    let decoded = crate::patient::decode_patient_list(body).unwrap();
    assert_eq!(decoded.skipped, 0);
    assert_eq!(names(&decoded.records), vec!["Ana", "Bob", "Caio"]);
    assert_eq!(decoded.records[0].status, "");
    assert_eq!(decoded.records[1].status, "2");
    assert_eq!(decoded.records[2].status, "true");

    let mut surface = RowBuffer::new();
    crate::render::render(&decoded.records, date(2024, 6, 1), &mut surface);
    assert_eq!(surface.rows().len(), 3);
    assert!(surface
        .rows()
        .iter()
        .all(|r| r.status_class == StatusClass::Default));
    assert_eq!(surface.rows()[0].age, Some(30));
}

#[test]
fn decode_rejects_missing_envelope() {
    assert!(crate::patient::decode_patient_list(b"[]").is_err());
    assert!(crate::patient::decode_patient_list(b"not json").is_err());
}

#[test]
fn status_tag_labels_and_parsing() {
    assert_eq!(StatusTag::Medium.label(), "Média");
    assert_eq!(StatusTag::from_label("Alta"), Some(StatusTag::High));
    assert_eq!(StatusTag::from_label("alta"), None);
    assert_eq!(StatusTag::parse("HIGH"), Some(StatusTag::High));
    assert_eq!(StatusTag::parse("média"), Some(StatusTag::Medium));
    assert_eq!(StatusTag::parse("urgent"), None);
}

#[test]
fn format_date_swaps_tokens_without_calendar_check() {
    assert_eq!(crate::creation::format_date("15/03/2000").unwrap(), "2000-03-15");
    assert_eq!(crate::creation::format_date("31/02/2024").unwrap(), "2024-02-31");
    assert!(matches!(
        crate::creation::format_date("2000-03-15"),
        Err(FormError::InvalidDateFormat { .. })
    ));
    assert!(crate::creation::format_date("15/03").is_err());
}

#[test]
fn new_patient_payload_uses_assigned_status_and_text_age() {
    let form = PatientForm {
        name: "Ana".to_string(),
        gender: "F".to_string(),
        date_of_birth: "15/03/2000".to_string(),
        cpf: "123".to_string(),
        card_number: "456".to_string(),
    };
    let mut assigner = FixedStatus(StatusTag::High);
    let payload =
        crate::creation::build_new_patient(&form, date(2024, 3, 14), &mut assigner).unwrap();
    assert_eq!(payload.age, "23");
    assert_eq!(payload.date_of_birth, "2000-03-15");
    assert_eq!(payload.status, StatusTag::High);

    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["status"], "Alta");
    assert_eq!(json["cardNumber"], "456");
    assert_eq!(json["dateOfBirth"], "2000-03-15");
    assert_eq!(json["age"], "23");
}

#[test]
fn random_status_stays_within_known_tags() {
    let mut assigner = crate::creation::RandomStatus;
    for _ in 0..50 {
        assert!(StatusTag::ALL.contains(&assigner.assign()));
    }
}

#[test]
fn output_format_parsing_and_inference() {
    assert_eq!(OutputFormat::parse(" JSON "), Some(OutputFormat::Json));
    assert_eq!(OutputFormat::parse("xml"), None);
    assert_eq!(
        crate::output::infer_format_from_path("out/patients.HTML"),
        Some(OutputFormat::Html)
    );
    assert_eq!(crate::output::infer_format_from_path("patients"), None);
}

#[test]
fn html_report_contains_cards_and_rows() {
    let store = PatientStore::with_records(ward());
    let rows = crate::render::compute_rows(store.records(), date(2024, 1, 1));
    let html = String::from_utf8(crate::output::render_html(&rows, &store.summary())).unwrap();
    assert!(html.contains("<tbody id=\"patientList\">"));
    assert!(html.contains("high-priority"));
    assert_eq!(html.matches("<tr>").count(), 1 + rows.len());
}

#[test]
fn shell_lines_map_to_events() {
    use crate::shell::parse_shell_line;
    assert_eq!(parse_shell_line("ana"), ShellEvent::Search("ana".to_string()));
    assert_eq!(parse_shell_line("/all"), ShellEvent::StatusCard(None));
    assert_eq!(
        parse_shell_line("/high"),
        ShellEvent::StatusCard(Some(StatusTag::High))
    );
    assert_eq!(
        parse_shell_line("/Baixa"),
        ShellEvent::StatusCard(Some(StatusTag::Low))
    );
    assert_eq!(parse_shell_line("/quit"), ShellEvent::Quit);
    assert_eq!(
        parse_shell_line("/frobnicate"),
        ShellEvent::Unknown("frobnicate".to_string())
    );
}

#[test]
fn config_file_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yml");
    assert!(crate::config::ensure_default_config_file(&path).unwrap());
    assert!(!crate::config::ensure_default_config_file(&path).unwrap());

    let cfg = crate::config::load_config(&path, false).unwrap();
    assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:8080"));
    assert_eq!(cfg.timeout, Some(10));
    assert_eq!(cfg.no_color, Some(false));
}

#[test]
fn missing_config_is_an_error_unless_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yml");
    assert!(crate::config::load_config(&path, false).is_err());
    assert_eq!(
        crate::config::load_config(&path, true).unwrap(),
        crate::config::ConfigFile::default()
    );
}
