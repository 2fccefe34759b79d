use super::{escape_html, HtmlTableBody};
use crate::patient::StatusTag;
use crate::render::{DisplayRow, DisplaySurface};
use crate::store::StatusSummary;

fn status_card(class: &str, title: &str, count: usize) -> String {
    format!(
        r#"      <div class="card {class}">
        <span class="card-title">{title}</span>
        <span class="card-count">{count}</span>
      </div>
"#,
        class = class,
        title = escape_html(title),
        count = count
    )
}

/// Standalone dashboard page: status cards plus the patient table.
pub fn render_html(rows: &[DisplayRow], summary: &StatusSummary) -> Vec<u8> {
    let mut body = HtmlTableBody::new();
    for row in rows {
        body.append_row(row);
    }

    let mut cards = String::new();
    cards.push_str(&status_card("all-patients", "Pacientes", summary.total));
    for (class, tag) in [
        ("low-priority", StatusTag::Low),
        ("medium-priority", StatusTag::Medium),
        ("high-priority", StatusTag::High),
    ] {
        cards.push_str(&status_card(class, tag.label(), summary.count(tag)));
    }

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Patient Dashboard</title>
  <style>
    body {{ font-family: 'Inter', sans-serif; background: #f8fafc; color: #0f172a; margin: 0; }}
    main {{ max-width: 1200px; margin: 0 auto; padding: 2.5rem 2rem; }}
    .cards {{ display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; margin-bottom: 2rem; }}
    .card {{ background: #fff; border-radius: 0.75rem; padding: 1.25rem; box-shadow: 0 1px 3px rgba(15,23,42,.08); display: flex; flex-direction: column; gap: .5rem; }}
    .card-title {{ font-size: .875rem; color: #64748b; text-transform: uppercase; }}
    .card-count {{ font-size: 2rem; font-weight: 800; }}
    table {{ width: 100%; border-collapse: collapse; background: #fff; border-radius: 0.75rem; overflow: hidden; }}
    th, td {{ text-align: left; padding: .75rem 1rem; border-bottom: 1px solid #e2e8f0; }}
    .status {{ padding: .25rem .6rem; border-radius: 9999px; font-size: .8rem; font-weight: 600; }}
    .status.delivered {{ background: #dcfce7; color: #166534; }}
    .status.pending {{ background: #fef9c3; color: #854d0e; }}
    .status.return {{ background: #fee2e2; color: #991b1b; }}
    .status.default {{ background: #e2e8f0; color: #334155; }}
  </style>
</head>
<body>
  <main>
    <section class="cards">
{cards}    </section>
    <table>
      <thead>
        <tr><th>Nome</th><th>Idade</th><th>Gênero</th><th>Status</th></tr>
      </thead>
      <tbody id="patientList">
{rows}      </tbody>
    </table>
  </main>
</body>
</html>
"####,
        cards = cards,
        rows = body.as_str()
    );

    html.into_bytes()
}
