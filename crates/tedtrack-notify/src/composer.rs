//! Notification body rendering.
//!
//! Every notification uses the same fixed layout: a styled table of
//! the matching records under a "Relatório de {column}" heading.

use tedtrack_table::record::{COLUMN_LABELS, Record};

/// Render matching records as an HTML table with the full 11-column
/// display projection.
pub fn render_table(records: &[&Record]) -> String {
    let mut html = String::from("<table>\n  <thead>\n    <tr>");
    for label in COLUMN_LABELS {
        html.push_str("<th>");
        html.push_str(&escape(label));
        html.push_str("</th>");
    }
    html.push_str("</tr>\n  </thead>\n  <tbody>\n");
    for record in records {
        html.push_str("    <tr>");
        for cell in record.to_cells() {
            html.push_str("<td>");
            html.push_str(&escape(&cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("  </tbody>\n</table>");
    html
}

/// Wrap a rendered table in the full notification document.
pub fn compose(subject: &str, table_html: &str) -> String {
    format!(
        r#"<html>
    <head>
        <style>
            table {{
                width: 100%;
                border-collapse: collapse;
                font-family: Arial, sans-serif;
            }}
            th, td {{
                border: 1px solid #dddddd;
                text-align: left;
                padding: 8px;
            }}
            th {{
                background-color: #f2f2f2;
                color: #333;
                font-weight: bold;
            }}
            tr:nth-child(even) {{
                background-color: #f9f9f9;
            }}
            tr:hover {{
                background-color: #f1f1f1;
            }}
        </style>
    </head>
    <body>
        <h2 style="font-family: Arial, sans-serif; color: #333333;">Relatório de {subject}</h2>
        {table}
    </body>
</html>"#,
        subject = escape(subject),
        table = table_html,
    )
}

/// Minimal HTML escaping for cell text.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_record() -> Record {
        Record {
            term_id: "7".into(),
            siafi: Some("123456".into()),
            proponent_unit: Some("UG <Norte>".into()),
            grantor_unit: None,
            title: Some("Obra & reforma".into()),
            document_status: Some("Vigente".into()),
            coordination: None,
            effective_start: Some(date(2030, 1, 1)),
            effective_end: date(2030, 6, 30),
            warning_date: date(2030, 5, 26),
            accounting_due: date(2030, 10, 28),
        }
    }

    #[test]
    fn test_render_table_has_headers_and_cells() {
        let record = sample_record();
        let html = render_table(&[&record]);
        assert!(html.contains("<th>Termo</th>"));
        assert!(html.contains("<th>Data de prestação de contas</th>"));
        assert!(html.contains("<td>7</td>"));
        assert!(html.contains("<td>30/06/2030</td>"));
    }

    #[test]
    fn test_render_table_escapes_cell_text() {
        let record = sample_record();
        let html = render_table(&[&record]);
        assert!(html.contains("UG &lt;Norte&gt;"));
        assert!(html.contains("Obra &amp; reforma"));
        assert!(!html.contains("UG <Norte>"));
    }

    #[test]
    fn test_compose_wraps_table_with_heading() {
        let body = compose("Vigência fim", "<table></table>");
        assert!(body.starts_with("<html>"));
        assert!(body.contains("Relatório de Vigência fim"));
        assert!(body.contains("<table></table>"));
        assert!(body.contains("border-collapse: collapse"));
        assert!(body.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_empty_match_list_still_renders_table() {
        let html = render_table(&[]);
        assert!(html.contains("<thead>"));
        assert!(html.contains("<tbody>"));
    }
}
