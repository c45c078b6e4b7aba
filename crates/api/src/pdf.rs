// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Minimal single-page PDF rendering for visit reports.
//!
//! The document is assembled by hand: one page, one built-in Helvetica
//! font, one text content stream, and a correct cross-reference table.

use fieldops_persistence::ReportData;

/// Page height origin for the title line, in points.
const TITLE_Y: i32 = 760;
/// First body line position, in points.
const BODY_START_Y: i32 = 720;
/// Vertical distance between body lines, in points.
const LINE_HEIGHT: i32 = 20;

/// Renders a report as a complete PDF document.
#[must_use]
pub fn render_report(report: &ReportData) -> Vec<u8> {
    let stream: String = content_stream(report);

    let objects: [String; 5] = [
        String::from("<< /Type /Catalog /Pages 2 0 R >>"),
        String::from("<< /Type /Pages /Kids [3 0 R] /Count 1 >>"),
        String::from(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>",
        ),
        String::from("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>"),
        format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ),
    ];

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets: Vec<usize> = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", index + 1).as_bytes());
    }

    let xref_offset: usize = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );

    out
}

/// Builds the page's text content stream.
fn content_stream(report: &ReportData) -> String {
    let fields: [(&str, String); 8] = [
        ("Client", report.client_name.clone()),
        ("Technician", report.technician_name.clone()),
        ("Supervisor", report.supervisor_name.clone()),
        ("Status", report.status.clone()),
        ("Planned at", report.planned_at.clone()),
        ("Minutes spent", report.minutes_spent.to_string()),
        ("Created at", report.created_at.clone()),
        ("Summary", report.summary.clone()),
    ];

    let mut stream: String = String::from("BT\n/F1 16 Tf\n");
    stream.push_str(&text_line(
        TITLE_Y,
        &format!("Visit Report #{}", report.visit_id),
    ));
    stream.push_str("/F1 11 Tf\n");

    let mut y: i32 = BODY_START_Y;
    for (label, value) in &fields {
        stream.push_str(&text_line(y, &format!("{label}: {value}")));
        y -= LINE_HEIGHT;
    }
    stream.push_str("ET");
    stream
}

/// One absolutely positioned text line.
fn text_line(y: i32, text: &str) -> String {
    format!("1 0 0 1 72 {y} Tm\n({}) Tj\n", escape_text(text))
}

/// Escapes characters with special meaning inside PDF string literals.
fn escape_text(text: &str) -> String {
    let mut escaped: String = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\\' => escaped.push_str("\\\\"),
            '\n' | '\r' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    escaped
}
