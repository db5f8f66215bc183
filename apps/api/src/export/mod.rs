//! PDF export — flattens the tailored resume to plain text and renders a
//! paginated document.
//!
//! Layout is deliberately simple: wrap each line to the printable width,
//! advance a fixed line height, start a new page past the bottom margin.

use std::io::BufWriter;

use anyhow::anyhow;
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::errors::AppError;
use crate::models::profile::{ContactInfo, EducationEntry};
use crate::models::TailoredResume;

pub const EXPORT_FILE_NAME: &str = "revised-resume.pdf";

// A4, 15mm margin, 11pt Helvetica, 7mm line advance, ~90-char printable width.
const WRAP_COLUMNS: usize = 90;

/// Flattens the tailored resume into the plain-text document the renderer
/// consumes: contact line, experience blocks, skills, education. Bullet
/// bold markers are stripped.
pub fn flatten_resume(
    contact: &ContactInfo,
    education: &[EducationEntry],
    resume: &TailoredResume,
) -> String {
    let contact_line = [
        &contact.phone,
        &contact.email,
        &contact.location,
        &contact.linkedin,
        &contact.portfolio,
    ]
    .into_iter()
    .filter(|field| !field.is_empty())
    .map(String::as_str)
    .collect::<Vec<_>>()
    .join(" | ");

    let mut content = format!("{}\n{}\n\nEXPERIENCE\n\n", contact.name, contact_line);

    for exp in &resume.experiences {
        content.push_str(&format!(
            "{} | {} | {} - {}\n",
            exp.company, exp.title, exp.start_date, exp.end_date
        ));
        for bullet in &exp.bullets {
            content.push_str(&format!("• {}\n", bullet.replace("**", "")));
        }
        content.push('\n');
    }

    content.push_str(&format!("SKILLS\n{}\n\nEDUCATION\n", resume.suggested_skills));
    for edu in education {
        content.push_str(&format!(
            "{} | {} | {} - {}\n",
            edu.school, edu.degree, edu.start_date, edu.end_date
        ));
    }

    content
}

/// Renders flattened text into PDF bytes.
pub fn render_pdf(content: &str) -> Result<Vec<u8>, AppError> {
    let (doc, page, layer) = PdfDocument::new("Revised Resume", Mm(210.0), Mm(297.0), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Internal(anyhow!("PDF font error: {e}")))?;

    let mut current_layer = doc.get_page(page).get_layer(layer);
    let mut y = Mm(282.0);

    for line in content.lines() {
        for wrapped in wrap_line(line, WRAP_COLUMNS) {
            if y.0 < 15.0 {
                let (next_page, next_layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
                current_layer = doc.get_page(next_page).get_layer(next_layer);
                y = Mm(282.0);
            }
            current_layer.use_text(&wrapped, 11.0, Mm(15.0), y, &font);
            y -= Mm(7.0);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| AppError::Internal(anyhow!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| AppError::Internal(anyhow!("PDF buffer error: {e}")))
}

/// Word-wraps one source line to at most `max_columns` characters. Blank
/// source lines survive as blank output lines so vertical spacing holds.
fn wrap_line(line: &str, max_columns: usize) -> Vec<String> {
    if line.trim().is_empty() {
        return vec![String::new()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_columns {
            wrapped.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped
}
