//! Document text extraction: raw file bytes to normalized plain text.
//!
//! Extraction failures never surface to the caller: empty or short text is a
//! valid downstream state ("needs OCR"), so a corrupt file, an unsupported
//! format, or a renderer error all degrade to an empty string.

use std::io::Read;

use quick_xml::events::Event;
use tracing::debug;

/// Extracts plain text from document bytes, dispatching on the declared MIME
/// type first, then the filename extension. Unknown formats fall back to the
/// PDF path as a best effort; legacy `.doc` has no reader here and yields
/// empty text.
pub fn extract_text(bytes: &[u8], mime_type: Option<&str>, file_name: Option<&str>) -> String {
    let mime = mime_type.unwrap_or("").to_lowercase();
    let name = file_name.unwrap_or("").to_lowercase();

    if mime.contains("pdf") || name.ends_with(".pdf") {
        extract_pdf(bytes)
    } else if mime.contains("word") || name.ends_with(".docx") {
        extract_docx(bytes)
    } else if name.ends_with(".doc") {
        String::new()
    } else {
        extract_pdf(bytes)
    }
}

fn extract_pdf(bytes: &[u8]) -> String {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            debug!("PDF text extraction failed: {e}");
            String::new()
        }
    }
}

fn extract_docx(bytes: &[u8]) -> String {
    match docx_paragraphs(bytes) {
        Ok(paragraphs) => paragraphs.join("\n").trim().to_string(),
        Err(e) => {
            debug!("DOCX text extraction failed: {e}");
            String::new()
        }
    }
}

/// Reads `word/document.xml` out of the DOCX zip container and collects one
/// string per `w:p` paragraph (the concatenated text of its `w:t` runs).
fn docx_paragraphs(bytes: &[u8]) -> anyhow::Result<Vec<String>> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)?;
    let mut file = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"w:p" => {
                paragraphs.push(std::mem::take(&mut current));
            }
            Ok(Event::Text(e)) if in_text => {
                current.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow::anyhow!("XML parsing error: {e}")),
            _ => {}
        }
        buf.clear();
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs)
}
