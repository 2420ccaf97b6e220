//! Text extraction for uploaded resume files.
//!
//! Dispatch is on the declared file kind, never on sniffed content; magic
//! headers are only checked to catch renamed files before a parse is
//! attempted. Parsing is CPU-bound and runs inside `spawn_blocking`.

use std::io::{Cursor, Read, Write};

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// A PDF below this size cannot hold a page object, let alone resume text.
const MIN_PDF_BYTES: usize = 100;

/// File kinds the extractor knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    WordDocument,
    Image,
    PlainText,
}

impl FileKind {
    /// Maps a declared MIME type to a kind. Any `image/*` subtype is
    /// accepted; whether the bytes are a readable image is checked later.
    pub fn from_mime(mime: &str) -> Option<FileKind> {
        match mime {
            "application/pdf" => Some(FileKind::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            | "application/msword" => Some(FileKind::WordDocument),
            "text/plain" => Some(FileKind::PlainText),
            _ if mime.starts_with("image/") => Some(FileKind::Image),
            _ => None,
        }
    }

    /// Maps a filename extension to a kind plus the canonical MIME type
    /// stored on the resume record.
    pub fn from_filename(filename: &str) -> Option<(FileKind, &'static str)> {
        let extension = filename.rsplit('.').next()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some((FileKind::Pdf, "application/pdf")),
            "docx" => Some((
                FileKind::WordDocument,
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            )),
            "png" => Some((FileKind::Image, "image/png")),
            "jpg" | "jpeg" => Some((FileKind::Image, "image/jpeg")),
            "txt" => Some((FileKind::PlainText, "text/plain")),
            _ => None,
        }
    }
}

/// Extraction failure taxonomy. Every variant carries remediation text
/// that is shown to the user as-is, so the wording tells them what to do
/// next rather than what went wrong internally.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format '{0}'. Please upload a PDF, DOCX, PNG, JPG, or TXT file.")]
    UnsupportedFormat(String),

    #[error("The file is too small to be a valid PDF ({size} bytes). Re-export the resume and upload it again.")]
    TooSmall { size: usize },

    #[error("The file does not appear to be a valid {expected} file. Check that the upload matches its extension, or re-export it and try again.")]
    FormatMismatch { expected: &'static str },

    #[error("Could not read the file: {0}. Re-save it without password protection and try again.")]
    CorruptOrProtected(String),

    #[error("No text could be found in the file. If the resume is a scanned image, upload it as a PNG or JPG so text recognition can run.")]
    EmptyExtraction,

    #[error("Text recognition failed: {0}")]
    OcrFailed(String),
}

/// Extracts the text content of an uploaded file.
///
/// Returns the trimmed text on success. The minimum-useful-length gate is
/// the caller's job; this function only distinguishes "some text" from
/// "no text at all" (`EmptyExtraction`).
pub async fn extract(bytes: Bytes, kind: FileKind) -> Result<String, ExtractError> {
    let handle = tokio::task::spawn_blocking(move || extract_blocking(&bytes, kind));
    match handle.await {
        Ok(result) => result,
        // pdf parsers are known to panic on malformed input; a panicked
        // task surfaces here as a join error.
        Err(e) => Err(ExtractError::CorruptOrProtected(e.to_string())),
    }
}

fn extract_blocking(bytes: &[u8], kind: FileKind) -> Result<String, ExtractError> {
    let text = match kind {
        FileKind::Pdf => extract_pdf(bytes)?,
        FileKind::WordDocument => extract_docx(bytes)?,
        FileKind::Image => extract_image(bytes)?,
        FileKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::EmptyExtraction);
    }
    Ok(trimmed.to_string())
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    if bytes.len() < MIN_PDF_BYTES {
        return Err(ExtractError::TooSmall { size: bytes.len() });
    }
    if !bytes.starts_with(b"%PDF-") {
        return Err(ExtractError::FormatMismatch { expected: "PDF" });
    }

    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::CorruptOrProtected(e.to_string()))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::CorruptOrProtected(e.to_string()))?;
    let mut document = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::CorruptOrProtected(e.to_string()))?;

    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::CorruptOrProtected(e.to_string()))?;

    document_xml_text(&xml)
}

/// Collects the visible text runs of an OOXML `word/document.xml`.
/// Each paragraph becomes one line; blank paragraphs are dropped.
fn document_xml_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    let paragraph = current.trim().to_string();
                    if !paragraph.is_empty() {
                        paragraphs.push(paragraph);
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:br" => current.push('\n'),
                b"w:tab" => current.push(' '),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => {
                let run = e
                    .unescape()
                    .map_err(|e| ExtractError::CorruptOrProtected(e.to_string()))?;
                current.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ExtractError::CorruptOrProtected(e.to_string())),
        }
    }

    Ok(paragraphs.join("\n"))
}

/// OCR path. The tesseract wrapper reads from a path, so the upload is
/// staged in a temp file that is removed when the guard drops.
fn extract_image(bytes: &[u8]) -> Result<String, ExtractError> {
    let suffix = if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        ".png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        ".jpg"
    } else {
        return Err(ExtractError::FormatMismatch {
            expected: "PNG or JPEG image",
        });
    };

    let mut staged = tempfile::Builder::new()
        .prefix("resumatch-ocr-")
        .suffix(suffix)
        .tempfile()
        .map_err(|e| ExtractError::OcrFailed(e.to_string()))?;
    staged
        .write_all(bytes)
        .map_err(|e| ExtractError::OcrFailed(e.to_string()))?;
    staged
        .flush()
        .map_err(|e| ExtractError::OcrFailed(e.to_string()))?;

    let image = rusty_tesseract::Image::from_path(staged.path())
        .map_err(|e| ExtractError::CorruptOrProtected(e.to_string()))?;
    rusty_tesseract::image_to_string(&image, &rusty_tesseract::Args::default())
        .map_err(|e| ExtractError::OcrFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docx_fixture(document_xml: &str) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("word/document.xml", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn mime_dispatch_covers_known_kinds() {
        assert_eq!(FileKind::from_mime("application/pdf"), Some(FileKind::Pdf));
        assert_eq!(
            FileKind::from_mime(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            Some(FileKind::WordDocument)
        );
        assert_eq!(FileKind::from_mime("image/png"), Some(FileKind::Image));
        assert_eq!(FileKind::from_mime("image/webp"), Some(FileKind::Image));
        assert_eq!(FileKind::from_mime("text/plain"), Some(FileKind::PlainText));
        assert_eq!(FileKind::from_mime("application/zip"), None);
    }

    #[test]
    fn filename_dispatch_is_case_insensitive_and_maps_canonical_mime() {
        assert_eq!(
            FileKind::from_filename("resume.PDF"),
            Some((FileKind::Pdf, "application/pdf"))
        );
        assert_eq!(
            FileKind::from_filename("photo.JPEG"),
            Some((FileKind::Image, "image/jpeg"))
        );
        assert_eq!(
            FileKind::from_filename("notes.txt"),
            Some((FileKind::PlainText, "text/plain"))
        );
        assert_eq!(FileKind::from_filename("archive.tar.gz"), None);
        assert_eq!(FileKind::from_filename("no_extension"), None);
    }

    #[test]
    fn tiny_pdf_fails_with_size_error() {
        let result = extract_blocking(b"%PDF-1.4", FileKind::Pdf);
        assert!(matches!(result, Err(ExtractError::TooSmall { size: 8 })));
    }

    #[test]
    fn renamed_text_file_fails_with_format_mismatch() {
        // 100+ bytes so the size gate passes and the header check runs.
        let bytes = vec![b'a'; 200];
        let result = extract_blocking(&bytes, FileKind::Pdf);
        assert!(matches!(
            result,
            Err(ExtractError::FormatMismatch { expected: "PDF" })
        ));
    }

    #[test]
    fn plain_text_is_returned_trimmed() {
        let result = extract_blocking(b"  Jane Doe\nEngineer  \n", FileKind::PlainText);
        assert_eq!(result.unwrap(), "Jane Doe\nEngineer");
    }

    #[test]
    fn invalid_utf8_plain_text_is_decoded_lossily() {
        let bytes = b"Jane \xF0\x28 Doe";
        let result = extract_blocking(bytes, FileKind::PlainText).unwrap();
        assert!(result.starts_with("Jane"));
        assert!(result.ends_with("Doe"));
    }

    #[test]
    fn whitespace_only_input_fails_with_empty_extraction() {
        let result = extract_blocking(b"   \n\t  ", FileKind::PlainText);
        assert!(matches!(result, Err(ExtractError::EmptyExtraction)));
    }

    #[test]
    fn docx_paragraphs_become_lines() {
        let xml = r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
                <w:p></w:p>
                <w:p><w:r><w:t>Senior</w:t></w:r><w:r><w:t xml:space="preserve"> Engineer</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;
        let bytes = docx_fixture(xml);
        let result = extract_blocking(&bytes, FileKind::WordDocument).unwrap();
        assert_eq!(result, "Jane Doe\nSenior Engineer");
    }

    #[test]
    fn docx_entities_and_tabs_are_decoded() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:p><w:r><w:t>R&amp;D</w:t></w:r><w:tab/><w:r><w:t>Lead</w:t></w:r></w:p>
            </w:document>"#;
        let bytes = docx_fixture(xml);
        let result = extract_blocking(&bytes, FileKind::WordDocument).unwrap();
        assert_eq!(result, "R&D Lead");
    }

    #[test]
    fn docx_that_is_not_a_zip_fails_as_corrupt() {
        let bytes = vec![0u8; 64];
        let result = extract_blocking(&bytes, FileKind::WordDocument);
        assert!(matches!(result, Err(ExtractError::CorruptOrProtected(_))));
    }

    #[test]
    fn docx_missing_document_xml_fails_as_corrupt() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("word/styles.xml", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(b"<w:styles/>").unwrap();
            writer.finish().unwrap();
        }
        let result = extract_blocking(&cursor.into_inner(), FileKind::WordDocument);
        assert!(matches!(result, Err(ExtractError::CorruptOrProtected(_))));
    }

    #[test]
    fn image_with_unknown_magic_fails_with_format_mismatch() {
        let result = extract_blocking(b"GIF89a not supported", FileKind::Image);
        assert!(matches!(
            result,
            Err(ExtractError::FormatMismatch {
                expected: "PNG or JPEG image"
            })
        ));
    }

    #[tokio::test]
    async fn extract_runs_on_the_blocking_pool() {
        let bytes = Bytes::from_static(b"Jane Doe, Platform Engineer");
        let result = extract(bytes, FileKind::PlainText).await.unwrap();
        assert_eq!(result, "Jane Doe, Platform Engineer");
    }

    #[test]
    fn error_messages_tell_the_user_what_to_do() {
        let unsupported = ExtractError::UnsupportedFormat("application/zip".to_string());
        assert!(unsupported.to_string().contains("PDF, DOCX, PNG, JPG, or TXT"));

        let empty = ExtractError::EmptyExtraction;
        assert!(empty.to_string().contains("PNG or JPG"));
    }
}
