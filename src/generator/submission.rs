use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::error::AppError;
use crate::generator::form::FormState;

pub const MISSING_CONTENT_MESSAGE: &str =
    "Please enter text or upload a file to generate handwriting.";

/// Contents of an attached `.txt`/`.pdf` file, read at submit time.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Validated request payload for `/api/generate`. `language`, `style`,
/// `size` and `ink_color` are always present; at least one of `text` /
/// `document` is, and both may be.
#[derive(Debug, Clone)]
pub struct Submission {
    pub language: String,
    pub style: String,
    pub size: &'static str,
    pub ink_color: String,
    pub text: Option<String>,
    pub document: Option<UploadedDocument>,
}

/// Cheap precondition shared by the controller (before entering Pending)
/// and the builder: some content source must be present.
pub fn ensure_has_content(form: &FormState) -> Result<(), AppError> {
    if form.text.trim().is_empty() && form.uploaded_file.is_none() {
        return Err(AppError::Validation(MISSING_CONTENT_MESSAGE.into()));
    }
    Ok(())
}

/// Mime type for a supported upload, or a validation error for anything
/// that is not `.txt` / `.pdf`.
pub fn supported_mime(path: &Path) -> Result<&'static str, AppError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("txt") => Ok("text/plain"),
        Some("pdf") => Ok("application/pdf"),
        _ => Err(AppError::Validation(
            "Only .txt and .pdf files are supported".into(),
        )),
    }
}

/// Build a submission from the current form, reading the attached file's
/// bytes if one is present.
pub fn build(form: &FormState) -> Result<Submission, AppError> {
    ensure_has_content(form)?;

    let document = match &form.uploaded_file {
        Some(path) => Some(read_document(path)?),
        None => None,
    };

    let trimmed_empty = form.text.trim().is_empty();
    Ok(Submission {
        language: form.language.clone(),
        style: form.style.clone(),
        size: form.size.as_str(),
        ink_color: form.ink_color.clone(),
        text: (!trimmed_empty).then(|| form.text.clone()),
        document,
    })
}

fn read_document(path: &Path) -> Result<UploadedDocument, AppError> {
    let mime = supported_mime(path)?;
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".into());

    Ok(UploadedDocument {
        filename,
        mime,
        bytes,
    })
}

impl Submission {
    /// Convert into the multipart body `/api/generate` expects.
    pub fn into_multipart(self) -> Result<Form, AppError> {
        let mut form = Form::new()
            .text("language", self.language)
            .text("style", self.style)
            .text("size", self.size)
            .text("ink_color", self.ink_color);

        if let Some(text) = self.text {
            form = form.text("text", text);
        }
        if let Some(doc) = self.document {
            let part = Part::bytes(doc.bytes)
                .file_name(doc.filename)
                .mime_str(doc.mime)
                .map_err(|e| AppError::Internal(format!("Invalid upload mime type: {e}")))?;
            form = form.part("file", part);
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::form::HandwritingSize;
    use std::io::Write;

    fn form_with_text(text: &str) -> FormState {
        let mut form = FormState::default();
        form.set_text(text.into());
        form
    }

    #[test]
    fn test_missing_content_is_rejected() {
        let form = form_with_text("   \n\t ");
        let err = build(&form).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), MISSING_CONTENT_MESSAGE);
    }

    #[test]
    fn test_text_only_submission() {
        let mut form = form_with_text("  hello world  ");
        form.style = "cursive".into();
        form.size = HandwritingSize::Large;
        form.ink_color = "#1A2B3C".into();

        let sub = build(&form).unwrap();
        assert_eq!(sub.language, "english");
        assert_eq!(sub.style, "cursive");
        assert_eq!(sub.size, "large");
        assert_eq!(sub.ink_color, "#1A2B3C");
        // Whitespace is only used for the presence check; the payload keeps
        // the text as typed.
        assert_eq!(sub.text.as_deref(), Some("  hello world  "));
        assert!(sub.document.is_none());
    }

    #[test]
    fn test_file_only_submission_reads_bytes() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"from a file").unwrap();

        let mut form = FormState::default();
        form.uploaded_file = Some(file.path().to_path_buf());

        let sub = build(&form).unwrap();
        assert!(sub.text.is_none());
        let doc = sub.document.unwrap();
        assert_eq!(doc.bytes, b"from a file");
        assert_eq!(doc.mime, "text/plain");
        assert!(doc.filename.ends_with(".txt"));
    }

    #[test]
    fn test_text_and_file_are_both_included() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let mut form = form_with_text("inline text");
        form.uploaded_file = Some(file.path().to_path_buf());

        let sub = build(&form).unwrap();
        assert_eq!(sub.text.as_deref(), Some("inline text"));
        assert_eq!(sub.document.unwrap().mime, "application/pdf");
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        assert!(supported_mime(Path::new("notes.docx")).is_err());
        assert!(supported_mime(Path::new("no_extension")).is_err());
        assert_eq!(supported_mime(Path::new("NOTES.TXT")).unwrap(), "text/plain");
        assert_eq!(supported_mime(Path::new("a.pdf")).unwrap(), "application/pdf");
    }

    #[test]
    fn test_into_multipart_builds() {
        let sub = build(&form_with_text("hi")).unwrap();
        assert!(sub.into_multipart().is_ok());
    }
}
