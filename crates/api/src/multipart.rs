//! Multipart bodies that can be sent more than once.
//!
//! `reqwest::multipart::Form` is consumed on send, but a request retried
//! after a token refresh needs the same body again. [`MultipartForm`] keeps
//! the parts and builds a fresh form per attempt.

use reqwest::multipart::{Form, Part};

use crate::ApiError;

/// An uploaded file destined for a multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Text fields plus file parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Add a text field only when `value` is present and non-blank.
    #[must_use]
    pub fn text_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value.map(Into::into) {
            Some(value) if !value.trim().is_empty() => self.text(name, value),
            _ => self,
        }
    }

    /// Replace the value of text field `name`, adding it when missing.
    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        self.fields.retain(|(key, _)| key != name);
        self.fields.push((name.to_owned(), value));
        self
    }

    /// Drop every text field called `name`.
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        self.fields.retain(|(key, _)| key != name);
        self
    }

    /// Add a file part. Empty uploads (no file chosen) are skipped.
    #[must_use]
    pub fn file(mut self, file: FilePart) -> Self {
        if !file.bytes.is_empty() {
            self.files.push(file);
        }
        self
    }

    #[must_use]
    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Value of the first text field called `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Build a fresh `reqwest` form.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] when a part carries an unparsable MIME type.
    pub fn to_form(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in &self.files {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            if let Some(content_type) = &file.content_type {
                part = part.mime_str(content_type)?;
            }
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn image(field: &str, bytes: &[u8]) -> FilePart {
        FilePart {
            field: field.to_owned(),
            file_name: "anh.png".to_owned(),
            content_type: Some("image/png".to_owned()),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_builder_skips_blank_values_and_empty_files() {
        let form = MultipartForm::new()
            .text("name", "Áo thun")
            .text_opt("description", Some("  "))
            .text_opt("brand", None::<String>)
            .file(image("images", b""));
        assert_eq!(form.field("name"), Some("Áo thun"));
        assert_eq!(form.field("description"), None);
        assert!(!form.has_files());
    }

    #[test]
    fn test_set_replaces_and_without_removes() {
        let form = MultipartForm::new()
            .text("price", "1.250.000")
            .text("discountPrice", "")
            .set("price", "1250000")
            .without("discountPrice");
        assert_eq!(form.field("price"), Some("1250000"));
        assert_eq!(form.field("discountPrice"), None);
    }

    #[test]
    fn test_to_form_can_be_called_repeatedly() {
        let form = MultipartForm::new()
            .text("name", "Giày")
            .file(image("images", b"\x89PNG"));
        assert!(form.to_form().is_ok());
        assert!(form.to_form().is_ok());
        assert!(form.has_files());
    }

    #[test]
    fn test_bad_mime_is_reported() {
        let mut bad = image("logo", b"x");
        bad.content_type = Some("not a mime".to_owned());
        assert!(MultipartForm::new().file(bad).to_form().is_err());
    }
}
