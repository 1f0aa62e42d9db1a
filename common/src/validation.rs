//! 入力検証
//!
//! 分類器の手前で弾く条件。分類器自体は失敗しない。

use crate::types::{ClassifyImageRequest, ClassifyTextRequest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// テキストの最大文字数（UTF-16単位。ブラウザ側の文字数と揃える）
pub const MAX_TEXT_CHARS: usize = 500;

/// アップロード上限 16MiB
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// 検証エラーの1項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    fn from_issues(issues: Vec<ValidationIssue>) -> std::result::Result<(), Self> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Self { issues })
        }
    }
}

impl From<ValidationIssue> for ValidationError {
    fn from(issue: ValidationIssue) -> Self {
        Self { issues: vec![issue] }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .issues
            .iter()
            .map(|i| format!("{}: {}", i.field, i.message))
            .collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_text(req: &ClassifyTextRequest) -> std::result::Result<(), ValidationError> {
    let units = req.text.encode_utf16().count();
    let mut issues = Vec::new();

    if units == 0 {
        issues.push(ValidationIssue::new("text", "Description is required"));
    } else if units > MAX_TEXT_CHARS {
        issues.push(ValidationIssue::new("text", "Description too long"));
    }

    ValidationError::from_issues(issues)
}

pub fn validate_image(req: &ClassifyImageRequest) -> std::result::Result<(), ValidationError> {
    let mut issues = Vec::new();

    if req.size > MAX_UPLOAD_BYTES {
        issues.push(ValidationIssue::new(
            "size",
            format!("File too large. Maximum size is {} bytes.", MAX_UPLOAD_BYTES),
        ));
    }

    if !is_allowed_mime_type(&req.mimetype) {
        issues.push(ValidationIssue::new(
            "mimetype",
            "Invalid file type. Only JPEG, PNG, GIF, and WebP are allowed.",
        ));
    }

    ValidationError::from_issues(issues)
}

pub fn is_allowed_mime_type(mimetype: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mimetype)
}

/// 拡張子からMIMEタイプを推定（大文字小文字を区別しない）
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> ClassifyTextRequest {
        ClassifyTextRequest { text: s.to_string() }
    }

    fn image(size: u64, mimetype: &str) -> ClassifyImageRequest {
        ClassifyImageRequest {
            filename: "photo.jpg".to_string(),
            size,
            mimetype: mimetype.to_string(),
        }
    }

    #[test]
    fn test_validate_text_empty() {
        let err = validate_text(&text("")).unwrap_err();
        assert_eq!(err.issues[0].message, "Description is required");
    }

    #[test]
    fn test_validate_text_length_boundary() {
        assert!(validate_text(&text(&"a".repeat(500))).is_ok());
        let err = validate_text(&text(&"a".repeat(501))).unwrap_err();
        assert_eq!(err.issues[0].message, "Description too long");
    }

    #[test]
    fn test_validate_text_counts_utf16_units() {
        // BMP内はUTF-8のバイト数ではなく1文字1単位
        assert!(validate_text(&text(&"缶".repeat(500))).is_ok());

        // 絵文字はサロゲートペアで2単位
        assert!(validate_text(&text(&"🍌".repeat(250))).is_ok());
        let err = validate_text(&text(&"🍌".repeat(251))).unwrap_err();
        assert_eq!(err.issues[0].message, "Description too long");
    }

    #[test]
    fn test_validate_image_ok() {
        for mime in ALLOWED_MIME_TYPES {
            assert!(validate_image(&image(1024, mime)).is_ok());
        }
        assert!(validate_image(&image(MAX_UPLOAD_BYTES, "image/png")).is_ok());
    }

    #[test]
    fn test_validate_image_rejects() {
        let err = validate_image(&image(MAX_UPLOAD_BYTES + 1, "application/pdf")).unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert_eq!(err.issues[0].field, "size");
        assert_eq!(err.issues[1].field, "mimetype");
        assert!(err.to_string().contains("Only JPEG, PNG, GIF, and WebP"));
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("jpeg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("webp"), Some("image/webp"));
        assert_eq!(mime_for_extension("bmp"), None);
    }
}
