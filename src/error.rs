//! Request-level errors.
//!
//! Everything that stops a check before a verdict can be produced ends up here.
//! A rejected image is *not* an error: it is a normal [`ValidationResult`] with
//! `success == false`.
//!
//! [`ValidationResult`]: crate::image_check::ValidationResult

use crate::image_check::ImageCategory;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The upload is not an image we can decode
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// `image_type` did not name a known category
    #[error("Unsupported image type: '{0}'")]
    UnknownCategory(String),

    /// A required multipart field was absent
    #[error("Missing form field '{0}'")]
    MissingField(&'static str),

    #[error("Uploaded file is empty")]
    EmptyUpload,

    /// The request body could not be read as multipart form data
    #[error("Invalid multipart request: {message}")]
    Multipart { status: u16, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckError {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            CheckError::Multipart { status, .. } => *status,
            CheckError::Internal(_) => 500,
            _ => 400,
        }
    }

    /// Follow-up hints shown to the caller next to the message
    pub fn hints(&self) -> Vec<String> {
        match self {
            CheckError::UnknownCategory(_) => {
                vec![format!(
                    "Supported types: {}",
                    ImageCategory::accepted_labels().join(", ")
                )]
            }
            CheckError::MissingField("image") => {
                vec!["Upload the file in a form field named 'image'".to_string()]
            }
            CheckError::MissingField(_) => vec![format!(
                "Provide 'image_type', one of: {}",
                ImageCategory::accepted_labels().join(", ")
            )],
            CheckError::Decode(_) => {
                vec!["Supported formats: PNG, JPEG, GIF, WEBP, BMP, TIFF".to_string()]
            }
            _ => Vec::new(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CheckError::Decode("bad".into()).status_code(), 400);
        assert_eq!(CheckError::UnknownCategory("selfie".into()).status_code(), 400);
        assert_eq!(CheckError::EmptyUpload.status_code(), 400);
        assert_eq!(
            CheckError::Multipart {
                status: 413,
                message: "too large".into()
            }
            .status_code(),
            413
        );
        assert_eq!(CheckError::Internal("boom".into()).status_code(), 500);
        assert!(!CheckError::Internal("boom".into()).is_client_error());
    }

    #[test]
    fn test_unknown_category_names_value_and_accepted_set() {
        let err = CheckError::UnknownCategory("selfie".into());
        assert!(err.to_string().contains("selfie"));

        let hints = err.hints();
        assert_eq!(hints.len(), 1);
        assert!(hints[0].contains("portrait"));
        assert!(hints[0].contains("id-photo"));
    }
}
