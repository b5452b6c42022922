//! JSON bodies returned by the HTTP API
//!
//! The `check --json` subcommand prints the very same bodies to stdout so
//! scripts can consume either surface.

use serde::{Deserialize, Serialize};

use crate::error::CheckError;
use crate::image_check::{ImageAttributes, ImageCategory, ValidationResult};

/// Decoded attributes as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub format: String,
    /// "WIDTH×HEIGHT"
    pub size: String,
    pub mode: String,
    pub transparent_pixels: u64,
}

impl From<&ImageAttributes> for ImageInfo {
    fn from(attrs: &ImageAttributes) -> Self {
        Self {
            format: attrs.format.clone(),
            size: attrs.size_label(),
            mode: attrs.mode.clone(),
            transparent_pixels: attrs.transparent_pixels,
        }
    }
}

/// Body of every `/check-image` answer, verdict or error
///
/// `image_info` is present whenever the upload decoded; `errors` lists one entry
/// per failed criterion, or hints for request errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_info: Option<ImageInfo>,
}

impl From<&ValidationResult> for CheckResponse {
    fn from(result: &ValidationResult) -> Self {
        Self {
            success: result.success,
            message: result.message.clone(),
            errors: result.violations.iter().map(|v| v.to_string()).collect(),
            image_info: Some(ImageInfo::from(&result.attributes)),
        }
    }
}

impl From<&CheckError> for CheckResponse {
    fn from(err: &CheckError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            errors: err.hints(),
            image_info: None,
        }
    }
}

impl CheckResponse {
    /// Print as a single JSON line to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub endpoints: Vec<EndpointInfo>,
    pub image_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub route: String,
    pub description: String,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints: vec![
                EndpointInfo {
                    route: "POST /check-image".to_string(),
                    description: "Check one image (multipart fields: image, image_type)"
                        .to_string(),
                },
                EndpointInfo {
                    route: "GET /".to_string(),
                    description: "Service information".to_string(),
                },
            ],
            image_types: ImageCategory::accepted_labels(),
        }
    }
}
