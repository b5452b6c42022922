// Library exports for the binary and the HTTP tests
pub mod cli;
pub mod config_file;
pub mod error;
pub mod image_check;
pub mod json_output;
pub mod report;
pub mod server;
pub mod utils;

// Re-export commonly used types
pub use error::CheckError;
pub use image_check::{
    check_image, validate, AttributeDecoder, ImageAttributes, ImageCategory, ImageCrateDecoder,
    RuleSet, TransparencyPolicy, ValidationResult,
};
pub use json_output::CheckResponse;
