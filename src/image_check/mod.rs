pub mod attributes;
pub mod category;
pub mod decode;
pub mod validator;

pub use attributes::ImageAttributes;
pub use category::{resolve_category, resolve_rules, ImageCategory, RuleSet};
pub use decode::{AttributeDecoder, ImageCrateDecoder, TransparencyPolicy};
pub use validator::{validate, ValidationResult, Violation, PASS_MESSAGE};

use crate::error::CheckError;

/// Run the full check on one upload: resolve the category, decode, validate
///
/// The label is resolved before decoding so an unknown category never pays for
/// a decode.
pub fn check_image(
    decoder: &dyn AttributeDecoder,
    bytes: &[u8],
    label: &str,
) -> Result<ValidationResult, CheckError> {
    if bytes.is_empty() {
        return Err(CheckError::EmptyUpload);
    }

    let rules = resolve_rules(label)?;
    let attributes = decoder.decode(bytes)?;

    Ok(validate(&attributes, rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns canned attributes and counts how often it was asked
    struct FixedDecoder {
        attributes: ImageAttributes,
        calls: AtomicUsize,
    }

    impl FixedDecoder {
        fn new(format: &str, width: u32, height: u32, mode: &str, transparent: u64) -> Self {
            Self {
                attributes: ImageAttributes {
                    format: format.to_string(),
                    width,
                    height,
                    mode: mode.to_string(),
                    transparent_pixels: transparent,
                },
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl AttributeDecoder for FixedDecoder {
        fn decode(&self, _bytes: &[u8]) -> Result<ImageAttributes, CheckError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.attributes.clone())
        }
    }

    struct FailingDecoder;

    impl AttributeDecoder for FailingDecoder {
        fn decode(&self, _bytes: &[u8]) -> Result<ImageAttributes, CheckError> {
            Err(CheckError::Decode("not an image".to_string()))
        }
    }

    #[test]
    fn test_check_image_pass() {
        let decoder = FixedDecoder::new("PNG", 900, 1200, "RGBA", 12_500);
        let result = check_image(&decoder, b"bytes", "portrait").unwrap();
        assert!(result.success);
        assert_eq!(result.attributes.size_label(), "900×1200");
    }

    #[test]
    fn test_unknown_category_skips_decode() {
        let decoder = FixedDecoder::new("PNG", 400, 400, "RGBA", 1);
        let err = check_image(&decoder, b"bytes", "selfie").unwrap_err();
        assert!(matches!(err, CheckError::UnknownCategory(ref l) if l == "selfie"));
        assert_eq!(decoder.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_empty_upload() {
        let decoder = FixedDecoder::new("PNG", 400, 400, "RGBA", 1);
        let err = check_image(&decoder, b"", "id-photo").unwrap_err();
        assert!(matches!(err, CheckError::EmptyUpload));
    }

    #[test]
    fn test_decode_error_propagates() {
        let err = check_image(&FailingDecoder, b"junk", "id-photo").unwrap_err();
        assert!(matches!(err, CheckError::Decode(_)));
    }

    #[test]
    fn test_check_is_idempotent() {
        let decoder = FixedDecoder::new("PNG", 400, 400, "RGBA", 0);
        let first = check_image(&decoder, b"bytes", "id-photo").unwrap();
        let second = check_image(&decoder, b"bytes", "id-photo").unwrap();
        assert_eq!(first, second);
        assert!(!first.success);
    }
}
