use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::CheckError;

/// Requirements an image must meet for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    pub width: u32,
    pub height: u32,
    /// Container format, uppercase (e.g. "PNG")
    pub format: &'static str,
    /// Color mode that carries an alpha channel (e.g. "RGBA")
    pub mode: &'static str,
    /// At least one transparent pixel is required
    pub require_transparency: bool,
}

impl RuleSet {
    /// Required size rendered as "WIDTH×HEIGHT"
    pub fn size_label(&self) -> String {
        format!("{}×{}", self.width, self.height)
    }
}

const PORTRAIT_RULES: RuleSet = RuleSet {
    width: 900,
    height: 1200,
    format: "PNG",
    mode: "RGBA",
    require_transparency: true,
};

const ID_PHOTO_RULES: RuleSet = RuleSet {
    width: 400,
    height: 400,
    format: "PNG",
    mode: "RGBA",
    require_transparency: true,
};

/// Declared intended use of a photo
///
/// Parsing is exact and case-sensitive. Each category also accepts its Chinese
/// label, which is what the existing upload forms send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum ImageCategory {
    /// Everyday portrait (生活照)
    #[strum(to_string = "portrait", serialize = "生活照")]
    Portrait,
    /// Identification photo (证件照)
    #[strum(to_string = "id-photo", serialize = "证件照")]
    IdPhoto,
}

impl ImageCategory {
    pub fn rules(&self) -> &'static RuleSet {
        match self {
            ImageCategory::Portrait => &PORTRAIT_RULES,
            ImageCategory::IdPhoto => &ID_PHOTO_RULES,
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            ImageCategory::Portrait => "生活照",
            ImageCategory::IdPhoto => "证件照",
        }
    }

    /// Every label `resolve_category` accepts, canonical names first
    pub fn accepted_labels() -> Vec<String> {
        ImageCategory::iter()
            .map(|c| c.to_string())
            .chain(ImageCategory::iter().map(|c| c.alias().to_string()))
            .collect()
    }
}

/// Map a category label onto its category
pub fn resolve_category(label: &str) -> Result<ImageCategory, CheckError> {
    ImageCategory::from_str(label).map_err(|_| CheckError::UnknownCategory(label.to_string()))
}

/// Map a category label onto its rule set
pub fn resolve_rules(label: &str) -> Result<&'static RuleSet, CheckError> {
    resolve_category(label).map(|category| category.rules())
}
