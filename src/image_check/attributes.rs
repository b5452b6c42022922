/// What the decoder learned about an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttributes {
    /// Container format, uppercase (e.g. "PNG", "JPEG")
    pub format: String,
    pub width: u32,
    pub height: u32,
    /// Color mode in short form: "L", "LA", "RGB", "RGBA", optionally with a
    /// ";16" or ";F" depth suffix
    pub mode: String,
    pub transparent_pixels: u64,
}

impl ImageAttributes {
    /// Size rendered as "WIDTH×HEIGHT"
    pub fn size_label(&self) -> String {
        format!("{}×{}", self.width, self.height)
    }

    /// Mode without its bit-depth suffix ("RGBA;16" -> "RGBA")
    pub fn base_mode(&self) -> &str {
        self.mode.split(';').next().unwrap_or(&self.mode)
    }

    pub fn total_pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(mode: &str) -> ImageAttributes {
        ImageAttributes {
            format: "PNG".to_string(),
            width: 900,
            height: 1200,
            mode: mode.to_string(),
            transparent_pixels: 0,
        }
    }

    #[test]
    fn test_size_label() {
        assert_eq!(attrs("RGBA").size_label(), "900×1200");
        assert_eq!(attrs("RGBA").total_pixels(), 1_080_000);
    }

    #[test]
    fn test_base_mode() {
        assert_eq!(attrs("RGBA").base_mode(), "RGBA");
        assert_eq!(attrs("RGBA;16").base_mode(), "RGBA");
        assert_eq!(attrs("LA;F").base_mode(), "LA");
        assert_eq!(attrs("").base_mode(), "");
    }
}
