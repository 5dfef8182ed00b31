//! Output format handling for plots

use std::path::Path;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Scalable Vector Graphics (default)
    #[default]
    Svg,
    /// Portable Network Graphics (requires `png` feature)
    Png,
}

impl OutputFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Detect format from a path; no extension means SVG.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::from_extension(ext),
            None => Some(Self::Svg),
        }
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }

    /// Whether this build can write the format.
    pub fn is_supported(&self) -> bool {
        match self {
            Self::Svg => true,
            Self::Png => cfg!(feature = "png"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a/GENEX.SVG")), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::from_path(Path::new("GENEX.png")), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("GENEX")), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::from_path(Path::new("GENEX.pdf")), None);
    }

    #[test]
    fn svg_is_always_supported() {
        assert!(OutputFormat::Svg.is_supported());
        assert_eq!(OutputFormat::default().extension(), "svg");
    }
}
