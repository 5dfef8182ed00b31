//! Color themes for box plots

use plotters::style::RGBColor;

/// Color theme for plots
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub background: RGBColor,
    /// Text color
    pub text: RGBColor,
    /// Axis color
    pub axis: RGBColor,
    /// Box outline colors, cycled across groups
    pub box_colors: Vec<RGBColor>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

impl Theme {
    /// Preset names accepted by [`Theme::from_name`].
    pub const NAMES: [&'static str; 5] = ["classic", "nature", "colorful", "dark", "high_contrast"];

    /// Look up a preset by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "classic" => Some(Self::classic()),
            "nature" => Some(Self::nature()),
            "colorful" => Some(Self::colorful()),
            "dark" => Some(Self::dark()),
            "high_contrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }

    /// Outline color for the group at `index`.
    pub fn box_color(&self, index: usize) -> RGBColor {
        if self.box_colors.is_empty() {
            return self.axis;
        }
        self.box_colors[index % self.box_colors.len()]
    }

    /// Single blue outline on white
    pub fn classic() -> Self {
        Self {
            background: RGBColor(255, 255, 255),
            text: RGBColor(0, 0, 0),
            axis: RGBColor(100, 100, 100),
            box_colors: vec![RGBColor(31, 119, 180)],
        }
    }

    /// Nature-style theme with muted colors
    pub fn nature() -> Self {
        Self {
            background: RGBColor(255, 255, 255),
            text: RGBColor(50, 50, 50),
            axis: RGBColor(80, 80, 80),
            box_colors: vec![
                RGBColor(77, 77, 77),    // Dark gray
                RGBColor(153, 153, 153), // Light gray
            ],
        }
    }

    /// Distinct color per group
    pub fn colorful() -> Self {
        Self {
            background: RGBColor(255, 255, 255),
            text: RGBColor(0, 0, 0),
            axis: RGBColor(100, 100, 100),
            box_colors: vec![
                RGBColor(228, 26, 28),   // Red
                RGBColor(55, 126, 184),  // Blue
                RGBColor(77, 175, 74),   // Green
                RGBColor(152, 78, 163),  // Purple
                RGBColor(255, 127, 0),   // Orange
                RGBColor(166, 86, 40),   // Brown
                RGBColor(247, 129, 191), // Pink
            ],
        }
    }

    /// Dark theme for presentations
    pub fn dark() -> Self {
        Self {
            background: RGBColor(30, 30, 30),
            text: RGBColor(220, 220, 220),
            axis: RGBColor(150, 150, 150),
            box_colors: vec![
                RGBColor(102, 194, 165), // Teal
                RGBColor(252, 141, 98),  // Coral
            ],
        }
    }

    /// High contrast theme for accessibility
    pub fn high_contrast() -> Self {
        Self {
            background: RGBColor(255, 255, 255),
            text: RGBColor(0, 0, 0),
            axis: RGBColor(0, 0, 0),
            box_colors: vec![RGBColor(0, 0, 0)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for name in Theme::NAMES {
            assert!(Theme::from_name(name).is_some(), "{name}");
        }
        assert!(Theme::from_name("High-Contrast").is_some());
        assert!(Theme::from_name("neon").is_none());
    }

    #[test]
    fn box_colors_cycle() {
        let theme = Theme::nature();
        assert_eq!(theme.box_color(0), theme.box_color(2));
        assert_ne!(theme.box_color(0), theme.box_color(1));
    }
}
