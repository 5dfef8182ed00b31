//! gtex-plotting: box plots of per-group read counts.
//!
//! ## Features
//! - One box per group, in the order the groups are given
//! - Vertical group labels, theme presets
//! - SVG output (default)
//! - PNG output (optional, requires `png` feature)
//!
//! ## Example
//! ```ignore
//! use gtex_plotting::{boxplot, PlotConfig};
//!
//! let groups = vec![
//!     ("Blood".to_string(), vec![5.0, 7.0]),
//!     ("Brain".to_string(), vec![9.0]),
//! ];
//! let config = PlotConfig { title: Some("GENEX".into()), ..PlotConfig::default() };
//! boxplot(&groups, "GENEX.svg", config)?;
//! ```

pub mod boxplot;
pub mod output;
pub mod themes;

pub use boxplot::boxplot;
pub use output::OutputFormat;
pub use themes::Theme;

/// Y axis description used when none is configured.
pub const DEFAULT_Y_DESC: &str = "Gene read counts";

/// Configuration for plot appearance
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Plot width in pixels
    pub width: u32,
    /// Plot height in pixels
    pub height: u32,
    /// Plot title
    pub title: Option<String>,
    /// X axis description, usually the grouping column
    pub x_desc: Option<String>,
    /// Y axis description
    pub y_desc: String,
    /// Color theme
    pub theme: Theme,
    /// Box width in pixels
    pub box_width: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 500,
            title: None,
            x_desc: None,
            y_desc: DEFAULT_Y_DESC.to_string(),
            theme: Theme::default(),
            box_width: 12,
        }
    }
}
