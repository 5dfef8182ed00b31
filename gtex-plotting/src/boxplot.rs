//! Box plot of read counts, one box per group

use crate::output::OutputFormat;
use crate::PlotConfig;
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::path::Path;
use tracing::debug;

/// Render one box per `(label, values)` group to `output_path`.
///
/// Groups keep their given order along the x axis. A group without values
/// keeps its slot and label but draws no box; an empty group list still
/// writes a chart with axes and title. The format follows the file
/// extension (SVG, or PNG with the `png` feature).
///
/// # Example
/// ```ignore
/// use gtex_plotting::{boxplot, PlotConfig};
///
/// let groups = vec![("Blood".to_string(), vec![5.0, 7.0, 9.0])];
/// boxplot(&groups, "GENEX.svg", PlotConfig::default())?;
/// ```
pub fn boxplot<P: AsRef<Path>>(
    groups: &[(String, Vec<f64>)],
    output_path: P,
    config: PlotConfig,
) -> Result<()> {
    let output_path = output_path.as_ref();

    let format = OutputFormat::from_path(output_path).with_context(|| {
        format!("Unsupported output format: {}", output_path.display())
    })?;

    let y_max = groups
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .fold(0.0_f64, f64::max);
    let y_max = ((y_max * 1.1) as f32).max(1.0);

    debug!(
        path = %output_path.display(),
        groups = groups.len(),
        y_max,
        "drawing box plot"
    );

    match format {
        OutputFormat::Svg => draw_svg(output_path, groups, &config, y_max),
        #[cfg(feature = "png")]
        OutputFormat::Png => draw_png(output_path, groups, &config, y_max),
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => anyhow::bail!("PNG output requires the `png` feature"),
    }
}

fn draw_svg(
    output_path: &Path,
    groups: &[(String, Vec<f64>)],
    config: &PlotConfig,
    y_max: f32,
) -> Result<()> {
    let root = SVGBackend::new(output_path, (config.width, config.height)).into_drawing_area();

    draw_impl(&root, groups, config, y_max).context("Failed to draw box plot")?;

    root.present().context("Failed to write SVG")?;
    Ok(())
}

#[cfg(feature = "png")]
fn draw_png(
    output_path: &Path,
    groups: &[(String, Vec<f64>)],
    config: &PlotConfig,
    y_max: f32,
) -> Result<()> {
    let root = BitMapBackend::new(output_path, (config.width, config.height)).into_drawing_area();

    draw_impl(&root, groups, config, y_max).context("Failed to draw box plot")?;

    root.present().context("Failed to write PNG")?;
    Ok(())
}

fn draw_impl<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    groups: &[(String, Vec<f64>)],
    config: &PlotConfig,
    y_max: f32,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&config.theme.background)?;

    let title = config.title.as_deref().unwrap_or("Read counts");
    let n_slots = (groups.len() as u32).max(1);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24).into_font().color(&config.theme.text))
        .margin(10)
        .x_label_area_size(160)
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..n_slots).into_segmented(), 0.0f32..y_max)?;

    let label_of = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => groups
            .get(*i as usize)
            .map(|(label, _)| label.clone())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(groups.len().max(1))
        .x_label_formatter(&label_of)
        .x_desc(config.x_desc.as_deref().unwrap_or(""))
        .y_desc(config.y_desc.as_str())
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90)
                .color(&config.theme.text),
        )
        .y_label_style(("sans-serif", 14).into_font().color(&config.theme.text))
        .axis_style(&config.theme.axis)
        .draw()?;

    // Quartiles cannot summarise an empty slice.
    let boxes: Vec<(u32, Quartiles, RGBColor)> = groups
        .iter()
        .enumerate()
        .filter(|(_, (_, values))| !values.is_empty())
        .map(|(i, (_, values))| (i as u32, Quartiles::new(values), config.theme.box_color(i)))
        .collect();

    chart.draw_series(boxes.iter().map(|(i, quartiles, color)| {
        Boxplot::new_vertical(SegmentValue::CenterOf(*i), quartiles)
            .width(config.box_width)
            .whisker_width(0.5)
            .style(color)
    }))?;

    Ok(())
}
