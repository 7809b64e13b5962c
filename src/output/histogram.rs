// histogram.rs - PNG histogram of pairwise differences

use std::error::Error;
use std::path::Path;
use std::sync::OnceLock;
use plotters::prelude::*;
use plotters::style::register_font;
use crate::core::Histogram;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

pub const TITLE: &str = "Histogram of Pairwise Differences";
pub const X_LABEL: &str = "Pairwise Nucleotide Differences";
pub const Y_LABEL: &str = "Frequency";

/// TrueType fonts tried, in order, for titles and tick labels
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Register the first readable system font as `sans-serif`; runs once
fn text_available() -> bool {
    static FONT_READY: OnceLock<bool> = OnceLock::new();
    *FONT_READY.get_or_init(|| {
        FONT_CANDIDATES.iter().any(|path| match std::fs::read(path) {
            Ok(bytes) => {
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                register_font("sans-serif", FontStyle::Normal, bytes).is_ok()
            }
            Err(_) => false,
        })
    })
}

/// Draw the bars, with title, axis labels and ticks when `with_text` is set
fn draw_histogram(hist: &Histogram, path: &Path, with_text: bool) -> Result<(), Box<dyn Error>> {
    let x_min = hist.edges.first().copied().unwrap_or(0.0);
    let x_max = hist.edges.last().copied().unwrap_or(1.0);
    let y_max = hist.max_count().max(1) as f64 * 1.05;

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if with_text {
        builder
            .caption(TITLE, ("sans-serif", 26))
            .x_label_area_size(50)
            .y_label_area_size(60);
    }
    let mut chart = builder.build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    if with_text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(X_LABEL)
            .y_desc(Y_LABEL)
            .y_label_formatter(&|v| format!("{:.0}", v))
            .draw()?;
    }

    let bars = hist.counts.iter().enumerate().map(|(i, &count)| {
        [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)]
    });
    chart.draw_series(bars.clone().map(|corners| Rectangle::new(corners, BLUE.mix(0.7).filled())))?;
    chart.draw_series(bars.map(|corners| Rectangle::new(corners, BLACK.stroke_width(1))))?;

    root.present()?;
    Ok(())
}

/// Bin the raw distances and write the PNG; returns `false` when there is
/// nothing to plot
pub fn write_histogram(file_path: &str, distances: &[usize], bins: usize) -> Result<bool, String> {
    let values: Vec<f64> = distances.iter().map(|&d| d as f64).collect();
    let hist = match Histogram::from_values(&values, bins) {
        Some(hist) => hist,
        None => return Ok(false),
    };

    super::ensure_parent_dir(file_path)?;
    let with_text = text_available();
    if !with_text {
        println!("⚠️  No TrueType font found, histogram drawn without title and labels");
    }
    draw_histogram(&hist, Path::new(file_path), with_text)
        .map_err(|e| format!("Failed to draw histogram '{}': {}", file_path, e))?;

    println!("✅ Histogram saved to {}", file_path);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_write_histogram_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots/hist.png");
        let distances: Vec<usize> = (0..50).map(|v| v % 13).collect();

        let written = write_histogram(path.to_str().unwrap(), &distances, 20).unwrap();
        assert!(written);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_unlabelled_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.png");
        let hist = Histogram::from_values(&[3.0, 3.0, 3.0], 20).unwrap();

        draw_histogram(&hist, &path, false).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_write_histogram_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist.png");
        let written = write_histogram(path.to_str().unwrap(), &[], 20).unwrap();
        assert!(!written);
        assert!(!path.exists());
    }
}
