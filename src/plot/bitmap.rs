use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

use super::color::{DivergingMap, SERIES};
use super::{histogram, scatter_points, PlotRenderer, PlotSpec};
use crate::config::AnalysisConfig;
use crate::data::model::Table;
use crate::stats::describe::correlation_matrix;

/// Family name the loaded TrueType font is registered under.
const FONT: &str = "sans-serif";

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn draw_err<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("drawing chart: {e}")
}

// ---------------------------------------------------------------------------
// BitmapRenderer
// ---------------------------------------------------------------------------

/// Draws charts into an in-memory RGB buffer and writes them out as PNG.
///
/// Text (titles, axis descriptions, heatmap annotations) needs a font; without
/// one the charts keep their marks and drop all text.
#[derive(Debug, Clone)]
pub struct BitmapRenderer {
    width: u32,
    height: u32,
    text: bool,
    colormap: DivergingMap,
}

impl BitmapRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            text: false,
            colormap: DivergingMap::default(),
        }
    }

    /// Build from config, registering the configured or discovered font.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let renderer = Self::new(config.image_width, config.image_height);
        let Some(font) = config.resolve_font() else {
            log::warn!("No TrueType font found; charts will be drawn without text");
            return renderer;
        };
        match renderer.clone().with_font_file(&font) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("{e:#}; charts will be drawn without text");
                renderer
            }
        }
    }

    /// Register a TrueType font for chart text.
    pub fn with_font_file(mut self, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading font {}", path.display()))?;
        // The font registry keeps a 'static reference for the whole process.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        plotters::style::register_font(FONT, FontStyle::Normal, bytes)
            .map_err(|_| anyhow!("{} is not a usable TrueType font", path.display()))?;
        log::debug!("Registered chart font {}", path.display());
        self.text = true;
        Ok(self)
    }

    pub fn has_text(&self) -> bool {
        self.text
    }

    fn draw_relational(
        &self,
        root: &Area<'_>,
        points: &[(f64, f64)],
        x: &str,
        y: &str,
        title: &str,
    ) -> Result<()> {
        let mut builder = ChartBuilder::on(root);
        builder.margin(20);
        if self.text {
            builder
                .caption(title, (FONT, 24))
                .x_label_area_size(45)
                .y_label_area_size(55);
        }
        let mut chart = builder
            .build_cartesian_2d(
                padded_range(points.iter().map(|p| p.0)),
                padded_range(points.iter().map(|p| p.1)),
            )
            .map_err(draw_err)?;

        if self.text {
            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc(x)
                .y_desc(y)
                .label_style((FONT, 13))
                .axis_desc_style((FONT, 15))
                .draw()
                .map_err(draw_err)?;
        }

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, 4, SERIES.mix(0.8).filled())),
            )
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_categorical(
        &self,
        root: &Area<'_>,
        values: &[f64],
        column: &str,
        bins: usize,
        title: &str,
    ) -> Result<()> {
        let bins = histogram(values, bins);
        let (lo, hi) = match (bins.first(), bins.last()) {
            (Some(first), Some(last)) => (first.lower, last.upper),
            _ => (0.0, 1.0),
        };
        let top = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.05;

        let mut builder = ChartBuilder::on(root);
        builder.margin(20);
        if self.text {
            builder
                .caption(title, (FONT, 24))
                .x_label_area_size(45)
                .y_label_area_size(55);
        }
        let mut chart = builder
            .build_cartesian_2d(lo..hi, 0.0..top)
            .map_err(draw_err)?;

        if self.text {
            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc(column)
                .y_desc("Count")
                .label_style((FONT, 13))
                .axis_desc_style((FONT, 15))
                .draw()
                .map_err(draw_err)?;
        }

        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new(
                    [(b.lower, 0.0), (b.upper, b.count as f64)],
                    SERIES.mix(0.85).filled(),
                )
            }))
            .map_err(draw_err)?;
        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new(
                    [(b.lower, 0.0), (b.upper, b.count as f64)],
                    WHITE.stroke_width(1),
                )
            }))
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_statistical(&self, root: &Area<'_>, table: &Table, title: &str) -> Result<()> {
        let matrix = correlation_matrix(table);
        let n = matrix.len();
        if n == 0 {
            bail!("no numeric columns to correlate");
        }
        let side = n as f64;

        let mut builder = ChartBuilder::on(root);
        builder.margin(20);
        if self.text {
            builder
                .caption(title, (FONT, 24))
                .x_label_area_size(40)
                .y_label_area_size(120);
        }
        let mut chart = builder
            .build_cartesian_2d(0.0..side, 0.0..side)
            .map_err(draw_err)?;

        // Row 0 is drawn at the top.
        let cell_y = |row: usize| (n - 1 - row) as f64;
        let cells = || (0..n).flat_map(move |row| (0..n).map(move |col| (row, col)));

        chart
            .draw_series(cells().map(|(row, col)| {
                let (x, y) = (col as f64, cell_y(row));
                Rectangle::new(
                    [(x, y), (x + 1.0, y + 1.0)],
                    self.colormap.color_for(matrix.get(row, col)).filled(),
                )
            }))
            .map_err(draw_err)?;
        chart
            .draw_series(cells().map(|(row, col)| {
                let (x, y) = (col as f64, cell_y(row));
                Rectangle::new([(x, y), (x + 1.0, y + 1.0)], WHITE.stroke_width(2))
            }))
            .map_err(draw_err)?;

        if !self.text {
            return Ok(());
        }

        let centered = Pos::new(HPos::Center, VPos::Center);
        chart
            .draw_series(cells().map(|(row, col)| {
                let r = matrix.get(row, col);
                let style = (FONT, 14)
                    .into_font()
                    .color(&self.colormap.text_color_for(r))
                    .pos(centered);
                Text::new(
                    format!("{r:.2}"),
                    (col as f64 + 0.5, cell_y(row) + 0.5),
                    style,
                )
            }))
            .map_err(draw_err)?;

        // Column names sit outside the plotting area, so they are drawn on
        // the root area at the pixel positions of the cell centres.
        let below = (FONT, 13)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        let left = (FONT, 13)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        for (i, name) in matrix.names.iter().enumerate() {
            let (px, py) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
            root.draw(&Text::new(name.as_str(), (px, py + 8), below.clone()))
                .map_err(draw_err)?;
            let (px, py) = chart.backend_coord(&(0.0, cell_y(i) + 0.5));
            root.draw(&Text::new(name.as_str(), (px - 8, py), left.clone()))
                .map_err(draw_err)?;
        }
        Ok(())
    }
}

impl PlotRenderer for BitmapRenderer {
    fn render(&mut self, table: &Table, spec: &PlotSpec) -> Result<PathBuf> {
        let (width, height) = (self.width, self.height);
        let mut buf = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            match spec {
                PlotSpec::Relational { x, y, title, .. } => {
                    let points = scatter_points(table, x, y)?;
                    self.draw_relational(&root, &points, x, y, title)?;
                }
                PlotSpec::Categorical {
                    column,
                    bins,
                    title,
                    ..
                } => {
                    let values = table.column(column)?.present_values()?;
                    self.draw_categorical(&root, &values, column, *bins, title)?;
                }
                PlotSpec::Statistical { title, .. } => {
                    self.draw_statistical(&root, table, title)?;
                }
            }
            root.present().map_err(draw_err)?;
        }

        let file = spec.file();
        save_png(file, width, height, buf)?;
        log::info!("Wrote {}", file.display());
        Ok(file.clone())
    }
}

/// Axis range covering every finite value with 5% padding on each side.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return 0.0..1.0;
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
    (lo - pad)..(hi + pad)
}

fn save_png(path: &Path, width: u32, height: u32, buf: Vec<u8>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let image = image::RgbImage::from_raw(width, height, buf)
        .context("pixel buffer does not match image size")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn table() -> Table {
        Table::new(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.5)]),
            Column::numeric("b", vec![Some(2.0), Some(1.0), Some(4.0), Some(3.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn padded_range_handles_degenerate_input() {
        assert_eq!(padded_range(std::iter::empty()), 0.0..1.0);
        assert_eq!(padded_range([2.0].into_iter()), 1.5..2.5);
        let r = padded_range([0.0, 10.0].into_iter());
        assert_eq!(r, -0.5..10.5);
    }

    #[test]
    fn writes_all_three_charts_without_a_font() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = BitmapRenderer::new(160, 120);
        assert!(!renderer.has_text());

        let specs = [
            PlotSpec::Relational {
                x: "a".into(),
                y: "b".into(),
                title: "a vs b".into(),
                file: dir.path().join("relational_plot.png"),
            },
            PlotSpec::Statistical {
                title: "heat".into(),
                file: dir.path().join("statistical_plot.png"),
            },
            PlotSpec::Categorical {
                column: "a".into(),
                bins: 20,
                title: "a".into(),
                file: dir.path().join("nested/categorical_plot.png"),
            },
        ];
        for spec in &specs {
            let written = renderer.render(&table(), spec).unwrap();
            assert_eq!(&written, spec.file());
            let img = image::open(&written).unwrap();
            assert_eq!((img.width(), img.height()), (160, 120));
        }
    }

    #[test]
    fn writes_all_three_charts_with_text() {
        let Some(font) = AnalysisConfig::default().resolve_font() else {
            return;
        };
        let mut renderer = BitmapRenderer::new(400, 300).with_font_file(&font).unwrap();
        assert!(renderer.has_text());

        let dir = tempfile::tempdir().unwrap();
        let specs = [
            PlotSpec::Relational {
                x: "a".into(),
                y: "b".into(),
                title: "a vs b".into(),
                file: dir.path().join("relational_plot.png"),
            },
            PlotSpec::Statistical {
                title: "HeatMap".into(),
                file: dir.path().join("statistical_plot.png"),
            },
            PlotSpec::Categorical {
                column: "a".into(),
                bins: 4,
                title: "a".into(),
                file: dir.path().join("categorical_plot.png"),
            },
        ];
        for spec in &specs {
            let written = renderer.render(&table(), spec).unwrap();
            let img = image::open(&written).unwrap();
            assert_eq!((img.width(), img.height()), (400, 300));
        }
    }

    #[test]
    fn unknown_column_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("x.png");
        let mut renderer = BitmapRenderer::new(50, 50);
        let spec = PlotSpec::Categorical {
            column: "missing".into(),
            bins: 5,
            title: String::new(),
            file: file.clone(),
        };
        assert!(renderer.render(&table(), &spec).is_err());
        assert!(!file.exists());
    }

    #[test]
    fn heatmap_needs_numeric_columns() {
        let dir = tempfile::tempdir().unwrap();
        let empty = Table::new(vec![Column::categorical("s", vec![Some("x".into())])]).unwrap();
        let spec = PlotSpec::Statistical {
            title: String::new(),
            file: dir.path().join("h.png"),
        };
        assert!(BitmapRenderer::new(50, 50).render(&empty, &spec).is_err());
    }

    #[test]
    fn unreadable_font_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("font.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        assert!(BitmapRenderer::new(10, 10).with_font_file(&bogus).is_err());
        assert!(BitmapRenderer::new(10, 10)
            .with_font_file(&dir.path().join("absent.ttf"))
            .is_err());
    }
}
