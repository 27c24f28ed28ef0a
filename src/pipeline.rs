use std::io::Write;

use anyhow::{Context, Result};

use crate::config::AnalysisConfig;
use crate::data::loader::load_file;
use crate::data::model::Table;
use crate::data::preprocess::preprocess;
use crate::plot::{PlotRenderer, PlotSpec};
use crate::report::write_report;
use crate::stats::moments::{compute_moments, MomentSet};
use crate::stats::shape::ShapeLabel;

// ---------------------------------------------------------------------------
// Session – the state of one run
// ---------------------------------------------------------------------------

/// Owns the cleaned table for the duration of a run; every stage borrows it.
pub struct Session<'c> {
    pub config: &'c AnalysisConfig,
    pub table: Table,
}

/// What a completed run computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub moments: MomentSet,
    pub shape: ShapeLabel,
}

impl<'c> Session<'c> {
    /// Load the configured input and preprocess it, printing the inspection
    /// summaries to `out`.
    pub fn open(config: &'c AnalysisConfig, out: &mut dyn Write) -> Result<Self> {
        let raw = load_file(&config.input)?;
        Self::from_raw(config, &raw, out)
    }

    /// Preprocess an already loaded table.
    pub fn from_raw(config: &'c AnalysisConfig, raw: &Table, out: &mut dyn Write) -> Result<Self> {
        let table = preprocess(raw, config.sample_rows, out)?;
        Ok(Session { config, table })
    }

    /// The three charts, in the order they are drawn.
    pub fn plot_specs(&self) -> [PlotSpec; 3] {
        let c = self.config;
        [
            PlotSpec::Relational {
                x: c.relational.x.clone(),
                y: c.relational.y.clone(),
                title: format!("{} vs {}", c.relational.x, c.relational.y),
                file: c.output_path(&c.relational.file),
            },
            PlotSpec::Statistical {
                title: c.statistical.title.clone(),
                file: c.output_path(&c.statistical.file),
            },
            PlotSpec::Categorical {
                column: c.categorical.column.clone(),
                bins: c.categorical.bins,
                title: c.categorical.column.clone(),
                file: c.output_path(&c.categorical.file),
            },
        ]
    }

    pub fn render_plots(&self, renderer: &mut dyn PlotRenderer) -> Result<()> {
        for spec in self.plot_specs() {
            renderer
                .render(&self.table, &spec)
                .with_context(|| format!("rendering {}", spec.file().display()))?;
        }
        Ok(())
    }

    /// Compute moments of the configured attribute and write the report.
    pub fn analyse(&self, out: &mut dyn Write) -> Result<Outcome> {
        let attribute = &self.config.attribute;
        let moments = compute_moments(&self.table, attribute)
            .with_context(|| format!("analysing attribute '{attribute}'"))?;
        log::debug!("{attribute}: {moments:?}");
        write_report(out, attribute, &moments).context("writing report")?;
        Ok(Outcome {
            moments,
            shape: ShapeLabel::of(&moments),
        })
    }
}

/// Run the whole pipeline once: load, preprocess, plot, analyse, report.
/// The first failing stage aborts the rest.
pub fn run(
    config: &AnalysisConfig,
    renderer: &mut dyn PlotRenderer,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let session = Session::open(config, out)?;
    session.render_plots(renderer)?;
    session.analyse(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::data::loader::parse_csv_str;
    use crate::stats::shape::{KurtosisLabel, SkewLabel};

    const IRIS: &str = "\
Id,SepalLengthCm,SepalWidthCm,PetalLengthCm,PetalWidthCm,Species
1,5.1,3.5,1.4,0.2,Iris-setosa
2,4.9,3.0,1.4,0.2,Iris-setosa
3,4.7,3.2,1.3,0.2,Iris-setosa
4,4.6,3.1,1.5,0.2,Iris-setosa
5,5.0,3.6,1.4,0.2,Iris-setosa
6,5.4,3.9,1.7,0.4,Iris-setosa
7,6.0,,4.0,1.3,Iris-versicolor
";

    /// Records requests instead of drawing.
    #[derive(Default)]
    struct RecordingRenderer {
        rendered: Vec<PlotSpec>,
        row_counts: Vec<usize>,
    }

    impl PlotRenderer for RecordingRenderer {
        fn render(&mut self, table: &Table, spec: &PlotSpec) -> Result<PathBuf> {
            self.rendered.push(spec.clone());
            self.row_counts.push(table.row_count());
            Ok(spec.file().clone())
        }
    }

    struct FailingRenderer;

    impl PlotRenderer for FailingRenderer {
        fn render(&mut self, _: &Table, _: &PlotSpec) -> Result<PathBuf> {
            anyhow::bail!("backend unavailable")
        }
    }

    fn session_run(
        config: &AnalysisConfig,
        renderer: &mut dyn PlotRenderer,
    ) -> (Result<Outcome>, String) {
        let raw = parse_csv_str(IRIS).unwrap();
        let mut out = Vec::new();
        let result = Session::from_raw(config, &raw, &mut out).and_then(|s| {
            s.render_plots(renderer)?;
            s.analyse(&mut out)
        });
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn end_to_end_sepal_length() {
        let config = AnalysisConfig::default();
        let mut renderer = RecordingRenderer::default();
        let (result, text) = session_run(&config, &mut renderer);
        let outcome = result.unwrap();

        // Row 7 is missing SepalWidthCm, so only the six setosa rows remain.
        assert_eq!(renderer.row_counts, vec![6, 6, 6]);
        assert!((outcome.moments.mean - 4.95).abs() < 1e-12);
        assert!((outcome.moments.stddev - 0.289).abs() < 1e-3);
        assert_eq!(outcome.shape.skew, SkewLabel::NotSkewed);
        assert_eq!(outcome.shape.kurtosis, KurtosisLabel::Platykurtic);

        assert!(text.contains("For the attribute SepalLengthCm:"));
        assert!(text.contains(
            "Mean = 4.95, Standard Deviation = 0.29, Skewness = 0.33, and Excess Kurtosis = -0.89."
        ));
        assert!(text.contains("The data was not skewed and platykurtic."));
    }

    #[test]
    fn plots_are_requested_in_order() {
        let config = AnalysisConfig::default();
        let mut renderer = RecordingRenderer::default();
        session_run(&config, &mut renderer).0.unwrap();

        let files: Vec<PathBuf> = renderer.rendered.iter().map(|s| s.file().clone()).collect();
        assert_eq!(
            files,
            vec![
                PathBuf::from("./relational_plot.png"),
                PathBuf::from("./statistical_plot.png"),
                PathBuf::from("./categorical_plot.png"),
            ]
        );
        assert!(matches!(
            &renderer.rendered[2],
            PlotSpec::Categorical { bins: 20, column, .. } if column == "SepalWidthCm"
        ));
    }

    #[test]
    fn console_output_is_idempotent() {
        let config = AnalysisConfig::default();
        let (first, a) = session_run(&config, &mut RecordingRenderer::default());
        let (second, b) = session_run(&config, &mut RecordingRenderer::default());
        assert_eq!(a, b);
        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn missing_attribute_is_fatal() {
        let config = AnalysisConfig {
            attribute: "Species".into(),
            ..Default::default()
        };
        let (result, text) = session_run(&config, &mut RecordingRenderer::default());
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("column 'Species' not found"), "{err:#}");
        assert!(!text.contains("For the attribute"));
    }

    #[test]
    fn renderer_failure_aborts_before_the_report() {
        let config = AnalysisConfig::default();
        let (result, text) = session_run(&config, &mut FailingRenderer);
        assert!(result.is_err());
        assert!(text.contains("Data Summary:"));
        assert!(!text.contains("For the attribute"));
    }

    #[test]
    fn run_reads_the_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.csv");
        std::fs::write(&input, IRIS).unwrap();
        let config = AnalysisConfig {
            input,
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let mut renderer = RecordingRenderer::default();
        let mut out = Vec::new();
        let outcome = run(&config, &mut renderer, &mut out).unwrap();
        assert_eq!(outcome.shape.skew, SkewLabel::NotSkewed);
        assert_eq!(renderer.rendered[0].file(), &dir.path().join("relational_plot.png"));
    }

    #[test]
    fn run_without_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            input: dir.path().join("data.csv"),
            ..Default::default()
        };
        let mut renderer = RecordingRenderer::default();
        let mut out = Vec::new();
        assert!(run(&config, &mut renderer, &mut out).is_err());
        assert!(renderer.rendered.is_empty());
    }
}
