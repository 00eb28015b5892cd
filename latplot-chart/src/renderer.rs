use crate::canvas::Canvas;
use crate::chart;
use crate::font;
use crate::style::ChartStyle;
use image::{DynamicImage, ImageError, ImageFormat};
use latplot_report::LatencyReport;
use slog::{debug, error, info};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No latency data to plot")]
    EmptyData,
    #[error("Could not load font {0}")]
    Font(String),
    #[error("Could not allocate a {0}x{1} canvas")]
    Canvas(u32, u32),
    #[error("Unsupported output image {path}: {source}")]
    Format {
        path: String,
        #[source]
        source: ImageError,
    },
    #[error("Could not encode image: {0}")]
    Encode(#[from] ImageError),
    #[error("Could not write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Turns a `LatencyReport` into a two-panel chart image.
pub struct Renderer {
    style: ChartStyle,
    logger: slog::Logger,
}

impl Renderer {
    pub fn new(style: ChartStyle, logger: slog::Logger) -> Renderer {
        Renderer { style, logger }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Draws the chart in memory.
    pub fn draw(&self, report: &LatencyReport) -> Result<DynamicImage, RenderError> {
        self.check_data(report)?;
        self.draw_checked(report)
    }

    fn draw_checked(&self, report: &LatencyReport) -> Result<DynamicImage, RenderError> {
        let font = font::load(self.style.font.as_deref(), &self.logger)?;
        let (w, h) = self.style.pixel_size();
        debug!(self.logger, "drawing chart"; "width" => w, "height" => h, "dpi" => self.style.dpi);
        let mut canvas = Canvas::new(w, h, Some(font)).ok_or(RenderError::Canvas(w, h))?;
        chart::draw(&mut canvas, &self.style, report);
        canvas.into_image().ok_or(RenderError::Canvas(w, h))
    }

    /// Draws the chart and writes it to `output`, in the format its extension
    /// names. Nothing is written unless the whole image encodes.
    pub fn render<P: AsRef<Path>>(&self, report: &LatencyReport, output: P) -> Result<PathBuf, RenderError> {
        let output = output.as_ref();
        self.check_data(report)?;
        let format = ImageFormat::from_path(output).map_err(|source| RenderError::Format {
            path: output.display().to_string(),
            source,
        })?;
        let image = self.draw_checked(report)?;
        let io_err = |source: io::Error| RenderError::Io {
            path: output.display().to_string(),
            source,
        };
        let dir = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            image.write_to(&mut writer, format)?;
            writer.flush().map_err(io_err)?;
        }
        tmp.persist(output).map_err(|e| io_err(e.error))?;
        info!(self.logger, "chart written"; "path" => %output.display());
        Ok(output.to_path_buf())
    }

    fn check_data(&self, report: &LatencyReport) -> Result<(), RenderError> {
        if report.percentiles().is_empty() {
            error!(self.logger, "No latency data to plot");
            return Err(RenderError::EmptyData);
        }
        Ok(())
    }
}
