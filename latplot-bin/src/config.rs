use anyhow::Error;
use latplot_chart::{ChartStyle, DEFAULT_TITLE};
use serde::Deserialize;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_OUTPUT: &str = "latency_plot.png";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub output: Option<String>,
    pub width_inches: Option<f32>,
    pub height_inches: Option<f32>,
    pub dpi: Option<u32>,
    pub font: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub output: PathBuf,
    pub style: ChartStyle,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be a positive number, got {1}")]
    NonPositive(&'static str, f32),
    #[error("dpi must be at least 1")]
    ZeroDpi,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            output: DEFAULT_OUTPUT.into(),
            style: ChartStyle::default(),
        }
    }
}

fn positive(name: &'static str, value: Option<f32>, default: f32) -> Result<f32, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) if v > 0.0 && v.is_finite() => Ok(v),
        Some(v) => Err(ConfigError::NonPositive(name, v)),
    }
}

impl Config {
    fn fill_defaults(unresolved: FileConfig, parent: &Path) -> Result<Config, Error> {
        let defaults = ChartStyle::default();
        let dpi = match unresolved.dpi {
            Some(0) => return Err(ConfigError::ZeroDpi.into()),
            Some(dpi) => dpi,
            None => defaults.dpi,
        };
        let style = ChartStyle {
            width_inches: positive("width_inches", unresolved.width_inches, defaults.width_inches)?,
            height_inches: positive(
                "height_inches",
                unresolved.height_inches,
                defaults.height_inches,
            )?,
            dpi,
            title: unresolved.title.unwrap_or_else(|| DEFAULT_TITLE.into()),
            font: unresolved.font.map(|f| parent.join(f)),
        };
        let output = unresolved
            .output
            .map(|o| parent.join(o))
            .unwrap_or_else(|| DEFAULT_OUTPUT.into());
        Ok(Config { output, style })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let mut f = File::open(path.as_ref())?;
        let mut contents = String::new();
        f.read_to_string(&mut contents)?;
        let config: FileConfig = toml::from_str(&contents)?;
        let p = path.as_ref().parent().unwrap_or_else(|| Path::new("."));
        Config::fill_defaults(config, &p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("latplot.toml");
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn empty_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(write_config(dir.path(), "")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.style.dpi, 300);
        assert_eq!(config.output, PathBuf::from("latency_plot.png"));
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "output = \"out/plot.png\"\nfont = \"fonts/Sans.ttf\"\ndpi = 150\ntitle = \"Checkout\"\n",
        );
        let config = Config::load(path).unwrap();
        assert_eq!(config.output, dir.path().join("out/plot.png"));
        assert_eq!(config.style.font, Some(dir.path().join("fonts/Sans.ttf")));
        assert_eq!(config.style.dpi, 150);
        assert_eq!(config.style.title, "Checkout");
        assert_eq!(config.style.width_inches, 10.0);
    }

    #[test]
    fn rejects_zero_dpi() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(write_config(dir.path(), "dpi = 0\n")).unwrap_err();
        assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::ZeroDpi)));
    }

    #[test]
    fn rejects_non_positive_size() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(write_config(dir.path(), "height_inches = -2.0\n")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NonPositive("height_inches", _))
        ));
    }

    #[test]
    fn rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(write_config(dir.path(), "colour = \"red\"\n")).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(dir.path().join("absent.toml")).is_err());
    }
}
