use crate::RenderError;
use rusttype::Font;
use slog::{debug, info};
use std::fs;
use std::path::Path;

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BUNDLED_NAME: &str = "DejaVuSans.ttf (bundled)";
static BUNDLED: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

/// Loads the configured font, else the first usable system font, else the
/// copy of DejaVu Sans compiled into the crate.
///
/// A configured font that cannot be loaded is an error.
pub fn load(explicit: Option<&Path>, logger: &slog::Logger) -> Result<Font<'static>, RenderError> {
    load_from(explicit, SYSTEM_FONTS, logger)
}

fn load_from(
    explicit: Option<&Path>,
    candidates: &[&str],
    logger: &slog::Logger,
) -> Result<Font<'static>, RenderError> {
    if let Some(path) = explicit {
        return read_font(path).ok_or_else(|| RenderError::Font(path.display().to_string()));
    }
    for candidate in candidates {
        if let Some(font) = read_font(Path::new(candidate)) {
            debug!(logger, "loaded font"; "path" => candidate);
            return Ok(font);
        }
    }
    info!(logger, "no system font found, using bundled font");
    bundled()
}

fn bundled() -> Result<Font<'static>, RenderError> {
    Font::try_from_bytes(BUNDLED).ok_or_else(|| RenderError::Font(BUNDLED_NAME.into()))
}

fn read_font(path: &Path) -> Option<Font<'static>> {
    fs::read(path).ok().and_then(Font::try_from_vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog::{o, Discard, Logger};

    fn logger() -> Logger {
        Logger::root(Discard, o!())
    }

    #[test]
    fn falls_back_to_bundled_font() {
        let font = load_from(None, &["/nonexistent/font.ttf"], &logger()).unwrap();
        assert!(font.glyph_count() > 100);
    }

    #[test]
    fn bundled_font_has_glyphs_for_labels() {
        let font = bundled().unwrap();
        for c in "P99: 150.2ms Latency (ms) Requests/sec: 1,000".chars() {
            assert_ne!(font.glyph(c).id().0, 0, "missing glyph for {:?}", c);
        }
    }

    #[test]
    fn configured_font_is_not_replaced() {
        let err = load_from(Some(Path::new("/nonexistent/font.ttf")), &[], &logger()).unwrap_err();
        assert!(matches!(err, RenderError::Font(_)));
    }
}
