use std::path::PathBuf;

pub const DEFAULT_TITLE: &str = "Latency Distribution";

/// Figure geometry and text settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub width_inches: f32,
    pub height_inches: f32,
    pub dpi: u32,
    pub title: String,
    /// Font file to use instead of probing the usual system locations.
    pub font: Option<PathBuf>,
}

impl Default for ChartStyle {
    fn default() -> ChartStyle {
        ChartStyle {
            width_inches: 10.0,
            height_inches: 8.0,
            dpi: 300,
            title: DEFAULT_TITLE.into(),
            font: None,
        }
    }
}

impl ChartStyle {
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |inches: f32| (inches * self.dpi as f32).round().max(1.0) as u32;
        (px(self.width_inches), px(self.height_inches))
    }

    /// Converts typographic points to pixels at this style's resolution.
    pub fn pt(&self, points: f32) -> f32 {
        points * self.dpi as f32 / 72.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ten_by_eight_at_300_dpi() {
        let style = ChartStyle::default();
        assert_eq!(style.pixel_size(), (3000, 2400));
        assert_eq!(style.pt(72.0), 300.0);
    }
}
