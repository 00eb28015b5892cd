mod canvas;
mod chart;
mod font;
mod renderer;
mod scale;
mod style;

pub use self::renderer::{RenderError, Renderer};
pub use self::style::{ChartStyle, DEFAULT_TITLE};
