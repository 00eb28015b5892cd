use image::{DynamicImage, RgbaImage};
use rusttype::{point, Font, Scale};
use tiny_skia::{
    Color, FillRule, Paint, Path, PathBuilder, Pixmap, PremultipliedColorU8, Rect, Stroke,
    StrokeDash, Transform,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Text direction. `Vertical` is rotated 90° counter-clockwise and reads
/// bottom to top; alignment is then relative to the rotated text box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
    /// Dash and gap lengths; solid when `None`.
    pub dash: Option<(f32, f32)>,
}

impl LineStyle {
    pub fn solid(color: Color, width: f32) -> LineStyle {
        LineStyle {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f32, dash: f32, gap: f32) -> LineStyle {
        LineStyle {
            color,
            width,
            dash: Some((dash, gap)),
        }
    }
}

/// Raster drawing surface with optional text support.
pub struct Canvas {
    pixmap: Pixmap,
    font: Option<Font<'static>>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, font: Option<Font<'static>>) -> Option<Canvas> {
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(Color::WHITE);
        Some(Canvas { pixmap, font })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn polyline(&mut self, points: &[(f32, f32)], style: LineStyle) {
        let mut pb = PathBuilder::new();
        let mut iter = points.iter();
        if let Some(&(x, y)) = iter.next() {
            pb.move_to(x, y);
        }
        for &(x, y) in iter {
            pb.line_to(x, y);
        }
        if let Some(path) = pb.finish() {
            self.stroke(&path, style);
        }
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), style: LineStyle) {
        self.polyline(&[from, to], style);
    }

    pub fn circle(&mut self, center: (f32, f32), radius: f32, color: Color) {
        if let Some(path) = PathBuilder::from_circle(center.0, center.1, radius) {
            self.fill(&path, color);
        }
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, style: LineStyle) {
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            self.stroke(&PathBuilder::from_rect(rect), style);
        }
    }

    pub fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, fill: Color, edge: LineStyle) {
        let r = radius.min(w / 2.0).min(h / 2.0);
        let mut pb = PathBuilder::new();
        pb.move_to(x + r, y);
        pb.line_to(x + w - r, y);
        pb.quad_to(x + w, y, x + w, y + r);
        pb.line_to(x + w, y + h - r);
        pb.quad_to(x + w, y + h, x + w - r, y + h);
        pb.line_to(x + r, y + h);
        pb.quad_to(x, y + h, x, y + h - r);
        pb.line_to(x, y + r);
        pb.quad_to(x, y, x + r, y);
        pb.close();
        if let Some(path) = pb.finish() {
            self.fill(&path, fill);
            self.stroke(&path, edge);
        }
    }

    fn fill(&mut self, path: &Path, color: Color) {
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke(&mut self, path: &Path, style: LineStyle) {
        let mut paint = Paint::default();
        paint.set_color(style.color);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: style.width,
            dash: style
                .dash
                .and_then(|(dash, gap)| StrokeDash::new(vec![dash, gap], 0.0)),
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }

    /// Width and height of `text` set at `size` pixels. Without a font the
    /// size is estimated so layout still leaves room for it.
    pub fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        match self.font {
            Some(ref font) => {
                let scale = Scale::uniform(size);
                let v = font.v_metrics(scale);
                let width = font
                    .layout(text, scale, point(0.0, 0.0))
                    .last()
                    .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                    .unwrap_or(0.0);
                (width, v.ascent - v.descent)
            }
            None => (text.chars().count() as f32 * size * 0.5, size),
        }
    }

    /// Draws `text` anchored at `(x, y)`. A no-op without a font.
    pub fn text(
        &mut self,
        text: &str,
        anchor: (f32, f32),
        size: f32,
        color: Color,
        align: (HAlign, VAlign),
        orientation: Orientation,
    ) {
        let font = match self.font {
            Some(ref font) => font,
            None => return,
        };
        let scale = Scale::uniform(size);
        let ascent = font.v_metrics(scale).ascent;
        let glyphs: Vec<_> = font.layout(text, scale, point(0.0, ascent)).collect();
        let (w, h) = self.measure(text, size);
        let du = match align.0 {
            HAlign::Left => 0.0,
            HAlign::Center => -w / 2.0,
            HAlign::Right => -w,
        };
        let dv = match align.1 {
            VAlign::Top => 0.0,
            VAlign::Center => -h / 2.0,
            VAlign::Bottom => -h,
        };
        let (width, height) = (self.pixmap.width() as i64, self.pixmap.height() as i64);
        let pixels = self.pixmap.pixels_mut();
        for glyph in glyphs {
            let bb = match glyph.pixel_bounding_box() {
                Some(bb) => bb,
                None => continue,
            };
            glyph.draw(|gx, gy, coverage| {
                // Position in the unrotated text box, relative to the anchor.
                let u = bb.min.x as f32 + gx as f32 + du;
                let v = bb.min.y as f32 + gy as f32 + dv;
                let (px, py) = match orientation {
                    Orientation::Horizontal => (anchor.0 + u, anchor.1 + v),
                    Orientation::Vertical => (anchor.0 + v, anchor.1 - u),
                };
                let (px, py) = (px.round() as i64, py.round() as i64);
                if px < 0 || py < 0 || px >= width || py >= height {
                    return;
                }
                let idx = (py * width + px) as usize;
                pixels[idx] = blend(pixels[idx], color, coverage);
            });
        }
    }

    /// Straight RGB of the pixel at `(x, y)`.
    #[cfg(test)]
    pub(crate) fn rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some((c.red(), c.green(), c.blue()))
    }

    pub fn into_image(self) -> Option<DynamicImage> {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        // The background is opaque, so premultiplied and straight alpha agree.
        let rgba = RgbaImage::from_raw(w, h, self.pixmap.take())?;
        Some(DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()))
    }
}

fn blend(dst: PremultipliedColorU8, color: Color, coverage: f32) -> PremultipliedColorU8 {
    let sa = (color.alpha() * coverage).max(0.0).min(1.0);
    let mix = |src: f32, dst: u8| src * sa * 255.0 + dst as f32 * (1.0 - sa);
    let a = (sa * 255.0 + dst.alpha() as f32 * (1.0 - sa)).round().min(255.0) as u8;
    let channel = |src: f32, dst: u8| (mix(src, dst).round() as u8).min(a);
    PremultipliedColorU8::from_rgba(
        channel(color.red(), dst.red()),
        channel(color.green(), dst.green()),
        channel(color.blue(), dst.blue()),
        a,
    )
    .unwrap_or(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_full_coverage_replaces_pixel() {
        let white = PremultipliedColorU8::from_rgba(255, 255, 255, 255).unwrap();
        let out = blend(white, Color::BLACK, 1.0);
        assert_eq!((out.red(), out.green(), out.blue(), out.alpha()), (0, 0, 0, 255));
    }

    #[test]
    fn blend_zero_coverage_keeps_pixel() {
        let white = PremultipliedColorU8::from_rgba(255, 255, 255, 255).unwrap();
        let out = blend(white, Color::BLACK, 0.0);
        assert_eq!(out, white);
    }

    #[test]
    fn measure_estimates_without_font() {
        let canvas = Canvas::new(10, 10, None).unwrap();
        assert_eq!(canvas.measure("abcd", 10.0), (20.0, 10.0));
    }

    #[test]
    fn image_has_canvas_size() {
        let canvas = Canvas::new(40, 30, None).unwrap();
        let img = canvas.into_image().unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
    }
}
