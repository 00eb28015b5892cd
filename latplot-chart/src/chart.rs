use crate::canvas::{Canvas, HAlign, LineStyle, Orientation, VAlign};
use crate::scale::{LinearScale, LogScale};
use crate::style::ChartStyle;
use latplot_report::LatencyReport;
use tiny_skia::Color;

fn curve_color() -> Color {
    Color::from_rgba8(0, 0, 255, 255)
}

fn reference_color() -> Color {
    Color::from_rgba8(255, 0, 0, 128)
}

fn grid_color() -> Color {
    Color::from_rgba8(176, 176, 176, 77)
}

fn box_color() -> Color {
    Color::from_rgba8(211, 211, 211, 204)
}

/// Pixel rectangle of one panel or plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Area {
    fn bottom(&self) -> f32 {
        self.y + self.h
    }

    fn right(&self) -> f32 {
        self.x + self.w
    }
}

/// Font sizes and strokes at the style's resolution.
struct Metrics {
    text: f32,
    title: f32,
    pad: f32,
    tick: f32,
    axis: f32,
    curve: f32,
    marker: f32,
    reference: f32,
}

impl Metrics {
    fn new(style: &ChartStyle) -> Metrics {
        Metrics {
            text: style.pt(10.0),
            title: style.pt(12.0),
            pad: style.pt(6.0),
            tick: style.pt(3.5),
            axis: style.pt(0.8),
            curve: style.pt(2.0),
            marker: style.pt(3.0),
            reference: style.pt(1.5),
        }
    }
}

/// Draws both panels: the percentile curve on top, the summary box below.
pub fn draw(canvas: &mut Canvas, style: &ChartStyle, report: &LatencyReport) {
    let m = Metrics::new(style);
    let (top, bottom) = panels(canvas);
    draw_percentile_panel(canvas, style, &m, top, report);
    draw_summary_panel(canvas, style, &m, bottom, report);
}

fn panels(canvas: &Canvas) -> (Area, Area) {
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let top = Area {
        x: 0.0,
        y: 0.0,
        w,
        h: h / 2.0,
    };
    let bottom = Area {
        x: 0.0,
        y: h / 2.0,
        w,
        h: h / 2.0,
    };
    (top, bottom)
}

/// Plot area and scales of the percentile panel.
struct PercentilePlot {
    plot: Area,
    xs: LinearScale,
    ys: LogScale,
    /// (rank, latency) pairs that can sit on the log axis, ascending by rank.
    points: Vec<(f64, f64)>,
}

fn percentile_plot(
    canvas: &Canvas,
    style: &ChartStyle,
    m: &Metrics,
    panel: Area,
    report: &LatencyReport,
) -> PercentilePlot {
    // Non-positive latencies have no place on a log axis.
    let points: Vec<(f64, f64)> = report
        .percentiles()
        .iter()
        .filter(|p| p.latency_ms() > 0.0)
        .map(|p| (p.rank(), p.latency_ms()))
        .collect();
    let ranks = report.percentiles().iter().map(|p| p.rank());
    let (x_lo, x_hi) = min_max(ranks).unwrap_or((0.0, 100.0));
    let (y_lo, y_hi) = min_max(points.iter().map(|p| p.1)).unwrap_or((1.0, 10.0));

    // Provisional scales to size the tick labels, then the real plot area.
    let y_ticks = LogScale::covering(y_lo, y_hi, 0.0, 1.0).ticks();
    let tick_label_w = y_ticks
        .iter()
        .map(|(_, label)| canvas.measure(label, m.text).0)
        .fold(0.0, f32::max);
    let (_, text_h) = canvas.measure("0", m.text);
    let (_, title_h) = canvas.measure(&style.title, m.title);

    let left = m.pad + text_h + m.pad + tick_label_w + m.pad + m.tick;
    let top = m.pad + title_h + m.pad;
    let bottom = m.tick + m.pad + text_h + m.pad + text_h + m.pad;
    let right = m.pad * 3.0;
    let plot = Area {
        x: panel.x + left,
        y: panel.y + top,
        w: (panel.w - left - right).max(1.0),
        h: (panel.h - top - bottom).max(1.0),
    };

    let xs = LinearScale::padded(x_lo, x_hi, plot.x, plot.right());
    let ys = LogScale::covering(y_lo, y_hi, plot.bottom(), plot.y);
    PercentilePlot {
        plot,
        xs,
        ys,
        points,
    }
}

fn draw_percentile_panel(
    canvas: &mut Canvas,
    style: &ChartStyle,
    m: &Metrics,
    panel: Area,
    report: &LatencyReport,
) {
    let PercentilePlot {
        plot,
        xs,
        ys,
        points,
    } = percentile_plot(canvas, style, m, panel, report);
    let grid = LineStyle::solid(grid_color(), m.axis);
    let axis = LineStyle::solid(Color::BLACK, m.axis);

    for (v, label) in xs.ticks() {
        let x = xs.map(v);
        canvas.line((x, plot.y), (x, plot.bottom()), grid);
        canvas.line((x, plot.bottom()), (x, plot.bottom() + m.tick), axis);
        canvas.text(
            &label,
            (x, plot.bottom() + m.tick + m.pad),
            m.text,
            Color::BLACK,
            (HAlign::Center, VAlign::Top),
            Orientation::Horizontal,
        );
    }
    for (v, label) in ys.ticks() {
        let y = ys.map(v);
        canvas.line((plot.x, y), (plot.right(), y), grid);
        canvas.line((plot.x - m.tick, y), (plot.x, y), axis);
        canvas.text(
            &label,
            (plot.x - m.tick - m.pad, y),
            m.text,
            Color::BLACK,
            (HAlign::Right, VAlign::Center),
            Orientation::Horizontal,
        );
    }
    canvas.stroke_rect(plot.x, plot.y, plot.w, plot.h, axis);

    let pixels: Vec<(f32, f32)> = points
        .iter()
        .map(|&(rank, ms)| (xs.map(rank), ys.map(ms)))
        .collect();
    canvas.polyline(&pixels, LineStyle::solid(curve_color(), m.curve));
    for &p in &pixels {
        canvas.circle(p, m.marker, curve_color());
    }

    let dash = LineStyle::dashed(reference_color(), m.reference, m.reference * 3.7, m.reference * 1.6);
    for p in report.percentiles().canonical() {
        let x = xs.map(p.rank());
        canvas.line((x, plot.y), (x, plot.bottom()), dash);
        let label = p.to_string();
        let (label_w, _) = canvas.measure(&label, m.text);
        let at = if p.latency_ms() > 0.0 {
            ys.map(p.latency_ms())
        } else {
            plot.bottom()
        };
        // Keep the rotated label inside the plot area.
        let start = at.min(plot.bottom()).max(plot.y + label_w);
        canvas.text(
            &label,
            (x, start),
            m.text,
            Color::BLACK,
            (HAlign::Left, VAlign::Top),
            Orientation::Vertical,
        );
    }

    canvas.text(
        &style.title,
        (plot.x + plot.w / 2.0, panel.y + m.pad),
        m.title,
        Color::BLACK,
        (HAlign::Center, VAlign::Top),
        Orientation::Horizontal,
    );
    canvas.text(
        "Percentile",
        (plot.x + plot.w / 2.0, panel.bottom() - m.pad),
        m.text,
        Color::BLACK,
        (HAlign::Center, VAlign::Bottom),
        Orientation::Horizontal,
    );
    canvas.text(
        "Latency (ms)",
        (panel.x + m.pad, plot.y + plot.h / 2.0),
        m.text,
        Color::BLACK,
        (HAlign::Center, VAlign::Top),
        Orientation::Vertical,
    );
}

fn draw_summary_panel(
    canvas: &mut Canvas,
    style: &ChartStyle,
    m: &Metrics,
    panel: Area,
    report: &LatencyReport,
) {
    let size = style.pt(12.0);
    let lines = report.summary_lines();
    let line_h = size * 1.2;
    let text_w = lines
        .iter()
        .map(|l| canvas.measure(l, size).0)
        .fold(0.0, f32::max);
    let pad = m.pad;
    let origin = (panel.x + panel.w * 0.1, panel.y + panel.h * 0.1);
    canvas.rounded_rect(
        origin.0,
        origin.1,
        text_w + pad * 2.0,
        line_h * lines.len() as f32 + pad * 2.0,
        pad,
        box_color(),
        LineStyle::solid(Color::BLACK, m.axis),
    );
    for (i, line) in lines.iter().enumerate() {
        canvas.text(
            line,
            (origin.0 + pad, origin.1 + pad + line_h * i as f32),
            size,
            Color::BLACK,
            (HAlign::Left, VAlign::Top),
            Orientation::Horizontal,
        );
    }
}

fn min_max<I: Iterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
