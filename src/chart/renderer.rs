use super::canvas::{Canvas, TextAlign, TextStyle};
use crate::models::PricePoint;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 200;

const PADDING_X: f64 = 30.0;
const PADDING_Y: f64 = 20.0;
/// Half-width of the range invented for flat or single-point series.
const SYNTHETIC_PADDING: f64 = 10.0;
const POINT_RADIUS: f64 = 4.0;
const LINE_WIDTH: f64 = 2.0;
const DATE_LABEL_OFFSET: f64 = 15.0;
const PRICE_LABEL_GAP: f64 = 5.0;

const LABEL_STYLE: TextStyle = TextStyle {
    font_family: "Arial",
    font_size: 12.0,
    color: "#64748B",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartColors {
    pub stroke: &'static str,
    pub fill: &'static str,
}

impl ChartColors {
    pub fn for_trend(is_positive: bool) -> Self {
        if is_positive {
            ChartColors {
                stroke: "#10B981",
                fill: "rgba(16, 185, 129, 0.1)",
            }
        } else {
            ChartColors {
                stroke: "#EF4444",
                fill: "rgba(239, 68, 68, 0.1)",
            }
        }
    }
}

/// Vertical extent of a series, widened so it never has zero height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    pub min: f64,
    pub max: f64,
    pub all_zero: bool,
}

impl PriceScale {
    /// `None` for an empty series.
    pub fn from_points(points: &[PricePoint]) -> Option<Self> {
        let first = points.first()?.price;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(p.price), hi.max(p.price)));

        if points.len() == 1 || min == max {
            if min == 0.0 && points.len() > 1 {
                return Some(PriceScale {
                    min: 0.0,
                    max: 1.0,
                    all_zero: true,
                });
            }
            return Some(PriceScale {
                min: min - SYNTHETIC_PADDING,
                max: max + SYNTHETIC_PADDING,
                all_zero: false,
            });
        }

        Some(PriceScale {
            min,
            max,
            all_zero: false,
        })
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Clears `canvas` and draws `data` as a filled line chart.
///
/// An empty series is a no-op: the surface is not even cleared. The
/// colours follow `is_positive`, not the slope of the data.
pub fn render_price_chart<C: Canvas + ?Sized>(canvas: &mut C, data: &[PricePoint], is_positive: bool) {
    let Some(scale) = PriceScale::from_points(data) else {
        return;
    };

    canvas.clear();

    let chart_width = canvas.width() - PADDING_X * 2.0;
    let chart_height = canvas.height() - PADDING_Y * 2.0;
    let baseline = PADDING_Y + chart_height;
    let colors = ChartColors::for_trend(is_positive);

    if data.len() == 1 {
        let x = PADDING_X + chart_width / 2.0;
        let y = PADDING_Y + chart_height / 2.0;
        canvas.fill_circle(x, y, POINT_RADIUS, colors.stroke);

        draw_price_labels(canvas, &scale, chart_height);
        canvas.fill_text(
            &data[0].date,
            x,
            baseline + DATE_LABEL_OFFSET,
            TextAlign::Center,
            &LABEL_STYLE,
        );
        return;
    }

    let last_index = (data.len() - 1) as f64;
    let points: Vec<(f64, f64)> = data
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let x = PADDING_X + (index as f64 / last_index) * chart_width;
            let y = baseline - ((entry.price - scale.min) / scale.range()) * chart_height;
            (x, y)
        })
        .collect();

    canvas.begin_path();
    for (index, (x, y)) in points.iter().enumerate() {
        if index == 0 {
            canvas.move_to(*x, *y);
        } else {
            canvas.line_to(*x, *y);
        }
    }
    canvas.stroke(colors.stroke, LINE_WIDTH);

    let (first_x, _) = points[0];
    let (last_x, _) = points[points.len() - 1];
    canvas.line_to(last_x, baseline);
    canvas.line_to(first_x, baseline);
    canvas.close_path();
    canvas.fill(colors.fill);

    draw_price_labels(canvas, &scale, chart_height);

    let label_y = baseline + DATE_LABEL_OFFSET;
    canvas.fill_text(&data[0].date, first_x, label_y, TextAlign::Center, &LABEL_STYLE);
    canvas.fill_text(
        &data[data.len() - 1].date,
        last_x,
        label_y,
        TextAlign::Center,
        &LABEL_STYLE,
    );
}

fn draw_price_labels<C: Canvas + ?Sized>(canvas: &mut C, scale: &PriceScale, chart_height: f64) {
    let x = PADDING_X - PRICE_LABEL_GAP;

    if scale.all_zero {
        canvas.fill_text(
            &format_price(0.0),
            x,
            PADDING_Y + chart_height / 2.0,
            TextAlign::Right,
            &LABEL_STYLE,
        );
        return;
    }

    canvas.fill_text(
        &format_price(scale.min),
        x,
        PADDING_Y + chart_height,
        TextAlign::Right,
        &LABEL_STYLE,
    );
    canvas.fill_text(&format_price(scale.max), x, PADDING_Y, TextAlign::Right, &LABEL_STYLE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::canvas::{DrawOp, RecordingCanvas};

    fn canvas() -> RecordingCanvas {
        RecordingCanvas::new(DEFAULT_WIDTH as f64, DEFAULT_HEIGHT as f64)
    }

    #[test]
    fn test_empty_series_draws_nothing() {
        let mut canvas = canvas();
        render_price_chart(&mut canvas, &[], true);
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_single_point_draws_one_centered_circle() {
        let mut canvas = canvas();
        render_price_chart(&mut canvas, &[PricePoint::new("d1", 5.0)], true);

        let circles = canvas.circles();
        assert_eq!(circles.len(), 1);
        match circles[0] {
            DrawOp::Circle { x, y, color, .. } => {
                assert_eq!(*x, 400.0);
                assert_eq!(*y, 100.0);
                assert_eq!(color, "#10B981");
            }
            other => panic!("unexpected op {:?}", other),
        }
        assert!(canvas.stroked_points().is_empty());
        assert_eq!(canvas.texts(), vec!["$-5.00", "$15.00", "d1"]);
    }

    #[test]
    fn test_flat_series_renders_at_mid_height() {
        let mut canvas = canvas();
        let data = [PricePoint::new("d1", 5.0), PricePoint::new("d2", 5.0)];
        render_price_chart(&mut canvas, &data, true);

        let points = canvas.stroked_points();
        assert_eq!(points, vec![(30.0, 100.0), (770.0, 100.0)]);
        assert_eq!(canvas.texts(), vec!["$-5.00", "$15.00", "d1", "d2"]);
        assert!(canvas.circles().is_empty());
    }

    #[test]
    fn test_all_zero_series_uses_unit_range() {
        let mut canvas = canvas();
        let data = [PricePoint::new("d1", 0.0), PricePoint::new("d2", 0.0)];
        render_price_chart(&mut canvas, &data, false);

        let points = canvas.stroked_points();
        assert!(points.iter().all(|(_, y)| y.is_finite()));
        assert_eq!(points[0].1, 180.0);

        let zero_label = canvas.ops.iter().find_map(|op| match op {
            DrawOp::Text { text, y, .. } if text == "$0.00" => Some(*y),
            _ => None,
        });
        assert_eq!(zero_label, Some(100.0));
        assert_eq!(canvas.texts().len(), 3);
    }

    #[test]
    fn test_normal_series_scales_between_min_and_max() {
        let mut canvas = canvas();
        let data = [
            PricePoint::new("10/1", 100.0),
            PricePoint::new("10/2", 150.0),
            PricePoint::new("10/3", 200.0),
        ];
        render_price_chart(&mut canvas, &data, true);

        let points = canvas.stroked_points();
        assert_eq!(points, vec![(30.0, 180.0), (400.0, 100.0), (770.0, 20.0)]);
        assert_eq!(canvas.texts(), vec!["$100.00", "$200.00", "10/1", "10/3"]);
        assert_eq!(canvas.ops[0], DrawOp::Clear);
    }

    #[test]
    fn test_colors_follow_flag_not_slope() {
        let mut canvas = canvas();
        let rising = [PricePoint::new("a", 1.0), PricePoint::new("b", 2.0)];
        render_price_chart(&mut canvas, &rising, false);

        assert!(canvas.ops.contains(&DrawOp::Stroke {
            color: "#EF4444".to_string(),
            line_width: 2.0,
        }));
        assert!(canvas.ops.contains(&DrawOp::Fill {
            color: "rgba(239, 68, 68, 0.1)".to_string(),
        }));
    }

    #[test]
    fn test_fill_closes_along_baseline() {
        let mut canvas = canvas();
        let data = [PricePoint::new("a", 1.0), PricePoint::new("b", 3.0)];
        render_price_chart(&mut canvas, &data, true);

        let stroke_at = canvas
            .ops
            .iter()
            .position(|op| matches!(op, DrawOp::Stroke { .. }))
            .unwrap();
        assert_eq!(canvas.ops[stroke_at + 1], DrawOp::LineTo(770.0, 180.0));
        assert_eq!(canvas.ops[stroke_at + 2], DrawOp::LineTo(30.0, 180.0));
        assert_eq!(canvas.ops[stroke_at + 3], DrawOp::ClosePath);
    }
}
