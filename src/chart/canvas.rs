#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: &'static str,
    pub font_size: f64,
    pub color: &'static str,
}

/// Immediate-mode drawing surface.
///
/// Path semantics follow the usual 2D context: `stroke` and `fill` draw the
/// current path without consuming it, and only `begin_path` starts over.
pub trait Canvas {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn clear(&mut self);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);

    fn stroke(&mut self, color: &str, line_width: f64);
    fn fill(&mut self, color: &str);

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, style: &TextStyle);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    Stroke { color: String, line_width: f64 },
    Fill { color: String },
    Circle { x: f64, y: f64, radius: f64, color: String },
    Text { text: String, x: f64, y: f64, align: TextAlign },
}

/// Canvas that only remembers what was asked of it.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn circles(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Points of the first stroked path.
    pub fn stroked_points(&self) -> Vec<(f64, f64)> {
        let mut points = Vec::new();
        for op in &self.ops {
            match op {
                DrawOp::BeginPath => points.clear(),
                DrawOp::MoveTo(x, y) | DrawOp::LineTo(x, y) => points.push((*x, *y)),
                DrawOp::Stroke { .. } => return points,
                _ => {}
            }
        }
        Vec::new()
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn stroke(&mut self, color: &str, line_width: f64) {
        self.ops.push(DrawOp::Stroke {
            color: color.to_string(),
            line_width,
        });
    }

    fn fill(&mut self, color: &str) {
        self.ops.push(DrawOp::Fill {
            color: color.to_string(),
        });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        self.ops.push(DrawOp::Circle {
            x,
            y,
            radius,
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, _style: &TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            align,
        });
    }
}
