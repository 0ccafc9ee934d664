use super::canvas::{Canvas, TextAlign, TextStyle};
use std::fmt::Write as _;

/// Canvas that renders to a standalone SVG document.
pub struct SvgCanvas {
    width: f64,
    height: f64,
    path: String,
    elements: Vec<String>,
}

impl SvgCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            path: String::new(),
            elements: Vec::new(),
        }
    }

    pub fn to_svg(&self) -> String {
        let mut out = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
            w = self.width,
            h = self.height
        );
        out.push('\n');
        for element in &self.elements {
            out.push_str("  ");
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Canvas for SvgCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.path.clear();
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.path, "M{:.2} {:.2} ", x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.path, "L{:.2} {:.2} ", x, y);
    }

    fn close_path(&mut self) {
        self.path.push_str("Z ");
    }

    fn stroke(&mut self, color: &str, line_width: f64) {
        self.elements.push(format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            self.path.trim_end(),
            color,
            line_width
        ));
    }

    fn fill(&mut self, color: &str) {
        self.elements.push(format!(
            r#"<path d="{}" fill="{}" stroke="none"/>"#,
            self.path.trim_end(),
            color
        ));
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        self.elements.push(format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}"/>"#,
            x, y, radius, color
        ));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, style: &TextStyle) {
        let anchor = match align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        self.elements.push(format!(
            r#"<text x="{:.2}" y="{:.2}" text-anchor="{}" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
            x,
            y,
            anchor,
            style.font_family,
            style.font_size,
            style.color,
            escape(text)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::render_price_chart;
    use crate::models::PricePoint;

    #[test]
    fn test_renders_line_fill_and_labels() {
        let mut canvas = SvgCanvas::new(800, 300);
        let data = [PricePoint::new("10/24", 2490.0), PricePoint::new("10/25", 2500.0)];
        render_price_chart(&mut canvas, &data, true);

        let svg = canvas.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r##"stroke="#10B981""##));
        assert!(svg.contains("rgba(16, 185, 129, 0.1)"));
        assert!(svg.contains(">$2490.00</text>"));
        assert!(svg.contains(">$2500.00</text>"));
        assert!(svg.contains(">10/25</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_redraw_replaces_previous_content() {
        let mut canvas = SvgCanvas::new(800, 200);
        render_price_chart(&mut canvas, &[PricePoint::new("a", 1.0), PricePoint::new("b", 2.0)], true);
        render_price_chart(&mut canvas, &[PricePoint::new("only", 7.0)], false);

        let svg = canvas.to_svg();
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<path"));
        assert!(!svg.contains(">a</text>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut canvas = SvgCanvas::new(100, 100);
        let style = TextStyle {
            font_family: "Arial",
            font_size: 12.0,
            color: "#000",
        };
        canvas.fill_text("F&O <x>", 1.0, 2.0, TextAlign::Left, &style);
        assert!(canvas.to_svg().contains("F&amp;O &lt;x&gt;"));
    }
}
