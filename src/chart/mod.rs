//! Hand-drawn price charts.
//!
//! The renderer talks to a [`Canvas`], a minimal 2D drawing context. The
//! CLI draws onto [`SvgCanvas`]; tests draw onto [`RecordingCanvas`] and
//! assert on the recorded operations.

pub mod canvas;
pub mod renderer;
pub mod svg;

pub use canvas::{Canvas, DrawOp, RecordingCanvas, TextAlign, TextStyle};
pub use renderer::{render_price_chart, ChartColors, PriceScale, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use svg::SvgCanvas;
