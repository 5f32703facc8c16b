//! Attendance Chart
//!
//! Deterministic bar chart rendering for categorized guest counts.
//!
//! - [`layout`]: bar geometry and wrapped labels for a surface size
//! - [`render`]: drawing commands replayable on any 2D surface
//! - [`SvgSurface`]: SVG backend for the drawing commands

mod layout;
mod render;
mod svg;

pub use layout::{
    display_label, format_value, layout, wrap_label, BarGeometry, ChartLayout, MonospaceMeasure,
    Surface, TextLine, TextMeasure, CORNER_RADIUS, GAP_RATIO, LINE_SPACING, MARGIN_BOTTOM,
    MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP, TOP_INSET,
};
pub use render::{render, DrawCommand, TextBaseline, BAR_COLORS};
pub use svg::SvgSurface;
