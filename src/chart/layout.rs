//! Bar chart layout
//!
//! Turns labeled category values into bar geometry and wrapped label lines for a
//! surface of a given size. All coordinates are layout units with the origin at
//! the top-left corner; the pixel ratio only affects the backing store.

use crate::guests::Category;

pub const MARGIN_TOP: f64 = 10.0;
pub const MARGIN_RIGHT: f64 = 10.0;
pub const MARGIN_BOTTOM: f64 = 55.0;
pub const MARGIN_LEFT: f64 = 35.0;

/// Share of each slot left empty between neighbouring bars
pub const GAP_RATIO: f64 = 0.35;

/// Head room kept between the tallest bar and the top margin
pub const TOP_INSET: f64 = 10.0;

pub const CORNER_RADIUS: f64 = 6.0;

/// Vertical distance between wrapped category label lines
pub const LINE_SPACING: f64 = 12.0;

/// Gap between a bar's top and its value label
pub const VALUE_LABEL_GAP: f64 = 4.0;

/// Distance from the baseline to the first category label line
pub const LABEL_OFFSET: f64 = 16.0;

/// Size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    /// Width in layout units
    pub width: f64,
    /// Height in layout units
    pub height: f64,
    /// Device pixels per layout unit
    pub pixel_ratio: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        self
    }

    /// Backing store width in device pixels
    pub fn pixel_width(&self) -> u32 {
        (self.width * self.pixel_ratio).round().max(0.0) as u32
    }

    /// Backing store height in device pixels
    pub fn pixel_height(&self) -> u32 {
        (self.height * self.pixel_ratio).round().max(0.0) as u32
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(400.0, 200.0)
    }
}

/// Measures rendered text width in the active label font
pub trait TextMeasure {
    fn measure(&self, text: &str) -> f64;
}

/// Fixed advance per character; a close fit for the 12px sans-serif label font
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub char_width: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { char_width: 6.5 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}

/// A single positioned line of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Geometry of one bar and its labels
#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub index: usize,
    pub value: f64,
    /// Left edge of the slot
    pub slot_x: f64,
    pub slot_width: f64,
    /// Left edge of the bar
    pub x: f64,
    /// Top edge of the bar
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Corner radius of the two top corners
    pub radius: f64,
    /// Value label, anchored bottom-center
    pub value_label: TextLine,
    /// Wrapped category label, anchored top-center
    pub label_lines: Vec<TextLine>,
}

impl BarGeometry {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Full layout of a non-empty bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub surface: Surface,
    /// Left edge of the plot area
    pub chart_x: f64,
    /// Top edge of the plot area
    pub chart_y: f64,
    pub chart_width: f64,
    pub chart_height: f64,
    pub baseline_y: f64,
    pub slot_width: f64,
    pub max_value: f64,
    pub bars: Vec<BarGeometry>,
}

/// Lay out `categories` on `surface`.
///
/// Returns `None` for an empty category list.
pub fn layout(
    categories: &[Category],
    surface: Surface,
    measure: &dyn TextMeasure,
) -> Option<ChartLayout> {
    if categories.is_empty() {
        return None;
    }

    let chart_x = MARGIN_LEFT;
    let chart_y = MARGIN_TOP;
    let chart_width = (surface.width - MARGIN_LEFT - MARGIN_RIGHT).max(0.0);
    let chart_height = (surface.height - MARGIN_TOP - MARGIN_BOTTOM).max(0.0);
    let baseline_y = chart_y + chart_height;

    let max_value = categories
        .iter()
        .map(|c| c.value)
        .fold(1.0_f64, f64::max);
    let usable_height = (chart_height - TOP_INSET).max(0.0);

    let slot_width = chart_width / categories.len() as f64;
    let bar_width = slot_width * (1.0 - GAP_RATIO);

    let bars = categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let slot_x = chart_x + index as f64 * slot_width;
            let x = slot_x + (slot_width - bar_width) / 2.0;
            let height = category.value.max(0.0) / max_value * usable_height;
            let y = baseline_y - height;
            let center_x = x + bar_width / 2.0;

            let label = display_label(index, &category.label);
            let label_lines = wrap_label(&label, slot_width, measure)
                .into_iter()
                .enumerate()
                .map(|(line, text)| TextLine {
                    text,
                    x: center_x,
                    y: baseline_y + LABEL_OFFSET + line as f64 * LINE_SPACING,
                })
                .collect();

            BarGeometry {
                index,
                value: category.value,
                slot_x,
                slot_width,
                x,
                y,
                width: bar_width,
                height,
                radius: CORNER_RADIUS.min(bar_width / 2.0).min(height),
                value_label: TextLine {
                    text: format_value(category.value),
                    x: center_x,
                    y: y - VALUE_LABEL_GAP,
                },
                label_lines,
            }
        })
        .collect();

    Some(ChartLayout {
        surface,
        chart_x,
        chart_y,
        chart_width,
        chart_height,
        baseline_y,
        slot_width,
        max_value,
        bars,
    })
}

/// Category label, or "Group N" (1-based) when blank
pub fn display_label(index: usize, label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        format!("Group {}", index + 1)
    } else {
        label.to_string()
    }
}

/// Greedily pack words into lines no wider than `max_width`.
///
/// A word that is wider than `max_width` on its own gets a line to itself.
pub fn wrap_label(text: &str, max_width: f64, measure: &dyn TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if measure.measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Whole numbers print without decimals, anything else with one
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
