//! Chart drawing commands
//!
//! Converts a [`ChartLayout`] into a flat list of drawing commands that any 2D
//! surface backend can replay.

use serde::Serialize;

use super::layout::{layout, Surface, TextMeasure};
use crate::guests::Category;

/// Bar colors, cycled per category
pub const BAR_COLORS: [&str; 6] = [
    "#FF9800", // Orange (primary)
    "#4CAF50", // Green
    "#2196F3", // Blue
    "#9C27B0", // Purple
    "#F44336", // Red
    "#00BCD4", // Cyan
];

pub const AXIS_COLOR: &str = "#9ca3af";
pub const TEXT_COLOR: &str = "#374151";
pub const VALUE_FONT: &str = "bold 12px sans-serif";
pub const LABEL_FONT: &str = "12px sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Bottom,
}

/// One drawing operation, in layout units
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Resize the backing store to `width * pixel_ratio` by `height * pixel_ratio`
    /// device pixels, erase it, and scale subsequent drawing by `pixel_ratio`
    Clear {
        width: f64,
        height: f64,
        pixel_ratio: f64,
    },
    /// Straight stroke
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: &'static str,
        line_width: f64,
    },
    /// Filled rectangle with rounded top corners
    RoundedBar {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        color: &'static str,
    },
    /// Horizontally centered text
    Text {
        text: String,
        x: f64,
        y: f64,
        baseline: TextBaseline,
        font: &'static str,
        color: &'static str,
    },
}

/// Render `categories` as a bar chart on `surface`.
///
/// Always starts with a [`DrawCommand::Clear`]; an empty category list yields
/// nothing else.
pub fn render(
    categories: &[Category],
    surface: Surface,
    measure: &dyn TextMeasure,
) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Clear {
        width: surface.width,
        height: surface.height,
        pixel_ratio: surface.pixel_ratio,
    }];

    let Some(chart) = layout(categories, surface, measure) else {
        return commands;
    };

    commands.push(DrawCommand::Line {
        x1: chart.chart_x,
        y1: chart.baseline_y,
        x2: chart.chart_x + chart.chart_width,
        y2: chart.baseline_y,
        color: AXIS_COLOR,
        line_width: 1.0,
    });

    for bar in chart.bars {
        commands.push(DrawCommand::RoundedBar {
            x: bar.x,
            y: bar.y,
            width: bar.width,
            height: bar.height,
            radius: bar.radius,
            color: BAR_COLORS[bar.index % BAR_COLORS.len()],
        });

        commands.push(DrawCommand::Text {
            text: bar.value_label.text,
            x: bar.value_label.x,
            y: bar.value_label.y,
            baseline: TextBaseline::Bottom,
            font: VALUE_FONT,
            color: TEXT_COLOR,
        });

        for line in bar.label_lines {
            commands.push(DrawCommand::Text {
                text: line.text,
                x: line.x,
                y: line.y,
                baseline: TextBaseline::Top,
                font: LABEL_FONT,
                color: TEXT_COLOR,
            });
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::layout::MonospaceMeasure;

    fn bars(commands: &[DrawCommand]) -> Vec<(f64, f64)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::RoundedBar { y, height, .. } => Some((*y, *height)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_is_clear_only() {
        let surface = Surface::new(400.0, 200.0).with_pixel_ratio(2.0);
        let commands = render(&[], surface, &MonospaceMeasure::default());

        assert_eq!(
            commands,
            vec![DrawCommand::Clear {
                width: 400.0,
                height: 200.0,
                pixel_ratio: 2.0,
            }]
        );
    }

    #[test]
    fn test_two_bars() {
        let cats = vec![Category::new("Adult", 40.0), Category::new("Kids", 10.0)];
        let commands = render(&cats, Surface::new(400.0, 200.0), &MonospaceMeasure::default());

        assert!(matches!(commands[0], DrawCommand::Clear { .. }));
        assert!(matches!(commands[1], DrawCommand::Line { y1, y2, .. } if y1 == 145.0 && y2 == 145.0));

        let bars = bars(&commands);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].1, 125.0);
        assert_eq!(bars[1].1 * 4.0, bars[0].1);

        let texts: Vec<&str> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["40", "Adult", "10", "Kids"]);
    }

    #[test]
    fn test_render_is_repeatable() {
        let cats = vec![Category::new("Adult", 40.0), Category::new("", 10.0)];
        let measure = MonospaceMeasure::default();

        let first = render(&cats, Surface::new(300.0, 150.0), &measure);
        let _resized = render(&cats, Surface::new(900.0, 450.0), &measure);
        let again = render(&cats, Surface::new(300.0, 150.0), &measure);

        assert_eq!(first, again);
    }

    #[test]
    fn test_colors_cycle() {
        let cats: Vec<Category> = (0..8).map(|i| Category::new(format!("C{}", i), 1.0)).collect();
        let commands = render(&cats, Surface::new(800.0, 200.0), &MonospaceMeasure::default());

        let colors: Vec<&str> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::RoundedBar { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors[0], colors[6]);
        assert_eq!(colors[1], colors[7]);
        assert_ne!(colors[0], colors[1]);
    }
}
