//! SVG surface
//!
//! Replays drawing commands into a standalone SVG document.

use std::fmt::Write;

use super::render::{DrawCommand, TextBaseline};

/// Builds SVG documents from drawing commands
#[derive(Debug, Default, Clone)]
pub struct SvgSurface {
    /// Optional background fill painted on every clear
    background: Option<String>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// Render `commands` to an SVG string.
    ///
    /// A `Clear` discards everything drawn before it. Without any `Clear` the
    /// document has zero size.
    pub fn render(&self, commands: &[DrawCommand]) -> String {
        let mut size = (0.0, 0.0, 1.0);
        let mut body = String::new();

        for command in commands {
            match command {
                DrawCommand::Clear {
                    width,
                    height,
                    pixel_ratio,
                } => {
                    size = (*width, *height, *pixel_ratio);
                    body.clear();
                    if let Some(background) = &self.background {
                        let _ = writeln!(
                            body,
                            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
                            fmt_num(*width),
                            fmt_num(*height),
                            escape(background)
                        );
                    }
                }
                DrawCommand::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                    line_width,
                } => {
                    let _ = writeln!(
                        body,
                        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                        fmt_num(*x1),
                        fmt_num(*y1),
                        fmt_num(*x2),
                        fmt_num(*y2),
                        color,
                        fmt_num(*line_width)
                    );
                }
                DrawCommand::RoundedBar {
                    x,
                    y,
                    width,
                    height,
                    radius,
                    color,
                } => {
                    let _ = writeln!(
                        body,
                        r#"<path d="{}" fill="{}"/>"#,
                        rounded_top_path(*x, *y, *width, *height, *radius),
                        color
                    );
                }
                DrawCommand::Text {
                    text,
                    x,
                    y,
                    baseline,
                    font,
                    color,
                } => {
                    let baseline = match baseline {
                        TextBaseline::Top => "hanging",
                        TextBaseline::Bottom => "text-after-edge",
                    };
                    let _ = writeln!(
                        body,
                        r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="{}" style="font: {}" fill="{}">{}</text>"#,
                        fmt_num(*x),
                        fmt_num(*y),
                        baseline,
                        font,
                        color,
                        escape(text)
                    );
                }
            }
        }

        let (width, height, ratio) = size;
        let pixel_width = (width * ratio).round();
        let pixel_height = (height * ratio).round();

        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{pw}\" height=\"{ph}\" viewBox=\"0 0 {pw} {ph}\">\n<g transform=\"scale({r})\">\n{body}</g>\n</svg>\n",
            pw = fmt_num(pixel_width),
            ph = fmt_num(pixel_height),
            r = fmt_num(ratio),
            body = body
        )
    }
}

/// Path for a rectangle whose two top corners are rounded
fn rounded_top_path(x: f64, y: f64, width: f64, height: f64, radius: f64) -> String {
    let bottom = y + height;
    let right = x + width;
    format!(
        "M{} {} L{} {} Q{} {} {} {} L{} {} Q{} {} {} {} L{} {} Z",
        fmt_num(x),
        fmt_num(bottom),
        fmt_num(x),
        fmt_num(y + radius),
        fmt_num(x),
        fmt_num(y),
        fmt_num(x + radius),
        fmt_num(y),
        fmt_num(right - radius),
        fmt_num(y),
        fmt_num(right),
        fmt_num(y),
        fmt_num(right),
        fmt_num(y + radius),
        fmt_num(right),
        fmt_num(bottom)
    )
}

/// Up to two decimals, trailing zeros trimmed
fn fmt_num(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
