use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::types::{BracketPath, Point, TextBlock};
use crate::scene::{Primitive, SceneGraph, TextAnchor};
use crate::theme::{FontWeight, Theme};
use anyhow::Result;
use std::path::Path;

pub fn render_svg(scene: &SceneGraph, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = scene.width.max(1.0);
    let height = scene.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        scene.background
    ));

    for cmd in &scene.cmds {
        match &cmd.prim {
            Primitive::Circle {
                cx,
                cy,
                radius,
                fill,
                stroke,
                stroke_width,
            } => {
                svg.push_str(&format!(
                    "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{radius:.2}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
                ));
            }
            Primitive::Rect {
                x,
                y,
                width,
                height,
                corner_radius,
                fill,
                stroke,
                stroke_width,
            } => {
                svg.push_str(&format!(
                    "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" rx=\"{corner_radius:.1}\" ry=\"{corner_radius:.1}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
                ));
            }
            Primitive::Line {
                from,
                to,
                stroke,
                stroke_width,
            } => {
                svg.push_str(&format!(
                    "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
                    from.0, from.1, to.0, to.1
                ));
            }
            Primitive::Polyline {
                points,
                stroke,
                stroke_width,
            } => {
                svg.push_str(&format!(
                    "<path d=\"{}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
                    polyline_path(points)
                ));
            }
            Primitive::Curve {
                from,
                control,
                to,
                stroke,
                stroke_width,
            } => {
                svg.push_str(&format!(
                    "<path d=\"M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
                    from.0, from.1, control.0, control.1, to.0, to.1
                ));
            }
            Primitive::Brace {
                path,
                stroke,
                stroke_width,
            } => {
                svg.push_str(&format!(
                    "<path d=\"{}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\" stroke-linecap=\"round\"/>",
                    brace_path(path)
                ));
            }
            Primitive::Polygon { points, fill } => {
                let coords: Vec<String> = points
                    .iter()
                    .map(|p| format!("{:.2},{:.2}", p.0, p.1))
                    .collect();
                svg.push_str(&format!(
                    "<polygon points=\"{}\" fill=\"{fill}\"/>",
                    coords.join(" ")
                ));
            }
            Primitive::Text {
                x,
                y,
                block,
                font_size,
                weight,
                color,
                anchor,
                visible,
                ..
            } => {
                if !visible {
                    continue;
                }
                svg.push_str(&text_svg(
                    *x, *y, block, *font_size, *weight, color, *anchor, theme, config,
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

fn polyline_path(points: &[Point]) -> String {
    let mut d = String::new();
    if let Some(first) = points.first() {
        d.push_str(&format!("M {:.2} {:.2}", first.0, first.1));
    }
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

/// Curly brace path: shoulder arcs at both ends, straight runs, and a
/// mid-span tip reaching back toward the parent.
fn brace_path(bracket: &BracketPath) -> String {
    let x = bracket.x;
    let r = bracket.arc_radius;
    let mid = bracket.mid_y();
    let tip = bracket.tip();
    let shoulder_x = x + bracket.direction * r;
    format!(
        "M {:.2} {:.2} Q {x:.2} {:.2} {x:.2} {:.2} L {x:.2} {:.2} Q {x:.2} {mid:.2} {:.2} {:.2} Q {x:.2} {mid:.2} {x:.2} {:.2} L {x:.2} {:.2} Q {x:.2} {:.2} {:.2} {:.2}",
        shoulder_x,
        bracket.top,
        bracket.top,
        bracket.top + r,
        mid - r,
        tip.0,
        tip.1,
        mid + r,
        bracket.bottom - r,
        bracket.bottom,
        shoulder_x,
        bracket.bottom,
    )
}

#[allow(clippy::too_many_arguments)]
fn text_svg(
    x: f32,
    y: f32,
    block: &TextBlock,
    font_size: f32,
    weight: FontWeight,
    color: &str,
    anchor: TextAnchor,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    let line_height = font_size * config.label_line_height;
    let total_height = block.lines.len() as f32 * line_height;
    // Baseline of the first line, centering the block on y.
    let start_y = y - total_height / 2.0 + font_size * 0.9;
    let anchor = match anchor {
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };

    let mut text = String::new();
    text.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{font_size}\" font-weight=\"{}\" fill=\"{color}\">",
        theme.font_family,
        weight.css_value(),
    ));
    for (idx, line) in block.lines.iter().enumerate() {
        if idx == 0 {
            text.push_str(&format!("<tspan x=\"{x:.2}\" dy=\"0\">{}", escape_xml(line)));
        } else {
            text.push_str(&format!(
                "<tspan x=\"{x:.2}\" dy=\"{line_height:.2}\">{}",
                escape_xml(line)
            ));
        }
        text.push_str("</tspan>");
    }
    text.push_str("</text>");
    text
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    anyhow::bail!("PNG output requires building with the `png` feature")
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
