//! Flat draw-command scene built from a layout. The scene is what the SVG
//! and PNG backends consume, what `--dump-scene` serializes, and what the
//! redaction pass edits. Every render rebuilds it wholesale, so a new
//! render fully replaces the previous scene with no mixed state.

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::layout::types::{
    BracketPath, CanvasBounds, ConnectorKind, ElementTag, LayoutResult, NodeKind, NodeSize, Point,
    Rect, TextBlock,
};
use crate::theme::{FontWeight, StyleSlot, Theme};

const BOX_CORNER_RADIUS: f32 = 5.0;
const ARROW_LENGTH: f32 = 9.0;
const ARROW_HALF_WIDTH: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Middle,
    End,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        fill: String,
        stroke: String,
        stroke_width: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        corner_radius: f32,
        fill: String,
        stroke: String,
        stroke_width: f32,
    },
    Line {
        from: Point,
        to: Point,
        stroke: String,
        stroke_width: f32,
    },
    Polyline {
        points: Vec<Point>,
        stroke: String,
        stroke_width: f32,
    },
    Curve {
        from: Point,
        control: Point,
        to: Point,
        stroke: String,
        stroke_width: f32,
    },
    Brace {
        path: BracketPath,
        stroke: String,
        stroke_width: f32,
    },
    Polygon {
        points: Vec<Point>,
        fill: String,
    },
    Text {
        x: f32,
        y: f32,
        block: TextBlock,
        font_size: f32,
        weight: FontWeight,
        color: String,
        anchor: TextAnchor,
        visible: bool,
        emphasized: bool,
    },
}

impl Primitive {
    pub fn bbox(&self) -> Rect {
        match self {
            Primitive::Circle { cx, cy, radius, .. } => {
                (cx - radius, cy - radius, radius * 2.0, radius * 2.0)
            }
            Primitive::Rect {
                x,
                y,
                width,
                height,
                ..
            } => (*x, *y, *width, *height),
            Primitive::Line { from, to, .. } => crate::layout::types::points_bbox(&[*from, *to]),
            Primitive::Polyline { points, .. } => crate::layout::types::points_bbox(points),
            Primitive::Curve {
                from, control, to, ..
            } => crate::layout::types::points_bbox(&[*from, *control, *to]),
            Primitive::Brace { path, .. } => path.bbox(),
            Primitive::Polygon { points, .. } => crate::layout::types::points_bbox(points),
            Primitive::Text {
                x, y, block, anchor, ..
            } => match anchor {
                TextAnchor::Middle => (
                    x - block.width / 2.0,
                    y - block.height / 2.0,
                    block.width,
                    block.height,
                ),
                TextAnchor::End => (x - block.width, y - block.height / 2.0, block.width, block.height),
            },
        }
    }

    pub(crate) fn translate(&mut self, dx: f32, dy: f32) {
        match self {
            Primitive::Circle { cx, cy, .. } => {
                *cx += dx;
                *cy += dy;
            }
            Primitive::Rect { x, y, .. } | Primitive::Text { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Primitive::Line { from, to, .. } => {
                from.0 += dx;
                from.1 += dy;
                to.0 += dx;
                to.1 += dy;
            }
            Primitive::Curve {
                from, control, to, ..
            } => {
                from.0 += dx;
                from.1 += dy;
                control.0 += dx;
                control.1 += dy;
                to.0 += dx;
                to.1 += dy;
            }
            Primitive::Brace { path, .. } => {
                path.anchor.0 += dx;
                path.anchor.1 += dy;
                path.x += dx;
                path.top += dy;
                path.bottom += dy;
            }
            Primitive::Polyline { points, .. } | Primitive::Polygon { points, .. } => {
                for p in points.iter_mut() {
                    p.0 += dx;
                    p.1 += dy;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawCmd {
    pub tag: ElementTag,
    pub prim: Primitive,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneGraph {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub cmds: Vec<DrawCmd>,
}

impl SceneGraph {
    /// Emits draw commands in paint order: connectors underneath, then each
    /// node's shape and label, then decorations and the watermark.
    pub fn build(layout: &LayoutResult, theme: &Theme, config: &LayoutConfig) -> Self {
        let bounds = layout.bounds;
        let (tx, ty) = (-bounds.min_x, -bounds.min_y);
        let mut cmds = Vec::new();

        for connector in &layout.connectors {
            emit_connector(&mut cmds, connector, theme, tx, ty);
        }

        for node in &layout.nodes {
            let style = &node.style;
            let shape = match node.size {
                NodeSize::Circle { radius } => Primitive::Circle {
                    cx: node.cx + tx,
                    cy: node.cy + ty,
                    radius,
                    fill: style.fill.clone(),
                    stroke: style.stroke.clone(),
                    stroke_width: style.stroke_width,
                },
                NodeSize::Box { width, height } => Primitive::Rect {
                    x: node.left() + tx,
                    y: node.top() + ty,
                    width,
                    height,
                    corner_radius: BOX_CORNER_RADIUS,
                    fill: style.fill.clone(),
                    stroke: style.stroke.clone(),
                    stroke_width: style.stroke_width,
                },
            };
            cmds.push(DrawCmd {
                tag: node.tag,
                prim: shape,
            });
            cmds.push(DrawCmd {
                tag: node.tag,
                prim: Primitive::Text {
                    x: node.cx + tx,
                    y: node.cy + ty,
                    block: node.label.clone(),
                    font_size: style.font_size,
                    weight: style.weight,
                    color: style.text_color.clone(),
                    anchor: TextAnchor::Middle,
                    visible: true,
                    emphasized: node.slot == StyleSlot::Accent,
                },
            });
        }

        for decoration in &layout.decorations {
            use crate::layout::types::Decoration;
            let (tag, prim) = match decoration {
                Decoration::FrameCircle {
                    tag,
                    cx,
                    cy,
                    radius,
                } => (
                    *tag,
                    Primitive::Circle {
                        cx: cx + tx,
                        cy: cy + ty,
                        radius: *radius,
                        fill: "none".to_string(),
                        stroke: theme.line_color.clone(),
                        stroke_width: 2.0,
                    },
                ),
                Decoration::RailLine { tag, from, to } => (
                    *tag,
                    Primitive::Line {
                        from: (from.0 + tx, from.1 + ty),
                        to: (to.0 + tx, to.1 + ty),
                        stroke: theme.line_color.clone(),
                        stroke_width: 2.0,
                    },
                ),
                Decoration::Triangle { tag, points } => (
                    *tag,
                    Primitive::Polygon {
                        points: points.iter().map(|p| (p.0 + tx, p.1 + ty)).collect(),
                        fill: theme.line_color.clone(),
                    },
                ),
            };
            cmds.push(DrawCmd { tag, prim });
        }

        let watermark = &config.watermark;
        if !watermark.text.is_empty() {
            let block = plain_block(&watermark.text, watermark.font_size);
            cmds.push(DrawCmd {
                tag: ElementTag::new(NodeKind::Watermark, 0),
                prim: Primitive::Text {
                    x: bounds.width - watermark.margin,
                    y: bounds.height - watermark.margin - block.height / 2.0,
                    block,
                    font_size: watermark.font_size,
                    weight: FontWeight::Normal,
                    color: theme.watermark_color.clone(),
                    anchor: TextAnchor::End,
                    visible: true,
                    emphasized: false,
                },
            });
        }

        SceneGraph {
            width: bounds.width,
            height: bounds.height,
            background: theme.background.clone(),
            cmds,
        }
    }

    /// Post-draw tight fit: recompute the canvas from the actual emitted
    /// geometry and re-anchor it at the padding origin. Removes dead space
    /// left behind by incremental edits.
    pub fn tighten(&mut self, padding: f32) {
        let Some(bounds) = CanvasBounds::from_rects(self.cmds.iter().map(|c| c.prim.bbox()))
        else {
            return;
        };
        let dx = padding - bounds.min_x;
        let dy = padding - bounds.min_y;
        for cmd in &mut self.cmds {
            cmd.prim.translate(dx, dy);
        }
        self.width = bounds.width + padding * 2.0;
        self.height = bounds.height + padding * 2.0;
    }
}

fn emit_connector(
    cmds: &mut Vec<DrawCmd>,
    connector: &crate::layout::types::Connector,
    theme: &Theme,
    tx: f32,
    ty: f32,
) {
    let stroke = theme.line_color.clone();
    match &connector.kind {
        ConnectorKind::Straight { from, to, arrow } => {
            let from = (from.0 + tx, from.1 + ty);
            let to = (to.0 + tx, to.1 + ty);
            cmds.push(DrawCmd {
                tag: connector.tag,
                prim: Primitive::Line {
                    from,
                    to,
                    stroke: stroke.clone(),
                    stroke_width: 2.0,
                },
            });
            if *arrow {
                cmds.push(DrawCmd {
                    tag: connector.tag,
                    prim: Primitive::Polygon {
                        points: arrowhead(from, to),
                        fill: stroke,
                    },
                });
            }
        }
        ConnectorKind::OrthogonalL { points } => {
            cmds.push(DrawCmd {
                tag: connector.tag,
                prim: Primitive::Polyline {
                    points: points.iter().map(|p| (p.0 + tx, p.1 + ty)).collect(),
                    stroke,
                    stroke_width: 2.0,
                },
            });
        }
        ConnectorKind::CurlyBracket(bracket) => {
            cmds.push(DrawCmd {
                tag: connector.tag,
                prim: Primitive::Brace {
                    path: shift_bracket(bracket, tx, ty),
                    stroke,
                    stroke_width: 2.0,
                },
            });
        }
        ConnectorKind::DirectedCurve { from, to, control } => {
            let from = (from.0 + tx, from.1 + ty);
            let to = (to.0 + tx, to.1 + ty);
            let control = (control.0 + tx, control.1 + ty);
            cmds.push(DrawCmd {
                tag: connector.tag,
                prim: Primitive::Curve {
                    from,
                    control,
                    to,
                    stroke: stroke.clone(),
                    stroke_width: 1.6,
                },
            });
            cmds.push(DrawCmd {
                tag: connector.tag,
                prim: Primitive::Polygon {
                    points: arrowhead(control, to),
                    fill: stroke,
                },
            });
        }
    }

    if let (Some(block), Some(anchor)) = (&connector.label, connector.label_anchor) {
        cmds.push(DrawCmd {
            tag: connector.tag,
            prim: Primitive::Text {
                x: anchor.0 + tx,
                y: anchor.1 + ty,
                block: block.clone(),
                font_size: 12.0,
                weight: FontWeight::Normal,
                color: theme.line_color.clone(),
                anchor: TextAnchor::Middle,
                visible: true,
                emphasized: false,
            },
        });
    }
}

/// Triangular arrowhead at `to`, oriented along the `from -> to` direction.
fn arrowhead(from: Point, to: Point) -> Vec<Point> {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let len = (dx * dx + dy * dy).sqrt().max(1e-6);
    let (ux, uy) = (dx / len, dy / len);
    let (px, py) = (-uy, ux);
    let base = (to.0 - ux * ARROW_LENGTH, to.1 - uy * ARROW_LENGTH);
    vec![
        to,
        (base.0 + px * ARROW_HALF_WIDTH, base.1 + py * ARROW_HALF_WIDTH),
        (base.0 - px * ARROW_HALF_WIDTH, base.1 - py * ARROW_HALF_WIDTH),
    ]
}

fn shift_bracket(bracket: &BracketPath, tx: f32, ty: f32) -> BracketPath {
    BracketPath {
        anchor: (bracket.anchor.0 + tx, bracket.anchor.1 + ty),
        x: bracket.x + tx,
        top: bracket.top + ty,
        bottom: bracket.bottom + ty,
        ..*bracket
    }
}

fn plain_block(text: &str, font_size: f32) -> TextBlock {
    TextBlock {
        lines: vec![text.to_string()],
        width: text.chars().count() as f32 * font_size * 0.55,
        height: font_size * 1.25,
    }
}
