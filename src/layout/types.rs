use serde::Serialize;

use crate::error::Degradation;
use crate::spec::DiagramFamily;
use crate::theme::{NodeStyle, StyleSlot};

pub type Point = (f32, f32);

/// Axis-aligned `(x, y, width, height)` rectangle.
pub type Rect = (f32, f32, f32, f32);

/// Wrapped, measured text for one label.
#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

impl TextBlock {
    pub fn text(&self) -> String {
        self.lines.join(" ").trim().to_string()
    }
}

/// What a scene element represents in the source spec. Combined with the
/// indices in [`ElementTag`] this lets external interaction tooling address
/// elements without re-deriving layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Topic,
    Attribute,
    Context,
    Frame,
    Similarity,
    LeftDifference,
    RightDifference,
    Event,
    Cause,
    Effect,
    Branch,
    Leaf,
    Part,
    Subpart,
    Title,
    Step,
    Substep,
    AnalogyUpper,
    AnalogyLower,
    Separator,
    Dimension,
    AltDimension,
    Concept,
    Relationship,
    Watermark,
    AnswerKey,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Topic => "topic",
            NodeKind::Attribute => "attribute",
            NodeKind::Context => "context",
            NodeKind::Frame => "frame",
            NodeKind::Similarity => "similarity",
            NodeKind::LeftDifference => "left_difference",
            NodeKind::RightDifference => "right_difference",
            NodeKind::Event => "event",
            NodeKind::Cause => "cause",
            NodeKind::Effect => "effect",
            NodeKind::Branch => "branch",
            NodeKind::Leaf => "leaf",
            NodeKind::Part => "part",
            NodeKind::Subpart => "subpart",
            NodeKind::Title => "title",
            NodeKind::Step => "step",
            NodeKind::Substep => "substep",
            NodeKind::AnalogyUpper => "analogy_upper",
            NodeKind::AnalogyLower => "analogy_lower",
            NodeKind::Separator => "separator",
            NodeKind::Dimension => "dimension",
            NodeKind::AltDimension => "alt_dimension",
            NodeKind::Concept => "concept",
            NodeKind::Relationship => "relationship",
            NodeKind::Watermark => "watermark",
            NodeKind::AnswerKey => "answer_key",
        }
    }
}

/// Stable identifier for one scene element: kind, index within its sibling
/// set, and the parent's index where nesting exists (substeps, leaves,
/// subparts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElementTag {
    pub kind: NodeKind,
    pub index: usize,
    pub parent: Option<usize>,
}

impl ElementTag {
    pub fn new(kind: NodeKind, index: usize) -> Self {
        Self {
            kind,
            index,
            parent: None,
        }
    }

    pub fn child(kind: NodeKind, parent: usize, index: usize) -> Self {
        Self {
            kind,
            index,
            parent: Some(parent),
        }
    }

    pub fn id(&self) -> String {
        match self.parent {
            Some(parent) => format!("{}_{}_{}", self.kind.as_str(), parent, self.index),
            None => format!("{}_{}", self.kind.as_str(), self.index),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum NodeSize {
    Circle { radius: f32 },
    Box { width: f32, height: f32 },
}

impl NodeSize {
    pub fn width(&self) -> f32 {
        match self {
            NodeSize::Circle { radius } => radius * 2.0,
            NodeSize::Box { width, .. } => *width,
        }
    }

    pub fn height(&self) -> f32 {
        match self {
            NodeSize::Circle { radius } => radius * 2.0,
            NodeSize::Box { height, .. } => *height,
        }
    }
}

/// A sized, positioned shape produced for one spec element. Owned by the
/// render pass that created it and rebuilt wholesale on every render.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub tag: ElementTag,
    pub cx: f32,
    pub cy: f32,
    pub size: NodeSize,
    pub label: TextBlock,
    pub slot: StyleSlot,
    pub style: NodeStyle,
}

impl LayoutNode {
    pub fn left(&self) -> f32 {
        self.cx - self.size.width() / 2.0
    }

    pub fn top(&self) -> f32 {
        self.cy - self.size.height() / 2.0
    }

    pub fn right(&self) -> f32 {
        self.cx + self.size.width() / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.cy + self.size.height() / 2.0
    }

    pub fn rect(&self) -> (f32, f32, f32, f32) {
        (
            self.left(),
            self.top(),
            self.size.width(),
            self.size.height(),
        )
    }

    /// Effective radius for circle-overlap checks: boxes use the half
    /// diagonal.
    pub fn effective_radius(&self) -> f32 {
        match self.size {
            NodeSize::Circle { radius } => radius,
            NodeSize::Box { width, height } => (width * width + height * height).sqrt() / 2.0,
        }
    }

    /// Point on this node's boundary along the ray toward `target`.
    pub fn boundary_toward(&self, target: Point) -> Point {
        let dx = target.0 - self.cx;
        let dy = target.1 - self.cy;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= f32::EPSILON {
            return (self.cx, self.cy);
        }
        let (ux, uy) = (dx / len, dy / len);
        match self.size {
            NodeSize::Circle { radius } => (self.cx + ux * radius, self.cy + uy * radius),
            NodeSize::Box { width, height } => {
                // Scale the unit vector to the box edge it exits through.
                let half_w = width / 2.0;
                let half_h = height / 2.0;
                let scale_x = if ux.abs() > f32::EPSILON {
                    half_w / ux.abs()
                } else {
                    f32::INFINITY
                };
                let scale_y = if uy.abs() > f32::EPSILON {
                    half_h / uy.abs()
                } else {
                    f32::INFINITY
                };
                let scale = scale_x.min(scale_y);
                (self.cx + ux * scale, self.cy + uy * scale)
            }
        }
    }
}

/// Parametric curly-bracket geometry connecting a node to the vertical
/// midpoint of its children's span. Tip depth and arc radius scale with the
/// span height.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BracketPath {
    /// Point on the parent node the bracket reaches back to.
    pub anchor: Point,
    /// Spine x position of the bracket.
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
    pub tip_depth: f32,
    pub arc_radius: f32,
    /// +1.0 when children sit to the right of the parent, -1.0 otherwise.
    pub direction: f32,
}

impl BracketPath {
    pub fn mid_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Sharp mid-span tip, pointing back toward the parent.
    pub fn tip(&self) -> Point {
        (self.x - self.direction * self.tip_depth, self.mid_y())
    }

    pub fn bbox(&self) -> (f32, f32, f32, f32) {
        let tip_x = self.tip().0;
        let arc_x = self.x + self.direction * self.arc_radius;
        let min_x = tip_x.min(arc_x).min(self.x).min(self.anchor.0);
        let max_x = tip_x.max(arc_x).max(self.x).max(self.anchor.0);
        (min_x, self.top, max_x - min_x, self.bottom - self.top)
    }
}

#[derive(Debug, Clone)]
pub enum ConnectorKind {
    Straight {
        from: Point,
        to: Point,
        arrow: bool,
    },
    /// Orthogonal two- or three-segment route.
    OrthogonalL {
        points: Vec<Point>,
    },
    CurlyBracket(BracketPath),
    /// Quadratic curve with an arrowhead at `to`.
    DirectedCurve {
        from: Point,
        to: Point,
        control: Point,
    },
}

#[derive(Debug, Clone)]
pub struct Connector {
    pub tag: ElementTag,
    pub kind: ConnectorKind,
    pub label: Option<TextBlock>,
    pub label_anchor: Option<Point>,
}

impl Connector {
    pub fn bbox(&self) -> (f32, f32, f32, f32) {
        let mut points: Vec<Point> = match &self.kind {
            ConnectorKind::Straight { from, to, .. } => vec![*from, *to],
            ConnectorKind::OrthogonalL { points } => points.clone(),
            ConnectorKind::CurlyBracket(bracket) => {
                let (x, y, w, h) = bracket.bbox();
                vec![(x, y), (x + w, y + h)]
            }
            ConnectorKind::DirectedCurve { from, to, control } => vec![*from, *to, *control],
        };
        if let Some(anchor) = self.label_anchor {
            // A placed label occupies its full rect, not just the anchor.
            match &self.label {
                Some(block) => {
                    points.push((anchor.0 - block.width / 2.0, anchor.1 - block.height / 2.0));
                    points.push((anchor.0 + block.width / 2.0, anchor.1 + block.height / 2.0));
                }
                None => points.push(anchor),
            }
        }
        points_bbox(&points)
    }
}

/// Non-node, non-connector geometry emitted by family layouts: the circle
/// map frame, the bridge rail and its separators.
#[derive(Debug, Clone)]
pub enum Decoration {
    FrameCircle {
        tag: ElementTag,
        cx: f32,
        cy: f32,
        radius: f32,
    },
    RailLine {
        tag: ElementTag,
        from: Point,
        to: Point,
    },
    Triangle {
        tag: ElementTag,
        points: [Point; 3],
    },
}

impl Decoration {
    pub fn bbox(&self) -> (f32, f32, f32, f32) {
        match self {
            Decoration::FrameCircle { cx, cy, radius, .. } => {
                (cx - radius, cy - radius, radius * 2.0, radius * 2.0)
            }
            Decoration::RailLine { from, to, .. } => points_bbox(&[*from, *to]),
            Decoration::Triangle { points, .. } => points_bbox(points),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CanvasBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasBounds {
    pub fn empty() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn from_rects<I: IntoIterator<Item = (f32, f32, f32, f32)>>(rects: I) -> Option<Self> {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        let mut any = false;
        for (x, y, w, h) in rects {
            any = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x + w);
            max_y = max_y.max(y + h);
        }
        any.then(|| Self {
            min_x,
            min_y,
            width: (max_x - min_x).max(0.0),
            height: (max_y - min_y).max(0.0),
        })
    }

    pub fn contains_rect(&self, rect: (f32, f32, f32, f32), tolerance: f32) -> bool {
        rect.0 >= self.min_x - tolerance
            && rect.1 >= self.min_y - tolerance
            && rect.0 + rect.2 <= self.min_x + self.width + tolerance
            && rect.1 + rect.3 <= self.min_y + self.height + tolerance
    }
}

/// Immutable output of one layout invocation. References nothing in the
/// input spec; the spec is never enriched in place.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub family: DiagramFamily,
    pub nodes: Vec<LayoutNode>,
    pub connectors: Vec<Connector>,
    pub decorations: Vec<Decoration>,
    pub bounds: CanvasBounds,
    pub degradations: Vec<Degradation>,
}

pub(crate) fn points_bbox(points: &[Point]) -> (f32, f32, f32, f32) {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for (x, y) in points {
        min_x = min_x.min(*x);
        min_y = min_y.min(*y);
        max_x = max_x.max(*x);
        max_y = max_y.max(*y);
    }
    if min_x > max_x {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        (min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

pub(crate) fn rects_intersect(a: (f32, f32, f32, f32), b: (f32, f32, f32, f32)) -> bool {
    a.0 < b.0 + b.2 && a.0 + a.2 > b.0 && a.1 < b.1 + b.3 && a.1 + a.3 > b.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_ids_are_stable() {
        assert_eq!(ElementTag::new(NodeKind::Topic, 0).id(), "topic_0");
        assert_eq!(
            ElementTag::child(NodeKind::Substep, 2, 1).id(),
            "substep_2_1"
        );
    }

    #[test]
    fn boundary_toward_circle_lies_on_radius() {
        let node = LayoutNode {
            tag: ElementTag::new(NodeKind::Topic, 0),
            cx: 0.0,
            cy: 0.0,
            size: NodeSize::Circle { radius: 10.0 },
            label: TextBlock {
                lines: vec!["x".to_string()],
                width: 5.0,
                height: 10.0,
            },
            slot: crate::theme::StyleSlot::Topic,
            style: crate::theme::Theme::classic()
                .resolve(DiagramFamily::Bubble)
                .unwrap()
                .topic
                .clone(),
        };
        let (bx, by) = node.boundary_toward((100.0, 0.0));
        assert!((bx - 10.0).abs() < 1e-4);
        assert!(by.abs() < 1e-4);
    }

    #[test]
    fn boundary_toward_box_hits_edge() {
        let node = LayoutNode {
            tag: ElementTag::new(NodeKind::Step, 0),
            cx: 0.0,
            cy: 0.0,
            size: NodeSize::Box {
                width: 20.0,
                height: 10.0,
            },
            label: TextBlock {
                lines: vec![String::new()],
                width: 0.0,
                height: 0.0,
            },
            slot: crate::theme::StyleSlot::Accent,
            style: crate::theme::Theme::classic()
                .resolve(DiagramFamily::Flow)
                .unwrap()
                .accent
                .clone(),
        };
        let (bx, by) = node.boundary_toward((50.0, 0.0));
        assert!((bx - 10.0).abs() < 1e-4, "bx = {bx}");
        assert!(by.abs() < 1e-4);
        let (_, by) = node.boundary_toward((0.0, 50.0));
        assert!((by - 5.0).abs() < 1e-4);
    }

    #[test]
    fn connector_bbox_covers_the_label_rect() {
        let connector = Connector {
            tag: ElementTag::new(NodeKind::Relationship, 0),
            kind: ConnectorKind::Straight {
                from: (0.0, 0.0),
                to: (100.0, 0.0),
                arrow: true,
            },
            label: Some(TextBlock {
                lines: vec!["a very wide edge label".to_string()],
                width: 160.0,
                height: 18.0,
            }),
            label_anchor: Some((50.0, -20.0)),
        };
        let (x, y, w, h) = connector.bbox();
        assert!(x <= 50.0 - 80.0);
        assert!(x + w >= 50.0 + 80.0);
        assert!(y <= -20.0 - 9.0);
        assert!(y + h >= 0.0);
        assert!(w >= 160.0 && h >= 29.0);
    }

    #[test]
    fn bracket_tip_extends_beyond_spine() {
        let bracket = BracketPath {
            anchor: (0.0, 50.0),
            x: 30.0,
            top: 0.0,
            bottom: 100.0,
            tip_depth: 5.0,
            arc_radius: 4.0,
            direction: 1.0,
        };
        assert!((bracket.tip().0 - 25.0).abs() < 1e-4);
        assert!((bracket.mid_y() - 50.0).abs() < 1e-4);
        let (x, y, w, h) = bracket.bbox();
        assert!(x <= 25.0 && x + w >= 34.0);
        assert!(y <= 0.0 + 1e-4 && y + h >= 100.0 - 1e-4);
    }
}
