//! First-pass canvas bounds: union of every positioned primitive's extent,
//! inflated by stroke, padded, and floored to any recommended minimum size.
//! The post-draw tight-fit pass lives with the scene graph, which owns the
//! rendered geometry by then.

use crate::config::CanvasConfig;
use crate::spec::RecommendedSize;

use super::types::{CanvasBounds, Rect};
use super::Pieces;

pub(super) fn compute_bounds(
    pieces: &Pieces,
    canvas: &CanvasConfig,
    recommended: Option<&RecommendedSize>,
) -> CanvasBounds {
    let node_rects = pieces.nodes.iter().map(|node| {
        inflate(node.rect(), node.style.stroke_width / 2.0)
    });
    let connector_rects = pieces.connectors.iter().map(|c| c.bbox());
    let decoration_rects = pieces.decorations.iter().map(|d| d.bbox());

    let mut bounds = CanvasBounds::from_rects(
        node_rects.chain(connector_rects).chain(decoration_rects),
    )
    .unwrap_or_else(CanvasBounds::empty);

    // Reserved bands (e.g. the bridge footer) extend content downward even
    // when nothing is drawn there yet.
    if pieces.reserve_bottom > bounds.min_y + bounds.height {
        bounds.height = pieces.reserve_bottom - bounds.min_y;
    }

    let padding = recommended.map(|r| r.padding).unwrap_or(canvas.padding);
    bounds.min_x -= padding;
    bounds.min_y -= padding;
    bounds.width += padding * 2.0;
    bounds.height += padding * 2.0;

    let min_width = recommended
        .map(|r| r.width)
        .unwrap_or(0.0)
        .max(canvas.min_width);
    let min_height = recommended
        .map(|r| r.height)
        .unwrap_or(0.0)
        .max(canvas.min_height);
    floor_dimensions(&mut bounds, min_width, min_height);
    bounds
}

/// Expands `bounds` symmetrically so content stays centered when floored
/// to a minimum size.
fn floor_dimensions(bounds: &mut CanvasBounds, min_width: f32, min_height: f32) {
    if bounds.width < min_width {
        bounds.min_x -= (min_width - bounds.width) / 2.0;
        bounds.width = min_width;
    }
    if bounds.height < min_height {
        bounds.min_y -= (min_height - bounds.height) / 2.0;
        bounds.height = min_height;
    }
}

fn inflate(rect: Rect, amount: f32) -> Rect {
    (
        rect.0 - amount,
        rect.1 - amount,
        rect.2 + amount * 2.0,
        rect.3 + amount * 2.0,
    )
}
