//! Bridge map layout: analogy pairs straddle a horizontal rail, with a
//! triangular separator between consecutive pairs, the relating factor
//! pinned left of the rail, and a footer band of alternative-dimension
//! chips that stays reserved even when empty.

use crate::spec::AnalogyPair;
use crate::theme::StyleSlot;

use super::sizing::box_node;
use super::types::{Decoration, ElementTag, NodeKind, Point};
use super::{LayoutCtx, Pieces};

pub(super) fn layout_bridge(
    relating_factor: &str,
    dimension: Option<&str>,
    analogies: &[AnalogyPair],
    alternative_dimensions: &[String],
    ctx: &LayoutCtx<'_>,
) -> Pieces {
    let cfg = &ctx.config.bridge;
    let mut pieces = Pieces::default();
    let rail_y = 0.0;

    // The named analogy pattern takes the rail-left spot when given.
    let rail_label = dimension.unwrap_or(relating_factor);
    let mut dimension = box_node(
        &ctx.measurer,
        ElementTag::new(NodeKind::Dimension, 0),
        rail_label,
        StyleSlot::Primary,
        &ctx.styles.primary,
        cfg.node_padding,
        0.0,
    );
    dimension.cx = dimension.size.width() / 2.0;
    dimension.cy = rail_y;

    let rail_start = dimension.right() + cfg.dimension_gap + cfg.rail_overhang;
    let mut pair_x = rail_start;
    let mut last_x = rail_start;

    for (pair_idx, pair) in analogies.iter().enumerate() {
        // Only the lead pair gets the emphasized filled treatment.
        let (slot, style) = if pair_idx == 0 {
            (StyleSlot::Accent, &ctx.styles.accent)
        } else {
            (StyleSlot::Secondary, &ctx.styles.secondary)
        };
        let mut upper = box_node(
            &ctx.measurer,
            ElementTag::new(NodeKind::AnalogyUpper, pair_idx),
            &pair.left,
            slot,
            style,
            cfg.node_padding,
            0.0,
        );
        let mut lower = box_node(
            &ctx.measurer,
            ElementTag::new(NodeKind::AnalogyLower, pair_idx),
            &pair.right,
            slot,
            style,
            cfg.node_padding,
            0.0,
        );
        upper.cx = pair_x;
        upper.cy = rail_y - cfg.pair_offset - upper.size.height() / 2.0;
        lower.cx = pair_x;
        lower.cy = rail_y + cfg.pair_offset + lower.size.height() / 2.0;
        pieces.nodes.push(upper);
        pieces.nodes.push(lower);

        if pair_idx > 0 {
            let mid_x = pair_x - cfg.pair_spacing / 2.0;
            pieces.decorations.push(Decoration::Triangle {
                tag: ElementTag::new(NodeKind::Separator, pair_idx - 1),
                points: separator_points(mid_x, rail_y, cfg.separator_size),
            });
        }

        last_x = pair_x;
        pair_x += cfg.pair_spacing;
    }

    pieces.decorations.push(Decoration::RailLine {
        tag: ElementTag::new(NodeKind::Separator, analogies.len()),
        from: (rail_start - cfg.rail_overhang, rail_y),
        to: (last_x + cfg.rail_overhang, rail_y),
    });
    pieces.nodes.push(dimension);

    // Alternative-dimension chips live in a footer band below the pairs.
    // The band is reserved even when no chips exist so edits that add or
    // remove dimensions do not reflow the rest of the diagram.
    let content_bottom = pieces
        .nodes
        .iter()
        .map(|n| n.bottom())
        .fold(rail_y, f32::max);
    let footer_mid = content_bottom + cfg.footer_height / 2.0;
    let mut chip_x = rail_start - cfg.rail_overhang;
    for (chip_idx, text) in alternative_dimensions.iter().enumerate() {
        let mut chip = box_node(
            &ctx.measurer,
            ElementTag::new(NodeKind::AltDimension, chip_idx),
            text,
            StyleSlot::Secondary,
            &ctx.styles.secondary,
            cfg.chip_padding,
            0.0,
        );
        chip.cx = chip_x + chip.size.width() / 2.0;
        chip.cy = footer_mid;
        chip_x = chip.right() + cfg.chip_gap;
        pieces.nodes.push(chip);
    }
    pieces.reserve_bottom = content_bottom + cfg.footer_height;

    pieces
}

fn separator_points(x: f32, rail_y: f32, size: f32) -> [Point; 3] {
    [
        (x, rail_y - size),
        (x - size * 0.8, rail_y),
        (x + size * 0.8, rail_y),
    ]
}
