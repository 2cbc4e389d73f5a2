//! Brace map layout: whole on the left, parts in a middle column, subparts
//! on the right, with parametric curly brackets spanning each child group.
//! Tip depth and arc radius are fixed fractions of the span height.

use crate::spec::BracePart;
use crate::theme::StyleSlot;

use super::sizing::box_node;
use super::types::{
    BracketPath, Connector, ConnectorKind, ElementTag, LayoutNode, NodeKind,
};
use super::{LayoutCtx, Pieces};

pub(super) fn layout_brace(topic: &str, parts: &[BracePart], ctx: &LayoutCtx<'_>) -> Pieces {
    let cfg = &ctx.config.brace;
    let mut pieces = Pieces::default();

    let mut whole = box_node(
        &ctx.measurer,
        ElementTag::new(NodeKind::Topic, 0),
        topic,
        StyleSlot::Topic,
        &ctx.styles.topic,
        cfg.node_padding * 1.5,
        0.0,
    );

    struct Group {
        part: LayoutNode,
        subparts: Vec<LayoutNode>,
        span: f32,
    }

    let mut groups = Vec::with_capacity(parts.len());
    for (part_idx, part) in parts.iter().enumerate() {
        let part_node = box_node(
            &ctx.measurer,
            ElementTag::new(NodeKind::Part, part_idx),
            &part.name,
            StyleSlot::Primary,
            &ctx.styles.primary,
            cfg.node_padding,
            0.0,
        );
        let subparts: Vec<LayoutNode> = part
            .subparts
            .iter()
            .enumerate()
            .map(|(sub_idx, text)| {
                box_node(
                    &ctx.measurer,
                    ElementTag::child(NodeKind::Subpart, part_idx, sub_idx),
                    text,
                    StyleSlot::Secondary,
                    &ctx.styles.secondary,
                    cfg.node_padding,
                    0.0,
                )
            })
            .collect();
        let sub_span = if subparts.is_empty() {
            0.0
        } else {
            subparts.iter().map(|n| n.size.height()).sum::<f32>()
                + cfg.item_gap * (subparts.len() as f32 - 1.0)
        };
        let span = sub_span.max(part_node.size.height());
        groups.push(Group {
            part: part_node,
            subparts,
            span,
        });
    }

    // Column content widths, accumulated left to right.
    let whole_width = whole.size.width();
    let part_width = groups
        .iter()
        .map(|g| g.part.size.width())
        .fold(0.0, f32::max);
    let part_x = whole_width + cfg.column_gap;
    let sub_x = part_x + part_width + cfg.column_gap;

    // Stack part groups; each part vertically centers on its subpart span.
    let group_gap = cfg.item_gap * 2.0;
    let mut cursor_y = 0.0;
    for group in &mut groups {
        let mid = cursor_y + group.span / 2.0;
        group.part.cx = part_x + group.part.size.width() / 2.0;
        group.part.cy = mid;
        let mut sub_cursor = mid
            - (group.span.min(
                group
                    .subparts
                    .iter()
                    .map(|n| n.size.height())
                    .sum::<f32>()
                    + cfg.item_gap * (group.subparts.len().saturating_sub(1)) as f32,
            )) / 2.0;
        for sub in &mut group.subparts {
            let height = sub.size.height();
            sub.cx = sub_x + sub.size.width() / 2.0;
            sub.cy = sub_cursor + height / 2.0;
            sub_cursor += height + cfg.item_gap;
        }
        cursor_y += group.span + group_gap;
    }

    // The whole centers on the full part span, which is also the main
    // bracket's vertical center.
    let parts_top = groups.first().map(|g| g.part.cy - g.span / 2.0).unwrap_or(0.0);
    let parts_bottom = groups
        .last()
        .map(|g| g.part.cy + g.span / 2.0)
        .unwrap_or(0.0);
    whole.cx = whole_width / 2.0;
    whole.cy = (parts_top + parts_bottom) / 2.0;

    // Main bracket between whole and the part column.
    if !groups.is_empty() {
        let span = parts_bottom - parts_top;
        pieces.connectors.push(Connector {
            tag: ElementTag::new(NodeKind::Topic, 0),
            kind: ConnectorKind::CurlyBracket(BracketPath {
                anchor: (whole.right(), whole.cy),
                x: part_x - cfg.column_gap / 2.0,
                top: parts_top,
                bottom: parts_bottom,
                tip_depth: span * cfg.tip_depth_ratio,
                arc_radius: span * cfg.arc_radius_ratio,
                direction: 1.0,
            }),
            label: None,
            label_anchor: None,
        });
    }

    // One bracket per part with subparts.
    for group in &groups {
        if group.subparts.is_empty() {
            continue;
        }
        let top = group.subparts.first().map(|n| n.top()).unwrap_or(0.0);
        let bottom = group.subparts.last().map(|n| n.bottom()).unwrap_or(0.0);
        let span = bottom - top;
        pieces.connectors.push(Connector {
            tag: ElementTag::new(NodeKind::Part, group.part.tag.index),
            kind: ConnectorKind::CurlyBracket(BracketPath {
                anchor: (group.part.right(), group.part.cy),
                x: sub_x - cfg.column_gap / 2.0,
                top,
                bottom,
                tip_depth: span * cfg.tip_depth_ratio,
                arc_radius: span * cfg.arc_radius_ratio,
                direction: 1.0,
            }),
            label: None,
            label_anchor: None,
        });
    }

    pieces.nodes.push(whole);
    for group in groups {
        pieces.nodes.push(group.part);
        pieces.nodes.extend(group.subparts);
    }
    pieces
}
