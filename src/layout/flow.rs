//! Flow map layout: a title over a vertical chain of steps, with optional
//! substep groups hung off to the right of their owning step.

use std::collections::BTreeMap;

use crate::spec::SubstepGroup;
use crate::theme::StyleSlot;

use super::sizing::box_node;
use super::types::{Connector, ConnectorKind, ElementTag, LayoutNode, NodeKind};
use super::{LayoutCtx, Pieces};

pub(super) fn layout_flow(
    title: &str,
    steps: &[String],
    substeps: &[SubstepGroup],
    ctx: &LayoutCtx<'_>,
) -> Pieces {
    let cfg = &ctx.config.flow;
    let mut pieces = Pieces::default();

    let groups: BTreeMap<&str, &SubstepGroup> =
        substeps.iter().map(|g| (g.step.as_str(), g)).collect();

    let mut title_node = box_node(
        &ctx.measurer,
        ElementTag::new(NodeKind::Title, 0),
        title,
        StyleSlot::Topic,
        &ctx.styles.topic,
        cfg.node_padding * 1.5,
        0.0,
    );

    let mut step_nodes: Vec<LayoutNode> = steps
        .iter()
        .enumerate()
        .map(|(idx, text)| {
            box_node(
                &ctx.measurer,
                ElementTag::new(NodeKind::Step, idx),
                text,
                StyleSlot::Accent,
                &ctx.styles.accent,
                cfg.node_padding,
                cfg.min_step_width,
            )
        })
        .collect();

    let chain_cx = step_nodes
        .iter()
        .map(|n| n.size.width())
        .fold(0.0, f32::max)
        / 2.0;
    let chain_right = chain_cx * 2.0;

    title_node.cx = chain_cx;
    title_node.cy = title_node.size.height() / 2.0;
    let mut cursor_y = title_node.bottom() + cfg.title_gap;

    let mut substep_nodes: Vec<LayoutNode> = Vec::new();
    for (step_idx, step) in step_nodes.iter_mut().enumerate() {
        step.cx = chain_cx;
        let group = groups.get(steps[step_idx].as_str());
        let subs: Vec<LayoutNode> = group
            .map(|g| {
                g.substeps
                    .iter()
                    .enumerate()
                    .map(|(sub_idx, text)| {
                        box_node(
                            &ctx.measurer,
                            ElementTag::child(NodeKind::Substep, step_idx, sub_idx),
                            text,
                            StyleSlot::Secondary,
                            &ctx.styles.secondary,
                            cfg.node_padding,
                            0.0,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        let sub_span = if subs.is_empty() {
            0.0
        } else {
            subs.iter().map(|n| n.size.height()).sum::<f32>()
                + cfg.substep_gap * (subs.len() as f32 - 1.0)
        };
        let span = sub_span.max(step.size.height());

        // A step with substeps re-centers on its group's span.
        step.cy = cursor_y + span / 2.0;

        if !subs.is_empty() {
            let sub_left = chain_right + cfg.side_gap;
            let mid_x = (chain_right + sub_left) / 2.0;
            let mut sub_cursor = step.cy - sub_span / 2.0;
            for mut sub in subs {
                let height = sub.size.height();
                sub.cx = sub_left + sub.size.width() / 2.0;
                sub.cy = sub_cursor + height / 2.0;
                sub_cursor += height + cfg.substep_gap;
                pieces.connectors.push(Connector {
                    tag: sub.tag,
                    kind: ConnectorKind::OrthogonalL {
                        points: vec![
                            (step.right(), step.cy),
                            (mid_x, step.cy),
                            (mid_x, sub.cy),
                            (sub.left(), sub.cy),
                        ],
                    },
                    label: None,
                    label_anchor: None,
                });
                substep_nodes.push(sub);
            }
        }

        cursor_y += span + cfg.step_gap;
    }

    for window in step_nodes.windows(2) {
        let (from, to) = (&window[0], &window[1]);
        pieces.connectors.push(Connector {
            tag: to.tag,
            kind: ConnectorKind::Straight {
                from: (from.cx, from.bottom()),
                to: (to.cx, to.top()),
                arrow: true,
            },
            label: None,
            label_anchor: None,
        });
    }

    pieces.nodes.push(title_node);
    pieces.nodes.extend(step_nodes);
    pieces.nodes.extend(substep_nodes);
    pieces
}
