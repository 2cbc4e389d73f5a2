//! Multi-flow layout: a central event with cause boxes flanking it on the
//! left and effect boxes on the right, directed arrows flowing left to
//! right.

use crate::theme::StyleSlot;

use super::sizing::box_node;
use super::types::{Connector, ConnectorKind, ElementTag, LayoutNode, NodeKind};
use super::{LayoutCtx, Pieces};

pub(super) fn layout_multi_flow(
    event: &str,
    causes: &[String],
    effects: &[String],
    ctx: &LayoutCtx<'_>,
) -> Pieces {
    let cfg = &ctx.config.multi_flow;
    let mut pieces = Pieces::default();

    let mut event_node = box_node(
        &ctx.measurer,
        ElementTag::new(NodeKind::Event, 0),
        event,
        StyleSlot::Topic,
        &ctx.styles.topic,
        cfg.node_padding * 1.5,
        cfg.min_node_width,
    );
    event_node.cx = 0.0;
    event_node.cy = 0.0;

    let mut cause_nodes = make_column(causes, NodeKind::Cause, ctx);
    let mut effect_nodes = make_column(effects, NodeKind::Effect, ctx);
    stack_centered(&mut cause_nodes, cfg.item_gap);
    stack_centered(&mut effect_nodes, cfg.item_gap);

    let cause_width = column_width(&cause_nodes);
    let effect_width = column_width(&effect_nodes);
    let event_half = event_node.size.width() / 2.0;
    for node in &mut cause_nodes {
        node.cx = -(event_half + cfg.column_gap + cause_width / 2.0);
    }
    for node in &mut effect_nodes {
        node.cx = event_half + cfg.column_gap + effect_width / 2.0;
    }

    for node in &cause_nodes {
        let from = node.boundary_toward((event_node.cx, node.cy));
        let to = event_node.boundary_toward((node.cx, node.cy));
        pieces.connectors.push(Connector {
            tag: node.tag,
            kind: ConnectorKind::Straight {
                from,
                to,
                arrow: true,
            },
            label: None,
            label_anchor: None,
        });
    }
    for node in &effect_nodes {
        let from = event_node.boundary_toward((node.cx, node.cy));
        let to = node.boundary_toward((event_node.cx, node.cy));
        pieces.connectors.push(Connector {
            tag: node.tag,
            kind: ConnectorKind::Straight {
                from,
                to,
                arrow: true,
            },
            label: None,
            label_anchor: None,
        });
    }

    pieces.nodes.push(event_node);
    pieces.nodes.extend(cause_nodes);
    pieces.nodes.extend(effect_nodes);
    pieces
}

fn make_column(items: &[String], kind: NodeKind, ctx: &LayoutCtx<'_>) -> Vec<LayoutNode> {
    let cfg = &ctx.config.multi_flow;
    items
        .iter()
        .enumerate()
        .map(|(idx, text)| {
            box_node(
                &ctx.measurer,
                ElementTag::new(kind, idx),
                text,
                StyleSlot::Primary,
                &ctx.styles.primary,
                cfg.node_padding,
                cfg.min_node_width,
            )
        })
        .collect()
}

fn stack_centered(nodes: &mut [LayoutNode], gap: f32) {
    if nodes.is_empty() {
        return;
    }
    let total: f32 = nodes.iter().map(|node| node.size.height()).sum::<f32>()
        + gap * (nodes.len() as f32 - 1.0);
    let mut cursor = -total / 2.0;
    for node in nodes.iter_mut() {
        let height = node.size.height();
        node.cy = cursor + height / 2.0;
        cursor += height + gap;
    }
}

fn column_width(nodes: &[LayoutNode]) -> f32 {
    nodes
        .iter()
        .map(|node| node.size.width())
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::spec::DiagramFamily;
    use crate::theme::Theme;

    fn fast_config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn causes_sit_left_effects_sit_right() {
        let theme = Theme::classic();
        let config = fast_config();
        let ctx = LayoutCtx::new(&theme, &config, DiagramFamily::MultiFlow).unwrap();
        let pieces = layout_multi_flow(
            "Storm",
            &["low pressure".to_string(), "warm ocean".to_string()],
            &["flooding".to_string()],
            &ctx,
        );
        for node in &pieces.nodes {
            match node.tag.kind {
                NodeKind::Cause => assert!(node.right() < 0.0),
                NodeKind::Effect => assert!(node.left() > 0.0),
                _ => {}
            }
        }
    }

    #[test]
    fn every_arrow_points_along_the_causal_flow() {
        let theme = Theme::classic();
        let config = fast_config();
        let ctx = LayoutCtx::new(&theme, &config, DiagramFamily::MultiFlow).unwrap();
        let pieces = layout_multi_flow(
            "Event",
            &["c1".to_string()],
            &["e1".to_string(), "e2".to_string()],
            &ctx,
        );
        assert_eq!(pieces.connectors.len(), 3);
        for connector in &pieces.connectors {
            let ConnectorKind::Straight { from, to, arrow } = &connector.kind else {
                panic!("expected straight arrows");
            };
            assert!(*arrow);
            assert!(from.0 < to.0, "arrow should flow left to right");
        }
    }
}
