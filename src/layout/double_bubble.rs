//! Dual-column compare layout: two topics, a middle column of shared
//! attributes, and inner columns of side-unique attributes.

use crate::theme::StyleSlot;

use super::sizing::{circle_node, uniform_radius};
use super::types::{Connector, ConnectorKind, ElementTag, LayoutNode, NodeKind, NodeSize};
use super::{LayoutCtx, Pieces};

pub(super) fn layout_double_bubble(
    left: &str,
    right: &str,
    similarities: &[String],
    left_differences: &[String],
    right_differences: &[String],
    ctx: &LayoutCtx<'_>,
) -> Pieces {
    let cfg = &ctx.config.double_bubble;
    let bubble = &ctx.config.bubble;
    let mut pieces = Pieces::default();

    let mut left_topic = circle_node(
        &ctx.measurer,
        ElementTag::new(NodeKind::Topic, 0),
        left,
        StyleSlot::Topic,
        &ctx.styles.topic,
        bubble.topic_padding,
        bubble.min_topic_radius,
    );
    let mut right_topic = circle_node(
        &ctx.measurer,
        ElementTag::new(NodeKind::Topic, 1),
        right,
        StyleSlot::Topic,
        &ctx.styles.topic,
        bubble.topic_padding,
        bubble.min_topic_radius,
    );

    let mut sim_nodes = make_column(similarities, NodeKind::Similarity, StyleSlot::Primary, ctx);
    let mut left_nodes = make_column(
        left_differences,
        NodeKind::LeftDifference,
        StyleSlot::Secondary,
        ctx,
    );
    let mut right_nodes = make_column(
        right_differences,
        NodeKind::RightDifference,
        StyleSlot::Secondary,
        ctx,
    );

    // Shared attributes are uniform among themselves; unique attributes are
    // uniform across BOTH sides so the two evidence columns mirror.
    let sim_radius = assign_uniform(&mut sim_nodes, &[]);
    let diff_required: Vec<f32> = left_nodes
        .iter()
        .chain(right_nodes.iter())
        .map(|node| node.effective_radius())
        .collect();
    let diff_radius = uniform_radius(&diff_required);
    for node in left_nodes.iter_mut().chain(right_nodes.iter_mut()) {
        node.size = NodeSize::Circle {
            radius: diff_radius,
        };
    }

    // Column height is the max of the three content heights; everything
    // centers vertically on that span.
    stack_column(&mut sim_nodes, cfg.item_gap);
    stack_column(&mut left_nodes, cfg.item_gap);
    stack_column(&mut right_nodes, cfg.item_gap);

    let x_inner = sim_radius + cfg.column_gap + diff_radius;
    for node in &mut left_nodes {
        node.cx = -x_inner;
    }
    for node in &mut right_nodes {
        node.cx = x_inner;
    }

    let left_topic_r = left_topic.effective_radius();
    let right_topic_r = right_topic.effective_radius();
    left_topic.cx = -(x_inner + diff_radius + cfg.column_gap + left_topic_r);
    left_topic.cy = 0.0;
    right_topic.cx = x_inner + diff_radius + cfg.column_gap + right_topic_r;
    right_topic.cy = 0.0;

    for node in &sim_nodes {
        push_link(&mut pieces, &left_topic, node);
        push_link(&mut pieces, &right_topic, node);
    }
    for node in &left_nodes {
        push_link(&mut pieces, &left_topic, node);
    }
    for node in &right_nodes {
        push_link(&mut pieces, &right_topic, node);
    }

    pieces.nodes.push(left_topic);
    pieces.nodes.push(right_topic);
    pieces.nodes.extend(sim_nodes);
    pieces.nodes.extend(left_nodes);
    pieces.nodes.extend(right_nodes);
    pieces
}

fn make_column(
    items: &[String],
    kind: NodeKind,
    slot: StyleSlot,
    ctx: &LayoutCtx<'_>,
) -> Vec<LayoutNode> {
    let cfg = &ctx.config.double_bubble;
    items
        .iter()
        .enumerate()
        .map(|(idx, text)| {
            circle_node(
                &ctx.measurer,
                ElementTag::new(kind, idx),
                text,
                slot,
                ctx.styles.slot(slot),
                cfg.node_padding,
                cfg.min_radius,
            )
        })
        .collect()
}

fn assign_uniform(nodes: &mut [LayoutNode], extra: &[f32]) -> f32 {
    let mut required: Vec<f32> = nodes.iter().map(|node| node.effective_radius()).collect();
    required.extend_from_slice(extra);
    let radius = uniform_radius(&required);
    for node in nodes.iter_mut() {
        node.size = NodeSize::Circle { radius };
    }
    radius
}

/// Stack circles vertically, centered on y = 0.
fn stack_column(nodes: &mut [LayoutNode], gap: f32) {
    if nodes.is_empty() {
        return;
    }
    let total: f32 = nodes
        .iter()
        .map(|node| node.size.height())
        .sum::<f32>()
        + gap * (nodes.len() as f32 - 1.0);
    let mut cursor = -total / 2.0;
    for node in nodes.iter_mut() {
        let height = node.size.height();
        node.cy = cursor + height / 2.0;
        cursor += height + gap;
    }
}

fn push_link(pieces: &mut Pieces, topic: &LayoutNode, node: &LayoutNode) {
    let from = topic.boundary_toward((node.cx, node.cy));
    let to = node.boundary_toward((topic.cx, topic.cy));
    pieces.connectors.push(Connector {
        tag: node.tag,
        kind: ConnectorKind::Straight {
            from,
            to,
            arrow: false,
        },
        label: None,
        label_anchor: None,
    });
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
    fn differences_share_one_radius_across_sides() {
        let theme = Theme::classic();
        let config = fast_config();
        let ctx = LayoutCtx::new(&theme, &config, DiagramFamily::DoubleBubble).unwrap();
        let pieces = layout_double_bubble(
            "Cats",
            "Dogs",
            &["mammal".to_string()],
            &["independent".to_string(), "retractable claws".to_string()],
            &["pack animal".to_string()],
            &ctx,
        );
        let radii: Vec<f32> = pieces
            .nodes
            .iter()
            .filter(|node| {
                matches!(
                    node.tag.kind,
                    NodeKind::LeftDifference | NodeKind::RightDifference
                )
            })
            .map(|node| node.effective_radius())
            .collect();
        assert_eq!(radii.len(), 3);
        for radius in &radii {
            assert!((radius - radii[0]).abs() < 1e-4);
        }
    }

    #[test]
    fn topics_center_on_the_tallest_column() {
        let theme = Theme::classic();
        let config = fast_config();
        let ctx = LayoutCtx::new(&theme, &config, DiagramFamily::DoubleBubble).unwrap();
        let pieces = layout_double_bubble(
            "A",
            "B",
            &["s1".to_string(), "s2".to_string(), "s3".to_string()],
            &["d1".to_string()],
            &["d2".to_string()],
            &ctx,
        );
        for topic in pieces.nodes.iter().filter(|n| n.tag.kind == NodeKind::Topic) {
            assert!(topic.cy.abs() < 1e-4);
        }
        // Similarity column is the tallest and centers on zero too.
        let sims: Vec<_> = pieces
            .nodes
            .iter()
            .filter(|n| n.tag.kind == NodeKind::Similarity)
            .collect();
        let mid = sims.iter().map(|n| n.cy).sum::<f32>() / sims.len() as f32;
        assert!(mid.abs() < 1e-3);
    }

    #[test]
    fn similarities_link_to_both_topics() {
        let theme = Theme::classic();
        let config = fast_config();
        let ctx = LayoutCtx::new(&theme, &config, DiagramFamily::DoubleBubble).unwrap();
        let pieces = layout_double_bubble(
            "A",
            "B",
            &["shared".to_string()],
            &["left only".to_string()],
            &["right only".to_string()],
            &ctx,
        );
        let sim_links = pieces
            .connectors
            .iter()
            .filter(|c| c.tag.kind == NodeKind::Similarity)
            .count();
        assert_eq!(sim_links, 2);
        assert_eq!(pieces.connectors.len(), 4);
    }
}
