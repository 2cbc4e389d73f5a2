//! Radial layout for the bubble and circle families: a fixed central topic
//! with uniformly sized siblings on a ring, relaxed to remove residual
//! overlap.

use std::f32::consts::PI;

use crate::theme::StyleSlot;

use super::sizing::{circle_node, radius_for_label, uniform_radius};
use super::types::{Connector, ConnectorKind, Decoration, ElementTag, NodeKind, NodeSize};
use super::{LayoutCtx, Pieces};

pub(super) fn layout_radial(
    topic: &str,
    siblings: &[String],
    sibling_kind: NodeKind,
    with_frame: bool,
    ctx: &LayoutCtx<'_>,
) -> Pieces {
    let cfg = &ctx.config.bubble;
    let mut pieces = Pieces::default();

    let mut topic_node = circle_node(
        &ctx.measurer,
        ElementTag::new(NodeKind::Topic, 0),
        topic,
        StyleSlot::Topic,
        &ctx.styles.topic,
        cfg.topic_padding,
        cfg.min_topic_radius,
    );
    topic_node.cx = 0.0;
    topic_node.cy = 0.0;
    let topic_radius = match topic_node.size {
        NodeSize::Circle { radius } => radius,
        NodeSize::Box { .. } => unreachable!("topic is circular"),
    };

    let n = siblings.len();
    let mut sibling_nodes = Vec::with_capacity(n);
    let mut required = Vec::with_capacity(n);
    for (idx, text) in siblings.iter().enumerate() {
        let node = circle_node(
            &ctx.measurer,
            ElementTag::new(sibling_kind, idx),
            text,
            StyleSlot::Primary,
            &ctx.styles.primary,
            cfg.node_padding,
            cfg.min_radius,
        );
        required.push(match node.size {
            NodeSize::Circle { radius } => radius,
            NodeSize::Box { .. } => 0.0,
        });
        sibling_nodes.push(node);
    }

    // Symmetry rule: every sibling takes the group's maximum radius.
    let r_uniform = uniform_radius(&required);
    for node in &mut sibling_nodes {
        node.size = NodeSize::Circle { radius: r_uniform };
    }

    let ring_radius = ring_radius(topic_radius, r_uniform, n, cfg);
    let targets: Vec<(f32, f32)> = (0..n)
        .map(|idx| {
            let angle = -PI / 2.0 + idx as f32 * 2.0 * PI / n.max(1) as f32;
            (ring_radius * angle.cos(), ring_radius * angle.sin())
        })
        .collect();
    for (node, target) in sibling_nodes.iter_mut().zip(&targets) {
        node.cx = target.0;
        node.cy = target.1;
    }

    relax_ring(&mut sibling_nodes, &targets, topic_radius, r_uniform, cfg);

    for node in &sibling_nodes {
        let from = topic_node.boundary_toward((node.cx, node.cy));
        let to = node.boundary_toward((topic_node.cx, topic_node.cy));
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

    if with_frame {
        let reach = sibling_nodes
            .iter()
            .map(|node| (node.cx * node.cx + node.cy * node.cy).sqrt() + r_uniform)
            .fold(topic_radius, f32::max);
        pieces.decorations.push(Decoration::FrameCircle {
            tag: ElementTag::new(NodeKind::Frame, 0),
            cx: 0.0,
            cy: 0.0,
            radius: reach + cfg.frame_margin,
        });
    }

    pieces.nodes.push(topic_node);
    pieces.nodes.extend(sibling_nodes);
    pieces
}

/// Ring distance resolving the radial and circumferential constraints,
/// taking the larger.
fn ring_radius(
    topic_radius: f32,
    sibling_radius: f32,
    count: usize,
    cfg: &crate::config::BubbleConfig,
) -> f32 {
    let radial_min = topic_radius + cfg.radial_gap + sibling_radius;
    if count == 0 {
        return radial_min;
    }
    let multiplier = if count <= cfg.band_small_max {
        cfg.spacing_small
    } else if count <= cfg.band_medium_max {
        cfg.spacing_medium
    } else {
        cfg.spacing_large
    };
    let circumferential_min = (sibling_radius * count as f32 * multiplier) / (2.0 * PI);
    radial_min.max(circumferential_min)
}

/// Spring-style pass: siblings are pulled toward their angular target while
/// repelling from neighbors and the topic.
fn relax_ring(
    nodes: &mut [super::types::LayoutNode],
    targets: &[(f32, f32)],
    topic_radius: f32,
    sibling_radius: f32,
    cfg: &crate::config::BubbleConfig,
) {
    let min_pair_dist = sibling_radius * 2.0 + 4.0;
    let min_topic_dist = topic_radius + cfg.radial_gap * 0.5 + sibling_radius;
    for _ in 0..cfg.relax_iterations {
        let mut moved = false;
        for i in 0..nodes.len() {
            // Pull back toward the assigned angular slot.
            let (tx, ty) = targets[i];
            let dx = tx - nodes[i].cx;
            let dy = ty - nodes[i].cy;
            nodes[i].cx += dx * cfg.relax_step * 0.3;
            nodes[i].cy += dy * cfg.relax_step * 0.3;

            // Repel from the topic.
            let dist = (nodes[i].cx * nodes[i].cx + nodes[i].cy * nodes[i].cy).sqrt();
            if dist > f32::EPSILON && dist < min_topic_dist {
                let push = (min_topic_dist - dist) * cfg.relax_step;
                nodes[i].cx += nodes[i].cx / dist * push;
                nodes[i].cy += nodes[i].cy / dist * push;
                moved = true;
            }
        }
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let dx = nodes[j].cx - nodes[i].cx;
                let dy = nodes[j].cy - nodes[i].cy;
                let dist = (dx * dx + dy * dy).sqrt().max(1e-3);
                if dist < min_pair_dist {
                    let push = (min_pair_dist - dist) / 2.0 * cfg.relax_step;
                    let (ux, uy) = (dx / dist, dy / dist);
                    nodes[i].cx -= ux * push;
                    nodes[i].cy -= uy * push;
                    nodes[j].cx += ux * push;
                    nodes[j].cy += uy * push;
                    moved = true;
                }
            }
        }
        if !moved {
            break;
        }
    }
}
