//! Concept map layout. Upstream-precomputed normalized positions are used
//! when supplied; otherwise concepts fall back to a deterministic radial
//! assignment with up to six primary sectors and secondary radius tiers.
//! Relationship edges are quadratic curves with labels placed by the
//! iterative non-overlap search.

use std::collections::HashMap;
use std::f32::consts::PI;

use crate::error::Degradation;
use crate::spec::{PrecomputedLayout, Relationship};
use crate::theme::StyleSlot;

use super::label_placement::LabelPlacer;
use super::sizing::{box_node, circle_node};
use super::types::{Connector, ConnectorKind, ElementTag, LayoutNode, NodeKind, Point};
use super::{LayoutCtx, Pieces};

// Control-point multipliers cycled across edges so parallel edges between
// nearby nodes bend apart instead of stacking.
const CURVATURE_CYCLE: [f32; 5] = [0.0, 1.0, -1.0, 2.0, -2.0];

pub(super) fn layout_concept(
    topic: &str,
    concepts: &[String],
    relationships: &[Relationship],
    precomputed: Option<&PrecomputedLayout>,
    ctx: &LayoutCtx<'_>,
) -> Pieces {
    let cfg = &ctx.config.concept;
    let mut pieces = Pieces::default();

    let mut topic_node = circle_node(
        &ctx.measurer,
        ElementTag::new(NodeKind::Topic, 0),
        topic,
        StyleSlot::Topic,
        &ctx.styles.topic,
        cfg.node_padding * 2.0,
        0.0,
    );

    let mut concept_nodes: Vec<LayoutNode> = concepts
        .iter()
        .enumerate()
        .map(|(idx, text)| {
            box_node(
                &ctx.measurer,
                ElementTag::new(NodeKind::Concept, idx),
                text,
                StyleSlot::Primary,
                &ctx.styles.primary,
                cfg.node_padding,
                cfg.min_node_width,
            )
        })
        .collect();

    match precomputed {
        Some(layout) => {
            if let Some(pos) = layout.positions.get(topic) {
                topic_node.cx = pos[0] * cfg.spacing_factor;
                topic_node.cy = pos[1] * cfg.spacing_factor;
            }
            for (node, text) in concept_nodes.iter_mut().zip(concepts) {
                if let Some(pos) = layout.positions.get(text) {
                    node.cx = pos[0] * cfg.spacing_factor;
                    node.cy = pos[1] * cfg.spacing_factor;
                } else {
                    log::warn!("no precomputed position for concept {text:?}");
                }
            }
        }
        None => {
            log::info!("no precomputed positions, using radial sector fallback");
            pieces.degradations.push(Degradation::LayoutFallback);
            place_radial(&mut concept_nodes, cfg.max_primary, cfg.base_radius, cfg.tier_increment);
        }
    }

    let by_text: HashMap<&str, usize> = concepts
        .iter()
        .enumerate()
        .map(|(idx, text)| (text.as_str(), idx + 1))
        .chain(std::iter::once((topic, 0)))
        .collect();
    let all_nodes: Vec<&LayoutNode> = std::iter::once(&topic_node)
        .chain(concept_nodes.iter())
        .collect();

    let obstacles = all_nodes.iter().map(|n| n.rect()).collect();
    let mut placer = LabelPlacer::new(obstacles);

    for (edge_idx, relationship) in relationships.iter().enumerate() {
        let (Some(&from_idx), Some(&to_idx)) = (
            by_text.get(relationship.from.as_str()),
            by_text.get(relationship.to.as_str()),
        ) else {
            log::warn!(
                "relationship {:?} -> {:?} names an unknown concept, skipping",
                relationship.from,
                relationship.to
            );
            continue;
        };
        let from_node = all_nodes[from_idx];
        let to_node = all_nodes[to_idx];
        let from = from_node.boundary_toward((to_node.cx, to_node.cy));
        let to = to_node.boundary_toward((from_node.cx, from_node.cy));

        let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
        let (tangent, normal) = edge_frame(from, to);
        let bend = CURVATURE_CYCLE[edge_idx % CURVATURE_CYCLE.len()] * cfg.edge_offset;
        let control = (mid.0 + normal.0 * bend, mid.1 + normal.1 * bend);

        let (label, label_anchor) = if relationship.label.is_empty() {
            (None, None)
        } else {
            let block = ctx
                .measurer
                .measure_label(&relationship.label, ctx.styles.secondary.font_size * 0.9);
            // The curve passes through (mid + control) / 2 at its apex.
            let apex = ((mid.0 + control.0) / 2.0, (mid.1 + control.1) / 2.0);
            let anchor = placer.place(
                apex,
                normal,
                tangent,
                block.width,
                block.height,
                cfg.label_gap,
                cfg.label_attempts,
            );
            (Some(block), Some(anchor))
        };
        pieces.connectors.push(Connector {
            tag: ElementTag::new(NodeKind::Relationship, edge_idx),
            kind: ConnectorKind::DirectedCurve { from, to, control },
            label,
            label_anchor,
        });
    }

    pieces.nodes.push(topic_node);
    pieces.nodes.extend(concept_nodes);
    pieces
}

/// Evenly spreads the first `max_primary` concepts around the topic, then
/// pushes the remainder outward one radius tier per group of sectors.
fn place_radial(nodes: &mut [LayoutNode], max_primary: usize, base_radius: f32, tier_increment: f32) {
    let total = nodes.len();
    for (idx, node) in nodes.iter_mut().enumerate() {
        let tier = idx / max_primary;
        let slot = idx % max_primary;
        let count = nodes_in_tier(total, tier, max_primary);
        let radius = base_radius + tier as f32 * tier_increment;
        // Offset odd tiers by half a sector so rings interleave.
        let phase = if tier % 2 == 0 { 0.0 } else { PI / count as f32 };
        let angle = -PI / 2.0 + phase + 2.0 * PI * slot as f32 / count as f32;
        node.cx = radius * angle.cos();
        node.cy = radius * angle.sin();
    }
}

fn nodes_in_tier(total: usize, tier: usize, max_primary: usize) -> usize {
    let start = tier * max_primary;
    total.saturating_sub(start).min(max_primary).max(1)
}

fn edge_frame(from: Point, to: Point) -> (Point, Point) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let len = (dx * dx + dy * dy).sqrt().max(1e-6);
    let tangent = (dx / len, dy / len);
    let normal = (-tangent.1, tangent.0);
    (tangent, normal)
}
