//! Mind map layout: a central topic with recursively nested branches.
//! The first half of the top-level branches fans out to the right, the
//! second half to the left, and every parent sits vertically centered on
//! its subtree's span, computed children-first.

use crate::spec::MindNode;
use crate::theme::StyleSlot;

use super::sizing::box_node;
use super::types::{Connector, ConnectorKind, ElementTag, LayoutNode, NodeKind};
use super::{LayoutCtx, Pieces};

struct Entry {
    node: LayoutNode,
    children: Vec<usize>,
    /// Vertical extent of this node's whole subtree, gaps included.
    span: f32,
}

pub(super) fn layout_mind(topic: &str, children: &[MindNode], ctx: &LayoutCtx<'_>) -> Pieces {
    let cfg = &ctx.config.mind;
    let mut pieces = Pieces::default();

    let mut root = box_node(
        &ctx.measurer,
        ElementTag::new(NodeKind::Topic, 0),
        topic,
        StyleSlot::Topic,
        &ctx.styles.topic,
        cfg.node_padding * 1.5,
        cfg.min_node_width,
    );
    root.cx = 0.0;
    root.cy = 0.0;

    let mut entries: Vec<Entry> = Vec::new();
    let top_level: Vec<usize> = children
        .iter()
        .map(|child| size_subtree(child, 0, 1, &mut entries, ctx))
        .collect();

    // Gaps tighten as the map grows, floored near the base font size.
    let node_count = entries.len() + 1;
    let density = if node_count >= 10 {
        0.7
    } else if node_count >= 6 {
        0.8
    } else {
        1.0
    };
    let h_gap = (cfg.branch_gap * density).max(ctx.styles.primary.font_size * 1.1);
    let v_gap = (cfg.sibling_gap * density).max(ctx.styles.primary.font_size * 0.9);

    for &idx in &top_level {
        subtree_span(idx, &mut entries, v_gap);
    }

    // First half of the top-level branches goes right, the rest left, so
    // the map stays balanced around the topic.
    let mid = top_level.len().div_ceil(2);
    place_side(&top_level[..mid], 1.0, &root, &mut entries, h_gap, v_gap);
    place_side(&top_level[mid..], -1.0, &root, &mut entries, h_gap, v_gap);

    for &idx in &top_level {
        connect(&root, idx, &entries, &mut pieces);
    }
    for entry_idx in 0..entries.len() {
        for &child_idx in &entries[entry_idx].children {
            connect(&entries[entry_idx].node, child_idx, &entries, &mut pieces);
        }
    }

    pieces.nodes.push(root);
    pieces.nodes.extend(entries.into_iter().map(|entry| entry.node));
    pieces
}

/// Sizes `node` and its descendants depth-first, returning the entry index.
/// DFS order gives every node a stable identifier independent of placement.
fn size_subtree(
    node: &MindNode,
    parent_id: usize,
    depth: usize,
    entries: &mut Vec<Entry>,
    ctx: &LayoutCtx<'_>,
) -> usize {
    let (slot, style) = if depth == 1 {
        (StyleSlot::Primary, &ctx.styles.primary)
    } else {
        (StyleSlot::Secondary, &ctx.styles.secondary)
    };
    let idx = entries.len();
    let dfs_id = idx + 1;
    let sized = box_node(
        &ctx.measurer,
        ElementTag::child(NodeKind::Branch, parent_id, dfs_id),
        &node.label,
        slot,
        style,
        ctx.config.mind.node_padding,
        ctx.config.mind.min_node_width,
    );
    entries.push(Entry {
        node: sized,
        children: Vec::new(),
        span: 0.0,
    });
    let child_indices: Vec<usize> = node
        .children
        .iter()
        .map(|child| size_subtree(child, dfs_id, depth + 1, entries, ctx))
        .collect();
    entries[idx].children = child_indices;
    idx
}

fn subtree_span(idx: usize, entries: &mut [Entry], v_gap: f32) -> f32 {
    let children = entries[idx].children.clone();
    let mut total = 0.0;
    for &child in &children {
        total += subtree_span(child, entries, v_gap);
    }
    if children.len() > 1 {
        total += v_gap * (children.len() as f32 - 1.0);
    }
    let span = entries[idx].node.size.height().max(total);
    entries[idx].span = span;
    span
}

fn place_side(
    group: &[usize],
    direction: f32,
    root: &LayoutNode,
    entries: &mut [Entry],
    h_gap: f32,
    v_gap: f32,
) {
    if group.is_empty() {
        return;
    }
    let mut total: f32 = group.iter().map(|&idx| entries[idx].span).sum();
    total += v_gap * (group.len() as f32 - 1.0);
    let mut cursor = root.cy - total / 2.0;
    for &idx in group {
        let span = entries[idx].span;
        let width = entries[idx].node.size.width();
        let cx = root.cx + direction * (root.size.width() / 2.0 + width / 2.0 + h_gap);
        place_subtree(idx, direction, cx, cursor + span / 2.0, entries, h_gap, v_gap);
        cursor += span + v_gap;
    }
}

fn place_subtree(
    idx: usize,
    direction: f32,
    cx: f32,
    cy: f32,
    entries: &mut [Entry],
    h_gap: f32,
    v_gap: f32,
) {
    entries[idx].node.cx = cx;
    entries[idx].node.cy = cy;
    let children = entries[idx].children.clone();
    if children.is_empty() {
        return;
    }
    let parent_width = entries[idx].node.size.width();
    let mut total: f32 = children.iter().map(|&child| entries[child].span).sum();
    total += v_gap * (children.len() as f32 - 1.0);
    let mut cursor = cy - total / 2.0;
    for &child in &children {
        let span = entries[child].span;
        let width = entries[child].node.size.width();
        let child_cx = cx + direction * (parent_width / 2.0 + width / 2.0 + h_gap);
        place_subtree(child, direction, child_cx, cursor + span / 2.0, entries, h_gap, v_gap);
        cursor += span + v_gap;
    }
}

fn connect(parent: &LayoutNode, child_idx: usize, entries: &[Entry], pieces: &mut Pieces) {
    let child = &entries[child_idx].node;
    let from = parent.boundary_toward((child.cx, child.cy));
    let to = child.boundary_toward((parent.cx, parent.cy));
    pieces.connectors.push(Connector {
        tag: child.tag,
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
    use crate::layout::types::rects_intersect;
    use crate::spec::DiagramFamily;
    use crate::theme::Theme;

    fn fast_config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    fn leaf(label: &str) -> MindNode {
        MindNode {
            label: label.to_string(),
            children: Vec::new(),
        }
    }

    fn branches() -> Vec<MindNode> {
        vec![
            MindNode {
                label: "Reading".to_string(),
                children: vec![
                    MindNode {
                        label: "Fiction".to_string(),
                        children: vec![leaf("novels"), leaf("stories")],
                    },
                    leaf("papers"),
                ],
            },
            MindNode {
                label: "Practice".to_string(),
                children: vec![leaf("drills"), leaf("projects")],
            },
            MindNode {
                label: "Teaching".to_string(),
                children: vec![leaf("mentoring")],
            },
            leaf("Rest"),
        ]
    }

    #[test]
    fn top_level_branches_split_between_the_sides() {
        let theme = Theme::classic();
        let config = fast_config();
        let ctx = LayoutCtx::new(&theme, &config, DiagramFamily::Mind).unwrap();
        let pieces = layout_mind("Learning", &branches(), &ctx);
        let root = pieces
            .nodes
            .iter()
            .find(|n| n.tag.kind == NodeKind::Topic)
            .unwrap();
        let top_level: Vec<_> = pieces
            .nodes
            .iter()
            .filter(|n| n.tag.kind == NodeKind::Branch && n.tag.parent == Some(0))
            .collect();
        assert_eq!(top_level.len(), 4);
        let right = top_level.iter().filter(|n| n.left() > root.right()).count();
        let left = top_level.iter().filter(|n| n.right() < root.left()).count();
        assert_eq!(right, 2, "first half of the branches goes right");
        assert_eq!(left, 2, "second half goes left");
    }

    #[test]
    fn parents_center_on_their_subtree_spans() {
        let theme = Theme::classic();
        let config = fast_config();
        let ctx = LayoutCtx::new(&theme, &config, DiagramFamily::Mind).unwrap();
        let pieces = layout_mind("Learning", &branches(), &ctx);
        for parent in pieces.nodes.iter().filter(|n| n.tag.kind == NodeKind::Branch) {
            let children: Vec<_> = pieces
                .nodes
                .iter()
                .filter(|n| n.tag.parent == Some(parent.tag.index))
                .collect();
            if children.is_empty() {
                continue;
            }
            let top = children.iter().map(|n| n.top()).fold(f32::MAX, f32::min);
            let bottom = children.iter().map(|n| n.bottom()).fold(f32::MIN, f32::max);
            // Centering is on subtree spans, so direct-child extents bound
            // the parent's center rather than pinning it exactly.
            assert!(
                parent.cy > top - 1e-3 && parent.cy < bottom + 1e-3,
                "{} drifted off its children's span",
                parent.tag.id()
            );
        }

        // A single-child parent centers exactly on that child.
        let teaching = pieces
            .nodes
            .iter()
            .find(|n| n.label.text() == "Teaching")
            .unwrap();
        let mentoring = pieces
            .nodes
            .iter()
            .find(|n| n.label.text() == "mentoring")
            .unwrap();
        assert!((teaching.cy - mentoring.cy).abs() < 1e-3);
    }

    #[test]
    fn deep_nesting_steps_outward_level_by_level() {
        let theme = Theme::classic();
        let config = fast_config();
        let ctx = LayoutCtx::new(&theme, &config, DiagramFamily::Mind).unwrap();
        let pieces = layout_mind("Learning", &branches(), &ctx);
        let by_id = |id: &str| {
            pieces
                .nodes
                .iter()
                .find(|n| n.tag.id() == id)
                .unwrap_or_else(|| panic!("missing {id}"))
        };
        // DFS order: Reading(1) -> Fiction(2) -> novels(3), stories(4).
        let reading = by_id("branch_0_1");
        let fiction = by_id("branch_1_2");
        let novels = by_id("branch_2_3");
        assert!(fiction.left() > reading.right());
        assert!(novels.left() > fiction.right());
    }

    #[test]
    fn no_two_nodes_overlap() {
        let theme = Theme::classic();
        let config = fast_config();
        let ctx = LayoutCtx::new(&theme, &config, DiagramFamily::Mind).unwrap();
        let pieces = layout_mind("Learning", &branches(), &ctx);
        for (i, a) in pieces.nodes.iter().enumerate() {
            for b in &pieces.nodes[i + 1..] {
                assert!(
                    !rects_intersect(a.rect(), b.rect()),
                    "{} overlaps {}",
                    a.tag.id(),
                    b.tag.id()
                );
            }
        }
    }

    #[test]
    fn every_node_but_the_root_has_a_connector() {
        let theme = Theme::classic();
        let config = fast_config();
        let ctx = LayoutCtx::new(&theme, &config, DiagramFamily::Mind).unwrap();
        let pieces = layout_mind("Learning", &branches(), &ctx);
        assert_eq!(pieces.connectors.len(), pieces.nodes.len() - 1);
        for connector in &pieces.connectors {
            assert!(matches!(
                connector.kind,
                ConnectorKind::Straight { arrow: false, .. }
            ));
        }
    }
}
