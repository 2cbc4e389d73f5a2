//! Tree map layout: root on top, one column per branch below, leaves
//! stacked contiguously under their branch. Column offsets are the
//! cumulative sum of prior column content widths, never a fixed guess.

use crate::spec::TreeBranch;
use crate::theme::StyleSlot;

use super::sizing::box_node;
use super::types::{Connector, ConnectorKind, ElementTag, LayoutNode, NodeKind};
use super::{LayoutCtx, Pieces};

pub(super) fn layout_tree(topic: &str, children: &[TreeBranch], ctx: &LayoutCtx<'_>) -> Pieces {
    let cfg = &ctx.config.tree;
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

    struct Column {
        branch: LayoutNode,
        leaves: Vec<LayoutNode>,
        width: f32,
    }

    let mut columns = Vec::with_capacity(children.len());
    for (branch_idx, branch) in children.iter().enumerate() {
        let branch_node = box_node(
            &ctx.measurer,
            ElementTag::new(NodeKind::Branch, branch_idx),
            &branch.text,
            StyleSlot::Primary,
            &ctx.styles.primary,
            cfg.node_padding,
            cfg.min_node_width,
        );
        let leaves: Vec<LayoutNode> = branch
            .children
            .iter()
            .enumerate()
            .map(|(leaf_idx, text)| {
                box_node(
                    &ctx.measurer,
                    ElementTag::child(NodeKind::Leaf, branch_idx, leaf_idx),
                    text,
                    StyleSlot::Secondary,
                    &ctx.styles.secondary,
                    cfg.node_padding,
                    cfg.min_node_width,
                )
            })
            .collect();
        let width = leaves
            .iter()
            .map(|leaf| leaf.size.width())
            .fold(branch_node.size.width(), f32::max);
        columns.push(Column {
            branch: branch_node,
            leaves,
            width,
        });
    }

    let branch_band_height = columns
        .iter()
        .map(|col| col.branch.size.height())
        .fold(0.0, f32::max);
    let branch_y = root.size.height() + cfg.level_gap + branch_band_height / 2.0;

    // Cumulative horizontal placement.
    let mut cursor_x = 0.0;
    for col in &mut columns {
        let center_x = cursor_x + col.width / 2.0;
        col.branch.cx = center_x;
        col.branch.cy = branch_y;
        let mut leaf_y = branch_y + branch_band_height / 2.0 + cfg.branch_leaf_gap;
        for leaf in &mut col.leaves {
            let height = leaf.size.height();
            leaf.cx = center_x;
            leaf.cy = leaf_y + height / 2.0;
            leaf_y += height + cfg.leaf_gap;
        }
        cursor_x += col.width + cfg.column_gap;
    }

    // Root aligns with the midpoint of the branch centers, not a fixed
    // canvas position.
    let root_cx = match (columns.first(), columns.last()) {
        (Some(first), Some(last)) => (first.branch.cx + last.branch.cx) / 2.0,
        _ => 0.0,
    };
    root.cx = root_cx;
    root.cy = root.size.height() / 2.0;

    // T-connector: a shared crossbar halfway down the level gap, with one
    // orthogonal route per branch.
    let bar_y = root.bottom() + cfg.level_gap / 2.0;
    for col in &columns {
        pieces.connectors.push(Connector {
            tag: col.branch.tag,
            kind: ConnectorKind::OrthogonalL {
                points: vec![
                    (root.cx, root.bottom()),
                    (root.cx, bar_y),
                    (col.branch.cx, bar_y),
                    (col.branch.cx, col.branch.top()),
                ],
            },
            label: None,
            label_anchor: None,
        });
        for leaf in &col.leaves {
            pieces.connectors.push(Connector {
                tag: leaf.tag,
                kind: ConnectorKind::Straight {
                    from: (col.branch.cx, col.branch.bottom()),
                    to: (leaf.cx, leaf.top()),
                    arrow: false,
                },
                label: None,
                label_anchor: None,
            });
        }
    }

    pieces.nodes.push(root);
    for col in columns {
        pieces.nodes.push(col.branch);
        pieces.nodes.extend(col.leaves);
    }
    pieces
}
