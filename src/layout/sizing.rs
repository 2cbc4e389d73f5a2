use crate::theme::{NodeStyle, StyleSlot};

use super::text::Measurer;
use super::types::{ElementTag, LayoutNode, NodeSize, TextBlock};

/// Radius needed to enclose a wrapped label with `padding` clearance.
pub(crate) fn radius_for_label(label: &TextBlock, padding: f32, min_radius: f32) -> f32 {
    let half_w = label.width / 2.0;
    let half_h = label.height / 2.0;
    let radius = (half_w * half_w + half_h * half_h).sqrt() + padding;
    radius.max(min_radius)
}

/// Box dimensions for a wrapped label with `padding` on every side.
pub(crate) fn box_for_label(label: &TextBlock, padding: f32, min_width: f32) -> (f32, f32) {
    let width = (label.width + padding * 2.0).max(min_width);
    let height = label.height + padding * 2.0;
    (width, height)
}

/// Uniform-sizing rule for symmetry-constrained sibling sets: every sibling
/// takes the maximum individually-required radius.
pub(crate) fn uniform_radius(radii: &[f32]) -> f32 {
    radii.iter().copied().fold(0.0, f32::max)
}

/// Build an unpositioned circular node at the origin.
pub(crate) fn circle_node(
    measurer: &Measurer<'_>,
    tag: ElementTag,
    text: &str,
    slot: StyleSlot,
    style: &NodeStyle,
    padding: f32,
    min_radius: f32,
) -> LayoutNode {
    let label = measurer.measure_label(text, style.font_size);
    let radius = radius_for_label(&label, padding, min_radius);
    LayoutNode {
        tag,
        cx: 0.0,
        cy: 0.0,
        size: NodeSize::Circle { radius },
        label,
        slot,
        style: style.clone(),
    }
}

/// Build an unpositioned rectangular node at the origin.
pub(crate) fn box_node(
    measurer: &Measurer<'_>,
    tag: ElementTag,
    text: &str,
    slot: StyleSlot,
    style: &NodeStyle,
    padding: f32,
    min_width: f32,
) -> LayoutNode {
    let label = measurer.measure_label(text, style.font_size);
    let (width, height) = box_for_label(&label, padding, min_width);
    LayoutNode {
        tag,
        cx: 0.0,
        cy: 0.0,
        size: NodeSize::Box { width, height },
        label,
        slot,
        style: style.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(width: f32, height: f32) -> TextBlock {
        TextBlock {
            lines: vec!["x".to_string()],
            width,
            height,
        }
    }

    #[test]
    fn radius_covers_label_diagonal() {
        let label = block(60.0, 20.0);
        let radius = radius_for_label(&label, 8.0, 0.0);
        let half_diag = (30.0f32 * 30.0 + 10.0 * 10.0).sqrt();
        assert!((radius - (half_diag + 8.0)).abs() < 1e-4);
    }

    #[test]
    fn radius_respects_floor() {
        let label = block(4.0, 4.0);
        assert_eq!(radius_for_label(&label, 2.0, 30.0), 30.0);
    }

    #[test]
    fn uniform_radius_is_group_maximum() {
        assert_eq!(uniform_radius(&[10.0, 28.5, 17.0]), 28.5);
        assert_eq!(uniform_radius(&[]), 0.0);
    }

    #[test]
    fn box_pads_both_axes() {
        let (w, h) = box_for_label(&block(50.0, 16.0), 10.0, 0.0);
        assert_eq!(w, 70.0);
        assert_eq!(h, 36.0);
    }
}
