//! Layout engine. Each thinking-map family has its own module that turns a
//! parsed spec into positioned nodes, connectors and decorations; this
//! module owns dispatch, shared context, and the first-pass canvas bounds.

mod bounds;
mod brace;
mod bridge;
mod bubble;
mod concept;
mod double_bubble;
mod flow;
mod label_placement;
mod mind;
mod multi_flow;
mod sizing;
mod text;
mod tree;
pub mod types;

use crate::config::LayoutConfig;
use crate::error::{Degradation, RenderError};
use crate::spec::{DiagramSpec, PrecomputedLayout, RecommendedSize};
use crate::theme::{FamilyStyles, Theme};

use self::text::Measurer;
use self::types::{Connector, Decoration, LayoutNode, LayoutResult, NodeKind};

/// Caller-supplied hints that are not part of the diagram spec itself.
#[derive(Debug, Default, Clone)]
pub struct LayoutOptions {
    /// Minimum canvas size to honor, typically from the embedding surface.
    pub recommended: Option<RecommendedSize>,
    /// Normalized concept positions computed upstream, if any.
    pub precomputed: Option<PrecomputedLayout>,
}

/// Shared state threaded through every family module.
pub(crate) struct LayoutCtx<'a> {
    pub measurer: Measurer<'a>,
    pub styles: &'a FamilyStyles,
    pub config: &'a LayoutConfig,
}

impl<'a> LayoutCtx<'a> {
    pub fn new(
        theme: &'a Theme,
        config: &'a LayoutConfig,
        family: crate::spec::DiagramFamily,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            measurer: Measurer::new(theme, config),
            styles: theme.resolve(family)?,
            config,
        })
    }
}

/// Intermediate output of a family module, before bounds are attached.
#[derive(Default)]
pub(crate) struct Pieces {
    pub nodes: Vec<LayoutNode>,
    pub connectors: Vec<Connector>,
    pub decorations: Vec<Decoration>,
    pub degradations: Vec<Degradation>,
    /// Lowest y-coordinate the canvas must reach even if nothing is drawn
    /// there, for layouts that reserve a band (zero means no reservation).
    pub reserve_bottom: f32,
}

/// Validates `spec` and computes the full immutable layout for it.
pub fn compute_layout(
    spec: &DiagramSpec,
    theme: &Theme,
    config: &LayoutConfig,
    options: &LayoutOptions,
) -> Result<LayoutResult, RenderError> {
    spec.validate()?;
    let family = spec.family();
    let ctx = LayoutCtx::new(theme, config, family)?;

    let mut pieces = match spec {
        DiagramSpec::BubbleMap { topic, attributes } => {
            bubble::layout_radial(topic, attributes, NodeKind::Attribute, false, &ctx)
        }
        DiagramSpec::CircleMap { topic, context } => {
            bubble::layout_radial(topic, context, NodeKind::Context, true, &ctx)
        }
        DiagramSpec::DoubleBubbleMap {
            left,
            right,
            similarities,
            left_differences,
            right_differences,
        } => double_bubble::layout_double_bubble(
            left,
            right,
            similarities,
            left_differences,
            right_differences,
            &ctx,
        ),
        DiagramSpec::MultiFlowMap {
            event,
            causes,
            effects,
        } => multi_flow::layout_multi_flow(event, causes, effects, &ctx),
        DiagramSpec::TreeMap { topic, children } => tree::layout_tree(topic, children, &ctx),
        DiagramSpec::MindMap { topic, children } => mind::layout_mind(topic, children, &ctx),
        DiagramSpec::BraceMap { topic, parts } => brace::layout_brace(topic, parts, &ctx),
        DiagramSpec::FlowMap {
            title,
            steps,
            substeps,
        } => flow::layout_flow(title, steps, substeps, &ctx),
        DiagramSpec::BridgeMap {
            relating_factor,
            dimension,
            analogies,
            alternative_dimensions,
        } => bridge::layout_bridge(
            relating_factor,
            dimension.as_deref(),
            analogies,
            alternative_dimensions,
            &ctx,
        ),
        DiagramSpec::ConceptMap {
            topic,
            concepts,
            relationships,
        } => concept::layout_concept(
            topic,
            concepts,
            relationships,
            options.precomputed.as_ref(),
            &ctx,
        ),
    };

    if ctx.measurer.took_fallback() {
        log::debug!("text measurement fell back to heuristic widths");
        pieces.degradations.push(Degradation::HeuristicMetrics);
    }

    let bounds = bounds::compute_bounds(&pieces, &config.canvas, options.recommended.as_ref());
    Ok(LayoutResult {
        family,
        nodes: pieces.nodes,
        connectors: pieces.connectors,
        decorations: pieces.decorations,
        bounds,
        degradations: pieces.degradations,
    })
}
