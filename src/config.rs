use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// Canvas padding and minimum dimensions applied by the bounds pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub padding: f32,
    pub min_width: f32,
    pub min_height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            padding: 24.0,
            min_width: 200.0,
            min_height: 150.0,
        }
    }
}

/// Tunables for the radial bubble/circle layouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BubbleConfig {
    pub node_padding: f32,
    pub min_radius: f32,
    pub topic_padding: f32,
    pub min_topic_radius: f32,
    /// Symmetrical gap between the topic boundary and sibling boundaries.
    pub radial_gap: f32,
    /// Circumferential spacing multipliers, in three discrete bands by
    /// sibling count: tighter for few siblings, looser for many.
    pub spacing_small: f32,
    pub spacing_medium: f32,
    pub spacing_large: f32,
    pub band_small_max: usize,
    pub band_medium_max: usize,
    pub relax_iterations: usize,
    pub relax_step: f32,
    /// Clearance between the outermost sibling and the circle-map frame.
    pub frame_margin: f32,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            node_padding: 10.0,
            min_radius: 28.0,
            topic_padding: 16.0,
            min_topic_radius: 45.0,
            radial_gap: 36.0,
            spacing_small: 2.2,
            spacing_medium: 2.5,
            spacing_large: 2.8,
            band_small_max: 4,
            band_medium_max: 8,
            relax_iterations: 40,
            relax_step: 0.35,
            frame_margin: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubleBubbleConfig {
    pub column_gap: f32,
    pub item_gap: f32,
    pub node_padding: f32,
    pub min_radius: f32,
}

impl Default for DoubleBubbleConfig {
    fn default() -> Self {
        Self {
            column_gap: 60.0,
            item_gap: 18.0,
            node_padding: 9.0,
            min_radius: 26.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiFlowConfig {
    pub column_gap: f32,
    pub item_gap: f32,
    pub node_padding: f32,
    pub min_node_width: f32,
}

impl Default for MultiFlowConfig {
    fn default() -> Self {
        Self {
            column_gap: 80.0,
            item_gap: 20.0,
            node_padding: 10.0,
            min_node_width: 90.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Vertical distance between the root band and the branch band.
    pub level_gap: f32,
    /// Horizontal gap between adjacent branch columns.
    pub column_gap: f32,
    pub leaf_gap: f32,
    pub branch_leaf_gap: f32,
    pub node_padding: f32,
    pub min_node_width: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            level_gap: 60.0,
            column_gap: 28.0,
            leaf_gap: 12.0,
            branch_leaf_gap: 30.0,
            node_padding: 10.0,
            min_node_width: 70.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindConfig {
    /// Horizontal clearance between a parent's edge and its children's edge.
    pub branch_gap: f32,
    /// Vertical spacing between adjacent sibling subtrees.
    pub sibling_gap: f32,
    pub node_padding: f32,
    pub min_node_width: f32,
}

impl Default for MindConfig {
    fn default() -> Self {
        Self {
            branch_gap: 44.0,
            sibling_gap: 16.0,
            node_padding: 10.0,
            min_node_width: 70.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BraceConfig {
    pub column_gap: f32,
    pub item_gap: f32,
    pub node_padding: f32,
    /// Bracket tip depth as a fraction of the child span height.
    pub tip_depth_ratio: f32,
    /// Bracket arc radius as a fraction of the child span height.
    pub arc_radius_ratio: f32,
}

impl Default for BraceConfig {
    fn default() -> Self {
        Self {
            column_gap: 46.0,
            item_gap: 14.0,
            node_padding: 10.0,
            tip_depth_ratio: 0.05,
            arc_radius_ratio: 0.04,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    pub step_gap: f32,
    /// Perpendicular offset between the main chain and side-hung substeps.
    pub side_gap: f32,
    pub substep_gap: f32,
    pub node_padding: f32,
    pub min_step_width: f32,
    pub title_gap: f32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            step_gap: 46.0,
            side_gap: 48.0,
            substep_gap: 12.0,
            node_padding: 10.0,
            min_step_width: 90.0,
            title_gap: 36.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub pair_spacing: f32,
    pub rail_overhang: f32,
    /// Vertical distance from the rail to each pair label.
    pub pair_offset: f32,
    pub separator_size: f32,
    pub dimension_gap: f32,
    pub footer_height: f32,
    pub chip_gap: f32,
    pub chip_padding: f32,
    pub node_padding: f32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            pair_spacing: 130.0,
            rail_overhang: 40.0,
            pair_offset: 34.0,
            separator_size: 12.0,
            dimension_gap: 18.0,
            footer_height: 44.0,
            chip_gap: 10.0,
            chip_padding: 8.0,
            node_padding: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptConfig {
    /// Scale applied to normalized precomputed positions.
    pub spacing_factor: f32,
    pub base_radius: f32,
    pub tier_increment: f32,
    pub max_primary: usize,
    pub edge_offset: f32,
    pub label_gap: f32,
    pub node_padding: f32,
    pub min_node_width: f32,
    pub label_attempts: usize,
}

impl Default for ConceptConfig {
    fn default() -> Self {
        Self {
            spacing_factor: 120.0,
            base_radius: 150.0,
            tier_increment: 90.0,
            max_primary: 6,
            edge_offset: 14.0,
            label_gap: 10.0,
            node_padding: 8.0,
            min_node_width: 80.0,
            label_attempts: 9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatermarkConfig {
    pub text: String,
    pub font_size: f32,
    pub margin: f32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: "thinkmap".to_string(),
            font_size: 10.0,
            margin: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionConfig {
    pub min_hidden: usize,
    pub answer_key_gap: f32,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            min_hidden: 2,
            answer_key_gap: 18.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub label_line_height: f32,
    pub max_label_width_chars: usize,
    /// Skip font lookups and use the heuristic widths for ASCII text.
    pub fast_text_metrics: bool,
    pub canvas: CanvasConfig,
    pub bubble: BubbleConfig,
    pub double_bubble: DoubleBubbleConfig,
    pub multi_flow: MultiFlowConfig,
    pub tree: TreeConfig,
    pub mind: MindConfig,
    pub brace: BraceConfig,
    pub flow: FlowConfig,
    pub bridge: BridgeConfig,
    pub concept: ConceptConfig,
    pub watermark: WatermarkConfig,
    pub redaction: RedactionConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_line_height: 1.25,
            max_label_width_chars: 24,
            fast_text_metrics: false,
            canvas: CanvasConfig::default(),
            bubble: BubbleConfig::default(),
            double_bubble: DoubleBubbleConfig::default(),
            multi_flow: MultiFlowConfig::default(),
            tree: TreeConfig::default(),
            mind: MindConfig::default(),
            brace: BraceConfig::default(),
            flow: FlowConfig::default(),
            bridge: BridgeConfig::default(),
            concept: ConceptConfig::default(),
            watermark: WatermarkConfig::default(),
            redaction: RedactionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariablesFile {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    line_color: Option<String>,
    watermark_color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariablesFile>,
    layout: Option<LayoutConfigFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    padding: Option<f32>,
    min_width: Option<f32>,
    min_height: Option<f32>,
    max_label_width_chars: Option<usize>,
    fast_text_metrics: Option<bool>,
    watermark_text: Option<String>,
}

/// Load a config file. The file may use JSON5 relaxed syntax; strict JSON
/// is tried first.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(_) => json5::from_str(&contents)?,
    };

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "classic" | "default" => config.theme = Theme::classic(),
            "display" => config.theme = Theme::display(),
            other => anyhow::bail!("unknown theme `{other}`"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.watermark_color {
            config.theme.watermark_color = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.padding {
            config.layout.canvas.padding = v;
        }
        if let Some(v) = layout.min_width {
            config.layout.canvas.min_width = v;
        }
        if let Some(v) = layout.min_height {
            config.layout.canvas.min_height = v;
        }
        if let Some(v) = layout.max_label_width_chars {
            config.layout.max_label_width_chars = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            config.layout.fast_text_metrics = v;
        }
        if let Some(v) = layout.watermark_text {
            config.layout.watermark.text = v;
        }
    }

    Ok(config)
}
