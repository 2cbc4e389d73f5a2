use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::spec::DiagramFamily;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Normal,
    SemiBold,
    Bold,
}

impl FontWeight {
    pub fn css_value(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::SemiBold => "600",
            FontWeight::Bold => "bold",
        }
    }
}

/// Concrete style for one node: resolved once per render, then carried by
/// value on the layout node so later passes never reach back into the theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
    pub text_color: String,
    pub font_size: f32,
    pub weight: FontWeight,
}

/// Named style slots within one diagram family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleSlot {
    /// Central topic / root / anchor nodes.
    Topic,
    /// First-tier siblings (attributes, similarities, branches, parts).
    Primary,
    /// Second-tier content (leaves, subparts, substeps, differences).
    Secondary,
    /// Emphasized elements: main flow steps, the first bridge pair.
    Accent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyStyles {
    pub topic: NodeStyle,
    pub primary: NodeStyle,
    pub secondary: NodeStyle,
    pub accent: NodeStyle,
}

impl FamilyStyles {
    pub fn slot(&self, slot: StyleSlot) -> &NodeStyle {
        match slot {
            StyleSlot::Topic => &self.topic,
            StyleSlot::Primary => &self.primary,
            StyleSlot::Secondary => &self.secondary,
            StyleSlot::Accent => &self.accent,
        }
    }
}

/// Immutable per-render styling. A family with no registered styles is a
/// configuration error, never silently substituted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub line_color: String,
    pub watermark_color: String,
    families: BTreeMap<DiagramFamily, FamilyStyles>,
}

impl Theme {
    /// Resolve the style slots for one family. Called once per render.
    pub fn resolve(&self, family: DiagramFamily) -> Result<&FamilyStyles, RenderError> {
        self.families
            .get(&family)
            .ok_or(RenderError::ThemeUnavailable(family))
    }

    pub fn set_family(&mut self, family: DiagramFamily, styles: FamilyStyles) {
        self.families.insert(family, styles);
    }

    /// Remove a family's styles. Exists so configuration errors can be
    /// exercised; built-in themes register every family.
    pub fn remove_family(&mut self, family: DiagramFamily) {
        self.families.remove(&family);
    }

    /// Default theme modeled on the classic colorful palette.
    pub fn classic() -> Self {
        Self::from_palette(ThemePalette {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#FFFFFF".to_string(),
            line_color: "#888888".to_string(),
            watermark_color: "#2c3e50".to_string(),
            topic_fill: "#4e79a7".to_string(),
            topic_text: "#FFFFFF".to_string(),
            primary_fill: "#a7c7e7".to_string(),
            primary_text: "#333333".to_string(),
            secondary_fill: "#f5f5f5".to_string(),
            secondary_text: "#333333".to_string(),
            accent_fill: "#f28e2b".to_string(),
            accent_text: "#FFFFFF".to_string(),
            stroke: "#35506b".to_string(),
        })
    }

    /// High-contrast presentation theme.
    pub fn display() -> Self {
        Self::from_palette(ThemePalette {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 16.0,
            background: "#FFFFFF".to_string(),
            line_color: "#60a5fa".to_string(),
            watermark_color: "#1e3a8a".to_string(),
            topic_fill: "#1e3a8a".to_string(),
            topic_text: "#FFFFFF".to_string(),
            primary_fill: "#93c5fd".to_string(),
            primary_text: "#1C2430".to_string(),
            secondary_fill: "#dbeafe".to_string(),
            secondary_text: "#1C2430".to_string(),
            accent_fill: "#3b82f6".to_string(),
            accent_text: "#FFFFFF".to_string(),
            stroke: "#1e3a8a".to_string(),
        })
    }

    fn from_palette(palette: ThemePalette) -> Self {
        let base = palette.font_size;
        let styles = FamilyStyles {
            topic: NodeStyle {
                fill: palette.topic_fill.clone(),
                stroke: palette.stroke.clone(),
                stroke_width: 2.0,
                text_color: palette.topic_text.clone(),
                font_size: base * 1.3,
                weight: FontWeight::Bold,
            },
            primary: NodeStyle {
                fill: palette.primary_fill.clone(),
                stroke: palette.stroke.clone(),
                stroke_width: 1.4,
                text_color: palette.primary_text.clone(),
                font_size: base,
                weight: FontWeight::Normal,
            },
            secondary: NodeStyle {
                fill: palette.secondary_fill.clone(),
                stroke: palette.stroke.clone(),
                stroke_width: 1.0,
                text_color: palette.secondary_text.clone(),
                font_size: base * 0.9,
                weight: FontWeight::Normal,
            },
            accent: NodeStyle {
                fill: palette.accent_fill.clone(),
                stroke: palette.stroke.clone(),
                stroke_width: 1.6,
                text_color: palette.accent_text.clone(),
                font_size: base * 1.1,
                weight: FontWeight::SemiBold,
            },
        };

        let mut families = BTreeMap::new();
        for family in DiagramFamily::ALL {
            families.insert(family, styles.clone());
        }

        Self {
            font_family: palette.font_family,
            font_size: palette.font_size,
            background: palette.background,
            line_color: palette.line_color,
            watermark_color: palette.watermark_color,
            families,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::classic()
    }
}

struct ThemePalette {
    font_family: String,
    font_size: f32,
    background: String,
    line_color: String,
    watermark_color: String,
    topic_fill: String,
    topic_text: String,
    primary_fill: String,
    primary_text: String,
    secondary_fill: String,
    secondary_text: String,
    accent_fill: String,
    accent_text: String,
    stroke: String,
}
