use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Diagram families supported by the engine. Each family has exactly one
/// layout algorithm; dispatch never happens on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramFamily {
    Bubble,
    Circle,
    DoubleBubble,
    MultiFlow,
    Tree,
    Mind,
    Brace,
    Flow,
    Bridge,
    Concept,
}

impl DiagramFamily {
    pub const ALL: [DiagramFamily; 10] = [
        DiagramFamily::Bubble,
        DiagramFamily::Circle,
        DiagramFamily::DoubleBubble,
        DiagramFamily::MultiFlow,
        DiagramFamily::Tree,
        DiagramFamily::Mind,
        DiagramFamily::Brace,
        DiagramFamily::Flow,
        DiagramFamily::Bridge,
        DiagramFamily::Concept,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DiagramFamily::Bubble => "bubble_map",
            DiagramFamily::Circle => "circle_map",
            DiagramFamily::DoubleBubble => "double_bubble_map",
            DiagramFamily::MultiFlow => "multi_flow_map",
            DiagramFamily::Tree => "tree_map",
            DiagramFamily::Mind => "mind_map",
            DiagramFamily::Brace => "brace_map",
            DiagramFamily::Flow => "flow_map",
            DiagramFamily::Bridge => "bridge_map",
            DiagramFamily::Concept => "concept_map",
        }
    }
}

/// One branch of a tree map: a category node plus its leaf texts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeBranch {
    pub text: String,
    pub children: Vec<String>,
}

/// One node of a mind map: a label plus arbitrarily nested children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindNode {
    pub label: String,
    #[serde(default)]
    pub children: Vec<MindNode>,
}

/// One part of a brace map: a part node plus its subpart texts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracePart {
    pub name: String,
    pub subparts: Vec<String>,
}

/// Substeps hung off one main step of a flow map, keyed by step text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstepGroup {
    pub step: String,
    pub substeps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalogyPair {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub label: String,
}

/// Validated input to the layout engine. The engine never mutates a spec;
/// every render builds a fresh result from it.
///
/// Every array a family's algorithm reads is a required field: an absent
/// array fails deserialization rather than being papered over with a
/// default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagramSpec {
    BubbleMap {
        topic: String,
        attributes: Vec<String>,
    },
    CircleMap {
        topic: String,
        context: Vec<String>,
    },
    DoubleBubbleMap {
        left: String,
        right: String,
        similarities: Vec<String>,
        left_differences: Vec<String>,
        right_differences: Vec<String>,
    },
    MultiFlowMap {
        event: String,
        causes: Vec<String>,
        effects: Vec<String>,
    },
    TreeMap {
        topic: String,
        children: Vec<TreeBranch>,
    },
    MindMap {
        topic: String,
        children: Vec<MindNode>,
    },
    BraceMap {
        topic: String,
        parts: Vec<BracePart>,
    },
    FlowMap {
        title: String,
        steps: Vec<String>,
        substeps: Vec<SubstepGroup>,
    },
    BridgeMap {
        relating_factor: String,
        /// Optional name of the analogy pattern; shown left of the rail in
        /// place of the relating factor when present.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dimension: Option<String>,
        analogies: Vec<AnalogyPair>,
        alternative_dimensions: Vec<String>,
    },
    ConceptMap {
        topic: String,
        concepts: Vec<String>,
        relationships: Vec<Relationship>,
    },
}

/// Normalized node positions precomputed by an upstream collaborator.
/// Coordinates are unitless; the concept layout scales them by the
/// configured spacing factor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrecomputedLayout {
    pub positions: BTreeMap<String, [f32; 2]>,
}

/// Externally recommended minimum canvas size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecommendedSize {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
}

const MAX_ITEMS: usize = 20;
const MAX_ITEM_LEN: usize = 100;

impl DiagramSpec {
    pub fn from_json(input: &str) -> Result<Self, RenderError> {
        let spec: DiagramSpec =
            serde_json::from_str(input).map_err(|err| RenderError::SpecParse(err.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn family(&self) -> DiagramFamily {
        match self {
            DiagramSpec::BubbleMap { .. } => DiagramFamily::Bubble,
            DiagramSpec::CircleMap { .. } => DiagramFamily::Circle,
            DiagramSpec::DoubleBubbleMap { .. } => DiagramFamily::DoubleBubble,
            DiagramSpec::MultiFlowMap { .. } => DiagramFamily::MultiFlow,
            DiagramSpec::TreeMap { .. } => DiagramFamily::Tree,
            DiagramSpec::MindMap { .. } => DiagramFamily::Mind,
            DiagramSpec::BraceMap { .. } => DiagramFamily::Brace,
            DiagramSpec::FlowMap { .. } => DiagramFamily::Flow,
            DiagramSpec::BridgeMap { .. } => DiagramFamily::Bridge,
            DiagramSpec::ConceptMap { .. } => DiagramFamily::Concept,
        }
    }

    /// Content validation beyond what deserialization enforces: topics must
    /// be non-blank, lists stay under the item cap, and items are non-blank
    /// and bounded in length.
    pub fn validate(&self) -> Result<(), RenderError> {
        let family = self.family().as_str();
        match self {
            DiagramSpec::BubbleMap { topic, attributes } => {
                check_topic(family, "topic", topic)?;
                check_items(family, "attributes", attributes)?;
            }
            DiagramSpec::CircleMap { topic, context } => {
                check_topic(family, "topic", topic)?;
                check_items(family, "context", context)?;
            }
            DiagramSpec::DoubleBubbleMap {
                left,
                right,
                similarities,
                left_differences,
                right_differences,
            } => {
                check_topic(family, "left", left)?;
                check_topic(family, "right", right)?;
                check_items(family, "similarities", similarities)?;
                check_items(family, "left_differences", left_differences)?;
                check_items(family, "right_differences", right_differences)?;
            }
            DiagramSpec::MultiFlowMap {
                event,
                causes,
                effects,
            } => {
                check_topic(family, "event", event)?;
                check_items(family, "causes", causes)?;
                check_items(family, "effects", effects)?;
            }
            DiagramSpec::TreeMap { topic, children } => {
                check_topic(family, "topic", topic)?;
                check_count(family, "children", children.len())?;
                for branch in children {
                    check_item(family, "children", &branch.text)?;
                    check_items(family, "children", &branch.children)?;
                }
            }
            DiagramSpec::MindMap { topic, children } => {
                check_topic(family, "topic", topic)?;
                check_mind_level(family, children)?;
            }
            DiagramSpec::BraceMap { topic, parts } => {
                check_topic(family, "topic", topic)?;
                check_count(family, "parts", parts.len())?;
                for part in parts {
                    check_item(family, "parts", &part.name)?;
                    check_items(family, "subparts", &part.subparts)?;
                }
            }
            DiagramSpec::FlowMap {
                title,
                steps,
                substeps,
            } => {
                check_topic(family, "title", title)?;
                check_items(family, "steps", steps)?;
                for group in substeps {
                    if !steps.iter().any(|step| step == &group.step) {
                        return Err(RenderError::InvalidField {
                            family: "flow_map",
                            field: "substeps",
                            reason: format!("substep group references unknown step `{}`", group.step),
                        });
                    }
                    check_items(family, "substeps", &group.substeps)?;
                }
            }
            DiagramSpec::BridgeMap {
                relating_factor,
                dimension,
                analogies,
                alternative_dimensions,
            } => {
                check_topic(family, "relating_factor", relating_factor)?;
                if let Some(dimension) = dimension {
                    check_item(family, "dimension", dimension)?;
                }
                check_count(family, "analogies", analogies.len())?;
                for pair in analogies {
                    check_item(family, "analogies", &pair.left)?;
                    check_item(family, "analogies", &pair.right)?;
                }
                check_items(family, "alternative_dimensions", alternative_dimensions)?;
            }
            DiagramSpec::ConceptMap {
                topic,
                concepts,
                relationships,
            } => {
                check_topic(family, "topic", topic)?;
                check_items(family, "concepts", concepts)?;
                for rel in relationships {
                    check_item(family, "relationships", &rel.from)?;
                    check_item(family, "relationships", &rel.to)?;
                    if rel.label.len() > MAX_ITEM_LEN {
                        return Err(RenderError::InvalidField {
                            family: "concept_map",
                            field: "relationships",
                            reason: "relationship label too long".to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_topic(
    family: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), RenderError> {
    if value.trim().is_empty() {
        return Err(RenderError::MissingField { family, field });
    }
    Ok(())
}

fn check_mind_level(family: &'static str, nodes: &[MindNode]) -> Result<(), RenderError> {
    check_count(family, "children", nodes.len())?;
    for node in nodes {
        check_item(family, "children", &node.label)?;
        check_mind_level(family, &node.children)?;
    }
    Ok(())
}

fn check_count(family: &'static str, field: &'static str, len: usize) -> Result<(), RenderError> {
    if len > MAX_ITEMS {
        return Err(RenderError::InvalidField {
            family,
            field,
            reason: format!("more than {MAX_ITEMS} items"),
        });
    }
    Ok(())
}

fn check_item(family: &'static str, field: &'static str, item: &str) -> Result<(), RenderError> {
    if item.trim().is_empty() {
        return Err(RenderError::InvalidField {
            family,
            field,
            reason: "blank item".to_string(),
        });
    }
    if item.len() > MAX_ITEM_LEN {
        return Err(RenderError::InvalidField {
            family,
            field,
            reason: format!("item longer than {MAX_ITEM_LEN} characters"),
        });
    }
    Ok(())
}

fn check_items(
    family: &'static str,
    field: &'static str,
    items: &[String],
) -> Result<(), RenderError> {
    check_count(family, field, items.len())?;
    for item in items {
        check_item(family, field, item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubble_map_parses_and_validates() {
        let spec = DiagramSpec::from_json(
            r#"{"type":"bubble_map","topic":"Sun","attributes":["hot","bright"]}"#,
        )
        .unwrap();
        assert_eq!(spec.family(), DiagramFamily::Bubble);
    }

    #[test]
    fn absent_array_is_a_parse_error() {
        let err = DiagramSpec::from_json(r#"{"type":"bubble_map","topic":"Sun"}"#).unwrap_err();
        assert!(matches!(err, RenderError::SpecParse(_)));
    }

    #[test]
    fn blank_topic_is_missing_field() {
        let err = DiagramSpec::from_json(
            r#"{"type":"bubble_map","topic":"  ","attributes":[]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RenderError::MissingField {
                family: "bubble_map",
                field: "topic"
            }
        ));
    }

    #[test]
    fn flow_substep_group_must_reference_a_step() {
        let err = DiagramSpec::from_json(
            r#"{"type":"flow_map","title":"Tea","steps":["Boil"],"substeps":[{"step":"Pour","substeps":["x"]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::InvalidField { .. }));
    }

    #[test]
    fn mind_map_children_nest_recursively() {
        let spec = DiagramSpec::from_json(
            r#"{"type":"mind_map","topic":"Learning","children":[
                {"label":"Reading","children":[
                    {"label":"Fiction","children":[{"label":"Novels"}]},
                    {"label":"Papers"}]},
                {"label":"Practice"}]}"#,
        )
        .unwrap();
        assert_eq!(spec.family(), DiagramFamily::Mind);
        let DiagramSpec::MindMap { children, .. } = &spec else {
            panic!("wrong variant");
        };
        assert_eq!(children[0].children[0].children[0].label, "Novels");
    }

    #[test]
    fn blank_nested_mind_label_is_rejected() {
        let err = DiagramSpec::from_json(
            r#"{"type":"mind_map","topic":"Learning","children":[
                {"label":"Reading","children":[{"label":"  "}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::InvalidField { .. }));
    }

    #[test]
    fn oversized_list_rejected() {
        let items: Vec<String> = (0..25).map(|i| format!("\"a{i}\"")).collect();
        let json = format!(
            r#"{{"type":"circle_map","topic":"Water","context":[{}]}}"#,
            items.join(",")
        );
        let err = DiagramSpec::from_json(&json).unwrap_err();
        assert!(matches!(err, RenderError::InvalidField { .. }));
    }
}
