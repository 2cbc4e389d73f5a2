use std::path::Path;

use thinkmap_renderer::layout::types::{ConnectorKind, Decoration, NodeKind};
use thinkmap_renderer::layout::{compute_layout, LayoutOptions};
use thinkmap_renderer::redact::redact_scene;
use thinkmap_renderer::scene::{Primitive, SceneGraph};
use thinkmap_renderer::{render_svg, Config, DiagramSpec, LayoutConfig};

fn fast_config() -> Config {
    Config {
        layout: LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        },
        ..Config::default()
    }
}

fn load_fixture(name: &str) -> DiagramSpec {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    DiagramSpec::from_json(&input).expect("fixture parse failed")
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
}

#[test]
fn render_all_fixtures() {
    let config = fast_config();

    // Keep this list explicit so new diagram families must be added
    // intentionally.
    let fixtures = [
        "bubble_map.json",
        "circle_map.json",
        "double_bubble_map.json",
        "multi_flow_map.json",
        "tree_map.json",
        "mind_map.json",
        "brace_map.json",
        "flow_map.json",
        "bridge_map.json",
        "concept_map.json",
    ];

    for name in fixtures {
        let spec = load_fixture(name);
        let layout =
            compute_layout(&spec, &config.theme, &config.layout, &LayoutOptions::default())
                .unwrap_or_else(|err| panic!("{name}: layout failed: {err}"));
        assert!(!layout.nodes.is_empty(), "{name}: empty layout");
        for node in &layout.nodes {
            assert!(
                layout.bounds.contains_rect(node.rect(), 0.5),
                "{name}: node {} escapes the canvas",
                node.tag.id()
            );
        }
        let scene = SceneGraph::build(&layout, &config.theme, &config.layout);
        let svg = render_svg(&scene, &config.theme, &config.layout);
        assert_valid_svg(&svg, name);
    }
}

#[test]
fn bubble_attributes_share_one_radius_without_overlap() {
    let config = fast_config();
    let spec = load_fixture("bubble_map.json");
    let layout =
        compute_layout(&spec, &config.theme, &config.layout, &LayoutOptions::default()).unwrap();

    let attributes: Vec<_> = layout
        .nodes
        .iter()
        .filter(|n| n.tag.kind == NodeKind::Attribute)
        .collect();
    assert_eq!(attributes.len(), 6);

    let radius = attributes[0].effective_radius();
    for node in &attributes {
        assert!(
            (node.effective_radius() - radius).abs() < 1e-3,
            "sibling radii must be uniform"
        );
    }
    for (i, a) in attributes.iter().enumerate() {
        for b in &attributes[i + 1..] {
            let dist = ((a.cx - b.cx).powi(2) + (a.cy - b.cy).powi(2)).sqrt();
            assert!(
                dist + 0.5 >= a.effective_radius() + b.effective_radius(),
                "attribute circles overlap"
            );
        }
    }
}

#[test]
fn tree_branches_hang_from_a_shared_crossbar() {
    let config = fast_config();
    let spec = load_fixture("tree_map.json");
    let layout =
        compute_layout(&spec, &config.theme, &config.layout, &LayoutOptions::default()).unwrap();

    let crossbar_ys: Vec<f32> = layout
        .connectors
        .iter()
        .filter_map(|c| match &c.kind {
            ConnectorKind::OrthogonalL { points } if points.len() == 4 => Some(points[1].1),
            _ => None,
        })
        .collect();
    assert_eq!(crossbar_ys.len(), 3, "one L-connector per branch");
    assert!(
        crossbar_ys.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-6),
        "branches must share one crossbar"
    );

    // Each branch centers over its leaf column.
    for branch in layout.nodes.iter().filter(|n| n.tag.kind == NodeKind::Branch) {
        let leaves: Vec<_> = layout
            .nodes
            .iter()
            .filter(|n| n.tag.kind == NodeKind::Leaf && n.tag.parent == Some(branch.tag.index))
            .collect();
        assert!(!leaves.is_empty());
        for leaf in leaves {
            assert!((leaf.cx - branch.cx).abs() < 1e-3);
        }
    }
}

#[test]
fn mind_map_nests_recursively_around_a_balanced_topic() {
    let config = fast_config();
    let spec = load_fixture("mind_map.json");
    let layout =
        compute_layout(&spec, &config.theme, &config.layout, &LayoutOptions::default()).unwrap();

    let root = layout
        .nodes
        .iter()
        .find(|n| n.tag.kind == NodeKind::Topic)
        .unwrap();
    let top_level: Vec<_> = layout
        .nodes
        .iter()
        .filter(|n| n.tag.kind == NodeKind::Branch && n.tag.parent == Some(0))
        .collect();
    assert_eq!(top_level.len(), 4);
    assert_eq!(top_level.iter().filter(|n| n.left() > root.right()).count(), 2);
    assert_eq!(top_level.iter().filter(|n| n.right() < root.left()).count(), 2);

    // Third-level nodes exist and sit one step further from the topic than
    // their parent.
    let water = layout
        .nodes
        .iter()
        .find(|n| n.label.text() == "Water")
        .expect("nested grandchild laid out");
    let hydration = layout
        .nodes
        .iter()
        .find(|n| n.label.text() == "Hydration")
        .unwrap();
    assert_eq!(water.tag.parent, Some(hydration.tag.index));
    assert!((water.cx - root.cx).abs() > (hydration.cx - root.cx).abs());
}

#[test]
fn flow_steps_recenter_on_their_substep_groups() {
    let config = fast_config();
    let spec = load_fixture("flow_map.json");
    let layout =
        compute_layout(&spec, &config.theme, &config.layout, &LayoutOptions::default()).unwrap();

    let knead = layout
        .nodes
        .iter()
        .find(|n| n.tag.kind == NodeKind::Step && n.label.text() == "Knead dough")
        .unwrap();
    let subs: Vec<_> = layout
        .nodes
        .iter()
        .filter(|n| n.tag.kind == NodeKind::Substep && n.tag.parent == Some(knead.tag.index))
        .collect();
    assert_eq!(subs.len(), 3);
    let top = subs.iter().map(|n| n.top()).fold(f32::MAX, f32::min);
    let bottom = subs.iter().map(|n| n.bottom()).fold(f32::MIN, f32::max);
    assert!((knead.cy - (top + bottom) / 2.0).abs() < 1e-3);
}

#[test]
fn bridge_pairs_straddle_the_rail_with_separators() {
    let config = fast_config();
    let spec = load_fixture("bridge_map.json");
    let layout =
        compute_layout(&spec, &config.theme, &config.layout, &LayoutOptions::default()).unwrap();

    let separators = layout
        .decorations
        .iter()
        .filter(|d| matches!(d, Decoration::Triangle { .. }))
        .count();
    assert_eq!(separators, 3, "one separator between consecutive pairs");

    let rail = layout
        .decorations
        .iter()
        .find_map(|d| match d {
            Decoration::RailLine { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .expect("bridge map must have a rail");
    for node in layout
        .nodes
        .iter()
        .filter(|n| matches!(n.tag.kind, NodeKind::AnalogyUpper | NodeKind::AnalogyLower))
    {
        assert!(node.cx >= rail.0 .0 && node.cx <= rail.1 .0, "pair off the rail");
        if node.tag.kind == NodeKind::AnalogyUpper {
            assert!(node.bottom() < rail.0 .1);
        } else {
            assert!(node.top() > rail.0 .1);
        }
    }
}

#[test]
fn concept_edge_labels_avoid_nodes_and_each_other() {
    let config = fast_config();
    let spec = load_fixture("concept_map.json");
    let layout =
        compute_layout(&spec, &config.theme, &config.layout, &LayoutOptions::default()).unwrap();
    let scene = SceneGraph::build(&layout, &config.theme, &config.layout);

    let labels: Vec<(f32, f32, f32, f32)> = scene
        .cmds
        .iter()
        .filter(|c| c.tag.kind == NodeKind::Relationship)
        .filter_map(|c| match &c.prim {
            Primitive::Text { .. } => Some(c.prim.bbox()),
            _ => None,
        })
        .collect();
    assert!(labels.len() >= 6);
    for (i, a) in labels.iter().enumerate() {
        for b in &labels[i + 1..] {
            let disjoint = a.0 + a.2 <= b.0 + 0.5
                || b.0 + b.2 <= a.0 + 0.5
                || a.1 + a.3 <= b.1 + 0.5
                || b.1 + b.3 <= a.1 + 0.5;
            assert!(disjoint, "edge labels overlap: {a:?} vs {b:?}");
        }
    }
}

#[test]
fn concept_edge_labels_stay_inside_the_first_pass_bounds() {
    let config = fast_config();
    let spec = DiagramSpec::from_json(
        r#"{"type":"concept_map","topic":"Ecosystems",
            "concepts":["producers","consumers","decomposers","sunlight","nutrients","soil"],
            "relationships":[
              {"from":"Ecosystems","to":"producers","label":"are sustained by primary"},
              {"from":"producers","to":"consumers","label":"pass stored energy along to"},
              {"from":"consumers","to":"decomposers","label":"leave organic remains for"},
              {"from":"decomposers","to":"nutrients","label":"break matter back down into"},
              {"from":"sunlight","to":"producers","label":"drives photosynthesis inside"},
              {"from":"nutrients","to":"soil","label":"accumulate over seasons in"}
            ]}"#,
    )
    .unwrap();
    let layout =
        compute_layout(&spec, &config.theme, &config.layout, &LayoutOptions::default()).unwrap();

    for connector in &layout.connectors {
        assert!(
            layout.bounds.contains_rect(connector.bbox(), 0.5),
            "connector {} escapes the canvas",
            connector.tag.id()
        );
        if let (Some(block), Some(anchor)) = (&connector.label, connector.label_anchor) {
            let rect = (
                anchor.0 - block.width / 2.0,
                anchor.1 - block.height / 2.0,
                block.width,
                block.height,
            );
            assert!(
                layout.bounds.contains_rect(rect, 0.5),
                "label {:?} escapes the canvas",
                block.text()
            );
        }
    }
}

#[test]
fn redaction_hides_the_expected_count_and_appends_the_key() {
    let config = fast_config();
    let spec = load_fixture("bubble_map.json");
    let layout =
        compute_layout(&spec, &config.theme, &config.layout, &LayoutOptions::default()).unwrap();
    let mut scene = SceneGraph::build(&layout, &config.theme, &config.layout);

    // Six eligible attribute labels at fraction 0.1 floors to 0, so the
    // minimum of two applies.
    let hidden = redact_scene(&mut scene, 0.1, 99, &config.layout.redaction, &config.theme);
    assert_eq!(hidden, 2);

    let key = scene
        .cmds
        .iter()
        .find(|c| c.tag.kind == NodeKind::AnswerKey)
        .expect("answer key appended");
    let Primitive::Text { block, visible, .. } = &key.prim else {
        panic!("answer key must be text");
    };
    assert!(*visible);
    let hidden_labels: Vec<String> = scene
        .cmds
        .iter()
        .filter_map(|c| match &c.prim {
            Primitive::Text {
                visible: false,
                block,
                ..
            } => Some(block.text()),
            _ => None,
        })
        .collect();
    assert_eq!(hidden_labels.len(), 2);
    for label in hidden_labels {
        assert!(block.text().contains(&label));
    }
}

#[test]
fn recommended_size_floors_the_canvas() {
    let config = fast_config();
    let spec = load_fixture("bubble_map.json");
    let options = LayoutOptions {
        recommended: Some(thinkmap_renderer::spec::RecommendedSize {
            width: 2000.0,
            height: 1600.0,
            padding: 24.0,
        }),
        precomputed: None,
    };
    let layout = compute_layout(&spec, &config.theme, &config.layout, &options).unwrap();
    assert!(layout.bounds.width >= 2000.0);
    assert!(layout.bounds.height >= 1600.0);
}
