use crate::layout::types::LayoutResult;
use crate::scene::SceneGraph;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Machine-readable snapshot of one render: element positions for
/// interaction tooling plus the flat draw-command list.
#[derive(Debug, Serialize)]
pub struct SceneDump<'a> {
    pub family: &'a str,
    pub width: f32,
    pub height: f32,
    pub elements: Vec<ElementDump>,
    pub degradations: Vec<String>,
    pub scene: &'a SceneGraph,
}

#[derive(Debug, Serialize)]
pub struct ElementDump {
    pub id: String,
    pub kind: String,
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub height: f32,
    pub label: String,
}

impl<'a> SceneDump<'a> {
    pub fn from_render(layout: &'a LayoutResult, scene: &'a SceneGraph) -> Self {
        let elements = layout
            .nodes
            .iter()
            .map(|node| ElementDump {
                id: node.tag.id(),
                kind: node.tag.kind.as_str().to_string(),
                cx: node.cx,
                cy: node.cy,
                width: node.size.width(),
                height: node.size.height(),
                label: node.label.text(),
            })
            .collect();
        SceneDump {
            family: layout.family.as_str(),
            width: scene.width,
            height: scene.height,
            elements,
            degradations: layout
                .degradations
                .iter()
                .map(|d| d.to_string())
                .collect(),
            scene,
        }
    }
}

pub fn write_scene_dump(
    path: &Path,
    layout: &LayoutResult,
    scene: &SceneGraph,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = SceneDump::from_render(layout, scene);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
