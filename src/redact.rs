//! Learning-sheet redaction: hide a fraction of the scene's labels and
//! append an answer key below the canvas. Runs on the finished scene so
//! eligibility can be judged from the actual rendered styling.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;

use crate::config::RedactionConfig;
use crate::layout::types::{ElementTag, NodeKind, TextBlock};
use crate::scene::{DrawCmd, Primitive, SceneGraph, TextAnchor};
use crate::theme::{FontWeight, Theme};

const ANSWER_KEY_FONT_SIZE: f32 = 13.0;

/// Hides `max(min_hidden, floor(eligible * fraction))` labels, chosen
/// without replacement from the seeded generator, and returns how many were
/// hidden. The same seed over the same scene always hides the same labels.
pub fn redact_scene(
    scene: &mut SceneGraph,
    fraction: f32,
    seed: u64,
    config: &RedactionConfig,
    theme: &Theme,
) -> usize {
    let eligible: Vec<usize> = scene
        .cmds
        .iter()
        .enumerate()
        .filter(|(_, cmd)| is_eligible(cmd))
        .map(|(idx, _)| idx)
        .collect();
    if eligible.is_empty() {
        return 0;
    }

    let fraction = fraction.clamp(0.0, 1.0);
    let wanted = ((eligible.len() as f32 * fraction).floor() as usize).max(config.min_hidden);
    let hide_count = wanted.min(eligible.len());

    let mut rng = StdRng::seed_from_u64(seed);
    let mut chosen: Vec<usize> = sample(&mut rng, eligible.len(), hide_count)
        .into_iter()
        .map(|i| eligible[i])
        .collect();
    chosen.sort_unstable();

    let mut answers = Vec::with_capacity(hide_count);
    for idx in chosen {
        if let Primitive::Text { visible, block, .. } = &mut scene.cmds[idx].prim {
            *visible = false;
            answers.push(block.text());
        }
    }

    append_answer_key(scene, &answers, config, theme);
    answers.len()
}

fn is_eligible(cmd: &DrawCmd) -> bool {
    if matches!(cmd.tag.kind, NodeKind::Watermark | NodeKind::AnswerKey) {
        return false;
    }
    match &cmd.prim {
        Primitive::Text {
            visible,
            weight,
            emphasized,
            ..
        } => *visible && !*emphasized && *weight == FontWeight::Normal,
        _ => false,
    }
}

fn append_answer_key(
    scene: &mut SceneGraph,
    answers: &[String],
    config: &RedactionConfig,
    theme: &Theme,
) {
    let text = format!("Answer key: {}", answers.join(", "));
    let width = text.chars().count() as f32 * ANSWER_KEY_FONT_SIZE * 0.6;
    let block = TextBlock {
        lines: vec![text],
        width,
        height: ANSWER_KEY_FONT_SIZE * 1.25,
    };
    let y = scene.height + config.answer_key_gap + block.height / 2.0;
    scene.height = scene.height + config.answer_key_gap * 2.0 + block.height;
    let old_width = scene.width;
    scene.width = scene.width.max(block.width + config.answer_key_gap * 2.0);

    // The watermark stays with the diagram block, pinned to the right edge;
    // the band added below belongs to the answer key alone.
    let grow_x = scene.width - old_width;
    if grow_x > 0.0 {
        for cmd in &mut scene.cmds {
            if cmd.tag.kind == NodeKind::Watermark {
                cmd.prim.translate(grow_x, 0.0);
            }
        }
    }
    scene.cmds.push(DrawCmd {
        tag: ElementTag::new(NodeKind::AnswerKey, 0),
        prim: Primitive::Text {
            x: scene.width / 2.0,
            y,
            block,
            font_size: ANSWER_KEY_FONT_SIZE,
            weight: FontWeight::Normal,
            color: theme.watermark_color.clone(),
            anchor: TextAnchor::Middle,
            visible: true,
            emphasized: false,
        },
    });
}
