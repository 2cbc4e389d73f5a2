use std::cell::Cell;

use crate::config::LayoutConfig;
use crate::text_metrics::FontRuler;
use crate::theme::Theme;

use super::types::TextBlock;

/// Per-render measurement front-end. Wraps the shared font pool behind an
/// explicit handle and records whether any measurement had to fall back to
/// heuristic widths.
pub(crate) struct Measurer<'a> {
    ruler: FontRuler,
    font_family: &'a str,
    line_height: f32,
    max_label_chars: usize,
    fast_metrics: bool,
    fell_back: Cell<bool>,
}

impl<'a> Measurer<'a> {
    pub fn new(theme: &'a Theme, config: &LayoutConfig) -> Self {
        Self {
            ruler: FontRuler::new(),
            font_family: &theme.font_family,
            line_height: config.label_line_height,
            max_label_chars: config.max_label_width_chars,
            fast_metrics: config.fast_text_metrics,
            fell_back: Cell::new(false),
        }
    }

    pub fn took_fallback(&self) -> bool {
        self.fell_back.get()
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        if self.fast_metrics && text.is_ascii() {
            return heuristic_width(text, font_size);
        }
        match self.ruler.measure_width(text, font_size, self.font_family) {
            Some(width) => width,
            None => {
                self.fell_back.set(true);
                heuristic_width(text, font_size)
            }
        }
    }

    fn average_char_width(&self, font_size: f32) -> f32 {
        if self.fast_metrics {
            return font_size * 0.55;
        }
        match self.ruler.average_char_width(self.font_family, font_size) {
            Some(width) => width,
            None => {
                self.fell_back.set(true);
                font_size * 0.55
            }
        }
    }

    /// Wrap and measure a label at the configured character budget.
    pub fn measure_label(&self, text: &str, font_size: f32) -> TextBlock {
        let max_width = self.max_label_chars.max(1) as f32 * self.average_char_width(font_size);
        self.measure_label_at(text, font_size, max_width)
    }

    pub fn measure_label_at(&self, text: &str, font_size: f32, max_width: f32) -> TextBlock {
        let lines = self.wrap(text, font_size, max_width);
        let width = lines
            .iter()
            .map(|line| self.text_width(line, font_size))
            .fold(0.0, f32::max);
        let height = lines.len() as f32 * font_size * self.line_height;
        TextBlock {
            lines,
            width,
            height,
        }
    }

    /// Split on explicit newlines, then greedily wrap each segment at word
    /// boundaries. A single word wider than `max_width` is never split
    /// mid-word. Always yields at least one line.
    pub fn wrap(&self, text: &str, font_size: f32, max_width: f32) -> Vec<String> {
        let mut segments: Vec<&str> = text.split('\n').collect();
        while segments.len() > 1 && segments.last().is_some_and(|s| s.trim().is_empty()) {
            segments.pop();
        }

        let mut lines = Vec::new();
        for segment in segments {
            let segment = segment.trim();
            if self.text_width(segment, font_size) <= max_width {
                lines.push(segment.to_string());
                continue;
            }
            let mut current = String::new();
            for word in segment.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if self.text_width(&candidate, font_size) > max_width {
                    if !current.is_empty() {
                        lines.push(current.clone());
                    }
                    current = word.to_string();
                } else {
                    current = candidate;
                }
            }
            lines.push(current);
        }

        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }
}

/// Average-glyph estimate used when no drawing context is available.
/// Classes are coarse on purpose; exact widths come from the font pool.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.30,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '!' | '|' | '\'' => 0.28,
        'f' | 'r' | 't' | 'I' | '(' | ')' | '[' | ']' => 0.36,
        'm' | 'w' | 'M' | 'W' | '@' => 0.88,
        'A'..='Z' | '0'..='9' => 0.64,
        _ if ch.is_ascii() => 0.55,
        _ => 1.0,
    }
}

fn heuristic_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}
