//! Font-backed text measurement.
//!
//! A process-wide pool of parsed font faces sits behind a mutex; every
//! measurement is a scoped acquire/measure/release so nothing accumulates
//! across the thousands of calls a single render can make. Layout code
//! never touches the pool directly; it goes through a [`FontRuler`] handle
//! created per render.

use std::collections::HashMap;
use std::sync::Mutex;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use ttf_parser::{Face, GlyphId};

static FONT_POOL: Lazy<Mutex<FontPool>> = Lazy::new(|| Mutex::new(FontPool::new()));

/// Handle to the shared measurement pool. Cheap to create; carries no state
/// of its own so a render can pass it around freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontRuler;

impl FontRuler {
    pub fn new() -> Self {
        Self
    }

    /// Measure the advance width of `text`. Returns `None` when no face for
    /// the family can be loaded; callers degrade to heuristic widths.
    pub fn measure_width(&self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        if text.is_empty() || font_size <= 0.0 {
            return Some(0.0);
        }
        let mut pool = FONT_POOL.lock().ok()?;
        pool.measure(text, font_size, font_family)
    }

    /// Average glyph width over a latin sample, used to derive pixel wrap
    /// widths from character budgets.
    pub fn average_char_width(&self, font_family: &str, font_size: f32) -> Option<f32> {
        if font_size <= 0.0 {
            return None;
        }
        let sample = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let width = self.measure_width(sample, font_size, font_family)?;
        Some(width / sample.chars().count() as f32)
    }
}

struct FontPool {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<LoadedFace>>,
}

impl FontPool {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = family_key(font_family);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(font_family);
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get_mut(&key).and_then(|face| face.as_mut())?;
        let normalized = text.replace('\t', "    ");
        face.measure_width(&normalized, font_size)
    }

    fn load_face(&mut self, font_family: &str) -> Option<LoadedFace> {
        let mut names: Vec<String> = Vec::new();
        let mut generics: Vec<Option<Family<'static>>> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => generics.push(Some(Family::Serif)),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    generics.push(Some(Family::SansSerif))
                }
                "monospace" | "ui-monospace" => generics.push(Some(Family::Monospace)),
                "cursive" => generics.push(Some(Family::Cursive)),
                "fantasy" => generics.push(Some(Family::Fantasy)),
                _ => {
                    names.push(raw.to_string());
                    generics.push(None);
                }
            }
        }

        let mut families: Vec<Family<'_>> = Vec::with_capacity(generics.len().max(1));
        let mut name_iter = names.iter();
        for generic in &generics {
            match generic {
                Some(family) => families.push(*family),
                None => {
                    if let Some(name) = name_iter.next() {
                        families.push(Family::Name(name.as_str()));
                    }
                }
            }
        }
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded: Option<LoadedFace> = None;
        self.db.with_face_data(id, |data, index| {
            let bytes = data.to_vec();
            loaded = LoadedFace::parse(bytes, index);
        });
        loaded
    }
}

struct LoadedFace {
    _data: Vec<u8>,
    units_per_em: u16,
    face: Face<'static>,
    ascii_advances: [u16; 128],
    glyph_cache: HashMap<char, Option<u16>>,
    advance_cache: HashMap<u16, u16>,
}

impl LoadedFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let parsed = Face::parse(&data, index).ok()?;
        let units_per_em = parsed.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph_id) = parsed.glyph_index(byte as char) {
                ascii_advances[byte as usize] = parsed.glyph_hor_advance(glyph_id).unwrap_or(0);
            }
        }
        // The face borrows `data`, which the struct owns and never moves out
        // of or mutates; the lifetime is erased to tie the two together.
        let face = unsafe { std::mem::transmute::<Face<'_>, Face<'static>>(parsed) };
        Some(Self {
            _data: data,
            units_per_em,
            face,
            ascii_advances,
            glyph_cache: HashMap::new(),
            advance_cache: HashMap::new(),
        })
    }

    fn measure_width(&mut self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * 0.56;

        if text.is_ascii() {
            let mut width = 0.0f32;
            for byte in text.as_bytes() {
                if *byte == b'\n' {
                    continue;
                }
                let advance = self.ascii_advances[*byte as usize];
                if advance == 0 {
                    width += fallback;
                } else {
                    width += advance as f32 * scale;
                }
            }
            return Some(width.max(0.0));
        }

        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let glyph = match self.glyph_cache.get(&ch) {
                Some(cached) => *cached,
                None => {
                    let glyph = self.face.glyph_index(ch).map(|id| id.0);
                    self.glyph_cache.insert(ch, glyph);
                    glyph
                }
            };
            let Some(glyph_id) = glyph else {
                width += fallback;
                continue;
            };
            let advance = match self.advance_cache.get(&glyph_id) {
                Some(value) => *value,
                None => {
                    let value = self.face.glyph_hor_advance(GlyphId(glyph_id)).unwrap_or(0);
                    self.advance_cache.insert(glyph_id, value);
                    value
                }
            };
            width += advance as f32 * scale;
        }
        Some(width.max(0.0))
    }
}

fn family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}
