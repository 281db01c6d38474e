use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};

/// One character placed on a page, in PDF user space (y grows upwards)
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub x: f64,
    pub y: f64,
    /// Horizontal advance in points
    pub advance: f64,
    pub font_size: f64,
    pub text: String,
}

impl Glyph {
    pub fn end(&self) -> f64 {
        self.x + self.advance
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Collects positioned glyphs for a single page render
#[derive(Debug, Default)]
pub struct GlyphCollector {
    glyphs: Vec<Glyph>,
}

impl GlyphCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_glyphs(self) -> Vec<Glyph> {
        self.glyphs
    }
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        // scale of the text rendering matrix, so Tm/cm scaling counts towards the size
        let scale = (trm.m11 * trm.m22 - trm.m12 * trm.m21).abs().sqrt();
        let size = if scale > 0.0 { font_size * scale } else { font_size };

        self.glyphs.push(Glyph {
            x: trm.m31,
            y: trm.m32,
            advance: width * size,
            font_size: size,
            text: char.to_string(),
        });
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}
