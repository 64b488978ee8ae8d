//! Minimal single-page PDF canvas on top of `pdf-writer`.

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};
use std::fs;
use std::io;
use std::path::Path;

pub const A4_WIDTH: f32 = 595.0;
pub const A4_HEIGHT: f32 = 842.0;

/// A baseline or progressive JPEG, embedded as-is with DCTDecode.
#[derive(Debug, Clone)]
pub struct JpegImage {
    data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    components: u8,
}

impl JpegImage {
    pub fn open(path: &Path) -> io::Result<Option<Self>> {
        Ok(Self::from_bytes(fs::read(path)?))
    }

    /// `None` when the bytes are not a JPEG with a readable frame header.
    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
            return None;
        }

        let mut i = 2;
        while i + 9 < data.len() {
            if data[i] != 0xFF {
                return None;
            }
            let marker = data[i + 1];
            if marker == 0xFF {
                i += 1;
                continue;
            }

            // SOF0..SOF15, esclusi DHT/JPG/DAC
            if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
                let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
                let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
                let components = data[i + 9];
                if width == 0 || height == 0 {
                    return None;
                }
                return Some(Self {
                    data,
                    width,
                    height,
                    components,
                });
            }

            let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            i += 2 + len;
        }
        None
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Map a char to its WinAnsi byte; unmapped chars become `?`.
fn win_ansi(c: char) -> u8 {
    match c {
        '\u{20}'..='\u{7E}' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        _ => b'?',
    }
}

pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi).collect()
}

/// Approximate Helvetica advance, in units of the font size.
fn glyph_width(c: char) -> f32 {
    match c {
        ' ' | 'i' | 'j' | 'l' | '.' | ',' | ';' | ':' | '\'' | '!' | '|' | 'I' | 'ì' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '/' | '-' => 0.33,
        'm' | 'w' | 'M' | 'W' => 0.83,
        'A'..='Z' => 0.67,
        _ => 0.55,
    }
}

pub struct PdfCanvas {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_id: Ref,
    content_id: Ref,
    font_id: Ref,
    bold_font_id: Ref,
    next_id: i32,
    images: Vec<(String, Ref)>,
    content: Content,
    pub page_w: f32,
    pub page_h: f32,
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCanvas {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        // ID gestiti a mano
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let page_id = Ref::new(3);
        let content_id = Ref::new(4);
        let font_id = Ref::new(5);
        let bold_font_id = Ref::new(6);

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_font_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_id,
            content_id,
            font_id,
            bold_font_id,
            next_id: 7,
            images: Vec::new(),
            content: Content::new(),
            page_w: A4_WIDTH,
            page_h: A4_HEIGHT,
        }
    }

    /// Genera un nuovo Ref univoco
    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(glyph_width).sum::<f32>() * size
    }

    pub fn draw_text(&mut self, x: f32, y: f32, size: f32, bold: bool, text: &str) {
        let font = if bold { Name(b"F2") } else { Name(b"F1") };
        let bytes = encode_win_ansi(text);
        self.content.begin_text();
        self.content.set_font(font, size);
        self.content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        self.content.show(Str(&bytes));
        self.content.end_text();
    }

    pub fn draw_centered(&mut self, y: f32, size: f32, bold: bool, text: &str) {
        let x = ((self.page_w - self.text_width(text, size)) / 2.0).max(0.0);
        self.draw_text(x, y, size, bold, text);
    }

    /// Embed the image once; returns the resource name to draw it with.
    pub fn add_image(&mut self, image: &JpegImage) -> String {
        let id = self.fresh_ref();
        let name = format!("Im{}", self.images.len() + 1);

        let mut xobject = self.pdf.image_xobject(id, &image.data);
        xobject.filter(Filter::DctDecode);
        xobject.width(image.width as i32);
        xobject.height(image.height as i32);
        match image.components {
            1 => xobject.color_space().device_gray(),
            4 => xobject.color_space().device_cmyk(),
            _ => xobject.color_space().device_rgb(),
        };
        xobject.bits_per_component(8);
        xobject.finish();

        self.images.push((name.clone(), id));
        name
    }

    /// Draw a previously added image with its lower-left corner at (x, y).
    pub fn draw_image(&mut self, name: &str, x: f32, y: f32, w: f32, h: f32) {
        self.content.save_state();
        self.content.transform([w, 0.0, 0.0, h, x, y]);
        self.content.x_object(Name(name.as_bytes()));
        self.content.restore_state();
    }

    pub fn finish(mut self) -> Vec<u8> {
        {
            let mut page = self.pdf.page(self.page_id);
            page.parent(self.pages_id)
                .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
                .contents(self.content_id);

            let mut resources = page.resources();
            resources
                .fonts()
                .pair(Name(b"F1"), self.font_id)
                .pair(Name(b"F2"), self.bold_font_id);

            let mut xobjects = resources.x_objects();
            for (name, id) in &self.images {
                xobjects.pair(Name(name.as_bytes()), *id);
            }
        }

        let content = std::mem::replace(&mut self.content, Content::new());
        self.pdf.stream(self.content_id, &content.finish());

        self.pdf.pages(self.pages_id).kids([self.page_id]).count(1);
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);

        self.pdf.finish()
    }

    pub fn save(self, path: &Path) -> io::Result<()> {
        fs::write(path, self.finish())
    }
}
