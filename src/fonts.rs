//! Font resolution for the icon lettering
//!
//! Fonts are looked up by file name through an ordered list of candidates. The first
//! candidate that can be found on disk and parsed as a TrueType/OpenType font is used;
//! when none can, a small built-in bitmap face takes over so rendering never fails.

use crate::canvas::paint_pixel;
use fontdb::{Database, Source};
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Font files tried in order before falling back to the built-in face.
pub const FONT_CANDIDATES: &[&str] = &["arial.ttf", "segoeui.ttf"];

/// Ink bounds of a piece of text, relative to the origin it is drawn at.
///
/// The origin sits on the ascender line, so `top` is usually positive for TrueType
/// faces (capital letters start below the ascender).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBox {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// A font resolved at a fixed pixel size.
#[derive(Clone)]
pub enum Face {
    TrueType { font: Font<'static>, scale: Scale },
    Builtin { px: u32 },
}

impl std::fmt::Debug for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Face::TrueType { scale, .. } => f
                .debug_struct("TrueType")
                .field("scale", &scale.y)
                .finish(),
            Face::Builtin { px } => f.debug_struct("Builtin").field("px", px).finish(),
        }
    }
}

impl Face {
    /// Build a face whose em square is `px` pixels tall.
    pub fn truetype(font: Font<'static>, px: f32) -> Self {
        let metrics = font.v_metrics_unscaled();
        let units_per_em = f32::from(font.units_per_em().max(1));
        let height = px * (metrics.ascent - metrics.descent) / units_per_em;
        Face::TrueType {
            font,
            scale: Scale::uniform(height),
        }
    }

    pub fn builtin(px: u32) -> Self {
        Face::Builtin { px }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Face::Builtin { .. })
    }

    /// Measure the ink bounds of `text` drawn at the origin.
    pub fn text_bbox(&self, text: &str) -> TextBox {
        match self {
            Face::TrueType { font, scale } => {
                let glyphs = layout(font, *scale, text, 0, 0);
                let mut bounds: Option<TextBox> = None;
                for bb in glyphs.iter().filter_map(PositionedGlyph::pixel_bounding_box) {
                    let b = bounds.get_or_insert(TextBox {
                        left: bb.min.x,
                        top: bb.min.y,
                        right: bb.max.x,
                        bottom: bb.max.y,
                    });
                    b.left = b.left.min(bb.min.x);
                    b.top = b.top.min(bb.min.y);
                    b.right = b.right.max(bb.max.x);
                    b.bottom = b.bottom.max(bb.max.y);
                }
                bounds.unwrap_or_default()
            }
            Face::Builtin { px } => bitmap::text_bbox(text, bitmap::cell_size(*px)),
        }
    }

    /// Draw `text` with its origin at `(x, y)`, painting `color` in proportion to glyph coverage.
    pub fn draw_text(&self, img: &mut RgbaImage, (x, y): (i32, i32), text: &str, color: Rgba<u8>) {
        match self {
            Face::TrueType { font, scale } => {
                for glyph in layout(font, *scale, text, x, y) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, coverage| {
                        paint_pixel(
                            img,
                            bb.min.x + gx as i32,
                            bb.min.y + gy as i32,
                            color,
                            coverage,
                        );
                    });
                }
            }
            Face::Builtin { px } => {
                bitmap::draw_text(img, (x, y), text, bitmap::cell_size(*px), color)
            }
        }
    }
}

/// Lay out `text` with the ascender line at `y`.
fn layout<'a>(
    font: &'a Font<'a>,
    scale: Scale,
    text: &str,
    x: i32,
    y: i32,
) -> Vec<PositionedGlyph<'a>> {
    let ascent = font.v_metrics(scale).ascent;
    font.layout(text, scale, point(x as f32, y as f32 + ascent)).collect()
}

/// The large and small faces used for the lettering.
#[derive(Debug, Clone)]
pub struct FontPair {
    pub large: Face,
    pub small: Face,
}

impl FontPair {
    pub const LARGE_PX: f32 = 180.0;
    pub const SMALL_PX: f32 = 60.0;

    /// Resolve both faces against the fonts installed on this system.
    pub fn resolve(candidates: &[&str]) -> Self {
        Self::resolve_in(&system_fonts(), candidates)
    }

    /// Resolve both faces from the first usable candidate, or the built-in face.
    pub fn resolve_in(db: &Database, candidates: &[&str]) -> Self {
        candidates
            .iter()
            .find_map(|name| load_truetype(&locate_font(db, name)?))
            .map(Self::from_font)
            .unwrap_or_else(Self::builtin)
    }

    pub fn from_font(font: Font<'static>) -> Self {
        FontPair {
            large: Face::truetype(font.clone(), Self::LARGE_PX),
            small: Face::truetype(font, Self::SMALL_PX),
        }
    }

    pub fn builtin() -> Self {
        FontPair {
            large: Face::builtin(Self::LARGE_PX as u32),
            small: Face::builtin(Self::SMALL_PX as u32),
        }
    }
}

/// Index of the fonts installed in the platform's font directories.
pub fn system_fonts() -> Database {
    let mut db = Database::new();
    db.load_system_fonts();
    db
}

/// Parse font bytes, returning `None` for anything rusttype cannot read.
pub fn load_truetype(path: &Path) -> Option<Font<'static>> {
    let data = fs::read(path).ok()?;
    Font::try_from_vec(data)
}

/// Find a font file by name: as given first, then among the fonts indexed in `db`.
pub fn locate_font(db: &Database, name: &str) -> Option<PathBuf> {
    let direct = PathBuf::from(name);
    if direct.is_file() {
        return Some(direct);
    }
    // Only bare file names are matched against the index
    if direct.components().count() != 1 {
        return None;
    }
    find_indexed_font(db, name)
}

/// Path of an indexed font file called `name`, the lowest path winning on duplicates.
pub fn find_indexed_font(db: &Database, name: &str) -> Option<PathBuf> {
    db.faces()
        .filter_map(|face| match &face.source {
            Source::File(path) => Some(path),
            _ => None,
        })
        .filter(|path| path.file_name().is_some_and(|file| file == name))
        .min()
        .cloned()
}

/// 5x7 bitmap glyphs for the built-in face
mod bitmap {
    use crate::canvas::paint_pixel;
    use image::{Rgba, RgbaImage};

    use super::TextBox;

    const COLS: i32 = 5;
    const ROWS: i32 = 7;
    const ADVANCE: i32 = COLS + 1;

    const W: [u8; 7] = [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001];
    const M: [u8; 7] = [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001];
    const MISSING: [u8; 7] = [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111];

    fn glyph(c: char) -> &'static [u8; 7] {
        match c.to_ascii_uppercase() {
            'W' => &W,
            'M' => &M,
            _ => &MISSING,
        }
    }

    pub fn cell_size(px: u32) -> i32 {
        (px / 9).max(1) as i32
    }

    pub fn text_bbox(text: &str, cell: i32) -> TextBox {
        let count = text.chars().count() as i32;
        if count == 0 {
            return TextBox::default();
        }
        TextBox {
            left: 0,
            top: 0,
            right: (count * ADVANCE - 1) * cell,
            bottom: ROWS * cell,
        }
    }

    pub fn draw_text(
        img: &mut RgbaImage,
        (x, y): (i32, i32),
        text: &str,
        cell: i32,
        color: Rgba<u8>,
    ) {
        for (i, c) in text.chars().enumerate() {
            let origin_x = x + i as i32 * ADVANCE * cell;
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..COLS {
                    if bits & (1 << (COLS - 1 - col)) == 0 {
                        continue;
                    }
                    let px = origin_x + col * cell;
                    let py = y + row as i32 * cell;
                    for dy in 0..cell {
                        for dx in 0..cell {
                            paint_pixel(img, px + dx, py + dy, color, 1.0);
                        }
                    }
                }
            }
        }
    }
}

/// An installed font file rusttype can read with a "W" glyph, plain sans faces first.
#[cfg(test)]
pub(crate) fn sample_font_file() -> Option<PathBuf> {
    const PREFERRED: &[&str] = &["DejaVu Sans", "Liberation Sans", "Arial", "Noto Sans"];

    let db = system_fonts();
    let mut paths: Vec<(bool, PathBuf)> = db
        .faces()
        .filter_map(|face| {
            let Source::File(path) = &face.source else {
                return None;
            };
            let plain = face.style == fontdb::Style::Normal
                && face.weight == fontdb::Weight::NORMAL
                && face
                    .families
                    .iter()
                    .any(|(family, _)| PREFERRED.contains(&family.as_str()));
            Some((!plain, path.clone()))
        })
        .collect();
    paths.sort();
    paths.dedup();
    paths.into_iter().map(|(_, path)| path).find(|path| {
        load_truetype(path).is_some_and(|font| font.glyph('W').id().0 != 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolve_falls_back_to_builtin_when_nothing_is_found() {
        let pair = FontPair::resolve(&["definitely-not-a-font-4f1c.ttf"]);
        assert!(pair.large.is_builtin());
        assert!(pair.small.is_builtin());
    }

    #[test]
    fn resolve_with_no_candidates_is_builtin() {
        let pair = FontPair::resolve_in(&Database::new(), &[]);
        assert!(pair.large.is_builtin());
    }

    #[test]
    fn unparseable_font_file_is_skipped() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let bogus = dir.path().join("bogus.ttf");
        fs::write(&bogus, b"not a font").expect("Failed to write bogus font");
        let db = Database::new();

        assert_eq!(locate_font(&db, bogus.to_str().unwrap()), Some(bogus.clone()));
        assert!(load_truetype(&bogus).is_none());

        let pair = FontPair::resolve_in(&db, &[bogus.to_str().unwrap()]);
        assert!(pair.large.is_builtin());
    }

    #[test]
    fn empty_index_finds_nothing() {
        let db = Database::new();
        assert_eq!(find_indexed_font(&db, "arial.ttf"), None);
        assert_eq!(locate_font(&db, "arial.ttf"), None);
    }

    #[test]
    fn paths_with_directories_are_not_matched_against_the_index() {
        assert_eq!(locate_font(&system_fonts(), "no/such/dir/arial.ttf"), None);
    }

    #[test]
    fn indexed_font_is_found_by_file_name() {
        let Some(source) = sample_font_file() else {
            println!("No readable system font installed, skipping");
            return;
        };
        let dir = TempDir::new().expect("Failed to create temp directory");
        let nested = dir.path().join("truetype").join("msttcorefonts");
        fs::create_dir_all(&nested).expect("Failed to create nested dirs");
        fs::copy(&source, nested.join("arial.ttf")).expect("Failed to copy font");

        let mut db = Database::new();
        db.load_fonts_dir(dir.path());

        let found = find_indexed_font(&db, "arial.ttf").expect("arial.ttf should be indexed");
        assert!(found.ends_with(Path::new("msttcorefonts").join("arial.ttf")));
        assert_eq!(find_indexed_font(&db, "segoeui.ttf"), None);

        // A missing first candidate falls through to the indexed one
        let pair = FontPair::resolve_in(&db, &["segoeui.ttf", "arial.ttf"]);
        assert!(!pair.large.is_builtin());
        assert!(!pair.small.is_builtin());
    }

    #[test]
    fn truetype_sizes_are_em_sizes() {
        let Some(path) = sample_font_file() else {
            println!("No readable system font installed, skipping");
            return;
        };
        let font = load_truetype(&path).expect("Sample font should parse");
        let metrics = font.v_metrics_unscaled();
        let expected = 180.0 * (metrics.ascent - metrics.descent) / f32::from(font.units_per_em());

        let Face::TrueType { scale, .. } = Face::truetype(font, 180.0) else {
            panic!("Expected a TrueType face");
        };
        assert!((scale.y - expected).abs() < 1e-3);
        assert_eq!(scale.x, scale.y);
    }

    #[test]
    fn truetype_bbox_is_measured_from_the_ascender() {
        let Some(path) = sample_font_file() else {
            println!("No readable system font installed, skipping");
            return;
        };
        let font = load_truetype(&path).expect("Sample font should parse");
        let large = Face::truetype(font.clone(), 180.0);
        let small = Face::truetype(font, 60.0);

        let bbox = large.text_bbox("W");
        assert!(bbox.width() > 0 && bbox.height() > 0, "empty bbox {:?}", bbox);
        assert!(bbox.top > 0, "capital should start below the ascender: {:?}", bbox);

        let small_bbox = small.text_bbox("W");
        assert!(small_bbox.width() < bbox.width());
        assert!(small_bbox.height() < bbox.height());
    }

    #[test]
    fn truetype_draws_inside_its_bbox() {
        let Some(path) = sample_font_file() else {
            println!("No readable system font installed, skipping");
            return;
        };
        let face = Face::truetype(load_truetype(&path).expect("Sample font should parse"), 60.0);
        let mut img = RgbaImage::from_pixel(120, 120, Rgba([0, 0, 0, 0]));
        face.draw_text(&mut img, (20, 10), "W", Rgba([255, 255, 255, 255]));

        let bbox = face.text_bbox("W");
        let mut inked = 0;
        for (x, y, p) in img.enumerate_pixels() {
            if p[3] == 0 {
                continue;
            }
            inked += 1;
            let (x, y) = (x as i32 - 20, y as i32 - 10);
            assert!(x >= bbox.left && x < bbox.right, "x {} outside {:?}", x, bbox);
            assert!(y >= bbox.top && y < bbox.bottom, "y {} outside {:?}", y, bbox);
        }
        assert!(inked > 0, "W should leave ink");
    }

    #[test]
    fn builtin_bbox_scales_with_size() {
        let face = Face::builtin(180);
        let bbox = face.text_bbox("W");
        assert_eq!(bbox, TextBox { left: 0, top: 0, right: 100, bottom: 140 });
        assert_eq!(bbox.width(), 100);
        assert_eq!(bbox.height(), 140);

        let small = Face::builtin(60).text_bbox("M");
        assert_eq!((small.width(), small.height()), (30, 42));

        assert_eq!(Face::builtin(4).text_bbox("WM").width(), 11);
        assert_eq!(Face::builtin(60).text_bbox(""), TextBox::default());
    }

    #[test]
    fn builtin_draws_inside_its_bbox() {
        let mut img = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0]));
        let face = Face::builtin(18);
        let white = Rgba([255, 255, 255, 255]);
        face.draw_text(&mut img, (10, 20), "W", white);

        let bbox = face.text_bbox("W");
        for (x, y, p) in img.enumerate_pixels() {
            if p[3] == 0 {
                continue;
            }
            let (x, y) = (x as i32 - 10, y as i32 - 20);
            assert!(x >= bbox.left && x < bbox.right, "x {} outside bbox", x);
            assert!(y >= bbox.top && y < bbox.bottom, "y {} outside bbox", y);
        }
        // Top-left stroke of the W and the gap next to it (cell size 2)
        assert_eq!(*img.get_pixel(10, 20), white);
        assert_eq!(img.get_pixel(12, 20)[3], 0);
    }

    #[test]
    fn unknown_characters_render_as_a_box() {
        let mut img = RgbaImage::from_pixel(5, 7, Rgba([0, 0, 0, 0]));
        Face::builtin(9).draw_text(&mut img, (0, 0), "?", Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(0, 0)[3], 255);
        assert_eq!(img.get_pixel(4, 6)[3], 255);
        assert_eq!(img.get_pixel(2, 3)[3], 0);
    }
}
