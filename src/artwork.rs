//! Drawing of the WellMinder app icon
//!
//! The background is a stack of opaque green discs, each a little smaller and darker
//! than the previous one. A large "W" with a smaller "M" beneath it sits on top,
//! each with a soft drop shadow, and a faint white ring frames the whole icon.

use crate::canvas::{fill_circle, stroke_circle};
use crate::fonts::{Face, FontPair, TextBox, FONT_CANDIDATES};
use image::{Rgb, Rgba, RgbaImage};

/// Edge length of the full-resolution icon.
pub const ICON_SIZE: u32 = 512;

/// Background colours, drawn from the outermost disc inwards.
pub const PALETTE: [Rgb<u8>; 3] = [Rgb([76, 175, 80]), Rgb([69, 160, 73]), Rgb([56, 142, 60])];

const DISC_MARGIN: i32 = 20;
const DISC_STEP: i32 = 15;

const LARGE_TEXT: &str = "W";
const SMALL_TEXT: &str = "M";
const LARGE_LIFT: i32 = 30;
const SMALL_GAP: i32 = 10;
const LARGE_SHADOW_OFFSET: i32 = 3;
const SMALL_SHADOW_OFFSET: i32 = 2;

const SHADOW: Rgba<u8> = Rgba([0, 0, 0, 100]);
const TEXT: Rgba<u8> = Rgba([255, 255, 255, 255]);

const RING_INSET: i32 = 10;
const RING_WIDTH: i32 = 4;
const RING: Rgba<u8> = Rgba([255, 255, 255, 50]);

/// Render the icon with fonts resolved from the default candidate list.
pub fn generate_icon() -> RgbaImage {
    render_icon(&FontPair::resolve(FONT_CANDIDATES))
}

/// Render the icon with already resolved fonts.
pub fn render_icon(fonts: &FontPair) -> RgbaImage {
    let size = ICON_SIZE as i32;
    let mut img = RgbaImage::from_pixel(ICON_SIZE, ICON_SIZE, Rgba([0, 0, 0, 0]));

    let center = size / 2;
    draw_background(&mut img, center, center - DISC_MARGIN);

    let large = place_centered(&fonts.large, LARGE_TEXT, size);
    let large_pos = (large.x, (size - large.bbox.height()).div_euclid(2) - LARGE_LIFT);
    draw_with_shadow(&mut img, &fonts.large, large_pos, LARGE_TEXT, LARGE_SHADOW_OFFSET);

    let small = place_centered(&fonts.small, SMALL_TEXT, size);
    let small_pos = (small.x, large_pos.1 + large.bbox.height() + SMALL_GAP);
    draw_with_shadow(&mut img, &fonts.small, small_pos, SMALL_TEXT, SMALL_SHADOW_OFFSET);

    let ring_radius = center - RING_INSET;
    stroke_circle(&mut img, center, center, ring_radius, RING_WIDTH, RING);

    img
}

fn draw_background(img: &mut RgbaImage, center: i32, radius: i32) {
    for (i, color) in PALETTE.iter().enumerate() {
        let r = radius - i as i32 * DISC_STEP;
        if r <= 0 {
            continue;
        }
        let Rgb([red, green, blue]) = *color;
        fill_circle(img, center, center, r, Rgba([red, green, blue, 255]));
    }
}

struct Placement {
    x: i32,
    bbox: TextBox,
}

/// Horizontal position that centres the ink width of `text` on the canvas.
fn place_centered(face: &Face, text: &str, size: i32) -> Placement {
    let bbox = face.text_bbox(text);
    Placement {
        x: (size - bbox.width()).div_euclid(2),
        bbox,
    }
}

fn draw_with_shadow(
    img: &mut RgbaImage,
    face: &Face,
    (x, y): (i32, i32),
    text: &str,
    offset: i32,
) {
    face.draw_text(img, (x + offset, y + offset), text, SHADOW);
    face.draw_text(img, (x, y), text, TEXT);
}
