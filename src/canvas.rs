use image::{Rgba, RgbaImage};

/// Fill a disc of radius `r` centred on (`cx`, `cy`), replacing the pixels it covers.
///
/// A pixel belongs to the disc when its distance to the centre is at most `r`,
/// so the disc spans `2r + 1` pixels edge to edge.
pub fn fill_circle(img: &mut RgbaImage, cx: i32, cy: i32, r: i32, color: Rgba<u8>) {
    if r <= 0 {
        return;
    }
    let r2 = i64::from(r) * i64::from(r);
    for (x, y) in span(img, cx, cy, r) {
        if dist2(x, y, cx, cy) <= r2 {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Stroke a ring of the given `width` just inside radius `r`, replacing the pixels it covers.
pub fn stroke_circle(img: &mut RgbaImage, cx: i32, cy: i32, r: i32, width: i32, color: Rgba<u8>) {
    if r <= 0 || width <= 0 {
        return;
    }
    let outer = i64::from(r) * i64::from(r);
    let inner_r = i64::from((r - width).max(0));
    let inner = inner_r * inner_r;
    for (x, y) in span(img, cx, cy, r) {
        let d2 = dist2(x, y, cx, cy);
        // A zero-width interior would otherwise leave the centre pixel unfilled
        if d2 <= outer && (d2 > inner || inner_r == 0) {
            paint_pixel(img, x, y, color, 1.0);
        }
    }
}

/// Move every channel of the pixel at (`x`, `y`) towards `ink` by `coverage`.
///
/// Alpha is interpolated like the colour channels rather than composited, so full
/// coverage leaves exactly `ink` behind even when it is translucent. Out of bounds
/// coordinates are ignored.
pub fn paint_pixel(img: &mut RgbaImage, x: i32, y: i32, ink: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
        return;
    }
    let mask = (coverage.clamp(0.0, 1.0) * 255.0).round() as u32;
    if mask == 0 {
        return;
    }
    let pixel = img.get_pixel_mut(x as u32, y as u32);
    for (out, &ink) in pixel.0.iter_mut().zip(ink.0.iter()) {
        *out = div255(u32::from(*out) * (255 - mask) + u32::from(ink) * mask);
    }
}

/// Rounded division by 255 for values up to 255 * 255.
fn div255(v: u32) -> u8 {
    let t = v + 128;
    (((t >> 8) + t) >> 8) as u8
}

fn dist2(x: i32, y: i32, cx: i32, cy: i32) -> i64 {
    let dx = i64::from(x - cx);
    let dy = i64::from(y - cy);
    dx * dx + dy * dy
}

/// Coordinates of the bounding square of a circle, clipped to the canvas.
fn span(img: &RgbaImage, cx: i32, cy: i32, r: i32) -> impl Iterator<Item = (i32, i32)> {
    let x0 = (cx - r).max(0);
    let y0 = (cy - r).max(0);
    let x1 = (cx + r).min(img.width() as i32 - 1);
    let y1 = (cy + r).min(img.height() as i32 - 1);
    (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| (x, y)))
}
