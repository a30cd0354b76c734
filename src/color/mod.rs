//! RGB <-> HSV conversion on normalized channels.
//!
//! Hue is expressed as a fraction of a full turn in `[0, 1)`, saturation and
//! value in `[0, 1]`. Value is `max(r, g, b)`, so it is exactly recoverable
//! from byte channels.

use crate::util::math::{u8_to_unit, unit_to_u8};

/// HSV triple with hue in turns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
    /// Hue in `[0, 1)`.
    pub h: f32,
    /// Saturation in `[0, 1]`.
    pub s: f32,
    /// Value (brightness) in `[0, 1]`.
    pub v: f32,
}

/// Converts normalized RGB channels to HSV.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    let chroma = max - min;
    if chroma <= 0.0 || max <= 0.0 {
        return Hsv { h: 0.0, s: 0.0, v };
    }
    let s = chroma / max;
    let rc = (max - r) / chroma;
    let gc = (max - g) / chroma;
    let bc = (max - b) / chroma;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    Hsv {
        h: wrap_unit(h / 6.0),
        s,
        v,
    }
}

/// Converts HSV back to normalized RGB channels.
pub fn hsv_to_rgb(hsv: Hsv) -> [f32; 3] {
    let Hsv { h, s, v } = hsv;
    if s <= 0.0 {
        return [v, v, v];
    }
    let h6 = wrap_unit(h) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u8 % 6 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// HSV of a byte RGB(A) pixel; alpha is ignored.
#[inline]
pub fn pixel_hsv(px: [u8; 4]) -> Hsv {
    rgb_to_hsv(u8_to_unit(px[0]), u8_to_unit(px[1]), u8_to_unit(px[2]))
}

/// HSV value of a byte pixel, `max(r, g, b) / 255`.
#[inline]
pub fn pixel_value(px: [u8; 4]) -> f32 {
    u8_to_unit(px[0].max(px[1]).max(px[2]))
}

/// Rebuilds a byte pixel from HSV, carrying `alpha` through.
#[inline]
pub(crate) fn hsv_to_pixel(hsv: Hsv, alpha: u8) -> [u8; 4] {
    let [r, g, b] = hsv_to_rgb(hsv);
    [unit_to_u8(r), unit_to_u8(g), unit_to_u8(b), alpha]
}

/// Wraps a value onto the unit ring `[0, 1)`.
#[inline]
pub(crate) fn wrap_unit(value: f32) -> f32 {
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}
