//! Mathematical helpers for correlation and tone statistics.

/// Variance below this is treated as a constant sequence.
const DEGENERATE_VAR: f64 = 1e-12;

/// Pearson correlation between two equal-length sequences.
///
/// Constant sequences have no defined coefficient. Two constant sequences
/// score 1.0 when they hold the same value and 0.0 otherwise; a constant
/// sequence against a varying one scores 0.0. Mismatched lengths and empty
/// inputs score 0.0.
pub(crate) fn pearson<A, B>(a: A, b: B) -> f32
where
    A: IntoIterator<Item = f32>,
    B: IntoIterator<Item = f32>,
{
    let mut n = 0usize;
    let mut sum_a = 0.0f64;
    let mut sum_b = 0.0f64;
    let mut sum_aa = 0.0f64;
    let mut sum_bb = 0.0f64;
    let mut sum_ab = 0.0f64;
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    loop {
        match (a.next(), b.next()) {
            (Some(x), Some(y)) => {
                let (x, y) = (x as f64, y as f64);
                n += 1;
                sum_a += x;
                sum_b += y;
                sum_aa += x * x;
                sum_bb += y * y;
                sum_ab += x * y;
            }
            (None, None) => break,
            _ => return 0.0,
        }
    }
    if n == 0 {
        return 0.0;
    }

    let count = n as f64;
    let var_a = sum_aa - sum_a * sum_a / count;
    let var_b = sum_bb - sum_b * sum_b / count;
    let cov = sum_ab - sum_a * sum_b / count;

    let flat_a = var_a <= DEGENERATE_VAR * count;
    let flat_b = var_b <= DEGENERATE_VAR * count;
    match (flat_a, flat_b) {
        (true, true) => {
            if ((sum_a - sum_b) / count).abs() < 1e-6 {
                1.0
            } else {
                0.0
            }
        }
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let r = cov / (var_a * var_b).sqrt();
            if r.is_finite() {
                r.clamp(-1.0, 1.0) as f32
            } else {
                0.0
            }
        }
    }
}

/// Mean and population variance of a sequence, `None` when empty.
pub(crate) fn mean_variance<I>(values: I) -> Option<(f32, f32)>
where
    I: IntoIterator<Item = f32>,
{
    let mut n = 0usize;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for v in values {
        let v = v as f64;
        n += 1;
        sum += v;
        sum_sq += v * v;
    }
    if n == 0 {
        return None;
    }
    let count = n as f64;
    let mean = sum / count;
    let var = (sum_sq / count - mean * mean).max(0.0);
    Some((mean as f32, var as f32))
}

/// Converts a normalized channel to a byte with rounding and clamping.
#[inline]
pub(crate) fn unit_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Converts a byte channel to the normalized [0, 1] domain.
#[inline]
pub(crate) fn u8_to_unit(value: u8) -> f32 {
    value as f32 / 255.0
}
