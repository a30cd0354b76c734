//! Circular ordering of hues on the `[0, 1)` ring.

/// Sorts hues by angular proximity on the unit ring.
///
/// Hues are sorted ascending, then rotated so the sequence starts right after
/// the widest gap between neighbours (the wrap-around gap included). The
/// result walks the ring without crossing that gap, so hues such as 0.9 and
/// 0.1 end up adjacent. When several gaps tie for widest, the first one in
/// ascending order wins.
pub fn circular_sort(hues: &[f32]) -> Vec<f32> {
    let mut sorted = hues.to_vec();
    sorted.sort_by(f32::total_cmp);
    if sorted.len() < 2 {
        return sorted;
    }

    let n = sorted.len();
    let mut start = 0usize;
    let mut widest = f32::NEG_INFINITY;
    for i in 0..n {
        let next = if i + 1 == n { sorted[0] + 1.0 } else { sorted[i + 1] };
        let gap = next - sorted[i];
        if gap > widest {
            widest = gap;
            start = (i + 1) % n;
        }
    }
    sorted.rotate_left(start);
    sorted
}

/// Shortest angular distance between two hues, in turns.
pub fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(1.0);
    d.min(1.0 - d)
}
