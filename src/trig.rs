//! Fixed-point trigonometry.
//!
//! Angles are in millidegrees, results are Q16 (`65536` == 1.0). A quarter
//! wave is tabulated per degree and interpolated linearly in between.

/// `sin(n°)` for `n` in `0..=90`, Q16.
const SIN_Q16: [i32; 91] = [
    0, 1144, 2287, 3430, 4572, 5712, 6850, 7987, 9121, 10252,
    11380, 12505, 13626, 14742, 15855, 16962, 18064, 19161, 20252, 21336,
    22415, 23486, 24550, 25607, 26656, 27697, 28729, 29753, 30767, 31772,
    32768, 33754, 34729, 35693, 36647, 37590, 38521, 39441, 40348, 41243,
    42126, 42995, 43852, 44695, 45525, 46341, 47143, 47930, 48703, 49461,
    50203, 50931, 51643, 52339, 53020, 53684, 54332, 54963, 55578, 56175,
    56756, 57319, 57865, 58393, 58903, 59396, 59870, 60326, 60764, 61183,
    61584, 61966, 62328, 62672, 62997, 63303, 63589, 63856, 64104, 64332,
    64540, 64729, 64898, 65048, 65177, 65287, 65376, 65446, 65496, 65526,
    65536,
];

const QUARTER: i32 = 90_000;
const FULL: i32 = 4 * QUARTER;

/// One Q16 unit.
pub const ONE: i32 = 1 << 16;

/// Sine of an angle given in millidegrees, Q16.
pub fn sin_hq(millideg: i32) -> i32 {
    let a = millideg.rem_euclid(FULL);
    let within = a % QUARTER;
    match a / QUARTER {
        0 => quarter(within),
        1 => quarter(QUARTER - within),
        2 => -quarter(within),
        _ => -quarter(QUARTER - within),
    }
}

/// Cosine of an angle given in millidegrees, Q16.
pub fn cos_hq(millideg: i32) -> i32 {
    sin_hq(millideg.rem_euclid(FULL) + QUARTER)
}

/// Interpolated first-quadrant sine, `m` in `0..=90_000`.
fn quarter(m: i32) -> i32 {
    let deg = (m / 1000) as usize;
    if deg >= 90 {
        return SIN_Q16[90];
    }
    let frac = m % 1000;
    let (a, b) = (SIN_Q16[deg], SIN_Q16[deg + 1]);
    a + (b - a) * frac / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_angles_are_exact() {
        assert_eq!(sin_hq(0), 0);
        assert_eq!(sin_hq(90_000), ONE);
        assert_eq!(sin_hq(180_000), 0);
        assert_eq!(sin_hq(270_000), -ONE);
        assert_eq!(cos_hq(0), ONE);
        assert_eq!(cos_hq(180_000), -ONE);
        assert_eq!(cos_hq(360_000), ONE);
    }

    #[test]
    fn negative_and_wrapped_angles() {
        assert_eq!(sin_hq(-90_000), -ONE);
        assert_eq!(sin_hq(450_000), ONE);
        assert_eq!(sin_hq(30_000), ONE / 2);
        assert_eq!(sin_hq(-30_000), -ONE / 2);
    }

    #[test]
    fn interpolates_between_degrees() {
        let lo = sin_hq(10_000);
        let mid = sin_hq(10_500);
        let hi = sin_hq(11_000);
        assert!(lo < mid && mid < hi);
    }

    #[test]
    fn stays_within_unit_range() {
        for m in (0..FULL).step_by(250) {
            assert!(sin_hq(m).abs() <= ONE);
            assert!(cos_hq(m).abs() <= ONE);
        }
    }
}
