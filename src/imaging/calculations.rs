//! Pure calculation functions for image dimensions and the quality search.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Quality;

/// Dimensions after fitting to a maximum width.
///
/// Images at or under `max_width` keep their size. Wider images are scaled by
/// `max_width / width`: the width becomes exactly `max_width` and the height
/// is `floor(height * max_width / width)`, never less than one pixel.
///
/// # Examples
/// ```
/// # use gallery_optimizer::imaging::calculate_fit_width;
/// assert_eq!(calculate_fit_width((800, 400), 600), (600, 300));
/// assert_eq!(calculate_fit_width((500, 700), 600), (500, 700));
/// ```
pub fn calculate_fit_width(original: (u32, u32), max_width: u32) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    if orig_w <= max_width {
        return original;
    }
    // Integer math: floating point would round 299.999… down to 299.
    let h = (orig_h as u64 * max_width as u64 / orig_w as u64) as u32;
    (max_width, h.max(1))
}

/// One planned encode in the quality search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub quality: Quality,
    /// The last-resort encode after the ladder is exhausted. Its result is
    /// final whether or not it meets the budget.
    pub fallback: bool,
}

/// The full sequence of encodes the search may perform: every ladder level in
/// order, then one fallback at `floor`.
pub fn plan_attempts(ladder: &[Quality], floor: Quality) -> Vec<Attempt> {
    ladder
        .iter()
        .map(|&quality| Attempt {
            quality,
            fallback: false,
        })
        .chain(std::iter::once(Attempt {
            quality: floor,
            fallback: true,
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // calculate_fit_width tests
    // =========================================================================

    #[test]
    fn fit_wider_image_scales_to_max_width() {
        assert_eq!(calculate_fit_width((800, 400), 600), (600, 300));
    }

    #[test]
    fn fit_rounds_height_down() {
        // 1000 * 600 / 1920 = 312.5
        assert_eq!(calculate_fit_width((1920, 1000), 600), (600, 312));
        // 333 * 600 / 1000 = 199.8
        assert_eq!(calculate_fit_width((1000, 333), 600), (600, 199));
    }

    #[test]
    fn fit_exact_ratio_is_not_truncated() {
        // 0.3 * 1000 is not representable exactly in floating point
        assert_eq!(calculate_fit_width((2000, 1000), 600), (600, 300));
        assert_eq!(calculate_fit_width((1800, 2700), 600), (600, 900));
    }

    #[test]
    fn fit_at_threshold_is_unchanged() {
        assert_eq!(calculate_fit_width((600, 900), 600), (600, 900));
    }

    #[test]
    fn fit_narrow_image_is_unchanged() {
        assert_eq!(calculate_fit_width((320, 2000), 600), (320, 2000));
    }

    #[test]
    fn fit_extreme_panorama_keeps_one_pixel() {
        assert_eq!(calculate_fit_width((10_000, 5), 600), (600, 1));
    }

    #[test]
    fn fit_invariant_over_many_sizes() {
        for w in (1..3000).step_by(37) {
            for h in (1..3000).step_by(53) {
                let (out_w, out_h) = calculate_fit_width((w, h), 600);
                if w > 600 {
                    assert_eq!(out_w, 600);
                    let expected = (h as u64 * 600 / w as u64).max(1) as u32;
                    assert_eq!(out_h, expected, "{w}x{h}");
                } else {
                    assert_eq!((out_w, out_h), (w, h));
                }
            }
        }
    }

    // =========================================================================
    // plan_attempts tests
    // =========================================================================

    #[test]
    fn plan_default_ladder_then_floor() {
        let ladder: Vec<Quality> = [85, 75, 65, 55].into_iter().map(Quality::new).collect();
        let plan = plan_attempts(&ladder, Quality::new(50));

        let qualities: Vec<u32> = plan.iter().map(|a| a.quality.value()).collect();
        assert_eq!(qualities, vec![85, 75, 65, 55, 50]);
        assert!(plan[..4].iter().all(|a| !a.fallback));
        assert!(plan[4].fallback);
    }

    #[test]
    fn plan_empty_ladder_is_just_fallback() {
        let plan = plan_attempts(&[], Quality::new(50));
        assert_eq!(plan.len(), 1);
        assert!(plan[0].fallback);
    }
}
