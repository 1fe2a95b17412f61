//! Fitting the render surface to the window.

/// Largest size with the source's aspect ratio that fits in `window`.
///
/// If the window is wider than the source, height is kept and width shrinks
/// to `height * aspect`; otherwise width is kept and height becomes
/// `width / aspect`. Degenerate sources (zero width or height) return the
/// window unchanged. Results are rounded and never below 1x1.
pub fn fit_to_aspect(window: (u32, u32), source: (u32, u32)) -> (u32, u32) {
    let (ww, wh) = window;
    let (sw, sh) = source;
    if sw == 0 || sh == 0 || ww == 0 || wh == 0 {
        return window;
    }
    let aspect = sw as f64 / sh as f64;
    let window_aspect = ww as f64 / wh as f64;
    let (w, h) = if window_aspect > aspect {
        ((wh as f64 * aspect).round(), wh as f64)
    } else {
        (ww as f64, (ww as f64 / aspect).round())
    };
    ((w as u32).max(1), (h as u32).max(1))
}

/// Offset that centers a `content` sized rectangle inside `window`.
pub fn letterbox_offset(window: (u32, u32), content: (u32, u32)) -> (u32, u32) {
    (
        window.0.saturating_sub(content.0) / 2,
        window.1.saturating_sub(content.1) / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_window_pillarboxes() {
        assert_eq!(fit_to_aspect((1920, 1080), (640, 480)), (1440, 1080));
        assert_eq!(letterbox_offset((1920, 1080), (1440, 1080)), (240, 0));
    }

    #[test]
    fn test_tall_window_letterboxes() {
        assert_eq!(fit_to_aspect((800, 1000), (640, 480)), (800, 600));
        assert_eq!(letterbox_offset((800, 1000), (800, 600)), (0, 200));
    }

    #[test]
    fn test_matching_aspect_is_unchanged() {
        assert_eq!(fit_to_aspect((1280, 720), (1920, 1080)), (1280, 720));
    }

    #[test]
    fn test_result_fits_and_keeps_aspect() {
        let source = (1280, 720);
        for window in [(300, 300), (1000, 200), (123, 457), (1, 1)] {
            let (w, h) = fit_to_aspect(window, source);
            assert!(w <= window.0 && h <= window.1, "{:?} -> {:?}", window, (w, h));
            assert!(w >= 1 && h >= 1);
        }
        let (w, h) = fit_to_aspect((1000, 1000), source);
        assert!(((w as f64 / h as f64) - 16.0 / 9.0).abs() < 0.01);
    }

    #[test]
    fn test_degenerate_source_keeps_window() {
        assert_eq!(fit_to_aspect((640, 480), (0, 0)), (640, 480));
    }
}
