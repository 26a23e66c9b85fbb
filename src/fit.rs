//! Aspect-fit math: scale an image to the largest size that fits a cell
//! without distortion, centered.

/// The result of fitting an image into a cell: the scaled size and the
/// offset from the cell origin that centers it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub width: f64,
    pub height: f64,
    pub dx: f64,
    pub dy: f64,
}

/// Fit intrinsic dimensions into a `cell_w x cell_h` box preserving aspect
/// ratio. Without intrinsic dimensions the image fills the cell.
///
/// Guarantees: the result never exceeds the cell in either dimension, and
/// at least one dimension equals the cell's corresponding bound.
pub fn aspect_fit(cell_w: f64, cell_h: f64, intrinsic: Option<(f64, f64)>) -> Fit {
    let (iw, ih) = match intrinsic {
        Some((w, h)) if w > 0.0 && h > 0.0 => (w, h),
        _ => {
            return Fit {
                width: cell_w,
                height: cell_h,
                dx: 0.0,
                dy: 0.0,
            }
        }
    };

    let cell_ratio = cell_w / cell_h;
    let img_ratio = iw / ih;

    let (width, height) = if img_ratio > cell_ratio {
        // Wider than the cell: width is the binding constraint.
        (cell_w, cell_w / img_ratio)
    } else {
        (cell_h * img_ratio, cell_h)
    };

    Fit {
        width,
        height,
        dx: (cell_w - width) / 2.0,
        dy: (cell_h - height) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn missing_intrinsic_fills_cell() {
        let fit = aspect_fit(120.0, 90.0, None);
        assert_eq!(fit.width, 120.0);
        assert_eq!(fit.height, 90.0);
        assert_eq!(fit.dx, 0.0);
        assert_eq!(fit.dy, 0.0);
    }

    #[test]
    fn wide_image_binds_on_width() {
        // 4:1 image into a 2:1 cell.
        let fit = aspect_fit(200.0, 100.0, Some((400.0, 100.0)));
        assert!((fit.width - 200.0).abs() < EPS);
        assert!((fit.height - 50.0).abs() < EPS);
        assert!((fit.dx - 0.0).abs() < EPS);
        assert!((fit.dy - 25.0).abs() < EPS);
    }

    #[test]
    fn tall_image_binds_on_height() {
        let fit = aspect_fit(200.0, 100.0, Some((100.0, 400.0)));
        assert!((fit.height - 100.0).abs() < EPS);
        assert!((fit.width - 25.0).abs() < EPS);
        assert!((fit.dx - 87.5).abs() < EPS);
        assert!((fit.dy - 0.0).abs() < EPS);
    }

    #[test]
    fn exact_ratio_fills_cell() {
        let fit = aspect_fit(300.0, 150.0, Some((600.0, 300.0)));
        assert!((fit.width - 300.0).abs() < EPS);
        assert!((fit.height - 150.0).abs() < EPS);
    }

    #[test]
    fn never_exceeds_cell_and_preserves_ratio() {
        let cells = [(50.0, 50.0), (210.0, 75.5), (33.0, 400.0)];
        let images = [(1.0, 1000.0), (1000.0, 1.0), (640.0, 480.0), (3.0, 4.0)];
        for &(cw, ch) in &cells {
            for &(iw, ih) in &images {
                let fit = aspect_fit(cw, ch, Some((iw, ih)));
                assert!(fit.width <= cw + EPS, "{cw}x{ch} <- {iw}x{ih}");
                assert!(fit.height <= ch + EPS, "{cw}x{ch} <- {iw}x{ih}");
                // At least one dimension touches its bound.
                assert!(
                    (fit.width - cw).abs() < EPS || (fit.height - ch).abs() < EPS,
                    "neither bound reached for {cw}x{ch} <- {iw}x{ih}"
                );
                let want = iw / ih;
                let got = fit.width / fit.height;
                assert!((want - got).abs() < 1e-6, "ratio drift: {want} vs {got}");
            }
        }
    }

    #[test]
    fn degenerate_intrinsic_falls_back_to_fill() {
        let fit = aspect_fit(100.0, 80.0, Some((0.0, 480.0)));
        assert_eq!(fit.width, 100.0);
        assert_eq!(fit.height, 80.0);
    }
}
