//! Rasterization helpers.

use crate::common::*;

/// The outline of a ship as a closed polygon in `(x, y)` pixel coordinates.
///
/// The ship body is a `width × height` box centered at `(x, y)`, with its long side
/// along the heading given by `yaw`. The first corner is repeated at the end.
pub fn box_points(x: f64, y: f64, yaw: f64, width: f64, height: f64) -> [[f64; 2]; 5] {
    let (sin, cos) = yaw.sin_cos();
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let corner = |u: f64, v: f64| [x + u * cos - v * sin, y + u * sin + v * cos];

    [
        corner(-half_w, -half_h),
        corner(half_w, -half_h),
        corner(half_w, half_h),
        corner(-half_w, half_h),
        corner(-half_w, -half_h),
    ]
}

/// The point on the front edge of the ship that marks its heading.
pub fn nose_point(x: f64, y: f64, yaw: f64, height: f64) -> [f64; 2] {
    let (sin, cos) = yaw.sin_cos();
    let half_h = height / 2.0;
    [x - half_h * sin, y + half_h * cos]
}

/// Draws a line with Bresenham's algorithm. Pixels are combined by maximum and
/// pixels outside the canvas are skipped.
pub fn draw_line(canvas: &mut Array2<f32>, from: [f64; 2], to: [f64; 2], value: f32) {
    let (n_rows, n_cols) = canvas.dim();
    let [x0, y0] = from.map(|v| v.round() as i64);
    let [x1, y1] = to.map(|v| v.round() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y) = (x0, y0);
    let mut err = dx + dy;

    loop {
        if (0..n_cols as i64).contains(&x) && (0..n_rows as i64).contains(&y) {
            let pixel = &mut canvas[[y as usize, x as usize]];
            *pixel = pixel.max(value);
        }

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draws the segments between consecutive points.
pub fn draw_polyline(canvas: &mut Array2<f32>, points: &[[f64; 2]], value: f32) {
    points
        .windows(2)
        .for_each(|pair| draw_line(canvas, pair[0], pair[1], value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn axis_aligned_box() {
        let points = box_points(50.0, 60.0, 0.0, 20.0, 40.0);
        assert_eq!(points[0], points[4]);
        assert_abs_diff_eq!(points[0][0], 40.0);
        assert_abs_diff_eq!(points[0][1], 40.0);
        assert_abs_diff_eq!(points[2][0], 60.0);
        assert_abs_diff_eq!(points[2][1], 80.0);
    }

    #[test]
    fn nose_follows_yaw() {
        let [x, y] = nose_point(0.0, 0.0, PI / 2.0, 10.0);
        assert_abs_diff_eq!(x, -5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn line_is_clipped() {
        let mut canvas = Array2::zeros((10, 10));
        draw_line(&mut canvas, [-5.0, 2.0], [20.0, 2.0], 1.0);
        assert_eq!(canvas.row(2).sum(), 10.0);
        assert_eq!(canvas.sum(), 10.0);

        draw_line(&mut canvas, [3.0, 0.0], [3.0, 9.0], 0.5);
        assert_eq!(canvas[[2, 3]], 1.0);
        assert_eq!(canvas[[5, 3]], 0.5);
    }
}
