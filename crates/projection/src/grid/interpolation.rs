//! Interpolation over regular node grids.

use num_traits::Float;

/// Bilinear interpolation.
///
/// `data` is row-major with `width` columns; `x` and `y` are fractional
/// column and row positions. Returns `None` outside the grid or when any of
/// the four surrounding nodes is NaN.
pub fn bilinear_interpolate<T: Float>(
    data: &[T],
    width: usize,
    height: usize,
    x: f64,
    y: f64,
) -> Option<f64> {
    if width == 0 || height == 0 || data.len() < width * height {
        return None;
    }
    if !(x >= 0.0 && y >= 0.0) || x > (width - 1) as f64 || y > (height - 1) as f64 {
        return None;
    }

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);

    let xf = x - x0 as f64;
    let yf = y - y0 as f64;

    let v00 = data[y0 * width + x0].to_f64()?;
    let v10 = data[y0 * width + x1].to_f64()?;
    let v01 = data[y1 * width + x0].to_f64()?;
    let v11 = data[y1 * width + x1].to_f64()?;

    if v00.is_nan() || v10.is_nan() || v01.is_nan() || v11.is_nan() {
        return None;
    }

    let bottom = v00 * (1.0 - xf) + v10 * xf;
    let top = v01 * (1.0 - xf) + v11 * xf;
    Some(bottom * (1.0 - yf) + top * yf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bilinear_interpolate() {
        let data: Vec<f32> = vec![
            1.0, 2.0,
            3.0, 4.0,
        ];

        assert_eq!(bilinear_interpolate(&data, 2, 2, 0.0, 0.0), Some(1.0));
        assert_eq!(bilinear_interpolate(&data, 2, 2, 1.0, 0.0), Some(2.0));
        assert_eq!(bilinear_interpolate(&data, 2, 2, 0.0, 1.0), Some(3.0));
        assert_eq!(bilinear_interpolate(&data, 2, 2, 1.0, 1.0), Some(4.0));

        let center = bilinear_interpolate(&data, 2, 2, 0.5, 0.5).unwrap();
        assert!((center - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_bilinear_f64() {
        let data = vec![0.0_f64, 10.0, 0.0, 10.0, 20.0, 30.0];
        // Halfway between 5 on the bottom row and 25 on the top row
        let v = bilinear_interpolate(&data, 3, 2, 1.5, 0.5).unwrap();
        assert!((v - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_bilinear_with_nan() {
        let data: Vec<f32> = vec![
            1.0, f32::NAN,
            3.0, 4.0,
        ];
        assert_eq!(bilinear_interpolate(&data, 2, 2, 0.5, 0.5), None);
    }

    #[test]
    fn test_outside() {
        let data: Vec<f32> = vec![1.0; 4];
        assert_eq!(bilinear_interpolate(&data, 2, 2, -0.1, 0.0), None);
        assert_eq!(bilinear_interpolate(&data, 2, 2, 0.0, 1.01), None);
        assert_eq!(bilinear_interpolate(&data, 2, 2, f64::NAN, 0.0), None);
    }
}
