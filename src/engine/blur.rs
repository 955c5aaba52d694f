use crate::foundation::error::{ViewfinderError, ViewfinderResult};

/// Two-pass separable gaussian blur over premultiplied RGBA8, edge-clamped.
pub(crate) fn blur_rgba8(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> ViewfinderResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ViewfinderError::pipeline("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(ViewfinderError::pipeline(
            "blur_rgba8 expects src matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    convolve_pass(src, &mut tmp, width, height, &kernel, Axis::Horizontal);
    convolve_pass(&tmp, &mut out, width, height, &kernel, Axis::Vertical);
    Ok(out)
}

/// Normalized 1-D gaussian weights of length `2*radius + 1`.
fn gaussian_kernel(radius: u32, sigma: f32) -> ViewfinderResult<Vec<f32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ViewfinderError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let mut weights = Vec::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(ViewfinderError::pipeline("gaussian kernel sum is zero"));
    }

    Ok(weights.into_iter().map(|w| (w / sum) as f32).collect())
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn convolve_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[f32], axis: Axis) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;

    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as i32 - radius;
                let (sx, sy) = match axis {
                    Axis::Horizontal => ((x + d).clamp(0, w - 1), y),
                    Axis::Vertical => (x, (y + d).clamp(0, h - 1)),
                };
                let idx = ((sy * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += kw * f32::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_zero_is_copy() {
        let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        let out = blur_rgba8(&src, 2, 1, 0, 1.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn uniform_image_is_unchanged() {
        let src = vec![128u8; 4 * 4 * 4];
        let out = blur_rgba8(&src, 4, 4, 2, 1.5).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn blur_spreads_energy() {
        // A single bright pixel in a black field must dim at the center and
        // light up its neighbors.
        let mut src = vec![0u8; 5 * 5 * 4];
        let center = (2 * 5 + 2) * 4;
        src[center] = 255;
        src[center + 3] = 255;

        let out = blur_rgba8(&src, 5, 5, 1, 0.8).unwrap();
        assert!(out[center] < 255);
        let left = (2 * 5 + 1) * 4;
        assert!(out[left] > 0);
    }

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(blur_rgba8(&[0u8; 10], 2, 2, 1, 1.0).is_err());
    }

    #[test]
    fn rejects_bad_sigma() {
        let src = vec![0u8; 4];
        assert!(blur_rgba8(&src, 1, 1, 1, 0.0).is_err());
        assert!(blur_rgba8(&src, 1, 1, 1, f32::NAN).is_err());
    }
}
