//! Noise generators
//!
//! The random source is passed in by the caller, so a seeded generator gives
//! reproducible output. Noise is applied to every pixel, in row-major order.

use kernelfx_image::{PixelBuffer, CHANNELS};
use rand::Rng;

use crate::error::FilterError;
use crate::filter::window::saturate_u8;

/// Standard normal sample using the Box-Muller transform.
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // 1 - [0, 1) keeps the logarithm finite
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Add zero-mean Gaussian noise to every channel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `sigma` - Standard deviation in intensity units, `>= 0`.
/// * `rng` - The random source.
///
/// # Examples
///
/// ```
/// use kernelfx_image::PixelBuffer;
/// use kernelfx_imgproc::noise::add_gaussian_noise;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let src = PixelBuffer::from_size_val([8, 8].into(), [128, 128, 128]).unwrap();
///
/// let a = add_gaussian_noise(&src, 10.0, &mut StdRng::seed_from_u64(7)).unwrap();
/// let b = add_gaussian_noise(&src, 10.0, &mut StdRng::seed_from_u64(7)).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn add_gaussian_noise<R: Rng + ?Sized>(
    src: &PixelBuffer,
    sigma: f64,
    rng: &mut R,
) -> Result<PixelBuffer, FilterError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(FilterError::InvalidParameter(format!(
            "noise sigma must be finite and >= 0, got {sigma}"
        )));
    }

    log::debug!("add_gaussian_noise: {}, sigma {sigma}", src.size());

    let mut dst = src.clone();
    for y in 0..dst.height() {
        dst.row_mut(y).iter_mut().for_each(|v| {
            *v = saturate_u8(f64::from(*v) + sigma * standard_normal(rng));
        });
    }

    Ok(dst)
}

/// Replace random pixels with black or white.
///
/// Each pixel is hit with probability `density`; a hit pixel becomes black
/// or white with equal odds.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `density` - Probability that a pixel is replaced, in `[0, 1]`.
/// * `rng` - The random source.
pub fn add_salt_and_pepper<R: Rng + ?Sized>(
    src: &PixelBuffer,
    density: f64,
    rng: &mut R,
) -> Result<PixelBuffer, FilterError> {
    if !(0.0..=1.0).contains(&density) {
        return Err(FilterError::InvalidParameter(format!(
            "noise density must be in [0, 1], got {density}"
        )));
    }

    log::debug!("add_salt_and_pepper: {}, density {density}", src.size());

    let mut dst = src.clone();
    for y in 0..dst.height() {
        for px in dst.row_mut(y).chunks_exact_mut(CHANNELS) {
            if rng.random_bool(density) {
                let value = if rng.random_bool(0.5) { 255 } else { 0 };
                px.fill(value);
            }
        }
    }

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_gaussian_noise_zero_sigma() -> Result<(), FilterError> {
        let src = PixelBuffer::from_size_val([6, 4].into(), [1, 128, 254])?;
        let dst = add_gaussian_noise(&src, 0.0, &mut StdRng::seed_from_u64(0))?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn test_gaussian_noise_statistics() -> Result<(), FilterError> {
        let src = PixelBuffer::from_size_val([64, 64].into(), [128, 128, 128])?;
        let dst = add_gaussian_noise(&src, 8.0, &mut StdRng::seed_from_u64(42))?;

        let n = dst.as_slice().len() as f64;
        let mean = dst.as_slice().iter().map(|&v| f64::from(v)).sum::<f64>() / n;
        let var = dst
            .as_slice()
            .iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / n;

        assert!((mean - 128.0).abs() < 1.0, "mean {mean}");
        assert!((var.sqrt() - 8.0).abs() < 1.0, "std {}", var.sqrt());
        Ok(())
    }

    #[test]
    fn test_gaussian_noise_keeps_padding() -> Result<(), FilterError> {
        let src = PixelBuffer::new([1, 2].into(), 4, vec![100, 100, 100, 9, 100, 100, 100, 9])?;
        let dst = add_gaussian_noise(&src, 50.0, &mut StdRng::seed_from_u64(3))?;
        assert_eq!(dst.as_slice()[3], 9);
        assert_eq!(dst.as_slice()[7], 9);
        Ok(())
    }

    #[test]
    fn test_salt_and_pepper() -> Result<(), FilterError> {
        let src = PixelBuffer::from_size_val([32, 32].into(), [100, 100, 100])?;

        let dst = add_salt_and_pepper(&src, 1.0, &mut StdRng::seed_from_u64(1))?;
        for px in dst.as_slice().chunks_exact(CHANNELS) {
            assert!(*px == [0, 0, 0] || *px == [255, 255, 255]);
        }

        let dst = add_salt_and_pepper(&src, 0.0, &mut StdRng::seed_from_u64(1))?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn test_noise_invalid_parameters() -> Result<(), FilterError> {
        let src = PixelBuffer::from_size_val([2, 2].into(), [0, 0, 0])?;
        let mut rng = StdRng::seed_from_u64(0);
        assert!(add_gaussian_noise(&src, -1.0, &mut rng).is_err());
        assert!(add_gaussian_noise(&src, f64::NAN, &mut rng).is_err());
        assert!(add_salt_and_pepper(&src, 1.5, &mut rng).is_err());
        Ok(())
    }
}
