//! Deterministic placeholder rendering.
//!
//! When no image backend is configured the service still returns a PNG: a
//! dark gradient with scattered colored dots, seeded from a hash of the
//! prompt so the same prompt always renders the same picture.

use image::{ImageBuffer, ImageFormat, Rgb};
use std::io::Cursor;

use super::ProviderError;
use crate::analysis::name_digest;

pub const PLACEHOLDER_SIZE: u32 = 512;
const DOT_COUNT: u32 = 50;

/// Minimal LCG over the prompt digest. Not a statistical generator, just a
/// stable scatter for the placeholder art.
struct Scatter {
    state: u64,
}

impl Scatter {
    fn from_prompt(prompt: &str) -> Self {
        let digest = name_digest(prompt);
        // First 16 hex chars of the digest seed the generator.
        let state = u64::from_str_radix(&digest[0..16], 16).unwrap_or(0x9e3779b97f4a7c15);
        Self { state }
    }

    fn next(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 33) as u32
    }

    fn in_range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + self.next() % (hi - lo)
    }
}

/// Render the placeholder for a prompt as encoded PNG bytes.
pub fn render_png(prompt: &str) -> Result<Vec<u8>, ProviderError> {
    let mut img = ImageBuffer::from_fn(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, |_, y| {
        // Vertical gradient, dark blue-ish floor to a lighter violet.
        let intensity = (20 + (y * 100) / PLACEHOLDER_SIZE) as u8;
        Rgb([intensity, intensity / 2, intensity.saturating_mul(2)])
    });

    let mut scatter = Scatter::from_prompt(prompt);
    for _ in 0..DOT_COUNT {
        let cx = scatter.in_range(0, PLACEHOLDER_SIZE) as i64;
        let cy = scatter.in_range(0, PLACEHOLDER_SIZE) as i64;
        let radius = scatter.in_range(2, 9) as i64;
        let color = Rgb([
            scatter.in_range(100, 256) as u8,
            scatter.in_range(100, 256) as u8,
            scatter.in_range(100, 256) as u8,
        ]);

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let x = cx + dx;
                let y = cy + dy;
                if (0..PLACEHOLDER_SIZE as i64).contains(&x)
                    && (0..PLACEHOLDER_SIZE as i64).contains(&y)
                {
                    img.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| ProviderError::Encoding(e.to_string()))?;
    Ok(bytes.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_prompt_same_bytes() {
        let a = render_png("a quiet scene").unwrap();
        let b = render_png("a quiet scene").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_prompts_differ() {
        let a = render_png("a quiet scene").unwrap();
        let b = render_png("a loud scene").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_output_is_png() {
        let bytes = render_png("anything").unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), PLACEHOLDER_SIZE);
        assert_eq!(decoded.height(), PLACEHOLDER_SIZE);
    }
}
