//! Icon set derivation.
//!
//! The source icon is decoded once, then each configured size is rendered
//! in its own `spawn_blocking` task.

use std::io::Cursor;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::join_all;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IconError {
    #[error("failed to decode source icon: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode {size}x{size} icon: {source}")]
    Encode {
        size: u32,
        #[source]
        source: image::ImageError,
    },

    #[error("icon task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// One square PNG rendering of the source icon.
#[derive(Debug, Clone)]
pub struct IconVariant {
    pub size: u32,
    pub png: Vec<u8>,
}

/// Resize `source` to a `size`x`size` PNG.
///
/// Non-square sources are scaled to cover the square and center-cropped.
pub fn render_variant(source: &DynamicImage, size: u32) -> Result<IconVariant, IconError> {
    let resized = source.resize_to_fill(size, size, FilterType::Lanczos3);
    // PNG cannot carry every pixel format the decoders produce (e.g. f32).
    let rgba = DynamicImage::ImageRgba8(resized.to_rgba8());

    let mut buffer = Cursor::new(Vec::new());
    rgba.write_to(&mut buffer, ImageFormat::Png)
        .map_err(|source| IconError::Encode { size, source })?;

    Ok(IconVariant {
        size,
        png: buffer.into_inner(),
    })
}

/// Decode `source` and render one variant per entry of `sizes`, in order.
///
/// # Errors
///
/// Fails if the source cannot be decoded or any variant cannot be encoded.
pub async fn derive_icon_variants(
    source: Bytes,
    sizes: &[u32],
) -> Result<Vec<IconVariant>, IconError> {
    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&source))
        .await?
        .map_err(IconError::Decode)?;
    let decoded = Arc::new(decoded);

    let tasks = sizes.iter().map(|&size| {
        let img = Arc::clone(&decoded);
        tokio::task::spawn_blocking(move || render_variant(&img, size))
    });

    let mut variants = Vec::with_capacity(sizes.len());
    for joined in join_all(tasks).await {
        variants.push(joined??);
    }
    Ok(variants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlhub_schema::ICON_SIZES;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn sample_png(width: u32, height: u32) -> Bytes {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        });
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        Bytes::from(buffer.into_inner())
    }

    #[tokio::test]
    async fn test_one_square_png_per_size() {
        let variants = derive_icon_variants(sample_png(300, 300), &ICON_SIZES)
            .await
            .unwrap();

        assert_eq!(variants.len(), ICON_SIZES.len());
        for (variant, &size) in variants.iter().zip(ICON_SIZES.iter()) {
            assert_eq!(variant.size, size);
            let decoded = image::load_from_memory_with_format(&variant.png, ImageFormat::Png)
                .expect("variant should be a valid PNG");
            assert_eq!(decoded.dimensions(), (size, size));
        }
    }

    #[tokio::test]
    async fn test_non_square_source_is_cropped_square() {
        let variants = derive_icon_variants(sample_png(200, 80), &[64])
            .await
            .unwrap();
        let decoded = image::load_from_memory(&variants[0].png).unwrap();
        assert_eq!(decoded.dimensions(), (64, 64));
    }

    #[tokio::test]
    async fn test_upscales_small_source() {
        let variants = derive_icon_variants(sample_png(8, 8), &[512]).await.unwrap();
        let decoded = image::load_from_memory(&variants[0].png).unwrap();
        assert_eq!(decoded.dimensions(), (512, 512));
    }

    #[tokio::test]
    async fn test_corrupt_source_fails() {
        let err = derive_icon_variants(Bytes::from_static(b"not an image"), &ICON_SIZES)
            .await
            .unwrap_err();
        assert!(matches!(err, IconError::Decode(_)));
    }
}
