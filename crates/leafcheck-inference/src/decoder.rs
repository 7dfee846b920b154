//! Decoding of uploaded image bytes into model input tensors.
//!
//! Only color-space normalization happens here. The exported graph owns
//! resizing and rescaling, so pixels stay in their native 0-255 range.

use ndarray::Array3;

use crate::error::{InferenceError, InferenceResult};

/// Decoded image as `(height, width, 3)` RGB values in 0-255.
pub type ImageTensor = Array3<f32>;

/// Decode image bytes of any supported format into an RGB f32 tensor.
///
/// Alpha is dropped and grayscale is expanded to three channels.
pub fn decode_image(bytes: &[u8]) -> InferenceResult<ImageTensor> {
    if bytes.is_empty() {
        return Err(InferenceError::decode("empty image payload"));
    }

    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(InferenceError::decode("image has no pixels"));
    }

    let data: Vec<f32> = rgb.into_raw().into_iter().map(f32::from).collect();
    Array3::from_shape_vec((height as usize, width as usize, 3), data)
        .map_err(|e| InferenceError::decode(format!("pixel buffer shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageBuffer, ImageOutputFormat, Luma, Rgba};
    use std::io::Cursor;

    fn encode(img: DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    #[test]
    fn test_empty_bytes_fail() {
        let err = decode_image(&[]).unwrap_err();
        assert!(matches!(err, InferenceError::Decode(_)));
    }

    #[test]
    fn test_garbage_bytes_fail() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, InferenceError::Decode(_)));
    }

    #[test]
    fn test_truncated_png_fails() {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(8, 8, image::Rgb([1, 2, 3])));
        let bytes = encode(img, ImageOutputFormat::Png);
        let err = decode_image(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_rgba_drops_alpha_without_rescaling() {
        let img = ImageBuffer::from_fn(4, 2, |x, _| Rgba([200u8, 100, x as u8, 7]));
        let bytes = encode(DynamicImage::ImageRgba8(img), ImageOutputFormat::Png);

        let tensor = decode_image(&bytes).unwrap();
        assert_eq!(tensor.shape(), &[2, 4, 3]);
        assert_eq!(tensor[[0, 0, 0]], 200.0);
        assert_eq!(tensor[[0, 0, 1]], 100.0);
        assert_eq!(tensor[[1, 3, 2]], 3.0);
    }

    #[test]
    fn test_grayscale_expands_to_three_channels() {
        let img: GrayImage = ImageBuffer::from_pixel(3, 5, Luma([255u8]));
        let bytes = encode(DynamicImage::ImageLuma8(img), ImageOutputFormat::Png);

        let tensor = decode_image(&bytes).unwrap();
        assert_eq!(tensor.shape(), &[5, 3, 3]);
        assert!(tensor.iter().all(|&v| v == 255.0));
    }
}
