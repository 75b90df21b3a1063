//! Integration tests for webp-bridge.

use webp_bridge::*;

/// Generate a solid color RGB image with the given row stride.
fn generate_rgb(width: u32, height: u32, stride: u32, rgb: [u8; 3]) -> Vec<u8> {
    let mut data = vec![0u8; (stride * height) as usize];
    for row in data.chunks_exact_mut(stride as usize) {
        for px in row[..(width * 3) as usize].chunks_exact_mut(3) {
            px.copy_from_slice(&rgb);
        }
    }
    data
}

/// Generate a gradient RGBA image with a translucent alpha ramp.
fn generate_gradient_rgba(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 255) / width.max(1)) as u8;
            let g = ((y * 255) / height.max(1)) as u8;
            let b = (((x + y) * 127) / (width + height).max(1)) as u8;
            let a = 64 + ((x * 127) / width.max(1)) as u8;
            data.extend_from_slice(&[r, g, b, a]);
        }
    }
    data
}

mod roundtrip {
    use super::*;

    #[test]
    fn test_small_white_rgb() {
        let rgb = [255u8; 12];
        let webp = encode_rgb(&rgb, 2, 2, 6, 80.0).expect("encode failed");
        assert!(!webp.is_empty());

        let (pixels, width, height) = decode_rgb(&webp).expect("decode failed");
        assert_eq!((width, height), (2, 2));
        assert_eq!(pixels.len(), 12);
    }

    #[test]
    fn test_rgb_shape_preserved() {
        for &(width, height) in &[(1, 1), (7, 3), (64, 48), (100, 80)] {
            let stride = width * 3;
            let original = generate_rgb(width, height, stride, [200, 100, 50]);
            let webp = encode_rgb(&original, width, height, stride, 90.0).expect("encode failed");

            let (decoded, dec_w, dec_h) = decode_rgb(&webp).expect("decode failed");
            assert_eq!((dec_w, dec_h), (width, height));
            assert_eq!(decoded.len(), (width * height * 3) as usize);
        }
    }

    #[test]
    fn test_padded_rows_decode_packed() {
        let (width, height, stride) = (10, 6, 40);
        let original = generate_rgb(width, height, stride, [10, 200, 30]);
        let webp = encode_rgb(&original, width, height, stride, 85.0).expect("encode failed");

        let (decoded, dec_w, dec_h) = decode_rgb(&webp).expect("decode failed");
        assert_eq!((dec_w, dec_h), (width, height));
        // Output is tightly packed regardless of input stride
        assert_eq!(decoded.len(), (width * height * 3) as usize);
    }

    #[test]
    fn test_rgba_lossy_close() {
        let (width, height) = (100, 80);
        let original = generate_gradient_rgba(width, height);
        let webp = encode_rgba(&original, width, height, width * 4, 95.0).expect("encode failed");

        let (decoded, dec_w, dec_h) = decode_rgba(&webp).expect("decode failed");
        assert_eq!((dec_w, dec_h), (width, height));
        assert_eq!(decoded.len(), original.len());

        let max_diff = original
            .iter()
            .zip(decoded.iter())
            .map(|(&o, &d)| (o as i32 - d as i32).abs())
            .max()
            .unwrap_or(0);
        assert!(max_diff < 40, "max pixel difference {} too high for q=95", max_diff);
    }

    #[test]
    fn test_cross_layout_decode() {
        let rgb = generate_rgb(8, 8, 24, [120, 130, 140]);
        let webp = encode_rgb(&rgb, 8, 8, 24, 80.0).expect("encode failed");

        let (rgba, w, h) = decode_rgba(&webp).expect("decode failed");
        assert_eq!((w, h), (8, 8));
        assert_eq!(rgba.len(), 8 * 8 * 4);
        assert!(rgba.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_typed_images() {
        let img = imgref::ImgVec::new(vec![rgb::RGB8::new(40, 80, 120); 12 * 9], 12, 9);
        let webp = encode_rgb_img(img.as_ref(), 85.0).expect("encode failed");

        let rgb_img = decode_rgb_img(&webp).expect("decode failed");
        assert_eq!((rgb_img.width(), rgb_img.height()), (12, 9));

        let rgba_img = decode_rgba_img(&webp).expect("decode failed");
        assert_eq!(rgba_img.buf().len(), 12 * 9);
    }

    #[test]
    fn test_edge_sub_images() {
        let full = imgref::ImgVec::new(vec![rgb::RGBA8::new(10, 20, 30, 100); 16 * 12], 16, 12);
        for &(left, top, w, h) in &[(8, 6, 8, 6), (0, 11, 16, 1), (15, 0, 1, 12), (3, 4, 13, 8)] {
            let view = full.sub_image(left, top, w, h);
            let webp = encode_rgba_img(view, 80.0).expect("encode failed");
            let (_, dec_w, dec_h) = decode_rgba(&webp).expect("decode failed");
            assert_eq!((dec_w as usize, dec_h as usize), (w, h));
        }
    }
}

mod features {
    use super::*;

    #[test]
    fn test_features_rgb_has_no_alpha() {
        let rgb = generate_rgb(16, 16, 48, [1, 2, 3]);
        let webp = encode_rgb(&rgb, 16, 16, 48, 75.0).expect("encode failed");

        let features = probe_features(&webp).expect("features failed");
        assert!(!features.has_alpha);
        assert!(!features.has_animation);
        assert_eq!((features.width, features.height), (16, 16));
        assert_eq!(features.format, BitstreamFormat::Lossy);
    }

    #[test]
    fn test_features_rgba_has_alpha() {
        let rgba = generate_gradient_rgba(16, 16);
        let webp = encode_rgba(&rgba, 16, 16, 64, 75.0).expect("encode failed");

        let features = probe_features(&webp).expect("features failed");
        assert!(features.has_alpha);
        assert_eq!((features.width, features.height), (16, 16));
    }

    #[test]
    fn test_features_truncated() {
        let rgb = generate_rgb(16, 16, 48, [9, 9, 9]);
        let webp = encode_rgb(&rgb, 16, 16, 48, 75.0).expect("encode failed");

        let err = probe_features(&webp[..12]).expect_err("truncated header accepted");
        assert!(matches!(err.error(), Error::CodecStatus(_)));
    }
}

mod errors {
    use super::*;

    #[test]
    fn test_stride_height_exceeds_buffer() {
        let err = encode_rgb(&[0u8; 50], 3, 10, 10, 80.0).expect_err("should reject");
        assert!(matches!(err.error(), Error::InvalidArgument(_)));
    }

    #[test]
    fn test_zero_dimensions() {
        for (w, h) in [(0, 0), (0, 10), (10, 0)] {
            let err = encode_rgb(&[], w, h, 0, 80.0).expect_err("should reject");
            assert!(matches!(err.error(), Error::InvalidArgument(_)));
            let err = encode_rgba(&[], w, h, 0, 80.0).expect_err("should reject");
            assert!(matches!(err.error(), Error::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_exceeds_max_dimension() {
        let data = vec![0u8; 64];
        let err = encode_rgba(&data, 20000, 1, 80000, 80.0).expect_err("should reject");
        assert!(matches!(err.error(), Error::InvalidArgument(_)));
    }

    #[test]
    fn test_invalid_webp_data() {
        let invalid = b"not a valid webp file at all";
        assert!(matches!(
            probe_features(invalid).expect_err("features").error(),
            Error::CodecStatus(_)
        ));
        assert_eq!(
            decode_rgb(invalid).expect_err("decode").error(),
            &Error::DecodeFailed
        );
        assert_eq!(
            decode_rgba(invalid).expect_err("decode").error(),
            &Error::DecodeFailed
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(probe_features(&[]).is_err());
        assert!(decode_rgb(&[]).is_err());
        assert!(decode_rgba(&[]).is_err());
    }
}

mod concurrency {
    use super::*;
    use std::thread;

    #[test]
    fn test_parallel_calls() {
        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                thread::spawn(move || {
                    let size = 8 + i;
                    let rgb = generate_rgb(size, size, size * 3, [i as u8 * 20, 50, 90]);
                    let webp =
                        encode_rgb(&rgb, size, size, size * 3, 80.0).expect("encode failed");
                    let (_, w, h) = decode_rgb(&webp).expect("decode failed");
                    (size, w, h)
                })
            })
            .collect();

        for handle in handles {
            let (size, w, h) = handle.join().expect("thread panicked");
            assert_eq!((w, h), (size, size));
        }
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn bounds_rejected_before_native_call(
            width in 0u32..64,
            height in 1u32..256,
            stride in 1u32..512,
            quality in -10.0f32..110.0,
            shortfall in 1u64..4096,
        ) {
            let required = u64::from(stride) * u64::from(height);
            let len = required.saturating_sub(shortfall).min(required - 1) as usize;
            let data = vec![0u8; len];

            let err = encode_rgb(&data, width, height, stride, quality).unwrap_err();
            prop_assert!(matches!(err.error(), Error::InvalidArgument(_)));
            let err = encode_rgba(&data, width, height, stride, quality).unwrap_err();
            prop_assert!(matches!(err.error(), Error::InvalidArgument(_)));
        }

        #[test]
        fn random_bytes_rejected(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            // Skip inputs that look like a container or a raw VP8/VP8L stream.
            prop_assume!(!data.starts_with(b"RIFF") && !data.starts_with(b"VP8"));
            prop_assume!(data.first() != Some(&0x2f));
            prop_assume!(data.get(3..6) != Some(&[0x9d, 0x01, 0x2a][..]));

            prop_assert!(probe_features(&data).is_err());
            prop_assert_eq!(decode_rgb(&data).unwrap_err().error().clone(), Error::DecodeFailed);
            prop_assert_eq!(decode_rgba(&data).unwrap_err().error().clone(), Error::DecodeFailed);
        }

        #[test]
        fn roundtrip_preserves_shape(
            width in 1u32..40,
            height in 1u32..40,
            padding in 0u32..8,
            quality in 0.0f32..=100.0,
            seed in any::<u8>(),
        ) {
            let stride = width * 3 + padding;
            let data: Vec<u8> = (0..stride * height)
                .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
                .collect();

            let webp = encode_rgb(&data, width, height, stride, quality).unwrap();
            let (pixels, w, h) = decode_rgb(&webp).unwrap();
            prop_assert_eq!((w, h), (width, height));
            prop_assert_eq!(pixels.len(), (width * height * 3) as usize);
        }
    }
}
