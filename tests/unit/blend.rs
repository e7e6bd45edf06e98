use super::*;
use crate::foundation::core::Canvas;

fn rgb(width: u32, height: u32, data: Vec<u8>) -> PixelBuffer {
    PixelBuffer::from_raw(
        Canvas::new(width, height).unwrap(),
        PixelLayout::Rgb8,
        data,
    )
    .unwrap()
}

fn gradient(width: u32, height: u32, seed: u8) -> PixelBuffer {
    let n = (width * height * 3) as usize;
    let data = (0..n)
        .map(|i| (i as u8).wrapping_mul(37).wrapping_add(seed))
        .collect();
    rgb(width, height, data)
}

fn strip_alpha(frame: &PixelBuffer) -> Vec<u8> {
    frame
        .as_bytes()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

#[test]
fn mix_ratio_follows_frame_position() {
    assert_eq!(MixRatio::for_frame(FrameIndex(0), 4), MixRatio::ZERO);
    let third = MixRatio::for_frame(FrameIndex(1), 4);
    assert_eq!((third.numerator(), third.denominator()), (1, 3));
    assert_eq!(MixRatio::for_frame(FrameIndex(3), 4), MixRatio::ONE);
    assert_eq!(MixRatio::for_frame(FrameIndex(9), 4), MixRatio::ONE);
}

#[test]
fn single_frame_run_uses_zero_ratio() {
    let mix = MixRatio::for_frame(FrameIndex(0), 1);
    assert_eq!(mix, MixRatio::ZERO);
    assert_eq!(mix.value(), 0.0);
}

#[test]
fn mix_ratio_rejects_out_of_range_fractions() {
    assert!(MixRatio::new(1, 0).is_err());
    assert!(MixRatio::new(3, 2).is_err());
    assert!(MixRatio::new(2, 2).is_ok());
}

#[test]
fn four_frame_single_pixel_example() {
    let color = rgb(1, 1, vec![200, 100, 50]);
    let bw = rgb(1, 1, vec![0, 0, 0]);

    let frames = (0..4)
        .map(|i| {
            let spec = FrameSpec::new(FrameIndex(i), 4);
            blend(&color, &bw, spec.mix).unwrap().into_raw()
        })
        .collect::<Vec<_>>();

    assert_eq!(frames[0], vec![200, 100, 50, 255]);
    assert_eq!(frames[1], vec![133, 66, 33, 255]);
    assert_eq!(frames[2], vec![66, 33, 16, 255]);
    assert_eq!(frames[3], vec![0, 0, 0, 255]);
}

#[test]
fn endpoints_reproduce_inputs_exactly() {
    let color = gradient(5, 4, 3);
    let bw = gradient(5, 4, 101);

    let first = blend(&color, &bw, MixRatio::ZERO).unwrap();
    let last = blend(&color, &bw, MixRatio::ONE).unwrap();
    assert_eq!(strip_alpha(&first), color.as_bytes());
    assert_eq!(strip_alpha(&last), bw.as_bytes());
}

#[test]
fn blending_an_image_with_itself_is_identity() {
    let color = gradient(7, 3, 11);
    for total in [2u32, 3, 7, 96, 1000] {
        for i in 0..total.min(50) {
            let mix = MixRatio::for_frame(FrameIndex(i), total);
            let out = blend(&color, &color, mix).unwrap();
            assert_eq!(strip_alpha(&out), color.as_bytes(), "total={total} i={i}");
        }
    }
}

#[test]
fn alpha_is_always_opaque() {
    let color = gradient(4, 4, 0);
    let bw = gradient(4, 4, 200);
    let out = blend(&color, &bw, MixRatio::new(5, 9).unwrap()).unwrap();
    assert!(out.as_bytes().chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn output_stays_between_inputs() {
    let color = rgb(1, 2, vec![255, 0, 128, 10, 20, 30]);
    let bw = rgb(1, 2, vec![0, 255, 128, 250, 240, 230]);
    for n in 0..=10 {
        let out = blend(&color, &bw, MixRatio::new(n, 10).unwrap()).unwrap();
        for (o, (c, b)) in strip_alpha(&out)
            .iter()
            .zip(color.as_bytes().iter().zip(bw.as_bytes()))
        {
            assert!(*o >= (*c).min(*b) && *o <= (*c).max(*b));
        }
    }
}

fn allocate(like: &PixelBuffer, layout: PixelLayout) -> PixelBuffer {
    PixelBuffer::try_zeroed(like.canvas(), layout).unwrap()
}

#[test]
fn blend_into_reuses_scratch_across_frames() {
    let color = gradient(3, 3, 1);
    let bw = gradient(3, 3, 2);
    let mut scratch = allocate(&color, PixelLayout::Rgba8);

    for i in 0..5 {
        let mix = MixRatio::for_frame(FrameIndex(i), 5);
        blend_into(&color, &bw, mix, &mut scratch).unwrap();
        assert_eq!(scratch, blend(&color, &bw, mix).unwrap());
    }
}

#[test]
fn blend_rejects_mismatched_buffers() {
    let color = gradient(2, 2, 0);
    let bw = gradient(2, 3, 0);
    assert!(blend(&color, &bw, MixRatio::ZERO).is_err());

    let mut wrong_out = allocate(&color, PixelLayout::Rgb8);
    let err = blend_into(&color, &color, MixRatio::ZERO, &mut wrong_out);
    assert!(err.is_err());
}
