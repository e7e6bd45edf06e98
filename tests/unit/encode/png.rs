use super::*;
use crate::foundation::core::{Canvas, FrameIndex};

fn tag(index: u32, unit: UnitId) -> FrameTag {
    FrameTag {
        index: FrameIndex(index),
        unit,
    }
}

#[test]
fn file_names_are_unique_per_unit_kind() {
    assert_eq!(frame_file_name(tag(7, UnitId::Sequential)), "frame_007.png");
    assert_eq!(
        frame_file_name(tag(7, UnitId::Thread(2))),
        "frame_007_thread_2.png"
    );
    assert_eq!(
        frame_file_name(tag(7, UnitId::Process(2))),
        "frame_007_proc2.png"
    );
    assert_eq!(
        frame_file_name(tag(1234, UnitId::Sequential)),
        "frame_1234.png"
    );
}

#[test]
fn png_sink_writes_decodable_frames() {
    let dir = PathBuf::from("target").join("unit_png_sink");
    let _ = std::fs::remove_dir_all(&dir);
    let sink = PngSink::new(&dir).unwrap();

    let canvas = Canvas::new(2, 1).unwrap();
    let frame =
        PixelBuffer::from_raw(canvas, PixelLayout::Rgba8, vec![1, 2, 3, 255, 4, 5, 6, 255])
            .unwrap();
    let t = tag(3, UnitId::Process(1));
    sink.persist(&frame, t).unwrap();

    let written = image::open(sink.path_for(t)).unwrap().to_rgba8();
    assert_eq!(written.dimensions(), (2, 1));
    assert_eq!(written.into_raw(), frame.as_bytes());
}

#[test]
fn png_sink_rejects_non_rgba_frames_as_write_errors() {
    let dir = PathBuf::from("target").join("unit_png_sink_rgb");
    let sink = PngSink::new(&dir).unwrap();
    let canvas = Canvas::new(1, 1).unwrap();
    let rgb = PixelBuffer::from_raw(canvas, PixelLayout::Rgb8, vec![0; 3]).unwrap();
    let err = sink.persist(&rgb, tag(0, UnitId::Sequential)).unwrap_err();
    assert!(matches!(err, CrossfadeError::Write(_)));
}

#[test]
fn png_sink_reports_unwritable_targets_as_write_errors() {
    let dir = PathBuf::from("target").join("unit_png_sink_blocked");
    let sink = PngSink::new(&dir).unwrap();
    let t = tag(0, UnitId::Sequential);
    let target = sink.path_for(t);
    let _ = std::fs::remove_file(&target);
    std::fs::create_dir_all(&target).unwrap();

    let canvas = Canvas::new(1, 1).unwrap();
    let frame = PixelBuffer::from_raw(canvas, PixelLayout::Rgba8, vec![0; 4]).unwrap();
    let err = sink.persist(&frame, t).unwrap_err();
    assert!(matches!(err, CrossfadeError::Write(_)));
}
