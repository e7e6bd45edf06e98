use std::sync::Mutex;

use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::FrameIndex;

fn sources() -> SourcePair {
    let canvas = Canvas::new(2, 1).unwrap();
    let color = PixelBuffer::from_raw(canvas, PixelLayout::Rgb8, vec![200, 100, 50, 90, 60, 30])
        .unwrap();
    let bw = PixelBuffer::from_raw(canvas, PixelLayout::Rgb8, vec![0, 0, 0, 90, 60, 30]).unwrap();
    SourcePair::new(color, bw).unwrap()
}

/// Fails every frame whose index is listed, records the rest.
struct FlakySink {
    fail_on: Vec<u32>,
    seen: Mutex<Vec<u32>>,
}

impl FrameSink for FlakySink {
    fn persist(&self, _frame: &PixelBuffer, tag: FrameTag) -> CrossfadeResult<()> {
        self.seen.lock().unwrap().push(tag.index.0);
        if self.fail_on.contains(&tag.index.0) {
            let msg = format!("refusing frame {}", tag.index.0);
            return Err(CrossfadeError::write(msg));
        }
        Ok(())
    }
}

#[test]
fn unit_persists_its_range_in_order() {
    let src = sources();
    let sink = InMemorySink::new();
    let job = UnitJob {
        sources: &src,
        total_frames: 4,
        range: WorkRange { start: 1, count: 2 },
        unit: UnitId::Thread(1),
    };
    let mut scratch = allocate_scratch(src.canvas()).unwrap();
    let result = run_unit(&job, &mut scratch, &sink).unwrap();

    assert_eq!(result.unit, UnitId::Thread(1));
    assert_eq!(result.range, job.range);
    assert_eq!(result.frames_written, 2);
    assert_eq!(result.frames_failed, 0);
    assert!(result.elapsed_secs >= 0.0);

    let frames = sink.into_frames().unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].0.index, FrameIndex(1));
    assert_eq!(frames[0].0.unit, UnitId::Thread(1));
    assert_eq!(frames[0].1.as_bytes(), &[133, 66, 33, 255, 90, 60, 30, 255]);
    assert_eq!(frames[1].1.as_bytes(), &[66, 33, 16, 255, 90, 60, 30, 255]);
}

#[test]
fn persist_failures_do_not_stop_the_unit() {
    let src = sources();
    let sink = FlakySink {
        fail_on: vec![0, 2],
        seen: Mutex::new(Vec::new()),
    };
    let job = UnitJob {
        sources: &src,
        total_frames: 4,
        range: WorkRange { start: 0, count: 4 },
        unit: UnitId::Sequential,
    };
    let mut scratch = allocate_scratch(src.canvas()).unwrap();
    let result = run_unit(&job, &mut scratch, &sink).unwrap();

    assert_eq!(result.frames_written, 2);
    assert_eq!(result.frames_failed, 2);
    assert_eq!(*sink.seen.lock().unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn empty_range_is_a_no_op() {
    let src = sources();
    let sink = InMemorySink::new();
    let job = UnitJob {
        sources: &src,
        total_frames: 2,
        range: WorkRange { start: 2, count: 0 },
        unit: UnitId::Thread(4),
    };
    let mut scratch = allocate_scratch(src.canvas()).unwrap();
    let result = run_unit(&job, &mut scratch, &sink).unwrap();
    assert_eq!(result.frames_written, 0);
    assert!(sink.is_empty());
}

#[test]
fn single_frame_run_emits_the_first_image() {
    let src = sources();
    let sink = InMemorySink::new();
    let job = UnitJob {
        sources: &src,
        total_frames: 1,
        range: WorkRange { start: 0, count: 1 },
        unit: UnitId::Sequential,
    };
    let mut scratch = allocate_scratch(src.canvas()).unwrap();
    run_unit(&job, &mut scratch, &sink).unwrap();

    let frames = sink.into_frames().unwrap();
    let first = frames[0].1.as_bytes();
    assert_eq!(first, &[200, 100, 50, 255, 90, 60, 30, 255]);
}

#[test]
fn mismatched_scratch_or_range_is_rejected() {
    let src = sources();
    let sink = InMemorySink::new();
    let job = UnitJob {
        sources: &src,
        total_frames: 3,
        range: WorkRange { start: 0, count: 3 },
        unit: UnitId::Sequential,
    };
    let mut wrong = allocate_scratch(Canvas::new(1, 1).unwrap()).unwrap();
    assert!(run_unit(&job, &mut wrong, &sink).is_err());

    let overflowing = UnitJob {
        range: WorkRange { start: 2, count: 2 },
        ..job
    };
    let mut scratch = allocate_scratch(src.canvas()).unwrap();
    assert!(run_unit(&overflowing, &mut scratch, &sink).is_err());

    let wrapping = UnitJob {
        range: WorkRange {
            start: u32::MAX,
            count: 1,
        },
        ..job
    };
    let err = run_unit(&wrapping, &mut scratch, &sink).unwrap_err();
    assert!(matches!(err, CrossfadeError::Validation(_)));
    assert!(sink.is_empty());
}
