use super::*;
use crate::buffer::PixelLayout;
use crate::foundation::core::Canvas;

fn frame(fill: u8) -> PixelBuffer {
    let canvas = Canvas::new(1, 1).unwrap();
    PixelBuffer::from_raw(canvas, PixelLayout::Rgba8, vec![fill; 4]).unwrap()
}

#[test]
fn in_memory_sink_orders_by_frame_index() {
    let sink = InMemorySink::new();
    assert!(sink.is_empty());
    for (i, unit) in [(2u32, UnitId::Thread(1)), (0, UnitId::Thread(0)), (1, UnitId::Thread(0))] {
        sink.persist(
            &frame(i as u8),
            FrameTag {
                index: FrameIndex(i),
                unit,
            },
        )
        .unwrap();
    }
    assert_eq!(sink.len(), 3);

    let frames = sink.into_frames().unwrap();
    let order = frames.iter().map(|(t, _)| t.index.0).collect::<Vec<_>>();
    assert_eq!(order, vec![0, 1, 2]);
    assert_eq!(frames[2].0.unit, UnitId::Thread(1));
    assert_eq!(frames[2].1.as_bytes(), &[2, 2, 2, 2]);
}

#[test]
fn in_memory_sink_is_shareable_across_threads() {
    let sink = InMemorySink::new();
    std::thread::scope(|s| {
        for t in 0..4u32 {
            let sink = &sink;
            s.spawn(move || {
                sink.persist(
                    &frame(0),
                    FrameTag {
                        index: FrameIndex(t),
                        unit: UnitId::Thread(t),
                    },
                )
                .unwrap();
            });
        }
    });
    assert_eq!(sink.len(), 4);
}
