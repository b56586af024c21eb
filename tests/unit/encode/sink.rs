use std::time::Duration;

use super::*;

#[test]
fn terminal_states() {
    assert!(!EncodeState::Idle.is_terminal());
    assert!(
        !EncodeState::Writing {
            next: FrameIndex(3)
        }
        .is_terminal()
    );
    assert!(EncodeState::Finalized.is_terminal());
    assert!(EncodeState::Failed.is_terminal());
}

#[test]
fn in_memory_sink_tracks_lifecycle() {
    let mut sink = InMemorySink::new();
    assert_eq!(sink.state(), EncodeState::Idle);

    let cfg = SinkConfig {
        delay: FrameDelay::new(Duration::from_millis(40)).unwrap(),
        frame_count: 1,
    };
    sink.begin(cfg).unwrap();
    sink.push_frame(
        FrameIndex(0),
        FrameRGBA {
            width: 1,
            height: 1,
            data: vec![0, 0, 0, 255],
        },
    )
    .unwrap();
    assert_eq!(
        sink.state(),
        EncodeState::Writing {
            next: FrameIndex(1)
        }
    );
    sink.end().unwrap();
    assert_eq!(sink.state(), EncodeState::Finalized);
    assert_eq!(sink.frames().len(), 1);
    assert_eq!(sink.config(), Some(cfg));
}

fn pixel() -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![0, 0, 0, 255],
    }
}

fn config() -> SinkConfig {
    SinkConfig {
        delay: FrameDelay::new(Duration::from_millis(40)).unwrap(),
        frame_count: 2,
    }
}

#[test]
fn in_memory_sink_rejects_calls_after_finalize() {
    let mut sink = InMemorySink::new();
    sink.begin(config()).unwrap();
    sink.push_frame(FrameIndex(0), pixel()).unwrap();
    sink.end().unwrap();

    assert!(sink.push_frame(FrameIndex(1), pixel()).is_err());
    assert!(sink.end().is_err());
    assert!(sink.begin(config()).is_err());
    sink.abort().unwrap();
    assert_eq!(sink.state(), EncodeState::Finalized);
    assert_eq!(sink.frames().len(), 1);
}

#[test]
fn in_memory_sink_stays_failed_after_abort() {
    let mut sink = InMemorySink::new();
    sink.begin(config()).unwrap();
    sink.abort().unwrap();
    assert_eq!(sink.state(), EncodeState::Failed);

    assert!(sink.begin(config()).is_err());
    assert!(sink.push_frame(FrameIndex(0), pixel()).is_err());
    assert!(sink.end().is_err());
    assert_eq!(sink.state(), EncodeState::Failed);
    assert!(sink.frames().is_empty());
}

#[test]
fn in_memory_sink_rejects_out_of_order_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(config()).unwrap();
    sink.push_frame(FrameIndex(0), pixel()).unwrap();

    let err = sink.push_frame(FrameIndex(7), pixel()).unwrap_err();
    assert!(err.to_string().contains("expected frame 1"));
    assert_eq!(sink.state(), EncodeState::Failed);
    assert_eq!(sink.frames().len(), 1);
}

#[test]
fn in_memory_sink_cannot_push_before_begin() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), pixel()).is_err());
    assert!(sink.end().is_err());
    assert_eq!(sink.state(), EncodeState::Idle);
}
