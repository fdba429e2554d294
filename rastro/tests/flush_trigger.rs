use rastro::testing_common::{manual_clock, SharedStorage};
use rastro::{request_flush, BufferConfig, TraceBuffer};

// The process-wide request reaches every buffer, so it gets a test binary of
// its own.
#[test]
fn process_wide_request_is_honoured_by_every_buffer() {
    let storages: Vec<SharedStorage> = (0..3).map(|_| SharedStorage::new()).collect();
    let mut buffers: Vec<TraceBuffer> = storages
        .iter()
        .enumerate()
        .map(|(i, storage)| {
            let (clock, _) = manual_clock(1, 0);
            TraceBuffer::with_storage(
                Box::new(storage.clone()),
                i as u64,
                0,
                clock,
                &BufferConfig::default(),
            )
        })
        .collect();

    for buffer in &mut buffers {
        buffer.event(1).unwrap();
    }
    assert!(storages.iter().all(|storage| storage.bytes().is_empty()));

    std::thread::spawn(request_flush).join().unwrap();

    for (buffer, storage) in buffers.iter_mut().zip(&storages) {
        let pending = buffer.used();
        buffer.event(2).unwrap();
        assert_eq!(storage.bytes().len(), pending);
    }

    // A request is honoured once.
    for buffer in &mut buffers {
        assert!(!buffer.poll_flush_request());
    }

    request_flush();
    for (buffer, storage) in buffers.iter_mut().zip(&storages) {
        let before = storage.bytes().len();
        assert!(buffer.poll_flush_request());
        assert!(storage.bytes().len() > before);
        assert_eq!(buffer.used(), 0);
    }
}
