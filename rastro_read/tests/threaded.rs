//! Per-thread producers through `rastro::current`, read back one file per
//! thread.

use rastro::testing_common::{manual_clock, test_dir};
use rastro::{current, BufferConfig, ProtocolTable};
use rastro_read::{Rastro, TraceFile};
use std::thread;

const THREADS: u64 = 4;
const EVENTS: u64 = 200;

#[test]
fn every_thread_writes_its_own_file() {
    let dir = test_dir("every_thread_writes_its_own_file");
    let table = ProtocolTable::from_letters(&["l"]).unwrap();

    let workers: Vec<_> = (0..THREADS)
        .map(|rank| {
            let dir = dir.clone();
            let table = table.clone();
            thread::spawn(move || {
                let (clock, time) = manual_clock(1_000, rank);
                let config = BufferConfig::default()
                    .with_directory(&dir)
                    .with_hostname(format!("host-{}", rank))
                    .with_capacity(1024);
                current::init_with(rank, 7, clock, &config);

                let codec = table.get_letters("l").unwrap();
                for i in 0..EVENTS {
                    time.advance(10);
                    current::record(1 + rank as u16, codec, &[(rank * 1_000 + i).into()]);
                }

                // The others are closed when their thread exits.
                if rank % 2 == 0 {
                    current::finalize();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    for rank in 0..THREADS {
        let path = dir.join(format!("rastro-{}-7.rst", rank));
        let mut file = TraceFile::open(&path, None).unwrap();
        assert_eq!(file.metadata().hostname, format!("host-{}", rank));

        let mut values = Vec::new();
        while let Some(event) = file.decode_next().unwrap() {
            assert_eq!(event.type_id, 1 + rank as u16);
            assert_eq!((event.id1, event.id2), (rank, 7));
            values.push(event.v_uint64[0]);
        }
        let expected: Vec<u64> = (0..EVENTS).map(|i| rank * 1_000 + i).collect();
        assert_eq!(values, expected, "file of thread {}", rank);
    }

    // Thread `rank` started its clock at `rank` ticks, so the merged replay
    // interleaves the threads round-robin.
    let mut session = Rastro::new();
    for rank in 0..THREADS {
        session.open_file(&dir.join(format!("rastro-{}-7.rst", rank))).unwrap();
    }
    let mut ranks = Vec::new();
    while let Some(event) = session.next_global_event().unwrap() {
        ranks.push(event.id1);
    }
    let expected: Vec<u64> = (0..EVENTS).flat_map(|_| 0..THREADS).collect();
    assert_eq!(ranks, expected);
}

#[test]
fn calls_on_a_thread_without_buffer_are_ignored() {
    thread::spawn(|| {
        current::event(1);
        current::flush();
        current::finalize();
        assert!(current::take().is_none());
    })
    .join()
    .unwrap();
}
