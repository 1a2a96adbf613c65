//! Test helpers for the transport module.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

use super::ChunkSink;

/// Sink that records every byte and whether the stream finished.
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    bytes: Arc<Mutex<Vec<u8>>>,
    finished: Arc<AtomicBool>,
}

impl RecordingSink {
    pub(crate) fn bytes(&self) -> Vec<u8> {
        self.bytes.lock().expect("recording sink poisoned").clone()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub(crate) fn wait_for_bytes(&self, expected: &[u8]) -> bool {
        wait_until(|| self.bytes() == expected)
    }

    pub(crate) fn wait_for_finish(&self) -> bool {
        wait_until(|| self.is_finished())
    }
}

impl ChunkSink for RecordingSink {
    fn accept_chunk(&mut self, chunk: &[u8]) {
        self.bytes
            .lock()
            .expect("recording sink poisoned")
            .extend_from_slice(chunk);
    }

    fn finish(&mut self) {
        self.finished.store(true, Ordering::SeqCst);
    }
}

pub(crate) fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}
