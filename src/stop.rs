//! One-shot stop latch and the keypress listener that trips it.
//!
//! The session only looks at the latch between rounds, so a keypress never cuts
//! a round short; it keeps the next one from starting.

use std::io::Read;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

/// Write side of the latch. Consumed by [`StopHandle::stop`]; dropping it
/// without stopping trips the latch too.
#[derive(Debug)]
pub struct StopHandle(Sender<()>);

impl StopHandle {
    pub fn stop(self) {
        let _ = self.0.send(());
    }
}

/// Read side of the latch. Once tripped it stays tripped.
#[derive(Debug)]
pub struct StopSignal {
    rx: Receiver<()>,
    // Held by latches that must never trip on their own.
    _keepalive: Option<Sender<()>>,
}

/// A fresh, untripped latch.
pub fn stop_latch() -> (StopHandle, StopSignal) {
    let (tx, rx) = mpsc::channel();
    (StopHandle(tx), StopSignal { rx, _keepalive: None })
}

impl StopSignal {
    /// A latch nothing can trip; sessions using it end by round count only.
    pub fn never() -> Self {
        let (tx, rx) = mpsc::channel();
        StopSignal { rx, _keepalive: Some(tx) }
    }

    /// Sleep up to `timeout`, returning early with `true` if the latch trips.
    pub fn wait(&self, timeout: Duration) -> bool {
        !matches!(self.rx.recv_timeout(timeout), Err(RecvTimeoutError::Timeout))
    }
}

/// Trip a new latch as soon as one byte (or an error, or EOF) arrives on `input`.
pub fn spawn_key_listener<R>(mut input: R) -> std::io::Result<StopSignal>
where
    R: Read + Send + 'static,
{
    let (handle, signal) = stop_latch();
    thread::Builder::new()
        .name("stop-listener".into())
        .spawn(move || {
            let mut byte = [0u8; 1];
            match input.read(&mut byte) {
                Ok(0) => debug!("input closed, stopping after this round"),
                Ok(_) => debug!("key pressed, stopping after this round"),
                Err(e) => warn!("reading stop key failed: {e}"),
            }
            handle.stop();
        })?;
    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "stdin gone"))
        }
    }

    struct Blocked(Receiver<()>);

    impl Read for Blocked {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            let _ = self.0.recv();
            Ok(1)
        }
    }

    #[test]
    fn latch_stays_tripped() {
        let (handle, signal) = stop_latch();
        assert!(!signal.wait(Duration::ZERO));
        handle.stop();
        assert!(signal.wait(Duration::ZERO));
        assert!(signal.wait(Duration::ZERO));
        assert!(signal.wait(Duration::from_secs(5)));
    }

    #[test]
    fn dropped_handle_trips_latch() {
        let (handle, signal) = stop_latch();
        drop(handle);
        assert!(signal.wait(Duration::from_secs(5)));
    }

    #[test]
    fn never_latch_times_out() {
        let signal = StopSignal::never();
        assert!(!signal.wait(Duration::from_millis(10)));
        assert!(!signal.wait(Duration::ZERO));
    }

    #[test]
    fn keypress_trips_listener() {
        let signal = spawn_key_listener(io::Cursor::new(b"\n".to_vec())).unwrap();
        assert!(signal.wait(Duration::from_secs(5)));
    }

    #[test]
    fn read_error_still_stops() {
        let signal = spawn_key_listener(Broken).unwrap();
        assert!(signal.wait(Duration::from_secs(5)));
    }

    #[test]
    fn listener_waits_for_input() {
        let (press, pressed) = mpsc::channel();
        let signal = spawn_key_listener(Blocked(pressed)).unwrap();
        assert!(!signal.wait(Duration::from_millis(20)));
        press.send(()).unwrap();
        assert!(signal.wait(Duration::from_secs(5)));
    }
}
