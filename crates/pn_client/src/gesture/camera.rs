//! Camera and hand tracker seams plus the scope that owns them.

use pn_core::Result;
use tracing::{info, warn};

use super::landmarks::HandFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

/// A live video stream; stopping it stops every track.
pub trait MediaStream: Send {
    fn stop(&mut self);
}

/// Grants access to a camera. Denial is reported as `Error::Capture`.
pub trait CaptureDevice {
    fn acquire(&mut self, constraints: &CaptureConstraints) -> Result<Box<dyn MediaStream>>;
}

/// Landmark model fed by a media stream.
pub trait HandTracker: Send {
    fn start(&mut self, stream: &mut dyn MediaStream) -> Result<()>;

    /// Next processed frame, or `None` once the tracker has nothing more to give.
    fn next_frame(&mut self) -> Option<HandFrame>;

    fn close(&mut self);
}

/// Owns the camera stream and the tracker for one recombine session and
/// releases both when dropped, whichever way the session ends.
pub struct GestureScope {
    stream: Option<Box<dyn MediaStream>>,
    tracker: Option<Box<dyn HandTracker>>,
}

impl std::fmt::Debug for GestureScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureScope")
            .field("stream", &self.stream.is_some())
            .field("tracker", &self.tracker.is_some())
            .finish()
    }
}

impl GestureScope {
    /// Acquires the camera, then starts the tracker on it. A tracker that
    /// fails to start releases the camera before the error is returned.
    pub fn open(
        device: &mut dyn CaptureDevice,
        mut tracker: Box<dyn HandTracker>,
        constraints: &CaptureConstraints,
    ) -> Result<Self> {
        let stream = device.acquire(constraints)?;
        info!("📷 Camera acquired ({}x{})", constraints.ideal_width, constraints.ideal_height);

        let mut scope = Self {
            stream: Some(stream),
            tracker: None,
        };
        if let Some(stream) = scope.stream.as_mut() {
            if let Err(e) = tracker.start(stream.as_mut()) {
                warn!("⚠️ Hand tracking failed to start: {}", e);
                return Err(e);
            }
        }
        scope.tracker = Some(tracker);
        info!("✋ Hand tracking started");
        Ok(scope)
    }

    /// Frames pulled from the tracker until it runs dry.
    pub fn frames(&mut self) -> impl Iterator<Item = HandFrame> + '_ {
        std::iter::from_fn(move || self.tracker.as_mut()?.next_frame())
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for GestureScope {
    fn drop(&mut self) {
        if let Some(mut tracker) = self.tracker.take() {
            tracker.close();
        }
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            info!("📷 Camera released");
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use pn_core::Error;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counters shared between the fakes and the test.
    #[derive(Debug, Default)]
    pub struct Probe {
        pub acquired: AtomicUsize,
        pub stopped: AtomicUsize,
        pub closed: AtomicUsize,
    }

    impl Probe {
        pub fn stopped(&self) -> usize {
            self.stopped.load(Ordering::SeqCst)
        }

        pub fn closed(&self) -> usize {
            self.closed.load(Ordering::SeqCst)
        }
    }

    pub struct FakeStream(pub Arc<Probe>);

    impl MediaStream for FakeStream {
        fn stop(&mut self) {
            self.0.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub struct FakeCamera {
        pub probe: Arc<Probe>,
        pub deny: bool,
    }

    impl CaptureDevice for FakeCamera {
        fn acquire(&mut self, _constraints: &CaptureConstraints) -> Result<Box<dyn MediaStream>> {
            if self.deny {
                return Err(Error::Capture("permission denied".to_string()));
            }
            self.probe.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeStream(self.probe.clone())))
        }
    }

    pub struct ScriptedTracker {
        pub probe: Arc<Probe>,
        pub frames: VecDeque<HandFrame>,
        pub fail_start: bool,
    }

    impl ScriptedTracker {
        pub fn boxed(probe: Arc<Probe>, frames: Vec<HandFrame>) -> Box<dyn HandTracker> {
            Box::new(Self {
                probe,
                frames: frames.into(),
                fail_start: false,
            })
        }
    }

    impl HandTracker for ScriptedTracker {
        fn start(&mut self, _stream: &mut dyn MediaStream) -> Result<()> {
            if self.fail_start {
                return Err(Error::Capture("model failed to load".to_string()));
            }
            Ok(())
        }

        fn next_frame(&mut self) -> Option<HandFrame> {
            self.frames.pop_front()
        }

        fn close(&mut self) {
            self.probe.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}
