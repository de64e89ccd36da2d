//! Camera capture for image search.
//!
//! A live camera stream is a scoped resource. [`CameraSession`] owns it and
//! stops every track when the user cancels, after a successful capture, and
//! on drop, so navigating away can never leave the camera running.

use async_trait::async_trait;

use crate::error::{FynddError, Result};
use crate::search::ImageBlob;

/// JPEG quality used for captured frames (0.0..=1.0).
pub const CAPTURE_JPEG_QUALITY: f32 = 0.8;

/// File name given to captured frames in the multipart upload.
pub const CAPTURE_FILE_NAME: &str = "capture.jpg";

/// A platform camera that can open live streams.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    async fn open_stream(&self) -> Result<Box<dyn MediaStream>>;
}

/// An open camera stream.
pub trait MediaStream: Send {
    /// Encodes the current video frame as JPEG at the given quality.
    fn capture_jpeg(&mut self, quality: f32) -> Result<Vec<u8>>;

    /// Stops all tracks. Must be safe to call more than once.
    fn stop_all_tracks(&mut self);
}

/// Owns a live camera stream for the duration of one capture attempt.
pub struct CameraSession {
    stream: Option<Box<dyn MediaStream>>,
    quality: f32,
}

impl CameraSession {
    /// Acquires a stream. Called only on explicit user action.
    pub async fn open(device: &dyn CameraDevice) -> Result<Self> {
        let stream = device.open_stream().await?;
        tracing::debug!("[Camera] Stream acquired");
        Ok(Self {
            stream: Some(stream),
            quality: CAPTURE_JPEG_QUALITY,
        })
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality.clamp(0.0, 1.0);
        self
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Grabs the current frame as a JPEG blob and releases the stream.
    ///
    /// The stream is released even when encoding fails.
    pub fn capture(mut self) -> Result<ImageBlob> {
        let mut stream = self
            .stream
            .take()
            .ok_or_else(|| FynddError::internal("camera stream already released"))?;
        let encoded = stream.capture_jpeg(self.quality);
        stream.stop_all_tracks();
        tracing::debug!("[Camera] Stream released after capture");
        Ok(ImageBlob::new(encoded?, "image/jpeg", CAPTURE_FILE_NAME))
    }

    /// Releases the stream without capturing.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_all_tracks();
            tracing::debug!("[Camera] Stream released");
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeStream {
        stops: Arc<AtomicUsize>,
        fail: bool,
    }

    impl MediaStream for FakeStream {
        fn capture_jpeg(&mut self, quality: f32) -> Result<Vec<u8>> {
            if self.fail {
                return Err(FynddError::internal("no frame"));
            }
            Ok(vec![0xFF, 0xD8, (quality * 100.0) as u8])
        }

        fn stop_all_tracks(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FakeCamera {
        stops: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl CameraDevice for FakeCamera {
        async fn open_stream(&self) -> Result<Box<dyn MediaStream>> {
            Ok(Box::new(FakeStream {
                stops: self.stops.clone(),
                fail: self.fail,
            }))
        }
    }

    fn camera(fail: bool) -> (FakeCamera, Arc<AtomicUsize>) {
        let stops = Arc::new(AtomicUsize::new(0));
        (
            FakeCamera {
                stops: stops.clone(),
                fail,
            },
            stops,
        )
    }

    #[tokio::test]
    async fn test_capture_releases_stream() {
        let (device, stops) = camera(false);
        let session = CameraSession::open(&device).await.unwrap();
        let blob = session.capture().unwrap();
        assert_eq!(blob.mime_type, "image/jpeg");
        assert_eq!(blob.bytes[2], 80);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_releases_stream_once() {
        let (device, stops) = camera(false);
        let session = CameraSession::open(&device).await.unwrap();
        session.cancel();
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_releases_stream() {
        let (device, stops) = camera(false);
        {
            let session = CameraSession::open(&device).await.unwrap();
            assert!(session.is_active());
        }
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_capture_still_releases() {
        let (device, stops) = camera(true);
        let session = CameraSession::open(&device).await.unwrap();
        assert!(session.capture().is_err());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }
}
