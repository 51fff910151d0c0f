//! Alert sound output

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::warn;

use crate::AlertError;

/// Something that can sound the alert.
///
/// Each call starts the cue from the beginning at full volume.
pub trait AlertSink {
    fn play(&self) -> Result<(), AlertError>;
}

impl<S: AlertSink + ?Sized> AlertSink for Box<S> {
    fn play(&self) -> Result<(), AlertError> {
        (**self).play()
    }
}

/// Rings the terminal bell
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl AlertSink for TerminalBell {
    fn play(&self) -> Result<(), AlertError> {
        warn!("Anger detected!");
        let mut out = std::io::stderr().lock();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(|e| AlertError::Playback(e.to_string()))
    }
}

/// Counts plays instead of making noise
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    plays: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following play fail until switched back
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Successful plays so far
    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl AlertSink for RecordingSink {
    fn play(&self) -> Result<(), AlertError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AlertError::Playback("simulated failure".into()));
        }
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(feature = "audio")]
pub use tone::ToneChime;

#[cfg(feature = "audio")]
mod tone {
    use std::time::Duration;

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{SampleFormat, StreamConfig};
    use tracing::{debug, error, info};

    use crate::{AlertConfig, AlertError, AlertSink};

    /// Sine chime on the default output device.
    ///
    /// Each play opens a fresh stream on its own thread, so the cue always
    /// starts at sample zero. `play` returns as soon as the thread is spawned;
    /// stream failures are logged from the chime thread.
    #[derive(Debug, Clone)]
    pub struct ToneChime {
        frequency_hz: f32,
        duration: Duration,
    }

    impl ToneChime {
        pub fn new(config: &AlertConfig) -> Result<Self, AlertError> {
            let host = cpal::default_host();
            let device = host.default_output_device().ok_or(AlertError::NoDevice)?;
            info!(
                "Alert chime on output device: {}",
                device.name().unwrap_or_else(|_| "unknown".into())
            );

            Ok(Self {
                frequency_hz: config.tone_hz,
                duration: Duration::from_millis(config.tone_ms),
            })
        }
    }

    impl AlertSink for ToneChime {
        fn play(&self) -> Result<(), AlertError> {
            let frequency_hz = self.frequency_hz;
            let duration = self.duration;

            std::thread::Builder::new()
                .name("alert-chime".into())
                .spawn(move || match open_stream(frequency_hz, duration) {
                    Ok(stream) => {
                        std::thread::sleep(duration + Duration::from_millis(50));
                        drop(stream);
                        debug!("Chime stream closed");
                    }
                    Err(e) => error!("Error playing sound: {}", e),
                })
                .map(|_| ())
                .map_err(|e| AlertError::Playback(e.to_string()))
        }
    }

    fn open_stream(frequency_hz: f32, duration: Duration) -> Result<cpal::Stream, AlertError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AlertError::NoDevice)?;
        let supported = device
            .default_output_config()
            .map_err(|e| AlertError::Output(e.to_string()))?;

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;
        let total_samples = (duration.as_secs_f32() * sample_rate) as u64;

        let mut index: u64 = 0;
        let mut next_sample = move || {
            let value = if index < total_samples {
                (index as f32 * frequency_hz * 2.0 * std::f32::consts::PI / sample_rate).sin()
            } else {
                0.0
            };
            index += 1;
            value
        };

        let on_error = |e: cpal::StreamError| error!("Audio stream error: {}", e);

        let stream = match sample_format {
            SampleFormat::F32 => device.build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let value = next_sample();
                        frame.iter_mut().for_each(|s| *s = value);
                    }
                },
                on_error,
                None,
            ),
            SampleFormat::I16 => device.build_output_stream(
                &config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let value = (next_sample() * i16::MAX as f32) as i16;
                        frame.iter_mut().for_each(|s| *s = value);
                    }
                },
                on_error,
                None,
            ),
            other => {
                return Err(AlertError::Output(format!(
                    "unsupported sample format {:?}",
                    other
                )))
            }
        }
        .map_err(|e| AlertError::Output(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AlertError::Playback(e.to_string()))?;
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_counts_and_fails() {
        let sink = RecordingSink::new();
        sink.play().unwrap();
        sink.set_failing(true);
        assert!(sink.play().is_err());
        assert!(sink.play().is_err());
        sink.set_failing(false);
        sink.play().unwrap();
        assert_eq!(sink.plays(), 2);
    }

    #[test]
    fn test_boxed_sink_delegates() {
        let sink = RecordingSink::new();
        let boxed: Box<dyn AlertSink + Send> = Box::new(sink.clone());
        boxed.play().unwrap();
        assert_eq!(sink.plays(), 1);
    }

    #[cfg(feature = "audio")]
    #[test]
    fn test_tone_chime_returns_before_the_tone_ends() {
        use std::time::{Duration, Instant};

        let config = crate::AlertConfig {
            tone_ms: 400,
            ..Default::default()
        };
        // No output device on this host: nothing to time
        let Ok(chime) = ToneChime::new(&config) else {
            return;
        };

        let started = Instant::now();
        chime.play().unwrap();
        assert!(started.elapsed() < Duration::from_millis(200));
    }
}
