//! Time-up tone
//!
//! With the `audio-io` feature the tone plays on the default output device
//! through cpal; otherwise, or when no device is available, the terminal
//! bell stands in.

use std::io::Write;
use tracing::warn;

/// Alert tone pitch
pub const TONE_FREQUENCY_HZ: f32 = 800.0;

/// Alert tone length
pub const TONE_DURATION_SECS: f32 = 0.5;

/// Mono sine samples with an exponential fade from 0.3 to 0.01
pub fn sine_tone(sample_rate: u32, frequency: f32, duration_secs: f32) -> Vec<f32> {
    let total = (sample_rate as f32 * duration_secs) as usize;
    if total == 0 {
        return Vec::new();
    }

    let decay = (0.01f32 / 0.3).ln() / total as f32;
    (0..total)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let gain = 0.3 * (decay * i as f32).exp();
            gain * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Play the alert tone, best effort
pub fn play_alert(use_device: bool) {
    #[cfg(feature = "audio-io")]
    if use_device {
        match device::play(TONE_FREQUENCY_HZ, TONE_DURATION_SECS) {
            Ok(()) => return,
            Err(e) => warn!("Tone unavailable: {}", e),
        }
    }
    #[cfg(not(feature = "audio-io"))]
    if use_device {
        tracing::debug!("Built without audio-io, using the terminal bell");
    }

    let mut stdout = std::io::stdout();
    if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
        warn!("Failed to ring the terminal bell: {}", e);
    }
}

#[cfg(feature = "audio-io")]
mod device {
    use super::sine_tone;
    use crate::{CookeaseError, Result};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;
    use tracing::{error, info};

    pub fn play(frequency: f32, duration_secs: f32) -> Result<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| CookeaseError::AudioDeviceError("No output device available".into()))?;

        info!(
            "Playing tone on {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config: cpal::StreamConfig = device
            .default_output_config()
            .map_err(|e| CookeaseError::AudioDeviceError(format!("Failed to get output config: {}", e)))?
            .into();

        let channels = config.channels as usize;
        let samples = Arc::new(Mutex::new(
            sine_tone(config.sample_rate.0, frequency, duration_secs).into_iter(),
        ));

        let err_fn = |err| {
            error!("Tone stream error: {}", err);
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut samples = samples.lock();
                    for frame in data.chunks_mut(channels) {
                        let sample = samples.next().unwrap_or(0.0);
                        frame.fill(sample);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| CookeaseError::AudioDeviceError(format!("Failed to build output stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| CookeaseError::AudioDeviceError(format!("Failed to start output stream: {}", e)))?;

        // Keep the stream alive until the tone has drained
        std::thread::sleep(Duration::from_secs_f32(duration_secs + 0.1));
        Ok(())
    }
}
