//! Blocking clip output on the default audio device.

use std::sync::mpsc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use tracing::{debug, error, info};

use crate::error::PlaybackError;
use crate::playback::{clip::ClipLibrary, Playback};

/// Handle on the default output device and its preferred stream layout.
pub struct Speaker {
    device: cpal::Device,
    config: cpal::StreamConfig,
    format: SampleFormat,
}

impl std::fmt::Debug for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Speaker")
            .field("config", &self.config)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl Speaker {
    pub fn open_default() -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(PlaybackError::NoOutputDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| PlaybackError::Device(e.to_string()))?;
        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        info!(
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            ?format,
            "audio output ready"
        );

        Ok(Speaker { device, config, format })
    }

    pub fn channels(&self) -> usize {
        usize::from(self.config.channels)
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Play interleaved frames already in the device layout and return once the
    /// last one has left the device's buffer.
    pub fn play_rendered(&self, frames: Vec<f32>) -> Result<(), PlaybackError> {
        if frames.is_empty() {
            return Ok(());
        }
        match self.format {
            SampleFormat::F32 => self.run::<f32>(frames),
            SampleFormat::I16 => self.run::<i16>(frames),
            SampleFormat::U16 => self.run::<u16>(frames),
            other => Err(PlaybackError::Device(format!("unsupported sample format {other:?}"))),
        }
    }

    fn run<T>(&self, frames: Vec<f32>) -> Result<(), PlaybackError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let (done_tx, done_rx) = mpsc::channel::<Result<(), String>>();
        let err_tx = done_tx.clone();

        let mut feed = ClipFeed::new(frames);
        let mut done = Some(done_tx);

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    if feed.fill(data) {
                        if let Some(tx) = done.take() {
                            let _ = tx.send(Ok(()));
                        }
                    }
                },
                move |err| {
                    error!("audio stream error: {err}");
                    let _ = err_tx.send(Err(err.to_string()));
                },
                None,
            )
            .map_err(|e| PlaybackError::Stream(e.to_string()))?;

        stream
            .play()
            .map_err(|e| PlaybackError::Stream(e.to_string()))?;

        match done_rx.recv() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(msg)) => Err(PlaybackError::Stream(msg)),
            Err(_) => Err(PlaybackError::Stream("stream closed before the clip finished".into())),
        }
    }
}

/// Buffers of silence written after the clip before it counts as heard. The
/// device asks for the next buffer while the previous one is still queued, so
/// the clip's tail is only out once two silent buffers have been requested.
const DRAIN_BUFFERS: usize = 2;

/// Feeds a rendered clip into device buffers, then pads with silence.
struct ClipFeed {
    samples: Vec<f32>,
    cursor: usize,
    silent_buffers: usize,
}

impl ClipFeed {
    fn new(samples: Vec<f32>) -> Self {
        ClipFeed { samples, cursor: 0, silent_buffers: 0 }
    }

    /// Fill `data` and report whether the clip has drained from the device.
    fn fill<T>(&mut self, data: &mut [T]) -> bool
    where
        T: Sample + FromSample<f32>,
    {
        if self.cursor >= self.samples.len() {
            self.silent_buffers += 1;
        }
        for slot in data.iter_mut() {
            let sample = self.samples.get(self.cursor).copied().unwrap_or(0.0);
            *slot = <T as Sample>::from_sample(sample);
            self.cursor += 1;
        }
        self.silent_buffers >= DRAIN_BUFFERS
    }
}

/// Plays each move's clip through the speaker, one at a time.
#[derive(Debug)]
pub struct SpeakerPlayback {
    library: ClipLibrary,
    speaker: Speaker,
}

impl SpeakerPlayback {
    pub fn new(library: ClipLibrary, speaker: Speaker) -> Self {
        SpeakerPlayback { library, speaker }
    }
}

impl Playback for SpeakerPlayback {
    fn play_clip(&mut self, name: &str) -> Result<(), PlaybackError> {
        let clip = self.library.load(name)?;
        let frames = clip.render(self.speaker.channels(), self.speaker.sample_rate());
        debug!(clip = name, samples = frames.len(), "playing");
        self.speaker.play_rendered(frames)
    }
}
