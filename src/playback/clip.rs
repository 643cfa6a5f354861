//! Clip decoding and the per-name clip cache.

use std::collections::HashMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::error::PlaybackError;

/// File extension of every clip; a move named `jab` plays `jab.mp3`.
pub const CLIP_EXTENSION: &str = "mp3";

/// Decoded audio, interleaved `f32` frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub samples: Vec<f32>,
    pub channels: usize,
    pub sample_rate: u32,
}

impl Clip {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    /// Convert to the device layout: linear resampling to `rate`, then channel
    /// mapping (mono fans out, mono output averages, extra outputs stay silent).
    pub fn render(&self, channels: usize, rate: u32) -> Vec<f32> {
        let src_frames = self.frames();
        if src_frames == 0 || channels == 0 || rate == 0 {
            return Vec::new();
        }

        let step = f64::from(self.sample_rate) / f64::from(rate);
        let out_frames = ((src_frames as f64) / step).round().max(1.0) as usize;
        let mut out = Vec::with_capacity(out_frames * channels);

        for frame in 0..out_frames {
            let pos = frame as f64 * step;
            let i = (pos.floor() as usize).min(src_frames - 1);
            let j = (i + 1).min(src_frames - 1);
            let t = (pos - i as f64) as f32;
            let at = |ch: usize| {
                let a = self.samples[i * self.channels + ch];
                let b = self.samples[j * self.channels + ch];
                a + (b - a) * t
            };

            if channels == 1 {
                let sum: f32 = (0..self.channels).map(&at).sum();
                out.push(sum / self.channels as f32);
                continue;
            }
            for ch in 0..channels {
                let sample = if self.channels == 1 {
                    at(0)
                } else if ch < self.channels {
                    at(ch)
                } else {
                    0.0
                };
                out.push(sample);
            }
        }
        out
    }
}

/// Decode one clip file with symphonia.
pub fn decode_clip(name: &str, path: &Path) -> Result<Clip, PlaybackError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PlaybackError::MissingClip {
            name: name.to_string(),
            path: path.to_path_buf(),
        },
        _ => PlaybackError::Io(e),
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let decode_err = |source: SymphoniaError| PlaybackError::Decode { name: name.to_string(), source };

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(decode_err)?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| PlaybackError::NoTrack(name.to_string()))?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(decode_err)?;

    let mut sample_rate = params.sample_rate;
    let mut channels = params.channels.map(|c| c.count());
    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_err(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            // A corrupt frame is skipped, the rest of the clip still plays.
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!(clip = name, "skipping undecodable packet: {msg}");
                continue;
            }
            Err(e) => return Err(decode_err(e)),
        };

        let spec = *decoded.spec();
        sample_rate.get_or_insert(spec.rate);
        channels.get_or_insert(spec.channels.count());

        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
    }

    match (sample_rate, channels) {
        (Some(sample_rate), Some(channels)) if channels > 0 && !samples.is_empty() => {
            debug!(clip = name, sample_rate, channels, samples = samples.len(), "decoded clip");
            Ok(Clip { samples, channels, sample_rate })
        }
        _ => Err(PlaybackError::NoTrack(name.to_string())),
    }
}

/// Clips addressed by move name inside one directory, decoded once each.
#[derive(Debug)]
pub struct ClipLibrary {
    dir: PathBuf,
    cache: HashMap<String, Arc<Clip>>,
}

impl ClipLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ClipLibrary { dir: dir.into(), cache: HashMap::new() }
    }

    pub fn clip_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{CLIP_EXTENSION}"))
    }

    /// Decoded clip for `name`, from the cache when it was loaded before.
    pub fn load(&mut self, name: &str) -> Result<Arc<Clip>, PlaybackError> {
        if let Some(clip) = self.cache.get(name) {
            return Ok(Arc::clone(clip));
        }
        let clip = Arc::new(decode_clip(name, &self.clip_path(name))?);
        self.cache.insert(name.to_string(), Arc::clone(&clip));
        Ok(clip)
    }

    /// Decode every named clip up front so a bad asset fails before round one.
    pub fn preload<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> Result<(), PlaybackError> {
        for name in names {
            self.load(name)?;
        }
        Ok(())
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo_ramp() -> Clip {
        Clip {
            samples: vec![0.0, 1.0, 0.5, 1.0, 1.0, 1.0],
            channels: 2,
            sample_rate: 100,
        }
    }

    #[test]
    fn render_same_layout_is_identity() {
        let clip = stereo_ramp();
        assert_eq!(clip.render(2, 100), clip.samples);
    }

    #[test]
    fn render_downmixes_to_mono() {
        let clip = stereo_ramp();
        assert_eq!(clip.render(1, 100), vec![0.5, 0.75, 1.0]);
    }

    #[test]
    fn render_fans_mono_out() {
        let clip = Clip { samples: vec![0.25, -0.25], channels: 1, sample_rate: 10 };
        assert_eq!(clip.render(3, 10), vec![0.25, 0.25, 0.25, -0.25, -0.25, -0.25]);
    }

    #[test]
    fn render_upsampling_interpolates() {
        let clip = Clip { samples: vec![0.0, 1.0], channels: 1, sample_rate: 10 };
        let out = clip.render(1, 20);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 0.5);
        assert_eq!(out[2], 1.0);
    }

    #[test]
    fn render_empty_clip_is_empty() {
        let clip = Clip { samples: Vec::new(), channels: 2, sample_rate: 48_000 };
        assert!(clip.render(2, 44_100).is_empty());
    }

    #[test]
    fn missing_clip_is_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = ClipLibrary::new(dir.path());
        match library.load("jab") {
            Err(PlaybackError::MissingClip { name, path }) => {
                assert_eq!(name, "jab");
                assert_eq!(path, dir.path().join("jab.mp3"));
            }
            other => panic!("expected MissingClip, got {other:?}"),
        }
        assert_eq!(library.cached(), 0);
    }

    #[test]
    fn garbage_clip_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("jab.mp3"), b"definitely not audio").unwrap();
        let mut library = ClipLibrary::new(dir.path());
        assert!(matches!(
            library.preload(["jab"]),
            Err(PlaybackError::Decode { .. } | PlaybackError::NoTrack(_))
        ));
    }
}
