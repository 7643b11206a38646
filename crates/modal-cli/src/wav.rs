//! WAV file writing.

use hound::{SampleFormat, WavWriter};
use std::path::Path;

/// WAV output format.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32). 32 bits is written as float.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Write planar channels to a WAV file, interleaving frames.
///
/// Every channel must hold the same number of frames; `spec.channels` is
/// taken from `channels.len()`.
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    channels: &[Vec<f32>],
    spec: WavSpec,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: channels.len() as u16,
        ..spec
    };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    let frames = channels.first().map_or(0, Vec::len);

    if spec.bits_per_sample == 32 {
        for frame in 0..frames {
            for channel in channels {
                writer.write_sample(channel[frame])?;
            }
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for frame in 0..frames {
            for channel in channels {
                let int_sample = (channel[frame] * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;
    use tempfile::NamedTempFile;

    #[test]
    fn test_float_stereo_interleaves() {
        let left: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let right: Vec<f32> = left.iter().map(|s| -s).collect();

        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &[left.clone(), right.clone()], WavSpec::default()).unwrap();

        let reader = WavReader::open(file.path()).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_format, SampleFormat::Float);
        let samples: Vec<f32> = reader.into_samples::<f32>().map(Result::unwrap).collect();
        assert_eq!(samples.len(), 200);
        assert_eq!(samples[10], left[5]);
        assert_eq!(samples[11], right[5]);
    }

    #[test]
    fn test_16_bit_clamps() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            bits_per_sample: 16,
            ..WavSpec::default()
        };
        write_wav(file.path(), &[vec![0.0, 0.5, 2.0, -2.0]], spec).unwrap();

        let reader = WavReader::open(file.path()).unwrap();
        let samples: Vec<i16> = reader.into_samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![0, 16384, i16::MAX, i16::MIN]);
    }
}
