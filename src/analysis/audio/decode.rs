use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec};

use super::{PcmAudio, resample_linear};

/// Read a WAV file, downmix to mono and resample to `sample_rate`.
///
/// Integer PCM of any width up to 32 bits and 32-bit float PCM are accepted.
/// Integer samples are scaled to `[-1.0, 1.0)`.
pub fn read_wav_mono(path: &Path, sample_rate: u32) -> Result<PcmAudio, String> {
    let mut reader = WavReader::open(path)
        .map_err(|err| format!("WAV open failed for {}: {err}", path.display()))?;
    let spec = reader.spec();
    let interleaved = read_interleaved(&mut reader, spec)
        .map_err(|err| format!("WAV read failed for {}: {err}", path.display()))?;
    if interleaved.is_empty() {
        return Err(format!("WAV decoded 0 samples for {}", path.display()));
    }
    let channels = spec.channels.max(1);
    let source_rate = spec.sample_rate.max(1);
    let target_rate = sample_rate.max(1);
    let mono = downmix_to_mono(&interleaved, channels);
    let mono = if source_rate == target_rate {
        mono
    } else {
        resample_linear(&mono, source_rate, target_rate)
    };
    Ok(PcmAudio {
        mono,
        sample_rate: target_rate,
        source_sample_rate: source_rate,
        source_channels: channels,
    })
}

fn read_interleaved<R: Read>(reader: &mut WavReader<R>, spec: WavSpec) -> Result<Vec<f32>, String> {
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| err.to_string()),
        (SampleFormat::Int, bits @ 1..=32) => {
            let scale = (1_u64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| err.to_string())
        }
        (format, bits) => Err(format!("unsupported sample format {format:?} at {bits} bits")),
    }
}

fn downmix_to_mono(interleaved: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavWriter;
    use tempfile::TempDir;

    #[test]
    fn reads_16_bit_pcm_as_normalized_floats() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pcm16.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample::<i16>(16_384).unwrap();
        writer.write_sample::<i16>(-32_768).unwrap();
        writer.write_sample::<i16>(0).unwrap();
        writer.finalize().unwrap();

        let audio = read_wav_mono(&path, 16_000).unwrap();
        assert_eq!(audio.mono, vec![0.5, -1.0, 0.0]);
        assert_eq!(audio.source_channels, 1);
        assert_eq!(audio.sample_rate, 16_000);
    }

    #[test]
    fn stereo_float_is_downmixed_and_resampled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 32_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..3_200 {
            writer.write_sample::<f32>(0.5).unwrap();
            writer.write_sample::<f32>(0.0).unwrap();
        }
        writer.finalize().unwrap();

        let audio = read_wav_mono(&path, 16_000).unwrap();
        assert_eq!(audio.source_sample_rate, 32_000);
        assert_eq!(audio.source_channels, 2);
        assert_eq!(audio.mono.len(), 1_600);
        assert!(audio.mono.iter().all(|&v| (v - 0.25).abs() < 1e-6));
        assert!((audio.duration_seconds() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn empty_wav_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        WavWriter::create(&path, spec).unwrap().finalize().unwrap();
        let err = read_wav_mono(&path, 16_000).unwrap_err();
        assert!(err.contains("0 samples"));
    }

    #[test]
    fn non_wav_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, b"definitely not riff data").unwrap();
        assert!(read_wav_mono(&path, 16_000).is_err());
    }
}
