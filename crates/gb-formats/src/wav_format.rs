//! WAV encoding and decoding for PCM audio.

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use gb_ir::{Frame, Sample, SampleData};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::FormatError;

// --- Writing ---

/// Encode `frames` as 16-bit stereo PCM.
pub fn write_wav<W: Write + Seek>(w: W, frames: &[Frame], sample_rate: u32) -> Result<(), FormatError> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::new(w, spec)?;
    for frame in frames {
        writer.write_sample(frame.left)?;
        writer.write_sample(frame.right)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Encode `frames` into an in-memory WAV file.
pub fn frames_to_wav(frames: &[Frame], sample_rate: u32) -> Result<Vec<u8>, FormatError> {
    let mut buf = Cursor::new(Vec::new());
    write_wav(&mut buf, frames, sample_rate)?;
    Ok(buf.into_inner())
}

// --- Reading ---

/// Load a WAV file from raw bytes into a Sample.
pub fn load_wav(data: &[u8], name: &str) -> Result<Sample, FormatError> {
    read_wav(Cursor::new(data), name)
}

/// Load a WAV file from disk; the sample is named after the file stem.
pub fn load_wav_file(path: &Path) -> Result<Sample, FormatError> {
    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let file = std::io::BufReader::new(std::fs::File::open(path)?);
    read_wav(file, name)
}

fn read_wav<R: Read>(reader: R, name: &str) -> Result<Sample, FormatError> {
    let reader = WavReader::new(reader)?;
    let spec = reader.spec();
    if !(1..=2).contains(&spec.channels) {
        return Err(FormatError::UnsupportedChannels(spec.channels));
    }

    let mut sample = Sample::new(name);
    sample.sample_rate = spec.sample_rate;
    sample.data = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8) => {
            let raw: Vec<i8> = reader.into_samples::<i8>().collect::<Result<_, _>>()?;
            if spec.channels == 1 {
                SampleData::Mono8(raw)
            } else {
                let (l, r) = deinterleave(&raw);
                SampleData::Stereo8(l, r)
            }
        }
        (SampleFormat::Int, bits) => {
            let shift = bits.saturating_sub(16);
            let raw: Vec<i16> = reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| (v >> shift) as i16))
                .collect::<Result<_, _>>()?;
            pack_16(raw, spec.channels)
        }
        (SampleFormat::Float, _) => {
            let raw: Vec<i16> = reader
                .into_samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * 32767.0) as i16))
                .collect::<Result<_, _>>()?;
            pack_16(raw, spec.channels)
        }
    };
    log::debug!(
        "loaded '{}': {} frames, {} ch, {} Hz",
        name,
        sample.len(),
        spec.channels,
        spec.sample_rate
    );
    Ok(sample)
}

fn pack_16(raw: Vec<i16>, channels: u16) -> SampleData {
    if channels == 1 {
        SampleData::Mono16(raw)
    } else {
        let (l, r) = deinterleave(&raw);
        SampleData::Stereo16(l, r)
    }
}

fn deinterleave<T: Copy>(raw: &[T]) -> (Vec<T>, Vec<T>) {
    let mut left = Vec::with_capacity(raw.len() / 2);
    let mut right = Vec::with_capacity(raw.len() / 2);
    for pair in raw.chunks_exact(2) {
        left.push(pair[0]);
        right.push(pair[1]);
    }
    (left, right)
}
