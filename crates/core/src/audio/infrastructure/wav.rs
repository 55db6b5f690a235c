use std::path::Path;

use crate::audio::domain::audio_segment::AudioSegment;
use crate::shared::constants::{WHISPER_BITS_PER_SAMPLE, WHISPER_CHANNELS, WHISPER_SAMPLE_RATE};

fn scratch_spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: WHISPER_CHANNELS,
        sample_rate: WHISPER_SAMPLE_RATE,
        bits_per_sample: WHISPER_BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Writes `audio` as mono 16 kHz 16-bit PCM WAV.
pub fn write_scratch_wav(path: &Path, audio: &AudioSegment) -> Result<(), Box<dyn std::error::Error>> {
    if audio.channels() != WHISPER_CHANNELS || audio.sample_rate() != WHISPER_SAMPLE_RATE {
        return Err(format!(
            "Scratch audio must be {WHISPER_CHANNELS} channel at {WHISPER_SAMPLE_RATE} Hz, got {} at {} Hz",
            audio.channels(),
            audio.sample_rate()
        )
        .into());
    }

    let mut writer = hound::WavWriter::create(path, scratch_spec())?;
    for sample in audio.to_pcm_i16() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Reads a scratch WAV, rejecting anything that is not mono 16 kHz 16-bit PCM.
pub fn read_scratch_wav(path: &Path) -> Result<AudioSegment, Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let expected = scratch_spec();

    if spec.channels != expected.channels {
        return Err(format!(
            "Expected {} channel(s), found {}",
            expected.channels, spec.channels
        )
        .into());
    }
    if spec.sample_rate != expected.sample_rate {
        return Err(format!(
            "Expected {} Hz sample rate, found {} Hz",
            expected.sample_rate, spec.sample_rate
        )
        .into());
    }
    if spec.bits_per_sample != expected.bits_per_sample
        || spec.sample_format != expected.sample_format
    {
        return Err(format!(
            "Expected 16-bit integer PCM, found {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )
        .into());
    }

    let pcm = reader.samples::<i16>().collect::<Result<Vec<i16>, _>>()?;
    Ok(AudioSegment::from_pcm_i16(
        &pcm,
        spec.sample_rate,
        spec.channels,
    ))
}
