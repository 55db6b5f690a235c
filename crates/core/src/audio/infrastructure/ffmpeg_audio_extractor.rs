use std::fs;
use std::path::Path;

use crate::audio::domain::audio_extractor::AudioExtractor;
use crate::audio::domain::audio_segment::AudioSegment;
use crate::shared::constants::{WHISPER_CHANNELS, WHISPER_SAMPLE_RATE};

use super::wav::write_scratch_wav;

/// Decodes the best audio stream of a video with ffmpeg-next, downmixes it to
/// mono 16 kHz and writes the result as a 16-bit PCM WAV.
pub struct FfmpegAudioExtractor;

impl FfmpegAudioExtractor {
    fn decode(&self, path: &Path) -> Result<AudioSegment, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;

        let audio_stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Audio)
            .ok_or_else(|| format!("No audio stream in {}", path.display()))?;

        let audio_stream_index = audio_stream.index();
        let codec_ctx =
            ffmpeg_next::codec::context::Context::from_parameters(audio_stream.parameters())?;
        let mut decoder = codec_ctx.decoder().audio()?;

        let mut resampler = ffmpeg_next::software::resampling::Context::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Planar),
            ffmpeg_next::ChannelLayout::MONO,
            WHISPER_SAMPLE_RATE,
        )?;

        let mut all_samples: Vec<f32> = Vec::new();
        let mut decoded_frame = ffmpeg_next::util::frame::audio::Audio::empty();
        let mut resampled_frame = ffmpeg_next::util::frame::audio::Audio::empty();

        for (stream, packet) in ictx.packets() {
            if stream.index() != audio_stream_index {
                continue;
            }

            decoder.send_packet(&packet)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                resampler.run(&decoded_frame, &mut resampled_frame)?;
                extract_f32_samples(&resampled_frame, &mut all_samples);
            }
        }

        decoder.send_eof()?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            resampler.run(&decoded_frame, &mut resampled_frame)?;
            extract_f32_samples(&resampled_frame, &mut all_samples);
        }

        // The resampler may still hold buffered samples
        if let Ok(Some(delay)) = resampler.flush(&mut resampled_frame) {
            if delay.output > 0 {
                extract_f32_samples(&resampled_frame, &mut all_samples);
            }
        }

        Ok(AudioSegment::new(
            all_samples,
            WHISPER_SAMPLE_RATE,
            WHISPER_CHANNELS,
        ))
    }
}

impl AudioExtractor for FfmpegAudioExtractor {
    fn extract(&self, video_path: &Path, dest: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let audio = self.decode(video_path)?;
        log::debug!(
            "Decoded {:.1}s of audio from {}",
            audio.duration(),
            video_path.display()
        );

        if let Err(e) = write_scratch_wav(dest, &audio) {
            let _ = fs::remove_file(dest);
            return Err(e);
        }
        Ok(())
    }
}

/// Extract f32 samples from a planar mono resampled frame.
fn extract_f32_samples(frame: &ffmpeg_next::util::frame::audio::Audio, out: &mut Vec<f32>) {
    let num_samples = frame.samples();
    if num_samples == 0 {
        return;
    }
    let data = frame.data(0);
    let floats = unsafe { std::slice::from_raw_parts(data.as_ptr() as *const f32, num_samples) };
    out.extend_from_slice(floats);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn missing_video() -> &'static Path {
        if cfg!(windows) {
            Path::new("Z:\\nonexistent\\file.mp4")
        } else {
            Path::new("/nonexistent/file.mp4")
        }
    }

    #[test]
    fn test_extract_nonexistent_file_errors() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("audio.wav");
        let result = FfmpegAudioExtractor.extract(missing_video(), &dest);
        assert!(result.is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn test_extract_non_media_file_errors() {
        let tmp = TempDir::new().unwrap();
        let video = tmp.path().join("garbage.mp4");
        fs::write(&video, b"definitely not a container").unwrap();
        let dest = tmp.path().join("audio.wav");
        assert!(FfmpegAudioExtractor.extract(&video, &dest).is_err());
        assert!(!dest.exists());
    }
}
