/// A segment of decoded audio: interleaved PCM samples normalized to [-1.0, 1.0].
#[derive(Clone, Debug)]
pub struct AudioSegment {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioSegment {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Builds a segment from signed 16-bit PCM.
    pub fn from_pcm_i16(pcm: &[i16], sample_rate: u32, channels: u16) -> Self {
        let samples = pcm.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
        Self::new(samples, sample_rate, channels)
    }

    /// Quantizes the samples to signed 16-bit PCM, clipping out-of-range values.
    pub fn to_pcm_i16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)
            .collect()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_creates_segment_with_correct_fields() {
        let samples = vec![0.0f32; 16000];
        let seg = AudioSegment::new(samples.clone(), 16000, 1);
        assert_eq!(seg.samples(), &samples[..]);
        assert_eq!(seg.sample_rate(), 16000);
        assert_eq!(seg.channels(), 1);
    }

    #[test]
    fn test_duration_mono() {
        let seg = AudioSegment::new(vec![0.0; 48000], 16000, 1);
        assert_eq!(seg.duration(), 3.0);
    }

    #[test]
    fn test_duration_stereo() {
        let seg = AudioSegment::new(vec![0.0; 96000], 48000, 2);
        assert_eq!(seg.duration(), 1.0);
    }

    #[test]
    fn test_pcm_conversion_clips_out_of_range() {
        let seg = AudioSegment::new(vec![2.0, -2.0, 0.0], 16000, 1);
        assert_eq!(seg.to_pcm_i16(), vec![i16::MAX, -i16::MAX, 0]);
    }

    #[test]
    fn test_from_pcm_i16_normalizes() {
        let seg = AudioSegment::from_pcm_i16(&[i16::MAX, 0], 16000, 1);
        assert_relative_eq!(seg.samples()[0], 1.0);
        assert_relative_eq!(seg.samples()[1], 0.0);
    }
}
