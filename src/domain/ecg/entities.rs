use super::value_objects::{EcgAnnotationCode, EcgLeadCode, EcgWavePointType};
use crate::domain::errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Sampled channels of one record. `channels[lead][sample]` in microvolts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EcgSignal {
    pub sample_rate: f64,
    pub channels: Vec<Vec<f32>>,
}

impl EcgSignal {
    pub fn new(sample_rate: f64, channels: Vec<Vec<f32>>) -> Self {
        Self { sample_rate, channels }
    }

    /// Length of the first channel; every builder steps by it.
    pub fn sample_count(&self) -> usize {
        self.channels.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn lead_count(&self) -> usize {
        self.channels.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EcgWavePoint {
    pub kind: EcgWavePointType,
    /// Sample index inside the owning record
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgAnnotation {
    pub code: EcgAnnotationCode,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub label: Option<String>,
}

/// One contiguous chunk of recording.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EcgRecord {
    #[serde(default)]
    pub leads: Vec<EcgLeadCode>,
    pub signal: EcgSignal,
    /// Sample indices of detected beats
    #[serde(default)]
    pub beats: Option<Vec<usize>>,
    #[serde(default)]
    pub wave_points: Vec<EcgWavePoint>,
    #[serde(default)]
    pub annotations: Vec<EcgAnnotation>,
}

impl EcgRecord {
    pub fn new(leads: Vec<EcgLeadCode>, signal: EcgSignal) -> Self {
        Self { leads, signal, ..Default::default() }
    }

    pub fn with_beats(mut self, beats: Vec<usize>) -> Self {
        self.beats = Some(beats);
        self
    }

    pub fn with_wave_points(mut self, wave_points: Vec<EcgWavePoint>) -> Self {
        self.wave_points = wave_points;
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<EcgAnnotation>) -> Self {
        self.annotations = annotations;
        self
    }

    /// Structural check run by the host before building. Builders themselves
    /// tolerate everything this rejects.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.signal.channels.is_empty() {
            return Err(ValidationError::NoChannels);
        }
        if !(self.signal.sample_rate > 0.0) {
            return Err(ValidationError::InvalidSampleRate(self.signal.sample_rate));
        }
        let expected = self.signal.sample_count();
        for (lead, channel) in self.signal.channels.iter().enumerate() {
            if channel.len() != expected {
                return Err(ValidationError::RaggedChannels { lead, expected, actual: channel.len() });
            }
        }
        if let Some(beats) = &self.beats {
            if let Some(&index) = beats.iter().find(|&&b| b >= expected) {
                return Err(ValidationError::IndexOutOfRange { what: "beat", index, len: expected });
            }
        }
        if let Some(wp) = self.wave_points.iter().find(|wp| wp.index >= expected) {
            return Err(ValidationError::IndexOutOfRange { what: "wave point", index: wp.index, len: expected });
        }
        if let Some(a) = self.annotations.iter().find(|a| a.start > a.end || a.end >= expected) {
            return Err(ValidationError::IndexOutOfRange { what: "annotation", index: a.end, len: expected });
        }
        Ok(())
    }
}
