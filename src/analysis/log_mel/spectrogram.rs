/// Flattened `(n_mels, n_frames)` log-mel matrix, mel-bin-major.
#[derive(Debug, Clone, PartialEq)]
pub struct MelSpectrogram {
    n_mels: usize,
    n_frames: usize,
    data: Vec<f32>,
}

impl MelSpectrogram {
    pub(crate) fn from_parts(n_mels: usize, n_frames: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), n_mels * n_frames);
        Self {
            n_mels,
            n_frames,
            data,
        }
    }

    pub fn n_mels(&self) -> usize {
        self.n_mels
    }

    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(mel, frame)`, or `None` when out of range.
    pub fn value(&self, mel: usize, frame: usize) -> Option<f32> {
        if mel >= self.n_mels || frame >= self.n_frames {
            return None;
        }
        self.data.get(mel * self.n_frames + frame).copied()
    }

    /// All frames of one mel bin.
    pub fn mel_row(&self, mel: usize) -> Option<&[f32]> {
        if mel >= self.n_mels {
            return None;
        }
        let start = mel * self.n_frames;
        self.data.get(start..start + self.n_frames)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Raw little-endian `f32` bytes in mel-bin-major order.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 4);
        for value in &self.data {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out
    }
}
