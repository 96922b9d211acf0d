//! Reader for the binary filters file shipped next to the speech model.
//!
//! Layout (little-endian): `u32` magic, `i32 n_mel`, `i32 n_bins`, then
//! `n_mel * n_bins` `f32` weights. Vocabulary data that follows the weights
//! belongs to the model's tokenizer and is left unread.

use std::path::Path;

use super::{FilterbankFileError, MelFilterbank};

/// Magic number at the start of a filters file ("NESU" read little-endian).
pub const FILTERS_FILE_MAGIC: u32 = 0x5553_454e;

const HEADER_LEN: usize = 12;

impl MelFilterbank {
    /// Load the filterbank section of a model filters file.
    pub fn from_filters_file(path: &Path) -> Result<Self, FilterbankFileError> {
        let bytes = std::fs::read(path).map_err(|source| FilterbankFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let bank = Self::from_filters_bytes(&bytes)?;
        tracing::debug!(
            "Loaded {}x{} mel filterbank from {}",
            bank.n_mels(),
            bank.n_bins(),
            path.display()
        );
        Ok(bank)
    }

    /// Parse the filterbank section from an in-memory filters file.
    pub fn from_filters_bytes(bytes: &[u8]) -> Result<Self, FilterbankFileError> {
        if bytes.len() < HEADER_LEN {
            return Err(FilterbankFileError::Truncated {
                needed: HEADER_LEN,
                available: bytes.len(),
            });
        }
        let magic = read_u32(bytes, 0);
        if magic != FILTERS_FILE_MAGIC {
            return Err(FilterbankFileError::BadMagic { found: magic });
        }
        let n_mel = read_u32(bytes, 4) as i32;
        let n_bins = read_u32(bytes, 8) as i32;
        if n_mel <= 0 || n_bins <= 0 {
            return Err(FilterbankFileError::InvalidHeader { n_mel, n_bins });
        }
        let count = n_mel as usize * n_bins as usize;
        let needed = HEADER_LEN + count * 4;
        if bytes.len() < needed {
            return Err(FilterbankFileError::Truncated {
                needed,
                available: bytes.len(),
            });
        }
        let weights = bytes[HEADER_LEN..needed]
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Self::new(n_mel as usize, n_bins as usize, weights)
            .map_err(|_| FilterbankFileError::InvalidHeader { n_mel, n_bins })
    }

    /// Serialize as a filters file without vocabulary data.
    pub fn to_filters_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.weights().len() * 4);
        out.extend_from_slice(&FILTERS_FILE_MAGIC.to_le_bytes());
        out.extend_from_slice(&(self.n_mels() as i32).to_le_bytes());
        out.extend_from_slice(&(self.n_bins() as i32).to_le_bytes());
        for weight in self.weights() {
            out.extend_from_slice(&weight.to_le_bytes());
        }
        out
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::log_mel::MelConfig;
    use tempfile::tempdir;

    #[test]
    fn filters_file_ignores_trailing_vocab() {
        let bank = MelFilterbank::slaney(&MelConfig::WHISPER);
        let mut bytes = bank.to_filters_bytes();
        // Vocabulary section: count followed by length-prefixed words.
        bytes.extend_from_slice(&2_i32.to_le_bytes());
        bytes.extend_from_slice(&1_i32.to_le_bytes());
        bytes.push(b'a');
        bytes.extend_from_slice(&1_i32.to_le_bytes());
        bytes.push(b'b');

        let dir = tempdir().unwrap();
        let path = dir.path().join("filters_vocab_en.bin");
        std::fs::write(&path, &bytes).unwrap();
        let loaded = MelFilterbank::from_filters_file(&path).unwrap();
        assert_eq!(loaded, bank);
    }

    #[test]
    fn bad_magic_is_reported() {
        let mut bytes = MelFilterbank::slaney(&MelConfig::WHISPER).to_filters_bytes();
        bytes[0] ^= 0xff;
        let err = MelFilterbank::from_filters_bytes(&bytes).unwrap_err();
        assert!(matches!(err, FilterbankFileError::BadMagic { .. }));
    }

    #[test]
    fn short_weight_section_is_truncated() {
        let bytes = MelFilterbank::slaney(&MelConfig::WHISPER).to_filters_bytes();
        let err = MelFilterbank::from_filters_bytes(&bytes[..bytes.len() - 4]).unwrap_err();
        assert!(matches!(
            err,
            FilterbankFileError::Truncated { needed, available } if needed == available + 4
        ));
    }

    #[test]
    fn negative_dimensions_are_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&FILTERS_FILE_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&(-1_i32).to_le_bytes());
        bytes.extend_from_slice(&201_i32.to_le_bytes());
        let err = MelFilterbank::from_filters_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            FilterbankFileError::InvalidHeader { n_mel: -1, n_bins: 201 }
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let err = MelFilterbank::from_filters_file(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, FilterbankFileError::Read { .. }));
    }
}
