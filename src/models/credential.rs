//! In-memory credential record and its one-line file encoding.

use crate::constants::RECORD_SEPARATOR;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use thiserror::Error;

/// Standard alphabet; `=` padding optional on read.
const DIGEST_DECODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Authentication state: either no password, or a salt and the digest of
/// `password ‖ salt`.
#[derive(Default, PartialEq, Eq)]
pub enum CredentialRecord {
    #[default]
    Unset,
    Set { salt: String, digest: Vec<u8> },
}

/// Reasons a credential file is rejected as corrupt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorruptRecord {
    #[error("expected 1 line, found {0}")]
    LineCount(usize),
    #[error("expected 2 segments, found {0}")]
    SegmentCount(usize),
    #[error("digest is not valid base64: {0}")]
    Digest(String),
}

impl CredentialRecord {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set { .. })
    }

    pub fn salt(&self) -> Option<&str> {
        match self {
            Self::Set { salt, .. } => Some(salt.as_str()),
            Self::Unset => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn digest(&self) -> Option<&[u8]> {
        match self {
            Self::Set { digest, .. } => Some(digest.as_slice()),
            Self::Unset => None,
        }
    }

    /// Render as `<salt>:<base64(digest)>`. `None` for an unset record,
    /// which is represented on disk by the file's absence.
    pub fn to_line(&self) -> Option<String> {
        match self {
            Self::Set { salt, digest } => Some(format!(
                "{}{}{}",
                salt,
                RECORD_SEPARATOR,
                STANDARD.encode(digest)
            )),
            Self::Unset => None,
        }
    }

    /// Parse the full contents of a credential file.
    pub fn parse(contents: &str) -> Result<Self, CorruptRecord> {
        let lines: Vec<&str> = contents.lines().collect();
        if lines.len() != 1 {
            return Err(CorruptRecord::LineCount(lines.len()));
        }

        // Trailing empty segments do not count, so "123:" is one segment.
        let mut segments: Vec<&str> = lines[0].split(RECORD_SEPARATOR).collect();
        while segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }
        if segments.len() != 2 {
            return Err(CorruptRecord::SegmentCount(segments.len()));
        }

        let digest = DIGEST_DECODER
            .decode(segments[1])
            .map_err(|e| CorruptRecord::Digest(e.to_string()))?;
        Ok(Self::Set {
            salt: segments[0].to_string(),
            digest,
        })
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => f.write_str("Unset"),
            Self::Set { .. } => f.debug_struct("Set").finish_non_exhaustive(),
        }
    }
}
