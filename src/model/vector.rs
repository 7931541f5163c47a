//! Feature vectors and their little-endian f32 wire format.

use std::sync::Arc;

use thiserror::Error;

use crate::constants::F32_WIRE_BYTES;

/// Failure to turn wire bytes into a [`FeatureVector`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorError {
    #[error("feature vector is empty")]
    Empty,

    #[error("feature bytes length {len} is not a multiple of 4")]
    Misaligned { len: usize },

    #[error("feature bytes length {len} is not divisible by embedding dimension {dim}")]
    NotDivisible { len: usize, dim: usize },

    #[error("feature vector dimension mismatch: expected {expected}, got {actual}")]
    WrongDimension { expected: usize, actual: usize },
}

/// Immutable embedding of a pet photo.
///
/// Cloning is cheap; the values are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Arc<[f32]>);

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values.into())
    }

    /// Decodes a flat little-endian f32 array.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, VectorError> {
        if bytes.is_empty() {
            return Err(VectorError::Empty);
        }
        if !bytes.len().is_multiple_of(F32_WIRE_BYTES) {
            return Err(VectorError::Misaligned { len: bytes.len() });
        }

        Ok(Self::new(decode_f32_le(bytes)))
    }

    /// Decodes and additionally requires exactly `dim` elements.
    pub fn from_le_bytes_with_dim(bytes: &[u8], dim: usize) -> Result<Self, VectorError> {
        if dim == 0 || !bytes.len().is_multiple_of(dim) {
            return Err(VectorError::NotDivisible {
                len: bytes.len(),
                dim,
            });
        }

        let vector = Self::from_le_bytes(bytes)?;
        if vector.dim() != dim {
            return Err(VectorError::WrongDimension {
                expected: dim,
                actual: vector.dim(),
            });
        }
        Ok(vector)
    }

    /// Encodes to the wire format.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        encode_f32_le(&self.0)
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Returns `true` if every element is zero (cosine is undefined).
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

#[cfg(target_endian = "little")]
fn decode_f32_le(bytes: &[u8]) -> Vec<f32> {
    // Zero-copy view only works when the buffer happens to be 4-byte aligned.
    match bytemuck::try_cast_slice::<u8, f32>(bytes) {
        Ok(values) => values.to_vec(),
        Err(_) => decode_f32_le_unaligned(bytes),
    }
}

#[cfg(not(target_endian = "little"))]
fn decode_f32_le(bytes: &[u8]) -> Vec<f32> {
    decode_f32_le_unaligned(bytes)
}

fn decode_f32_le_unaligned(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(F32_WIRE_BYTES)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(target_endian = "little")]
fn encode_f32_le(values: &[f32]) -> Vec<u8> {
    bytemuck::cast_slice::<f32, u8>(values).to_vec()
}

#[cfg(not(target_endian = "little"))]
fn encode_f32_le(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Cosine similarity accumulated in f64. Returns `0.0` for empty, unequal or zero vectors.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (&av, &bv)| {
                let av = av as f64;
                let bv = bv as f64;
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
