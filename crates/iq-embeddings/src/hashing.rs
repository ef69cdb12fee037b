//! Deterministic feature-hashing embedder.
//!
//! Each lowercase alphanumeric token (and a light plural-stripped variant) is
//! hashed with FNV-1a into one of `dimension` buckets with a hash-derived sign.
//! The result is L2-normalized, so cosine similarity reduces to token overlap.

use async_trait::async_trait;

use crate::{EmbeddingError, EmbeddingProvider};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Offline embedder with stable output across runs and platforms.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// # Panics
    ///
    /// Panics if `dimension` is zero.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        assert!(dimension > 0, "hashing embedder needs at least one bucket");
        Self { dimension }
    }

    /// Embed synchronously. Empty or token-free text yields the zero vector.
    #[must_use]
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        for token in tokens(text) {
            self.add_feature(&mut vector, &token);
            if let Some(stem) = singular(&token) {
                self.add_feature(&mut vector, stem);
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str) {
        let hash = fnv1a(feature.as_bytes());
        #[allow(clippy::cast_possible_truncation)]
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_sync(text))
    }

    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// "regions" -> "region", but leave short words and "-ss" endings alone.
fn singular(token: &str) -> Option<&str> {
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        Some(&token[..token.len() - 1])
    } else {
        None
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
