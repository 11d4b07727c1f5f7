//! Offline embedding backend based on signed feature hashing.
//!
//! Each lower-cased, accent-folded word and each of its character trigrams is
//! hashed with BLAKE3 into one of `dim` buckets; the bucket gets `+w` or `-w`
//! depending on one hash bit. The resulting vector is L2-normalized, so cosine
//! similarity reduces to a dot product. Output is fully deterministic.
//!
//! This backend has no notion of meaning: it rewards shared words and word
//! fragments. It keeps the bot usable without a model server.

use tracing::trace;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct HashingService {
    dim: usize,
}

impl HashingService {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embeds `input`. Text without any word yields the zero vector.
    pub fn embeddings(&self, input: &str) -> Vec<f32> {
        let mut out = vec![0.0f32; self.dim];

        for word in tokenize(input) {
            self.bump(&mut out, word.as_bytes(), WORD_WEIGHT);

            let padded: Vec<char> = format!("#{word}#").chars().collect();
            for tri in padded.windows(3) {
                let gram: String = tri.iter().collect();
                self.bump(&mut out, gram.as_bytes(), TRIGRAM_WEIGHT);
            }
        }

        let norm = out.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut out {
                *v /= norm;
            }
        }
        trace!(dim = self.dim, non_zero = out.iter().filter(|v| **v != 0.0).count(), "hashed");
        out
    }

    fn bump(&self, out: &mut [f32], feature: &[u8], weight: f32) {
        let digest = blake3::hash(feature);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest.as_bytes()[..8]);
        let h = u64::from_le_bytes(head);

        let idx = (h % self.dim as u64) as usize;
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        out[idx] += sign * weight;
    }
}

/// Splits into lower-cased, accent-folded alphanumeric words.
fn tokenize(input: &str) -> Vec<String> {
    input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.chars().flat_map(char::to_lowercase).map(fold_accent).collect())
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn deterministic_and_normalized() {
        let svc = HashingService::new(128);
        let a = svc.embeddings("Configurar el adaptador de red");
        let b = svc.embeddings("Configurar el adaptador de red");
        assert_eq!(a, b);
        assert!((dot(&a, &a) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn empty_input_is_zero_vector() {
        let svc = HashingService::new(16);
        assert!(svc.embeddings("  ¿? ").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn accents_and_case_are_folded() {
        let svc = HashingService::new(64);
        assert_eq!(svc.embeddings("DIRECCIÓN"), svc.embeddings("direccion"));
    }

    #[test]
    fn shared_words_score_higher_than_unrelated() {
        let svc = HashingService::new(256);
        let doc = svc.embeddings("verificar direccion ip del adaptador");
        let close = svc.embeddings("como verifico la direccion ip");
        let far = svc.embeddings("quiero un cafe con leche");
        assert!(dot(&doc, &close) > dot(&doc, &far));
    }
}
