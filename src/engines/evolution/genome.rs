use crate::config::{Encoding, organism::MAX_GENOME_BITS};
use rand::Rng;

/// Fixed-width bit string encoding one potential response.
///
/// Bits are stored most significant first. A genome is never edited once it is
/// part of a population; the algorithm builds fresh genomes for each generation
/// and the organism swaps the whole population at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Genome {
    bits: Vec<bool>,
}

impl Genome {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        assert!(
            !bits.is_empty() && bits.len() <= MAX_GENOME_BITS,
            "genome width {} outside 1..={}",
            bits.len(),
            MAX_GENOME_BITS
        );
        Self { bits }
    }

    /// Uniformly random genome: each bit is 0 or 1 with equal probability.
    pub fn random<R: Rng>(width: usize, rng: &mut R) -> Self {
        Self::from_bits((0..width).map(|_| rng.gen_bool(0.5)).collect())
    }

    /// Genome whose decoded phenotype is `value` under `encoding`.
    pub fn encode(value: u32, width: usize, encoding: Encoding) -> Self {
        let code = match encoding {
            Encoding::Binary => value,
            Encoding::Gray => value ^ (value >> 1),
        };
        Self::from_bits(
            (0..width)
                .rev()
                .map(|shift| (code >> shift) & 1 == 1)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn decode(&self, encoding: Encoding) -> u32 {
        let raw = self
            .bits
            .iter()
            .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit));
        match encoding {
            Encoding::Binary => raw,
            Encoding::Gray => gray_to_binary(raw),
        }
    }

    /// Offspring are mutated before they join a population, never after.
    pub(crate) fn flip(&mut self, index: usize) {
        self.bits[index] = !self.bits[index];
    }
}

fn gray_to_binary(mut gray: u32) -> u32 {
    let mut shift = 1;
    while shift < u32::BITS {
        gray ^= gray >> shift;
        shift <<= 1;
    }
    gray
}
