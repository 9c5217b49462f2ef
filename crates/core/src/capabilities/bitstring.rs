//! Capability bitstring codec
//!
//! A [`CapabilityString`] is one logical bitmask stored as an ordered
//! sequence of 64-bit words. Capability `id` lives at word `id / 64`, bit
//! `id % 64`. The sequence is never longer than needed to hold the highest
//! set bit, so two strings with the same content are identical word for
//! word.

use serde::{Deserialize, Serialize};

use super::Capability;

const WORD_BITS: usize = 64;

/// Dense bitmask of capability ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<u64>", into = "Vec<u64>")]
pub struct CapabilityString(Vec<u64>);

impl CapabilityString {
    /// Build a bitstring from capability ids.
    ///
    /// Ids at or below [`Capability::UNUSED`] are skipped. Order and
    /// duplicates in the input do not affect the result.
    pub fn from_capabilities<I>(caps: I) -> Self
    where
        I: IntoIterator<Item = Capability>,
    {
        let mut words: Vec<u64> = Vec::new();
        for cap in caps {
            if !cap.is_encodable() {
                continue;
            }
            let index = cap.id() as usize / WORD_BITS;
            let bit = cap.id() as usize % WORD_BITS;
            if words.len() <= index {
                words.resize(index + 1, 0);
            }
            words[index] |= 1u64 << bit;
        }
        Self(words)
    }

    /// Adopt words received from the wire, dropping trailing zero words.
    pub fn from_words(mut words: Vec<u64>) -> Self {
        while words.last() == Some(&0) {
            words.pop();
        }
        Self(words)
    }

    /// Words in transmission order
    pub fn as_words(&self) -> &[u64] {
        &self.0
    }

    /// Number of words in use
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no capability bit is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the bit for `cap` is set
    pub fn contains(&self, cap: Capability) -> bool {
        if !cap.is_encodable() {
            return false;
        }
        let index = cap.id() as usize / WORD_BITS;
        let bit = cap.id() as usize % WORD_BITS;
        self.0
            .get(index)
            .map(|word| word & (1u64 << bit) != 0)
            .unwrap_or(false)
    }

    /// True iff every bit set in `self` is also set in `advertised`.
    ///
    /// `self` is the requirement. An advertisement with fewer words can
    /// never cover a requirement bit beyond its own range.
    pub fn compatible_with(&self, advertised: &CapabilityString) -> bool {
        if self.0.len() > advertised.0.len() {
            return false;
        }
        self.0
            .iter()
            .zip(advertised.0.iter())
            .all(|(required, offered)| required & offered == *required)
    }
}

impl From<Vec<u64>> for CapabilityString {
    fn from(words: Vec<u64>) -> Self {
        Self::from_words(words)
    }
}

impl From<CapabilityString> for Vec<u64> {
    fn from(caps: CapabilityString) -> Self {
        caps.0
    }
}

impl FromIterator<Capability> for CapabilityString {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        Self::from_capabilities(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn caps(ids: &[i32]) -> Vec<Capability> {
        ids.iter().copied().map(Capability).collect()
    }

    #[test]
    fn test_sentinels_are_dropped() {
        let s = CapabilityString::from_capabilities(caps(&[-10, -1, 0, 1, 2, 3, 4, 5]));
        assert_eq!(s.as_words(), &[62]);
    }

    #[test]
    fn test_skips_empty_words() {
        let s = CapabilityString::from_capabilities(caps(&[193, 192]));
        assert_eq!(s.as_words(), &[0, 0, 0, 3]);
    }

    #[test]
    fn test_out_of_order_inserts() {
        let s = CapabilityString::from_capabilities(caps(&[193, 54, 192, 79]));
        assert_eq!(s.as_words(), &[1 << 54, 1 << 15, 0, 3]);
    }

    #[test]
    fn test_empty_input() {
        let s = CapabilityString::from_capabilities(Vec::new());
        assert!(s.is_empty());
        assert_eq!(s, CapabilityString::default());
    }

    #[test]
    fn test_from_words_trims_trailing_zeros() {
        let s = CapabilityString::from_words(vec![6, 0, 0]);
        assert_eq!(s.as_words(), &[6]);
        assert_eq!(CapabilityString::from_words(vec![0, 0]).len(), 0);
    }

    #[test]
    fn test_contains() {
        let s = CapabilityString::from_capabilities(caps(&[1, 70]));
        assert!(s.contains(Capability(1)));
        assert!(s.contains(Capability(70)));
        assert!(!s.contains(Capability(2)));
        assert!(!s.contains(Capability(500)));
        assert!(!s.contains(Capability::UNUSED));
    }

    #[test]
    fn test_simple_compatibility() {
        let required = CapabilityString::from_capabilities(caps(&[0, 1, 2, 3]));
        assert!(required.compatible_with(&CapabilityString::from_words(vec![15])));
        assert!(!required.compatible_with(&CapabilityString::from_words(vec![7])));
    }

    #[test]
    fn test_empty_requirement_is_compatible_with_anything() {
        let empty = CapabilityString::default();
        assert!(empty.compatible_with(&CapabilityString::default()));
        assert!(empty.compatible_with(&CapabilityString::from_capabilities(caps(&[1, 300]))));
    }

    #[test]
    fn test_longer_requirement_is_incompatible() {
        let required = CapabilityString::from_capabilities(caps(&[1, 64]));
        let advertised = CapabilityString::from_capabilities(caps(&[1, 2, 3]));
        assert!(!required.compatible_with(&advertised));
    }

    #[test]
    fn test_wire_encoding_is_word_list() {
        let s = CapabilityString::from_capabilities(caps(&[1, 65]));
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[2,2]");

        let back: CapabilityString = serde_json::from_str("[2,2,0]").unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_construction_ignores_order_and_duplicates() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let n = rng.gen_range(0..64);
            let ids: Vec<i32> = (0..n).map(|_| rng.gen_range(-4..400)).collect();
            let baseline = CapabilityString::from_capabilities(caps(&ids));

            let mut shuffled = ids.clone();
            shuffled.extend_from_slice(&ids[..ids.len() / 2]);
            shuffled.shuffle(&mut rng);

            assert_eq!(CapabilityString::from_capabilities(caps(&shuffled)), baseline);
            assert_ne!(baseline.as_words().last(), Some(&0));
        }
    }

    #[test]
    fn test_subset_compatibility() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let nb_caps = rng.gen_range(0..=512);
            let full: Vec<Capability> = (1..=nb_caps)
                .filter(|_| rng.gen_bool(0.5))
                .map(Capability)
                .collect();

            let reduction = rng.gen_range(0..=full.len());
            let mut subset = full.clone();
            for _ in 0..reduction {
                let k = rng.gen_range(0..subset.len());
                subset.swap_remove(k);
            }
            assert_eq!(subset.len(), full.len() - reduction);

            let sub = CapabilityString::from_capabilities(subset.iter().copied());
            let sup = CapabilityString::from_capabilities(full.iter().copied());

            assert!(sub.compatible_with(&sup), "subset not compatible with full set");
            assert!(sub.compatible_with(&sub));
            if reduction > 0 {
                assert!(!sup.compatible_with(&sub), "full set compatible with strict subset");
            } else {
                assert_eq!(sub, sup);
            }
        }
    }
}
