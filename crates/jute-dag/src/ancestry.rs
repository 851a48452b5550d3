//! Dense slot sets backed by 64-bit words.
//!
//! A query numbers the members of one ancestor set `0..n` in identity order
//! and works on those local slots, so a [`SlotSet`] never grows past the
//! size of the set being examined, however large the whole DAG is.

const WORD_BITS: usize = 64;

/// A growable set of local slots.
#[derive(Clone, Debug, Default)]
pub(crate) struct SlotSet {
    words: Vec<u64>,
}

impl SlotSet {
    /// An empty set.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert `slot`, returning `true` if it was not present.
    pub(crate) fn insert(&mut self, slot: usize) -> bool {
        let (word, mask) = Self::locate(slot);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, slot: usize) -> bool {
        let (word, mask) = Self::locate(slot);
        self.words.get(word).is_some_and(|w| w & mask != 0)
    }

    /// In-place union.
    pub(crate) fn union_with(&mut self, other: &SlotSet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (dst, src) in self.words.iter_mut().zip(&other.words) {
            *dst |= *src;
        }
    }

    /// Number of members.
    pub(crate) fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Members in ascending order.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(i * WORD_BITS + bit)
            })
        })
    }

    fn locate(slot: usize) -> (usize, u64) {
        (slot / WORD_BITS, 1u64 << (slot % WORD_BITS))
    }
}

impl PartialEq for SlotSet {
    fn eq(&self, other: &Self) -> bool {
        let (short, long) = if self.words.len() <= other.words.len() {
            (&self.words, &other.words)
        } else {
            (&other.words, &self.words)
        };
        short.iter().zip(long.iter()).all(|(a, b)| a == b)
            && long[short.len()..].iter().all(|&w| w == 0)
    }
}

impl Eq for SlotSet {}

impl FromIterator<usize> for SlotSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = SlotSet::new();
        for slot in iter {
            set.insert(slot);
        }
        set
    }
}
