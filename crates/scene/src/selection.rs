use foundation::RecordId;

/// Deterministic record set backed by a bitset.
///
/// Membership is tracked by `RecordId::index()`.
///
/// Ordering contract:
/// - Iteration yields ids in ascending index order, which is dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    words: Vec<u64>,
    len: usize,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set containing ids `0..count`.
    pub fn full(count: usize) -> Self {
        let mut s = Self::default();
        for i in 0..count {
            s.insert(RecordId(i as u32));
        }
        s
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: RecordId) -> bool {
        let (word, bit) = word_bit(id.0);
        self.words
            .get(word)
            .is_some_and(|w| (w & (1u64 << bit)) != 0)
    }

    /// Inserts `id` into the set.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, id: RecordId) -> bool {
        let (word, bit) = word_bit(id.0);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << bit;
        let w = &mut self.words[word];
        if (*w & mask) != 0 {
            return false;
        }
        *w |= mask;
        self.len += 1;
        true
    }

    /// Iterates member ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = RecordId> + '_ {
        RecordSetIter {
            words: &self.words,
            word_index: 0,
            current_word: 0,
            base_index: 0,
        }
    }
}

impl FromIterator<RecordId> for RecordSet {
    fn from_iter<T: IntoIterator<Item = RecordId>>(iter: T) -> Self {
        let mut s = Self::default();
        for id in iter {
            s.insert(id);
        }
        s
    }
}

fn word_bit(index: u32) -> (usize, u32) {
    ((index / 64) as usize, index % 64)
}

struct RecordSetIter<'a> {
    words: &'a [u64],
    word_index: usize,
    current_word: u64,
    base_index: u32,
}

impl Iterator for RecordSetIter<'_> {
    type Item = RecordId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let tz = self.current_word.trailing_zeros();
                self.current_word &= !(1u64 << tz);
                return Some(RecordId(self.base_index + tz));
            }

            let w = *self.words.get(self.word_index)?;
            self.current_word = w;
            self.base_index = (self.word_index as u32) * 64;
            self.word_index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RecordSet;
    use foundation::RecordId;

    #[test]
    fn insert_contains_and_len() {
        let mut s = RecordSet::new();
        assert!(s.is_empty());
        assert!(s.insert(RecordId(1)));
        assert!(!s.insert(RecordId(1)));
        assert!(s.contains(RecordId(1)));
        assert!(!s.contains(RecordId(700)));
        assert_eq!(s.len(), 1);
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn iter_is_sorted_across_words() {
        let s: RecordSet = [RecordId(65), RecordId(2), RecordId(10)].into_iter().collect();
        let got: Vec<u32> = s.iter().map(|id| id.0).collect();
        assert_eq!(got, vec![2, 10, 65]);
    }

    #[test]
    fn full_covers_prefix() {
        let s = RecordSet::full(70);
        assert_eq!(s.len(), 70);
        assert!(s.contains(RecordId(69)));
        assert!(!s.contains(RecordId(70)));
    }
}
