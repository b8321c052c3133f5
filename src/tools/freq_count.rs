use rustc_hash::FxHashMap;

/// Occurrence count per character, built by one pass over the source.
pub type FrequencyTable = FxHashMap<u8, u64>;

/// Returns a frequency count of the input data. Never empty for non-empty input.
pub fn freqs(data: &[u8]) -> FrequencyTable {
    let mut freqs = FrequencyTable::default();
    data.iter().for_each(|&el| *freqs.entry(el).or_insert(0) += 1);
    freqs
}

/// Returns the characters of a frequency table in ascending order. This is the order in which
/// leaves enter the Huffman queue, so it must not depend on hash iteration order.
pub fn sorted_symbols(freqs: &FrequencyTable) -> Vec<(u8, u64)> {
    let mut symbols: Vec<(u8, u64)> = freqs.iter().map(|(&sym, &count)| (sym, count)).collect();
    symbols.sort_unstable_by_key(|&(sym, _)| sym);
    symbols
}

#[cfg(test)]
mod test {
    use super::{freqs, sorted_symbols};

    #[test]
    fn freqs_test() {
        let table = freqs(b"abracadabra");
        assert_eq!(table.len(), 5);
        assert_eq!(table[&b'a'], 5);
        assert_eq!(table[&b'b'], 2);
        assert_eq!(table[&b'r'], 2);
        assert_eq!(table[&b'c'], 1);
        assert_eq!(table[&b'd'], 1);
    }

    #[test]
    fn empty_test() {
        assert!(freqs(&[]).is_empty());
    }

    #[test]
    fn sorted_test() {
        let table = freqs(b"zzya");
        assert_eq!(sorted_symbols(&table), vec![(b'a', 1), (b'y', 1), (b'z', 2)]);
    }
}
