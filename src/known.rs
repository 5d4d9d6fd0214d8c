//! Reference table of the first 100 safe primes (OEIS A005385).

use rug::Integer;

use crate::primality::PrimalityOracle;

/// The first 100 safe primes, ascending.
pub const KNOWN_SAFE_PRIMES: [u32; 100] = [
    5, 7, 11, 23, 47, 59, 83, 107, 167, 179, 227, 263, 347, 359, 383, 467, 479, 503, 563, 587, 719,
    839, 863, 887, 983, 1019, 1187, 1283, 1307, 1319, 1367, 1439, 1487, 1523, 1619, 1823, 1907,
    2027, 2039, 2063, 2099, 2207, 2447, 2459, 2579, 2819, 2879, 2903, 2963, 2999, 3023, 3119, 3167,
    3203, 3467, 3623, 3779, 3803, 3863, 3947, 4007, 4079, 4127, 4139, 4259, 4283, 4547, 4679, 4703,
    4787, 4799, 4919, 5087, 5099, 5387, 5399, 5483, 5507, 5639, 5807, 5879, 5927, 5939, 6047, 6599,
    6659, 6719, 6779, 6827, 6899, 6983, 7079, 7187, 7247, 7523, 7559, 7607, 7643, 7703, 7727,
];

/// True iff both `p` and `(p - 1) / 2` are prime.
pub fn is_safe_prime(p: &Integer, oracle: &dyn PrimalityOracle) -> bool {
    if !oracle.is_prime(p) {
        return false;
    }
    let q = Integer::from(p - 1u32) >> 1u32;
    oracle.is_prime(&q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primality::MillerRabin;

    #[test]
    fn table_is_sorted_and_complete() {
        assert_eq!(KNOWN_SAFE_PRIMES.len(), 100);
        assert!(KNOWN_SAFE_PRIMES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn every_entry_is_a_safe_prime() {
        let oracle = MillerRabin::default();
        for &p in KNOWN_SAFE_PRIMES.iter() {
            assert!(is_safe_prime(&Integer::from(p), &oracle), "{} is not a safe prime", p);
        }
    }

    #[test]
    fn table_has_no_gaps() {
        // every safe prime below the last entry appears in the table
        let oracle = MillerRabin::default();
        let last = *KNOWN_SAFE_PRIMES.last().unwrap();
        let found: Vec<u32> = (0..=last)
            .filter(|&v| is_safe_prime(&Integer::from(v), &oracle))
            .collect();
        assert_eq!(found, KNOWN_SAFE_PRIMES.to_vec());
    }

    #[test]
    fn rejects_non_safe_primes() {
        let oracle = MillerRabin::default();
        for v in [2u32, 3, 13, 15, 29, 4, 1] {
            assert!(!is_safe_prime(&Integer::from(v), &oracle), "{}", v);
        }
    }
}
