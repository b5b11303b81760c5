use proptest::prelude::*;

use bill_types::{Timestamp, TxHash, ONE_DAY_SECS};

proptest! {
    /// TxHash hex form parses back to the same hash.
    #[test]
    fn tx_hash_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        let parsed: TxHash = hash.to_hex().parse().unwrap();
        prop_assert_eq!(parsed, hash);
    }

    /// TxHash::is_zero is true only for all-zero bytes.
    #[test]
    fn tx_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// Shifting a timestamp forward by whole days is observed as exactly that many days.
    #[test]
    fn whole_day_shift_is_counted(start in 0u64..1_000_000_000, days in 0u64..10_000) {
        let t0 = Timestamp::new(start);
        let t1 = t0.plus(days * ONE_DAY_SECS);
        prop_assert_eq!(t0.days_to(t1), days);
    }

    /// Timestamp bincode serialization roundtrip.
    #[test]
    fn timestamp_bincode_roundtrip(secs in 0u64..u64::MAX) {
        let ts = Timestamp::new(secs);
        let encoded = bincode::serialize(&ts).unwrap();
        let decoded: Timestamp = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, ts);
    }
}
