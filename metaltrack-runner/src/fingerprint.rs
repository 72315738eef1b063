//! Dataset fingerprint for comparing snapshots.

use metaltrack_core::StoredRecord;

/// Deterministic BLAKE3 hash over every stored field, in collection order.
///
/// Each field is length-prefixed so `("ab", "c")` and `("a", "bc")` differ.
pub fn dataset_hash(records: &[StoredRecord]) -> String {
    let mut hasher = blake3::Hasher::new();
    let mut field = |s: &str| {
        hasher.update(&(s.len() as u64).to_le_bytes());
        hasher.update(s.as_bytes());
    };

    for stored in records {
        let r = &stored.record;
        field(stored.id.to_string().as_str());
        field(r.date.to_string().as_str());
        field(r.silver_price.as_str());
        field(r.gold_price.as_str());
        field(r.gold_silver_ratio.as_str());
        field(r.momentum.as_str());
        field(r.comex_inventory.as_str());
        field(r.comex_eligible.as_deref().unwrap_or(""));
        field(r.comex_total.as_deref().unwrap_or(""));
        field(r.cot_commercial.as_str());
        field(r.cot_change.map(|c| c.as_str()).unwrap_or(""));
        field(r.cot_speculator.as_str());
        field(r.slv_holdings.as_str());
        field(r.pslv_holdings.as_deref().unwrap_or(""));
        field(r.monthly_change.as_deref().unwrap_or(""));
        field(r.weekly_change.as_deref().unwrap_or(""));
        field(r.delivery_window.as_deref().unwrap_or(""));
        field(r.note.as_str());
    }

    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use metaltrack_core::{Record, RecordId};

    fn stored(id: u64, note: &str) -> StoredRecord {
        StoredRecord {
            id: RecordId(id),
            record: Record {
                silver_price: "32.50".into(),
                note: note.into(),
                ..Record::new(NaiveDate::from_ymd_opt(2026, 1, 7).unwrap())
            },
        }
    }

    #[test]
    fn deterministic() {
        let records = vec![stored(0, "a"), stored(1, "b")];
        assert_eq!(dataset_hash(&records), dataset_hash(&records.clone()));
        assert_eq!(dataset_hash(&records).len(), 64);
    }

    #[test]
    fn sensitive_to_content_and_order() {
        let a = vec![stored(0, "a"), stored(1, "b")];
        let b = vec![stored(1, "b"), stored(0, "a")];
        let c = vec![stored(0, "a"), stored(1, "c")];
        assert_ne!(dataset_hash(&a), dataset_hash(&b));
        assert_ne!(dataset_hash(&a), dataset_hash(&c));
    }

    #[test]
    fn empty_collection_hashes() {
        assert_eq!(dataset_hash(&[]), blake3::hash(b"").to_hex().to_string());
    }
}
