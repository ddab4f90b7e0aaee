//! Record identity for highlights and notes.
//!
//! New ids are UUIDv7 strings: 48 bits of creation time in epoch
//! milliseconds followed by random bits. Ids read back from storage are kept
//! verbatim, so slots written by older clients with other id formats stay
//! loadable.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::{NoContext, Timestamp, Uuid};

/// Stable identifier of one highlight or note.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generates a fresh time-ordered id stamped with `now_ms`.
    ///
    /// Negative clock values are clamped to the unix epoch.
    pub fn generate(now_ms: i64) -> Self {
        let millis = u64::try_from(now_ms).unwrap_or(0);
        let seconds = millis / 1000;
        let subsec_nanos = u32::try_from((millis % 1000) * 1_000_000).unwrap_or(0);
        let timestamp = Timestamp::from_unix(NoContext, seconds, subsec_nanos);
        Self(Uuid::new_v7(timestamp).to_string())
    }

    /// Generates an id that no record in `existing` already uses.
    pub fn generate_unique<T>(
        existing: &[T],
        id_of: impl Fn(&T) -> &RecordId,
        now_ms: i64,
    ) -> Self {
        loop {
            let candidate = Self::generate(now_ms);
            if existing.iter().all(|record| id_of(record) != &candidate) {
                return candidate;
            }
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::RecordId;
    use std::collections::HashSet;
    use uuid::Uuid;

    #[test]
    fn generated_ids_are_v7_uuids() {
        let id = RecordId::generate(1_700_000_000_123);
        let parsed = Uuid::parse_str(id.as_str()).expect("generated id should parse");
        assert_eq!(parsed.get_version_num(), 7);
    }

    #[test]
    fn generated_ids_do_not_collide_within_one_millisecond() {
        let ids: HashSet<RecordId> = (0..1_000)
            .map(|_| RecordId::generate(1_700_000_000_000))
            .collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn generated_ids_embed_the_timestamp_prefix() {
        let earlier = RecordId::generate(1_000);
        let later = RecordId::generate(2_000_000);
        assert!(earlier < later);
    }

    #[test]
    fn generate_unique_skips_ids_already_in_use() {
        let existing: Vec<RecordId> = (0..50).map(|_| RecordId::generate(7)).collect();
        let fresh = RecordId::generate_unique(&existing, |id| id, 7);
        assert!(!existing.contains(&fresh));
    }

    #[test]
    fn negative_clock_is_clamped() {
        let id = RecordId::generate(-5);
        assert!(id.as_str().starts_with("00000000-0000-7"));
    }

    #[test]
    fn legacy_ids_are_kept_verbatim() {
        let id: RecordId = serde_json::from_str("\"lq2x8k1-abc12\"").unwrap();
        assert_eq!(id.as_str(), "lq2x8k1-abc12");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"lq2x8k1-abc12\"");
    }
}
