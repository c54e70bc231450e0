//! Profile model: the single operator profile.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::DocumentId;

/// The stored operator profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: DocumentId,
    pub username: String,
    pub color: String,
    pub role: String,
    pub last_updated: DateTime<Utc>,
}

/// Request body for creating the profile.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
    pub username: String,
    pub color: String,
    pub role: String,
}

impl NewProfile {
    pub fn into_profile(self, id: DocumentId, last_updated: DateTime<Utc>) -> Profile {
        Profile {
            id,
            username: self.username,
            color: self.color,
            role: self.role,
            last_updated,
        }
    }
}

/// Current time at the precision the document store keeps (milliseconds).
pub fn store_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_store_now_is_millisecond_precision() {
        assert_eq!(store_now().nanosecond() % 1_000_000, 0);
    }

    #[test]
    fn test_profile_json_shape() {
        let at = store_now();
        let profile = NewProfile {
            username: "ada".to_string(),
            color: "blue".to_string(),
            role: "admin".to_string(),
        }
        .into_profile(DocumentId::generate(), at);

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["username"], "ada");
        assert_eq!(json["role"], "admin");
        let stamped: DateTime<Utc> = json["last_updated"].as_str().unwrap().parse().unwrap();
        assert_eq!(stamped, at);
    }
}
