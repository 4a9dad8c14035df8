//! Authenticated principal attached to a request.

use serde::Serialize;
use uuid::Uuid;

/// The user a request is made on behalf of.
///
/// The API key is kept out of serialization; pages receive it through a
/// dedicated field so it is never dumped along with the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub api_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_is_not_serialized() {
        let principal = Principal {
            id: Uuid::nil(),
            username: "ada".to_string(),
            api_key: "secret-key".to_string(),
        };
        let json = serde_json::to_value(&principal).unwrap();
        assert_eq!(json["username"], "ada");
        assert!(json.get("api_key").is_none());
    }
}
