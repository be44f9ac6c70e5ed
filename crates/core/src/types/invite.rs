//! Team invitation payload.

use serde::{Deserialize, Serialize};

/// A request to email a team invitation.
///
/// Exists only for the duration of one notification; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    /// Recipient address.
    pub email: String,
    /// Invitee display name.
    pub name: String,
    /// Account activation URL.
    pub link: String,
    /// Name of the store the invitee is joining.
    pub store_name: String,
    /// Name of the store owner sending the invitation.
    pub owner_name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wire_field_names() {
        let request: InviteRequest = serde_json::from_value(json!({
            "email": "ana@example.com",
            "name": "Ana",
            "link": "https://app.storedesk.app/activate?token=abc",
            "storeName": "Auto Center Sul",
            "ownerName": "Carlos"
        }))
        .unwrap();

        assert_eq!(request.store_name, "Auto Center Sul");
        assert_eq!(request.owner_name, "Carlos");
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result = serde_json::from_value::<InviteRequest>(json!({
            "email": "ana@example.com",
            "name": "Ana"
        }));
        assert!(result.is_err());
    }
}
