//! Payload of `GET /api/admin/rentals/verifications/{bookingId}/approve`

use crate::booking::Booking;
use crate::charges::StoredChargeRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything the admin review needs for one booking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReview {
    pub booking: Booking,
    /// Persisted charge computation, if the backend already ran one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges: Option<StoredChargeRecord>,
    /// AI document verification result, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_verification: Option<Value>,
}

impl VerificationReview {
    /// Stored record, if present and carrying at least one non-zero value
    pub fn stored_charges(&self) -> Option<&StoredChargeRecord> {
        self.charges.as_ref().filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stored_record_is_ignored() {
        let json = r#"{
            "booking": { "id": "bk_1" },
            "charges": { "mileageCharge": 0, "totalCharges": 0 },
            "aiVerification": { "score": 92 }
        }"#;
        let review: VerificationReview = serde_json::from_str(json).unwrap();
        assert!(review.charges.is_some());
        assert!(review.stored_charges().is_none());
        assert_eq!(review.ai_verification.unwrap()["score"], 92);
    }
}
