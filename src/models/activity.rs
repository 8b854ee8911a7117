//! Activity entries recorded against a service request.

use serde::{Deserialize, Serialize};

/// A time-tracking activity entry on a service request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrActivity {
    /// Id of the user the activity is recorded for.
    pub user_id: String,

    /// Activity start time, epoch milliseconds.
    pub from_time: String,

    /// Activity end time, epoch milliseconds.
    pub to_time: String,

    /// Free-text description of the work done.
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_serializes_with_snake_keys() {
        let activity = SrActivity {
            user_id: "7".to_string(),
            from_time: "1700000000000".to_string(),
            to_time: "1700000360000".to_string(),
            description: "Replaced toner".to_string(),
        };

        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "user_id": "7",
                "from_time": "1700000000000",
                "to_time": "1700000360000",
                "description": "Replaced toner"
            })
        );
    }
}
