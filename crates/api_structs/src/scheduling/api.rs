use serde::{Deserialize, Serialize};

pub mod extend_schedules {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub classes_extended: usize,
        pub classes_skipped: usize,
        pub classes_failed: usize,
        pub sessions_created: usize,
    }
}

pub mod scan_reminders {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub sessions_inspected: usize,
        pub reminders_sent: usize,
        pub send_failures: usize,
    }
}
