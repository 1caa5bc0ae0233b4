use crate::dtos::ClassSessionDTO;
use campus_scheduler_domain::{ClassSession, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session: ClassSessionDTO,
}

impl SessionResponse {
    pub fn new(session: ClassSession) -> Self {
        Self {
            session: ClassSessionDTO::new(session),
        }
    }
}

pub mod update_session_status {
    use super::*;
    use campus_scheduler_domain::SessionStatus;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub session_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub status: SessionStatus,
    }

    pub type APIResponse = SessionResponse;
}
