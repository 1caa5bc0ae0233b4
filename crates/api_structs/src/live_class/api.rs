use crate::dtos::{ClassSessionDTO, LiveClassDTO};
use campus_scheduler_domain::{ClassSession, LiveClass, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveClassResponse {
    pub live_class: LiveClassDTO,
}

impl LiveClassResponse {
    pub fn new(live_class: LiveClass) -> Self {
        Self {
            live_class: LiveClassDTO::new(live_class),
        }
    }
}

pub mod create_live_class {
    use super::*;
    use campus_scheduler_domain::ContentSourceRef;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub content_source: ContentSourceRef,
    }

    pub type APIResponse = LiveClassResponse;
}

pub mod get_live_class {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub live_class_id: ID,
    }

    pub type APIResponse = LiveClassResponse;
}

pub mod set_live_class_status {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub live_class_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub is_active: bool,
    }

    pub type APIResponse = LiveClassResponse;
}

pub mod get_class_sessions {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub live_class_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    pub struct APIResponse {
        pub sessions: Vec<ClassSessionDTO>,
    }

    impl APIResponse {
        pub fn new(sessions: Vec<ClassSession>) -> Self {
            Self {
                sessions: sessions.into_iter().map(ClassSessionDTO::new).collect(),
            }
        }
    }
}
