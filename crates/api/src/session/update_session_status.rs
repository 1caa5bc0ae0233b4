use crate::error::CampusError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campus_scheduler_api_structs::update_session_status::{APIResponse, PathParams, RequestBody};
use campus_scheduler_domain::{ClassSession, SessionStatus, ID};
use campus_scheduler_infra::CampusContext;

pub async fn update_session_status_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<CampusContext>,
) -> Result<HttpResponse, CampusError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = UpdateSessionStatusUseCase {
        session_id: path_params.session_id.clone(),
        status: body.0.status,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.session)))
        .map_err(CampusError::from)
}

/// Moves a session through its lifecycle when the platform starts,
/// completes or cancels it. The scanner itself never mutates sessions.
#[derive(Debug)]
struct UpdateSessionStatusUseCase {
    pub session_id: ID,
    pub status: SessionStatus,
}

#[derive(Debug)]
enum UseCaseError {
    NotFound(ID),
    InvalidTransition(SessionStatus, SessionStatus),
    StorageError,
}

impl From<UseCaseError> for CampusError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(session_id) => Self::NotFound(format!(
                "The class session with id: {}, was not found.",
                session_id
            )),
            UseCaseError::InvalidTransition(from, to) => Self::Conflict(format!(
                "A session with status: {}, cannot move to status: {}.",
                from, to
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[derive(Debug)]
struct UseCaseRes {
    pub session: ClassSession,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateSessionStatusUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateSessionStatus";

    async fn execute(&mut self, ctx: &CampusContext) -> Result<Self::Response, Self::Error> {
        let mut session = ctx
            .repos
            .class_sessions
            .find(&self.session_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.session_id.clone()))?;

        if !session.status.can_transition_to(&self.status) {
            return Err(UseCaseError::InvalidTransition(session.status, self.status));
        }

        session.status = self.status;
        ctx.repos
            .class_sessions
            .save(&session)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseRes { session })
    }
}
