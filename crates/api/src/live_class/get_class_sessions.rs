use crate::error::CampusError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campus_scheduler_api_structs::get_class_sessions::{APIResponse, PathParams};
use campus_scheduler_domain::{ClassSession, ID};
use campus_scheduler_infra::CampusContext;

pub async fn get_class_sessions_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<CampusContext>,
) -> Result<HttpResponse, CampusError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = GetClassSessionsUseCase {
        live_class_id: path_params.live_class_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.sessions)))
        .map_err(CampusError::from)
}

/// Upcoming sessions of a class, used by listings. The free/paid label on
/// each session was fixed at generation time.
#[derive(Debug)]
struct GetClassSessionsUseCase {
    pub live_class_id: ID,
}

#[derive(Debug)]
enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for CampusError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(live_class_id) => Self::NotFound(format!(
                "The live class with id: {}, was not found.",
                live_class_id
            )),
        }
    }
}

#[derive(Debug)]
struct UseCaseRes {
    pub sessions: Vec<ClassSession>,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetClassSessionsUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "GetClassSessions";

    async fn execute(&mut self, ctx: &CampusContext) -> Result<Self::Response, Self::Error> {
        let live_class = ctx
            .repos
            .live_classes
            .find(&self.live_class_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.live_class_id.clone()))?;

        let sessions = ctx
            .repos
            .class_sessions
            .find_future_by_class(&live_class.id, ctx.sys.get_timestamp_millis())
            .await;

        Ok(UseCaseRes { sessions })
    }
}
