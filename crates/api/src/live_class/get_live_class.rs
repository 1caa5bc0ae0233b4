use crate::error::CampusError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campus_scheduler_api_structs::get_live_class::{APIResponse, PathParams};
use campus_scheduler_domain::{LiveClass, ID};
use campus_scheduler_infra::CampusContext;

pub async fn get_live_class_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<CampusContext>,
) -> Result<HttpResponse, CampusError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = GetLiveClassUseCase {
        live_class_id: path_params.live_class_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|live_class| HttpResponse::Ok().json(APIResponse::new(live_class)))
        .map_err(CampusError::from)
}

#[derive(Debug)]
struct GetLiveClassUseCase {
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

#[async_trait::async_trait(?Send)]
impl UseCase for GetLiveClassUseCase {
    type Response = LiveClass;

    type Error = UseCaseError;

    const NAME: &'static str = "GetLiveClass";

    async fn execute(&mut self, ctx: &CampusContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .live_classes
            .find(&self.live_class_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.live_class_id.clone()))
    }
}
