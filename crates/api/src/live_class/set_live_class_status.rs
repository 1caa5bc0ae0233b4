use crate::error::CampusError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campus_scheduler_api_structs::set_live_class_status::{APIResponse, PathParams, RequestBody};
use campus_scheduler_domain::{LiveClass, ID};
use campus_scheduler_infra::CampusContext;

pub async fn set_live_class_status_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<CampusContext>,
) -> Result<HttpResponse, CampusError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = SetLiveClassStatusUseCase {
        live_class_id: path_params.live_class_id.clone(),
        is_active: body.0.is_active,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.live_class)))
        .map_err(CampusError::from)
}

/// Toggles whether a class takes part in schedule extension and reminder
/// scanning. The existing calendar is left untouched.
#[derive(Debug)]
struct SetLiveClassStatusUseCase {
    pub live_class_id: ID,
    pub is_active: bool,
}

#[derive(Debug)]
enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for CampusError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(live_class_id) => Self::NotFound(format!(
                "The live class with id: {}, was not found.",
                live_class_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[derive(Debug)]
struct UseCaseRes {
    pub live_class: LiveClass,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetLiveClassStatusUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "SetLiveClassStatus";

    async fn execute(&mut self, ctx: &CampusContext) -> Result<Self::Response, Self::Error> {
        let mut live_class = ctx
            .repos
            .live_classes
            .find(&self.live_class_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.live_class_id.clone()))?;

        live_class.is_active = self.is_active;
        ctx.repos
            .live_classes
            .save(&live_class)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseRes { live_class })
    }
}
