use crate::error::CampusError;
use crate::scheduling::extend_schedules::{extend_class_schedule, ClassExtensionError};
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campus_scheduler_api_structs::create_live_class::{APIResponse, RequestBody};
use campus_scheduler_domain::{ContentSourceRef, LiveClass};
use campus_scheduler_infra::CampusContext;
use tracing::{error, warn};

pub async fn create_live_class_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<CampusContext>,
) -> Result<HttpResponse, CampusError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = CreateLiveClassUseCase {
        content_source: body.0.content_source,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Created().json(APIResponse::new(res.live_class)))
        .map_err(CampusError::from)
}

/// Converts a course or playlist into a live class. The initial calendar
/// is built as part of creation, a class that cannot schedule anything is
/// not kept around.
#[derive(Debug)]
struct CreateLiveClassUseCase {
    pub content_source: ContentSourceRef,
}

#[derive(Debug)]
enum UseCaseError {
    EmptyCatalog,
    StorageError,
}

impl From<UseCaseError> for CampusError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyCatalog => Self::BadClientData(
                "The given content source does not have any items to schedule.".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[derive(Debug)]
struct UseCaseRes {
    pub live_class: LiveClass,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateLiveClassUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateLiveClass";

    async fn execute(&mut self, ctx: &CampusContext) -> Result<Self::Response, Self::Error> {
        let live_class = LiveClass::new(self.content_source.clone());
        ctx.repos
            .live_classes
            .insert(&live_class)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        match extend_class_schedule(&live_class, ctx).await {
            Ok(_) => {
                // The extension advanced the persisted cursor
                let live_class = ctx
                    .repos
                    .live_classes
                    .find(&live_class.id)
                    .await
                    .ok_or(UseCaseError::StorageError)?;
                Ok(UseCaseRes { live_class })
            }
            Err(e) => {
                warn!(
                    "Unable to build the initial calendar for live class {}: {:?}",
                    live_class.id, e
                );
                // Compensation for the failed creation
                if let Err(del_err) = ctx.repos.live_classes.delete(&live_class.id).await {
                    error!(
                        "Unable to remove live class {} after failed initial scheduling: {:?}",
                        live_class.id, del_err
                    );
                }
                Err(match e {
                    ClassExtensionError::EmptyCatalog => UseCaseError::EmptyCatalog,
                    _ => UseCaseError::StorageError,
                })
            }
        }
    }
}
