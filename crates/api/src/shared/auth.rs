use crate::error::CampusError;
use actix_web::HttpRequest;
use campus_scheduler_infra::CampusContext;

pub const API_KEY_HEADER: &str = "campus-api-key";

/// Admin and trigger routes are called by the platform backend and the
/// periodic trigger, both of which carry a shared secret in the
/// `campus-api-key` header.
pub fn protect_admin_route(http_req: &HttpRequest, ctx: &CampusContext) -> Result<(), CampusError> {
    let api_key = match http_req.headers().get(API_KEY_HEADER) {
        Some(api_key) => match api_key.to_str() {
            Ok(api_key) => api_key,
            Err(_) => {
                return Err(CampusError::Unauthorized(format!(
                    "Malformed `{}` header provided",
                    API_KEY_HEADER
                )))
            }
        },
        None => {
            return Err(CampusError::Unauthorized(format!(
                "Missing `{}` header",
                API_KEY_HEADER
            )))
        }
    };

    if api_key != ctx.config.api_secret_code {
        return Err(CampusError::Unauthorized(
            "Invalid api key provided".into(),
        ));
    }

    Ok(())
}
