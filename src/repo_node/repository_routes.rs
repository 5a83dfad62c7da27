use super::http_server::AppState;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// List the repositories hosted by this node.
///
/// A node hosts exactly one repository; the listing is still an array so
/// clients discover repositories the same way against bigger servers.
pub async fn list_repositories(state: web::Data<AppState>) -> impl Responder {
    let node = state.node.lock().await;
    HttpResponse::Ok().json(json!({"data": [node.repository_info()]}))
}
