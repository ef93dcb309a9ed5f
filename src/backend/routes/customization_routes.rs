/**
 * Customization Route Handlers
 *
 * # Routes
 *
 * ## Tenant
 * - `GET  /customizations/{id}` - read a record
 * - `PUT  /customizations/{id}` - upsert a record
 * - `POST /customizations/request-unlock` - ask for an unlock
 * - `POST /customizations/lock` - lock (also the administrator force-lock)
 * - `POST /customizations/upload-logo` - multipart logo upload
 * - `GET  /uploads/{name}` - uploaded files
 *
 * ## Routing
 * - `GET  /company/{id}` - a company's routing domain
 * - `GET  /companies/domain/{domain}` - the company id for a domain
 *
 * ## Administrator
 * - `POST /customizations/unlock` - grant a pending unlock request
 * - `POST /company` - register a routing domain
 */

use axum::routing::{get, post};
use axum::Router;

use crate::backend::customization::handlers::{
    company_by_domain, get_company, get_customization, grant_unlock, lock, put_customization,
    register_company, request_unlock, serve_upload, upload_logo,
};
use crate::backend::server::state::AppState;

/// Add the tenant-facing customization routes
pub fn configure_customization_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/customizations/{company_id}",
            get(get_customization).put(put_customization),
        )
        .route("/customizations/request-unlock", post(request_unlock))
        .route("/customizations/lock", post(lock))
        .route("/customizations/upload-logo", post(upload_logo))
        .route("/uploads/{name}", get(serve_upload))
        .route("/company/{company_id}", get(get_company))
        .route("/companies/domain/{domain}", get(company_by_domain))
}

/// Add the administrator routes
pub fn configure_admin_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/customizations/unlock", post(grant_unlock))
        .route("/company", post(register_company))
}
