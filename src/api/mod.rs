// API layer - HTTP endpoints
pub mod accounts;
pub mod dashboard;
pub mod health;
pub mod helpers;

use std::sync::Arc;

use poem::Route;
use poem_openapi::OpenApiService;

pub use accounts::AccountsApi;
pub use dashboard::DashboardApi;
pub use health::HealthApi;

use crate::app_data::AppData;

/// Build the OpenAPI service for every endpoint group
pub fn api_service(
    app_data: &AppData,
) -> OpenApiService<(HealthApi, AccountsApi, DashboardApi), ()> {
    let accounts_api = AccountsApi::new(
        Arc::clone(&app_data.account_service),
        Arc::clone(&app_data.auth_service),
    );
    let dashboard_api = DashboardApi::new(
        Arc::clone(&app_data.account_service),
        Arc::clone(&app_data.auth_service),
        Arc::clone(&app_data.dashboard_service),
        Arc::clone(&app_data.activity_logger),
    );

    OpenApiService::new(
        (HealthApi, accounts_api, dashboard_api),
        "Savanna County Recruitment API",
        env!("CARGO_PKG_VERSION"),
    )
}

/// Routes served by the HTTP server: the API at the root, Swagger UI at /swagger
pub fn build_routes(app_data: &AppData, public_url: &str) -> Route {
    let api_service = api_service(app_data).server(public_url);
    let ui = api_service.swagger_ui();

    Route::new().nest("/swagger", ui).nest("/", api_service)
}
