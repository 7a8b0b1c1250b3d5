use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// The aggregated OpenAPI document for every module's REST surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Abacus",
        description = "Calculator backend: stateless evaluation, persisted calculations, accounts",
        version = "0.1.0",
    ),
    paths(
        accounts::api::rest::handlers::register,
        accounts::api::rest::handlers::login,
        accounts::api::rest::handlers::me,
        calculator::api::rest::handlers::calculate,
        calculator::api::rest::handlers::list_operations,
        calculator::api::rest::handlers::create_calculation,
        calculator::api::rest::handlers::list_calculations,
        calculator::api::rest::handlers::get_calculation,
        calculator::api::rest::handlers::update_calculation,
        calculator::api::rest::handlers::delete_calculation,
    ),
    components(schemas(
        api_problem::Problem,
        api_problem::ValidationViolation,
        accounts::api::rest::dto::RegisterRequest,
        accounts::api::rest::dto::LoginRequest,
        accounts::api::rest::dto::UserDto,
        accounts::api::rest::dto::TokenDto,
        calculator::api::rest::dto::CalculationDto,
        calculator::api::rest::dto::CreateCalculationRequest,
        calculator::api::rest::dto::PatchCalculationRequest,
        calculator::api::rest::dto::CalculateResponse,
        calculator::api::rest::dto::OperationsResponse,
    )),
    modifiers(&BearerTokenAddon),
    tags(
        (name = "Accounts", description = "Registration and login"),
        (name = "Calculator", description = "Stateless evaluation"),
        (name = "Calculations", description = "Persisted calculation records"),
    ),
)]
pub struct ApiDoc;

struct BearerTokenAddon;

impl Modify for BearerTokenAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
