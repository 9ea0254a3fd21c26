//! services/api/src/bin/openapi.rs
//!
//! Prints the OpenAPI document for the API service as pretty JSON.

use api_lib::web::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), serde_json::Error> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
