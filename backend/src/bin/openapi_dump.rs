//! Print the OpenAPI document as JSON.

use std::io::Write;

use utoipa::OpenApi;
use waitlist::doc::ApiDoc;

fn main() -> std::io::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(std::io::Error::other)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")
}
