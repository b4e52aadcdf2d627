//! Print the OpenAPI document as JSON.

use std::io::{self, Write as _};

use binder::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> io::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(|e| io::Error::other(format!("failed to serialise OpenAPI document: {e}")))?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")
}
