//! brain-service: simulates variable-cost work on `/think`, exposes `/metrics`.

use std::process::ExitCode;

use organism_service::{organs::OrganKind, server};

#[tokio::main]
async fn main() -> ExitCode {
    server::launch(OrganKind::Brain).await
}
