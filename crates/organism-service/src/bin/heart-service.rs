//! heart-service: counts beats on `/beat`, exposes `/metrics`.

use std::process::ExitCode;

use organism_service::{organs::OrganKind, server};

#[tokio::main]
async fn main() -> ExitCode {
    server::launch(OrganKind::Heart).await
}
