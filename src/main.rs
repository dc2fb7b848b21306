//! `formed` entrypoint.
//!
//! USAGE
//!   formed <mode> [flags]
//!
//! MODES
//!   query        Create a query api for the backend
//!   openapi      Print the OpenAPI document of the query api

use anyhow::Context;
use clap::Parser;
use formed::app::server;
use formed::infra::config::{Cli, Command, QueryConfig};
use formed::infra::logging;
use formed::transport::http::ApiDoc;
use utoipa::OpenApi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    match Cli::parse().command {
        Command::Query(args) => {
            let config = QueryConfig::try_from(args).context("invalid query flags")?;
            logging::init(config.debug);
            server::run_query(config).await
        }
        Command::Openapi => {
            println!("{}", ApiDoc::openapi().to_pretty_json()?);
            Ok(())
        }
    }
}
