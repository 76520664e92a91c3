//! local-connector: scan or watch local files and stream lifecycle events

use anyhow::Result;

fn main() -> Result<()> {
    local_connector::cli::run()
}
