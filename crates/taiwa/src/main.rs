use taiwa::cli::{self, ux};

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        ux::present_error(e);
        std::process::exit(1);
    }
}
