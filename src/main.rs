use clap::Parser;
use twisted_soul::{Config, initialize_rocket, setup_tracing};

#[rocket::main]
async fn main() {
    let config = Config::parse();
    setup_tracing(config.log_level);

    let rocket = initialize_rocket(config).unwrap_or_else(|e| {
        eprintln!("Failed to initialize service: {e}");
        std::process::exit(1);
    });

    if let Err(e) = rocket.launch().await {
        eprintln!("Service stopped with error: {e}");
        std::process::exit(1);
    }
}
