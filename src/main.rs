use std::env;

use dokkan_calc::cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let code = cli::run_with_args(&args).await;
    std::process::exit(code);
}
