use resup::cli::Cli;

#[tokio::main]
async fn main() {
    // Run the supervision loop and mirror its exit code
    let code = Cli::run().await;
    std::process::exit(code);
}
