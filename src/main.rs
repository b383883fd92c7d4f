use blockwatch::daemon::Daemon;
use blockwatch::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("daemon") => {
            Daemon::run().await
        }
        Some("status") => {
            blockwatch::cli::status()
        }
        Some("enable") => {
            blockwatch::cli::set_enabled(args.get(2).map(|s| s.as_str()), true)
        }
        Some("disable") => {
            blockwatch::cli::set_enabled(args.get(2).map(|s| s.as_str()), false)
        }
        _ => {
            eprintln!("Usage: blockwatch <daemon|status|enable|disable>");
            std::process::exit(1);
        }
    }
}
