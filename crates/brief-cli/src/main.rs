//! Brief — replay a message snapshot through the digest engine.

use tracing_subscriber::EnvFilter;

mod replay;

use replay::ReplayArgs;

fn print_usage() {
    println!("Brief — digest ranking and summarization");
    println!();
    println!("Usage: brief <command>");
    println!();
    println!("Commands:");
    println!("  digest <snapshot.json> [--now <rfc3339>] [--config <file>]");
    println!("                           Rank and summarize a snapshot, print the report as JSON");
    println!("  help                     Show this help message");
    println!();
    println!("Environment:");
    println!("  RUST_LOG                 Log filter (default: info), logs go to stderr");
    println!("  BRIEF_*                  Engine config overrides");
}

fn main() -> anyhow::Result<()> {
    // Logs on stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "digest" => {
            let replay = match ReplayArgs::parse(&args[2..]) {
                Ok(replay) => replay,
                Err(e) => {
                    eprintln!("{}", e);
                    eprintln!("Usage: brief digest <snapshot.json> [--now <rfc3339>] [--config <file>]");
                    std::process::exit(1);
                }
            };
            let report = replay::run(&replay)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}. Use 'brief help' for usage.", args[1]);
            std::process::exit(1);
        }
    }
}
