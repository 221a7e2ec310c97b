use clap::Parser;

use normalis::cli::{Options, run};

fn main() {
    let options = match Options::try_parse() {
        Ok(options) => options,
        Err(error) => {
            // clap renders help and version requests as "errors"; they are
            // the only ones that exit cleanly.
            let requested = matches!(
                error.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            );
            let _ = error.print();
            std::process::exit(i32::from(!requested));
        }
    };

    // Default: WARN for everything. --verbose raises this crate to INFO.
    // Override with the RUST_LOG env var (e.g. RUST_LOG=normalis=debug).
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
    if options.verbose {
        env_filter = env_filter.add_directive("normalis=info".parse().unwrap_or_default());
    }
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(&options) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
