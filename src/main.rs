//! This is the main entry point for mend.

fn main() {
    #[cfg(debug_assertions)]
    {
        tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::INFO)
                .finish(),
        )
        .unwrap();
    }

    if let Err(e) = mend::cli::parse(None) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
