use clap::Parser;

fn main() {
    let args = emr_metrics_lib::Args::parse();
    if let Err(e) = emr_metrics_lib::run(args) {
        tracing::error!(error = %e, "Extraction failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
