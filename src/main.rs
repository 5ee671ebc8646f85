use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize logging/tracing system
    // Control log level with RUST_LOG env var:
    //   RUST_LOG=debug wtfile <file>
    //   RUST_LOG=wtfile::archive=trace wtfile <file>
    wtfile::logging::init();

    wtfile::cli::run()
}
