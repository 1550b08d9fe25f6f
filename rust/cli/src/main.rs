use std::io;

fn main() {
    // logs are opt-in so command output stays clean
    if std::env::var_os("RUST_LOG").is_some() {
        let json = std::env::var("FELT_LOG_FORMAT").is_ok_and(|v| v == "json");
        if let Err(e) = felt_runtime::logging::init_logging(json) {
            eprintln!("WARNING: logging disabled: {}", e);
        }
    }
    let code = felt_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
