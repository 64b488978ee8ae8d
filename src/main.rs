//! rAttestati main entrypoint.

use rattestati::run;

fn main() {
    colog::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
