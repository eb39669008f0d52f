//! Kegel Helper main entrypoint.

use kegel_helper::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
