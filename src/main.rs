fn main() {
    if let Err(err) = chatstats_lib::run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
