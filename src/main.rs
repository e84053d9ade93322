fn main() {
    if let Err(err) = olympic_attendance::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
