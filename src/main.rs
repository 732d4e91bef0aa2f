fn main() {
    env_logger::init();
    if let Err(err) = paper_mindmap::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
