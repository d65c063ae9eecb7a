fn main() {
    if let Err(e) = bathroom_scene::core::Engine::run() {
        eprintln!("Scene failed to start: {}", e);
        std::process::exit(1);
    }
}
