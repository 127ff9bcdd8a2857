fn main() -> Result<(), eframe::Error> {
    // Set up logging, level from RUST_LOG
    env_logger::init();

    gallery_wall::run_app()
}
