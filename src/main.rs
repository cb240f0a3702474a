#[tokio::main]
async fn main() {
    if let Err(e) = unit_converter_lib::run().await {
        eprintln!("FATAL: {}", e);
        std::process::exit(1);
    }
}
