fn main() {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start the async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let code = runtime.block_on(keystream::app::startup::startup());

    // A pending stdin read cannot be cancelled; do not wait for it
    runtime.shutdown_background();
    std::process::exit(code);
}
