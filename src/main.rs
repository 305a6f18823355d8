//! EnviroSage command-line entrypoint.

use envirosage::run;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        envirosage::ui::messages::error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
