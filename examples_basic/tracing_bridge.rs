use fieldlog::init::init_tracing;
use fieldlog::{fields, Config};
use tracing::{error, info};

fn main() {
    let logger = Config::from_env().build().with(fields! {
        "hostname" => "staging-1",
        "appname" => "foo-app",
    });
    if let Err(e) = init_tracing(logger) {
        eprintln!("failed to install subscriber: {}", e);
        return;
    }

    info!("starting service");

    error!(
        user_id = 42,
        reason = "invalid password",
        "authentication failed"
    );
}
