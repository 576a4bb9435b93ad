use rstest::fixture;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod test_app;
pub use self::test_app::*;

mod client;
pub use self::client::*;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("booking_api=debug,booking_harness=debug,info"));
    // every test calls this, only the first install succeeds
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();

    debug!("tracing ready");
}

#[fixture]
pub async fn app() -> TestApp {
    init_tracing();
    TestApp::start()
        .await
        .unwrap_or_else(|error| panic!("booking-api did not start: {error:?}"))
}
