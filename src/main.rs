use std::env;
use std::sync::Arc;

use taxibe::config::Config;
use taxibe::engine::Engine;
use taxibe::external::geocoding::NominatimGeocoder;
use taxibe::external::push::PushGateway;
use taxibe::external::routing::OsrmRouting;
use taxibe::notify::{LogNotifier, Notifier};
use taxibe::server::serve;
use taxibe::store::MemoryStore;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().unwrap();

    let notifier: Arc<dyn Notifier> = if env::var("PUSH_API_BASE").is_ok() {
        Arc::new(PushGateway::default())
    } else {
        Arc::new(LogNotifier::default())
    };

    let engine = Engine::new(
        Arc::new(MemoryStore::new()),
        Arc::new(OsrmRouting::default()),
        Arc::new(NominatimGeocoder::default()),
        notifier,
        config,
    );

    serve(engine).await;
}
