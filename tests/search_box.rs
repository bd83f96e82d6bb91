//! Search box against a real server on a loopback port.

use std::{sync::Arc, time::Duration};

use tokio::{net::TcpListener, time::sleep};
use worth_it::{
    config::{Config, DatastoreConfig},
    gateway::memory::MemoryGateway,
    routes::router,
    state::State,
    widget::{
        Event, Key,
        client::{HttpSuggestionClient, SuggestionClient},
        driver::SearchBoxDriver,
    },
};

const FIXTURES: &str = include_str!("../fixtures/catalog.json");

async fn serve() -> String {
    let config = Config {
        port: 0,
        site_url: "http://localhost".to_string(),
        revalidate_secs: 3600,
        datastore: DatastoreConfig::Fixtures("fixtures/catalog.json".into()),
    };
    let gateway = Arc::new(MemoryGateway::from_json(FIXTURES).unwrap());
    let app = router(State::with_gateway(config, gateway));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{address}")
}

#[tokio::test]
async fn suggestions_over_http() {
    let base = serve().await;
    let client = HttpSuggestionClient::new(&base);

    let items = client.suggest("wat").await.unwrap();
    let slugs: Vec<&str> = items.iter().map(|i| i.slug.as_str()).collect();
    assert_eq!(slugs, vec!["wat-pho", "wat-arun"]);

    assert!(client.suggest("w").await.unwrap().is_empty());
    assert!(client.suggest("sky").await.unwrap().is_empty());
}

#[tokio::test]
async fn search_box_end_to_end() {
    let base = serve().await;
    let (driver, mut routes) = SearchBoxDriver::new("", Arc::new(HttpSuggestionClient::new(&base)));

    driver.dispatch(Event::Input("M".into()));
    driver.dispatch(Event::Input("Ma".into()));
    driver.dispatch(Event::Input("Mar".into()));

    let mut waited = Duration::ZERO;
    while !driver.snapshot().is_visible() && waited < Duration::from_secs(5) {
        sleep(Duration::from_millis(50)).await;
        waited += Duration::from_millis(50);
    }

    let state = driver.snapshot();
    assert!(state.is_visible());
    assert_eq!(state.items().len(), 2);
    assert_eq!(state.items()[0].slug, "chatuchak-weekend-market");

    driver.dispatch(Event::Key(Key::Down));
    driver.dispatch(Event::Key(Key::Down));
    driver.dispatch(Event::Key(Key::Down));
    driver.dispatch(Event::Key(Key::Enter));

    assert_eq!(
        routes.recv().await.unwrap(),
        "/is-it-worth-it/damnoen-saduak-floating-market"
    );
}
