//! Full run against mocked blue-rate, P2P and form endpoints.

use std::collections::HashMap;
use std::time::Duration;

use cotizador_core::{render_report, Config, Error, QuoteService, QuoteServiceTrait};
use cotizador_market_data::MarketDataError;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BLUE_PAGE: &str = r#"<html><body>
<a class="title">Dólar oficial</a>
<div class="compra"><div class="val">$900</div></div>
<div class="venta"><div class="val">$950</div></div>
<a class="title">Dólar blue</a>
<div class="values">
  <div class="compra"><div class="topic">Compra</div><div class="val">$1.480,00</div></div>
  <div class="venta"><div class="topic">Venta</div><div class="val">$1.500,00</div></div>
</div>
</body></html>"#;

fn offers_body(prices: &[&str]) -> serde_json::Value {
    let data: Vec<_> = prices
        .iter()
        .map(|price| json!({ "adv": { "price": price } }))
        .collect();
    json!({ "code": "000000", "data": data })
}

fn config(server: &MockServer, diagnostics: &std::path::Path, with_form: bool) -> Config {
    let mut vars = HashMap::from([
        ("COTIZADOR_BLUE_URLS", format!("{}/missing,{}/blue", server.uri(), server.uri())),
        ("COTIZADOR_P2P_URL", format!("{}/p2p", server.uri())),
        ("COTIZADOR_COMMISSION_RATE", "0.87".to_string()),
        ("COTIZADOR_MAX_ATTEMPTS", "1".to_string()),
        ("COTIZADOR_BACKOFF_MS", "0".to_string()),
        ("COTIZADOR_TIMEOUT_SECS", "5".to_string()),
        ("COTIZADOR_DIAGNOSTICS_DIR", diagnostics.display().to_string()),
    ]);
    if with_form {
        vars.insert("COTIZADOR_FORM_URL", format!("{}/form", server.uri()));
    }
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

async fn mount_blue(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blue"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BLUE_PAGE))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_pipeline_computes_and_publishes() {
    let server = MockServer::start().await;
    let diagnostics = tempfile::tempdir().unwrap();
    mount_blue(&server).await;
    Mock::given(method("POST"))
        .and(path("/p2p"))
        .and(body_string_contains("\"tradeType\":\"SELL\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(offers_body(&["1495.00", "1490.00", "1505.00", "1500.00"])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/form"))
        .and(body_string_contains("cotizacion_final=1296"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server, diagnostics.path(), true);
    let service = QuoteService::from_config(&config).unwrap();
    let result = service.run().await.unwrap();
    service.publish(&result).await;

    assert_eq!(result.blue_buy, 1480.0);
    assert_eq!(result.blue_sell, 1500.0);
    assert_eq!(result.market_low, 1490.0);
    assert_eq!(result.market_high, 1505.0);
    assert_eq!(result.real_value, 1437.6);
    assert_eq!(result.final_rate, 1296);

    let report = render_report(&result, config.only_payoneer);
    assert_eq!(report[0], "Dolar Blue Venta: 1500");
    assert_eq!(report[5], "COTIZACION FINAL CON COMISION (APLICADA A LA MAS BAJA): 1296");
}

#[tokio::test]
async fn test_pipeline_survives_form_failure() {
    let server = MockServer::start().await;
    let diagnostics = tempfile::tempdir().unwrap();
    mount_blue(&server).await;
    Mock::given(method("POST"))
        .and(path("/p2p"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offers_body(&["1500"])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/form"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = QuoteService::from_config(&config(&server, diagnostics.path(), true)).unwrap();
    let result = service.run().await.unwrap();
    service.publish(&result).await;

    assert_eq!(result.final_rate, 1305);
}

#[tokio::test]
async fn test_pipeline_result_ready_before_slow_form() {
    let server = MockServer::start().await;
    let diagnostics = tempfile::tempdir().unwrap();
    mount_blue(&server).await;
    Mock::given(method("POST"))
        .and(path("/p2p"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offers_body(&["1500"])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/form"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .expect(0)
        .mount(&server)
        .await;

    let service = QuoteService::from_config(&config(&server, diagnostics.path(), true)).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(3), service.run())
        .await
        .expect("run must return before the form is contacted")
        .unwrap();

    let report = render_report(&result, false);
    assert_eq!(report[5], "COTIZACION FINAL CON COMISION (APLICADA A LA MAS BAJA): 1305");
}

#[tokio::test]
async fn test_pipeline_empty_market_writes_diagnostic() {
    let server = MockServer::start().await;
    let diagnostics = tempfile::tempdir().unwrap();
    mount_blue(&server).await;
    Mock::given(method("POST"))
        .and(path("/p2p"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let service = QuoteService::from_config(&config(&server, diagnostics.path(), false)).unwrap();
    let err = service.run().await.unwrap_err();

    assert!(matches!(err, Error::MarketData(MarketDataError::EmptyMarket)));
    assert!(diagnostics.path().join("p2p_empty_market.json").exists());
}
