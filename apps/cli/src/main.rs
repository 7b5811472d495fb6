mod main_lib;

use cotizador_core::{render_report, Config, QuoteService, QuoteServiceTrait};
use main_lib::{init_tracing, write_report};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing()?;

    let service = QuoteService::from_config(&config)?;
    let result = match service.run().await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Quote run failed: {}", e);
            return Err(e.into());
        }
    };

    let lines = render_report(&result, config.only_payoneer);
    write_report(&mut std::io::stdout().lock(), &lines)?;

    service.publish(&result).await;
    Ok(())
}
