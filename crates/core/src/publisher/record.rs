use cotizador_market_data::format_amount;
use serde::Serialize;

use crate::calculator::SettlementResult;

/// Flat string-keyed record handed to result sinks.
///
/// Keys are fixed and kept in submission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    fields: Vec<(&'static str, String)>,
}

impl ResultRecord {
    pub const KEYS: [&'static str; 6] = [
        "blue_compra",
        "blue_venta",
        "binance_low",
        "valor_real",
        "cotizacion_final",
        "comision_aplicada",
    ];

    pub fn from_settlement(result: &SettlementResult, commission_rate: f64) -> Self {
        let values = [
            format_amount(result.blue_buy),
            format_amount(result.blue_sell),
            format_amount(result.market_low),
            format_amount(result.real_value),
            format_amount(result.final_rate as f64),
            format_amount(commission_rate),
        ];

        Self {
            fields: Self::KEYS.into_iter().zip(values).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    /// Owned key/value pairs for a url-encoded form body.
    pub fn to_form(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }
}
