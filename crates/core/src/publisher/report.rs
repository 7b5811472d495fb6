//! Console report.

use cotizador_market_data::format_amount;

use crate::calculator::SettlementResult;

/// One line of the advertisement block: `final_rate + offset` for a band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceTier {
    pub offset: i64,
    pub label: &'static str,
}

impl PriceTier {
    const fn new(offset: i64, label: &'static str) -> Self {
        Self { offset, label }
    }

    pub fn render(&self, final_rate: i64) -> String {
        format!("{} {}", final_rate + self.offset, self.label)
    }
}

const BINANCE_TIERS: &[PriceTier] = &[
    PriceTier::new(4, "menos de 600 USD Binance"),
    PriceTier::new(5, "mas de 600 USD Binance"),
];

pub const PAYONEER_TIERS: &[PriceTier] = &[
    PriceTier::new(0, "menos de 400 USD Payoneer"),
    PriceTier::new(1, "entre 400 y 800 USD Payoneer"),
    PriceTier::new(2, "mas de 800 USD Payoneer"),
];

const WISE_TIERS: &[PriceTier] = &[
    PriceTier::new(2, "menos de 400 USD Wise/TransferWise"),
    PriceTier::new(3, "entre 400 y 800 USD Wise/TransferWise"),
    PriceTier::new(4, "mas de 800 USD Wise/TransferWise"),
];

/// Tier groups in display order.
pub const PRICE_TIER_GROUPS: &[&[PriceTier]] = &[BINANCE_TIERS, PAYONEER_TIERS, WISE_TIERS];

const AD_HEADER: [&str; 3] = [
    "Estamos cambiando como minimo 150 usd.",
    "Te paso la ultima cotización del día! . Trabajamos también los fines de semana, 24 HS disponibles!",
    "También compramos saldo BINANCE! ",
];

/// Render the run summary followed by the advertisement block.
///
/// With `only_payoneer` the block lists the Payoneer tiers alone.
pub fn render_report(result: &SettlementResult, only_payoneer: bool) -> Vec<String> {
    let mut lines = vec![
        format!("Dolar Blue Venta: {}", format_amount(result.blue_sell)),
        format!("Dolar Blue Compra: {}", format_amount(result.blue_buy)),
        format!(
            "COTIZACION MAS ALTA BINANCE: {}",
            format_amount(result.market_high)
        ),
        format!(
            "COTIZACION MAS BAJA BINANCE: {}",
            format_amount(result.market_low)
        ),
        format!(
            "Valor real que me queda por Wise/Payoneer: {}",
            format_amount(result.real_value)
        ),
        format!(
            "COTIZACION FINAL CON COMISION (APLICADA A LA MAS BAJA): {}",
            result.final_rate
        ),
        String::new(),
    ];
    lines.extend(AD_HEADER.iter().map(|line| line.to_string()));

    let groups: &[&[PriceTier]] = if only_payoneer {
        &[PAYONEER_TIERS]
    } else {
        PRICE_TIER_GROUPS
    };
    for group in groups {
        lines.push(String::new());
        lines.extend(group.iter().map(|tier| tier.render(result.final_rate)));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settlement() -> SettlementResult {
        SettlementResult {
            blue_buy: 1480.0,
            blue_sell: 1500.0,
            market_low: 1490.0,
            market_high: 1505.0,
            real_value: 1437.6,
            final_rate: 1296,
        }
    }

    #[test]
    fn test_summary_lines() {
        let lines = render_report(&settlement(), false);

        assert_eq!(
            &lines[..6],
            &[
                "Dolar Blue Venta: 1500",
                "Dolar Blue Compra: 1480",
                "COTIZACION MAS ALTA BINANCE: 1505",
                "COTIZACION MAS BAJA BINANCE: 1490",
                "Valor real que me queda por Wise/Payoneer: 1437.60",
                "COTIZACION FINAL CON COMISION (APLICADA A LA MAS BAJA): 1296",
            ]
        );
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "Estamos cambiando como minimo 150 usd.");
    }

    #[test]
    fn test_full_tier_block() {
        let lines = render_report(&settlement(), false);
        let block = &lines[10..];

        assert_eq!(
            block,
            &[
                "",
                "1300 menos de 600 USD Binance",
                "1301 mas de 600 USD Binance",
                "",
                "1296 menos de 400 USD Payoneer",
                "1297 entre 400 y 800 USD Payoneer",
                "1298 mas de 800 USD Payoneer",
                "",
                "1298 menos de 400 USD Wise/TransferWise",
                "1299 entre 400 y 800 USD Wise/TransferWise",
                "1300 mas de 800 USD Wise/TransferWise",
            ]
        );
    }

    #[test]
    fn test_only_payoneer_block() {
        let lines = render_report(&settlement(), true);
        let block = &lines[10..];

        assert_eq!(
            block,
            &[
                "",
                "1296 menos de 400 USD Payoneer",
                "1297 entre 400 y 800 USD Payoneer",
                "1298 mas de 800 USD Payoneer",
            ]
        );
    }
}
