//! Per-symbol descriptive statistics

use super::series::mean_std;
use super::types::SymbolStats;
use crate::feed::Tick;

/// Summarize a tick series; fewer than two ticks gives all zeros
pub fn symbol_stats_from_ticks(ticks: &[Tick]) -> SymbolStats {
    if ticks.len() < 2 {
        return SymbolStats {
            tick_count: ticks.len(),
            ..SymbolStats::default()
        };
    }

    let prices: Vec<f64> = ticks.iter().map(|t| t.price).collect();
    let (mean, std) = mean_std(&prices);
    let high = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let current_price = prices[prices.len() - 1];

    let log_returns: Vec<f64> = prices
        .windows(2)
        .filter(|w| w[0] > 0.0 && w[1] > 0.0)
        .map(|w| (w[1] / w[0]).ln())
        .collect();
    let volatility = mean_std(&log_returns).1 * 100.0;

    let volume: f64 = ticks.iter().map(|t| t.size).sum();
    let vwap = if volume > 0.0 {
        ticks.iter().map(|t| t.price * t.size).sum::<f64>() / volume
    } else {
        current_price
    };

    SymbolStats {
        current_price,
        high,
        low,
        mean,
        std,
        volatility,
        volume,
        vwap,
        tick_count: ticks.len(),
    }
}
