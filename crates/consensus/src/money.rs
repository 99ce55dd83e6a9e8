//! Monetary units used by relay and fee defaults.

pub type Amount = i64;

pub const COIN: Amount = 100_000_000;

/// Formats an amount in whole coins with eight decimals.
pub fn format_coins(value: Amount) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let coin = COIN.unsigned_abs();
    format!("{sign}{}.{:08}", abs / coin, abs % coin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_fee_rates() {
        assert_eq!(format_coins(1_000), "0.00001000");
        assert_eq!(format_coins(COIN + 5), "1.00000005");
        assert_eq!(format_coins(-COIN), "-1.00000000");
    }
}
