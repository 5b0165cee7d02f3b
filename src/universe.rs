// =============================================================================
// Scan universe
// =============================================================================
//
// The universe is a fixed, ordered list of instruments. Order matters: the
// scanner walks it front to back on every pass, so pacing and batch
// boundaries land on the same instruments each time. Symbols must be unique.

use crate::types::Instrument;

/// Default universe: the NSE/BSE watchlist the scanner ships with.
pub fn default_universe() -> Vec<Instrument> {
    [
        ("HDFCBANK", "NSE", "Banking"),
        ("INFY", "NSE", "IT"),
        ("TCS", "NSE", "IT"),
        ("ONGC", "NSE", "Oil & Gas"),
        ("GOLDBEES", "NSE", "ETF"),
        ("ANGELONE", "NSE", "Brokerage"),
        ("SUNPHARMA", "BSE", "Pharma"),
        ("TECHM", "NSE", "IT"),
        ("HINDUNILVR", "BSE", "FMCG"),
        ("BSE", "NSE", "Exchange"),
        ("SILVERBEES", "NSE", "ETF"),
        ("BAJAJ_AUTO", "NSE", "Auto"),
        ("WIPRO", "BSE", "IT"),
        ("BHARTIARTL", "BSE", "Telecom"),
        ("TATAMOTORS", "NSE", "Auto"),
        ("APOLLOTYRE", "NSE", "Auto"),
        ("JSWSTEEL", "NSE", "Steel"),
        ("HINDCOPPER", "BSE", "Metals"),
        ("HAL", "NSE", "Defense"),
        ("TATAPOWER", "NSE", "Power"),
        ("LT", "NSE", "Infra"),
        ("LTF", "NSE", "Finance"),
        ("MAZDOCK", "NSE", "Shipbuilding"),
        ("COCHINSHIP", "BSE", "Shipping"),
        ("MOTHERSON", "BSE", "Auto Parts"),
        ("BAJAJFINSV", "NSE", "Financial"),
        ("CAMS", "BSE", "FinTech"),
        ("TRENT", "BSE", "Retail"),
        ("GPPL", "NSE", "Port"),
        ("NCC", "BSE", "Construction"),
        ("RECLTD", "BSE", "Power Finance"),
        ("CDSL", "NSE", "FinTech"),
        ("MCX", "NSE", "Commodities"),
    ]
    .into_iter()
    .map(|(symbol, venue, sector)| Instrument::new(symbol, venue, sector))
    .collect()
}

/// Parse a `VIGIL_SYMBOLS`-style comma-separated override into a universe.
///
/// Each entry is `SYMBOL` or `SYMBOL:VENUE`; the venue defaults to NSE and
/// the sector label is left empty. Blank entries are ignored, duplicate
/// symbols keep their first occurrence so the universe stays unique.
pub fn parse_universe(csv: &str) -> Vec<Instrument> {
    let mut out: Vec<Instrument> = Vec::new();
    for entry in csv.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (symbol, venue) = match entry.split_once(':') {
            Some((s, v)) => (s.trim().to_uppercase(), v.trim().to_uppercase()),
            None => (entry.to_uppercase(), "NSE".to_string()),
        };
        if out.iter().any(|i| i.symbol == symbol) {
            continue;
        }
        out.push(Instrument::new(symbol, venue, ""));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe_symbols_are_unique() {
        let universe = default_universe();
        let mut symbols: Vec<&str> = universe.iter().map(|i| i.symbol.as_str()).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), universe.len());
    }

    #[test]
    fn default_universe_is_nonempty_and_ordered() {
        let universe = default_universe();
        assert_eq!(universe.len(), 33);
        assert_eq!(universe[0].symbol, "HDFCBANK");
        assert_eq!(universe[32].symbol, "MCX");
    }

    #[test]
    fn parse_universe_accepts_symbol_and_symbol_venue() {
        let parsed = parse_universe("infy, wipro:bse ,,TCS");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].symbol, "INFY");
        assert_eq!(parsed[0].venue, "NSE");
        assert_eq!(parsed[1].symbol, "WIPRO");
        assert_eq!(parsed[1].venue, "BSE");
        assert_eq!(parsed[2].symbol, "TCS");
    }

    #[test]
    fn parse_universe_drops_duplicates() {
        let parsed = parse_universe("INFY,INFY:BSE");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].venue, "NSE");
    }
}
