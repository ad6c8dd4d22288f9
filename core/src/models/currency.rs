use std::fmt;

use serde::{Deserialize, Serialize};

/// Fiat currencies quoted by the price feed.
///
/// Per-currency attributes live in [`CURRENCY_TABLE`]; adding a currency means
/// adding a variant and a table row, never a new match arm elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
    Aud,
    Chf,
}

/// Static attributes of a [`Currency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub currency: Currency,
    /// Lowercase feed identifier (e.g. `"usd"`).
    pub code: &'static str,
    /// Display symbol.
    pub symbol: &'static str,
    /// Numeric id used by the chart provider's `convertId` parameter.
    pub chart_id: u32,
}

pub const CURRENCY_TABLE: [CurrencyInfo; 7] = [
    CurrencyInfo {
        currency: Currency::Usd,
        code: "usd",
        symbol: "$",
        chart_id: 2781,
    },
    CurrencyInfo {
        currency: Currency::Eur,
        code: "eur",
        symbol: "€",
        chart_id: 2790,
    },
    CurrencyInfo {
        currency: Currency::Gbp,
        code: "gbp",
        symbol: "£",
        chart_id: 2791,
    },
    CurrencyInfo {
        currency: Currency::Jpy,
        code: "jpy",
        symbol: "¥",
        chart_id: 2797,
    },
    CurrencyInfo {
        currency: Currency::Cad,
        code: "cad",
        symbol: "CA$",
        chart_id: 2784,
    },
    CurrencyInfo {
        currency: Currency::Aud,
        code: "aud",
        symbol: "A$",
        chart_id: 2782,
    },
    CurrencyInfo {
        currency: Currency::Chf,
        code: "chf",
        symbol: "CHF",
        chart_id: 2785,
    },
];

impl Currency {
    /// Currency every cross rate is computed against.
    pub const BASE: Currency = Currency::Usd;

    pub const ALL: [Currency; 7] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Cad,
        Currency::Aud,
        Currency::Chf,
    ];

    pub fn info(self) -> &'static CurrencyInfo {
        // Table rows are declared in variant order.
        &CURRENCY_TABLE[self as usize]
    }

    pub fn code(self) -> &'static str {
        self.info().code
    }

    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    pub fn chart_id(self) -> u32 {
        self.info().chart_id
    }

    pub fn is_base(self) -> bool {
        self == Self::BASE
    }

    /// Resolves a feed code, ignoring ASCII case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Currency> {
        let code = code.trim();
        CURRENCY_TABLE
            .iter()
            .find(|row| row.code.eq_ignore_ascii_case(code))
            .map(|row| row.currency)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
