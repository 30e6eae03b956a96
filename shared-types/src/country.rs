use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A dialing code offered in the phone input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct Country {
    pub code: String,
    pub iso: String,
    pub flag: String,
    pub name: String,
}

const COUNTRIES: &[(&str, &str, &str, &str)] = &[
    ("+1", "US", "🇺🇸", "United States"),
    ("+44", "GB", "🇬🇧", "United Kingdom"),
    ("+91", "IN", "🇮🇳", "India"),
    ("+52", "MX", "🇲🇽", "Mexico"),
    ("+55", "BR", "🇧🇷", "Brazil"),
    ("+49", "DE", "🇩🇪", "Germany"),
    ("+33", "FR", "🇫🇷", "France"),
    ("+81", "JP", "🇯🇵", "Japan"),
    ("+86", "CN", "🇨🇳", "China"),
    ("+61", "AU", "🇦🇺", "Australia"),
];

pub fn supported_countries() -> Vec<Country> {
    COUNTRIES
        .iter()
        .map(|(code, iso, flag, name)| Country {
            code: code.to_string(),
            iso: iso.to_string(),
            flag: flag.to_string(),
            name: name.to_string(),
        })
        .collect()
}

/// Look up a country by dialing code, e.g. `"+44"`
pub fn find_country(code: &str) -> Option<Country> {
    supported_countries().into_iter().find(|c| c.code == code)
}
