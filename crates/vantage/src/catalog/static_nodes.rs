//! Compiled-in fallback node table.
//!
//! Used only when both the cache and live discovery tiers come up empty, so
//! catalog resolution can never fail outright. The table mirrors the
//! provider's long-lived permanent nodes and will drift slowly; discovery
//! refreshes it whenever the provider page is reachable.

use std::collections::BTreeMap;

use super::types::NodeRecord;

/// (node id, country, city, region code)
const STATIC_NODES: &[(&str, &str, &str, &str)] = &[
    ("us1.node.check-host.net", "USA", "New York", "us"),
    ("us2.node.check-host.net", "USA", "Los Angeles", "us"),
    ("us3.node.check-host.net", "USA", "Dallas", "us"),
    ("us4.node.check-host.net", "USA", "Miami", "us"),
    ("us5.node.check-host.net", "USA", "Chicago", "us"),
    ("us6.node.check-host.net", "USA", "Seattle", "us"),
    ("us7.node.check-host.net", "USA", "Atlanta", "us"),
    ("us8.node.check-host.net", "USA", "Denver", "us"),
    ("ca1.node.check-host.net", "Canada", "Beauharnois", "ca"),
    ("ca2.node.check-host.net", "Canada", "Toronto", "ca"),
    ("ca3.node.check-host.net", "Canada", "Vancouver", "ca"),
    ("de1.node.check-host.net", "Germany", "Frankfurt", "de"),
    ("de2.node.check-host.net", "Germany", "Nuremberg", "de"),
    ("de3.node.check-host.net", "Germany", "Falkenstein", "de"),
    ("fr1.node.check-host.net", "France", "Strasbourg", "fr"),
    ("fr2.node.check-host.net", "France", "Paris", "fr"),
    ("gb1.node.check-host.net", "Great Britain", "London", "gb"),
    ("gb2.node.check-host.net", "Great Britain", "Manchester", "gb"),
    ("nl1.node.check-host.net", "Netherlands", "Amsterdam", "nl"),
    ("pl1.node.check-host.net", "Poland", "Warsaw", "pl"),
    ("es1.node.check-host.net", "Spain", "Madrid", "es"),
    ("it1.node.check-host.net", "Italy", "Milan", "it"),
    ("ru1.node.check-host.net", "Russia", "Moscow", "ru"),
    ("ru2.node.check-host.net", "Russia", "St. Petersburg", "ru"),
    ("ru3.node.check-host.net", "Russia", "Novosibirsk", "ru"),
    ("ru4.node.check-host.net", "Russia", "Khabarovsk", "ru"),
    ("ua1.node.check-host.net", "Ukraine", "Kyiv", "ua"),
    ("kz1.node.check-host.net", "Kazakhstan", "Almaty", "kz"),
    ("by1.node.check-host.net", "Belarus", "Minsk", "by"),
    ("ir1.node.check-host.net", "Iran", "Tehran", "ir"),
    ("ir3.node.check-host.net", "Iran", "Shiraz", "ir"),
    ("tr1.node.check-host.net", "Turkey", "Istanbul", "tr"),
    ("hk1.node.check-host.net", "Hong Kong", "Hong Kong", "hk"),
    ("sg1.node.check-host.net", "Singapore", "Singapore", "sg"),
    ("jp1.node.check-host.net", "Japan", "Tokyo", "jp"),
    ("md1.node.check-host.net", "Moldova", "Chisinau", "md"),
    ("br1.node.check-host.net", "Brazil", "Sao Paulo", "br"),
    ("au1.node.check-host.net", "Australia", "Sydney", "au"),
    ("ch1.node.check-host.net", "Switzerland", "Zurich", "ch"),
    ("se1.node.check-host.net", "Sweden", "Stockholm", "se"),
    ("fi1.node.check-host.net", "Finland", "Helsinki", "fi"),
    ("cl1.node.check-host.net", "Chile", "Santiago", "cl"),
    ("za1.node.check-host.net", "South Africa", "Johannesburg", "za"),
    ("in1.node.check-host.net", "India", "Mumbai", "in"),
    ("kr1.node.check-host.net", "South Korea", "Seoul", "kr"),
    ("vn1.node.check-host.net", "Vietnam", "Ho Chi Minh", "vn"),
    ("id1.node.check-host.net", "Indonesia", "Jakarta", "id"),
    ("ae1.node.check-host.net", "United Arab Emirates", "Dubai", "ae"),
    ("bg1.node.check-host.net", "Bulgaria", "Sofia", "bg"),
    ("cz1.node.check-host.net", "Czech Republic", "Prague", "cz"),
    ("at1.node.check-host.net", "Austria", "Vienna", "at"),
    ("ro1.node.check-host.net", "Romania", "Bucharest", "ro"),
    ("rs1.node.check-host.net", "Serbia", "Belgrade", "rs"),
    ("lt1.node.check-host.net", "Lithuania", "Vilnius", "lt"),
    ("lv1.node.check-host.net", "Latvia", "Riga", "lv"),
    ("ee1.node.check-host.net", "Estonia", "Tallinn", "ee"),
    ("ge1.node.check-host.net", "Georgia", "Tbilisi", "ge"),
    ("uz1.node.check-host.net", "Uzbekistan", "Tashkent", "uz"),
    ("kg1.node.check-host.net", "Kyrgyzstan", "Bishkek", "kg"),
    ("th1.node.check-host.net", "Thailand", "Bangkok", "th"),
    ("my1.node.check-host.net", "Malaysia", "Kuala Lumpur", "my"),
    ("ph1.node.check-host.net", "Philippines", "Manila", "ph"),
    ("mx1.node.check-host.net", "Mexico", "Mexico City", "mx"),
    ("ar1.node.check-host.net", "Argentina", "Buenos Aires", "ar"),
    ("co1.node.check-host.net", "Colombia", "Bogota", "co"),
    ("pe1.node.check-host.net", "Peru", "Lima", "pe"),
    ("ng1.node.check-host.net", "Nigeria", "Lagos", "ng"),
    ("eg1.node.check-host.net", "Egypt", "Cairo", "eg"),
    ("il1.node.check-host.net", "Israel", "Tel Aviv", "il"),
    ("sa1.node.check-host.net", "Saudi Arabia", "Riyadh", "sa"),
    ("pt1.node.check-host.net", "Portugal", "Lisbon", "pt"),
    ("ie1.node.check-host.net", "Ireland", "Dublin", "ie"),
    ("no1.node.check-host.net", "Norway", "Oslo", "no"),
    ("dk1.node.check-host.net", "Denmark", "Copenhagen", "dk"),
    ("gr1.node.check-host.net", "Greece", "Athens", "gr"),
    ("hu1.node.check-host.net", "Hungary", "Budapest", "hu"),
    ("be1.node.check-host.net", "Belgium", "Brussels", "be"),
    ("cn1.node.check-host.net", "China", "Shanghai", "cn"),
    ("cn2.node.check-host.net", "China", "Beijing", "cn"),
    ("tw1.node.check-host.net", "Taiwan", "Taipei", "tw"),
    ("nz1.node.check-host.net", "New Zealand", "Auckland", "nz"),
];

/// The static fallback table as wire-format records.
pub(crate) fn static_records() -> BTreeMap<String, NodeRecord> {
    STATIC_NODES
        .iter()
        .map(|(id, country, city, region_code)| {
            let record = NodeRecord {
                country: (*country).to_string(),
                city: (*city).to_string(),
                region_code: (*region_code).to_string(),
            };
            ((*id).to_string(), record)
        })
        .collect()
}
