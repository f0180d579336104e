// file: src/catalog.rs
// description: market assumptions shared by the synthetic data and corpus generators
// reference: base prices, locality premiums and rental yields per city

pub struct CityProfile {
    pub name: &'static str,
    pub base_price_per_sqft: f64,
    pub rental_yield: f64,
    /// (locality, price factor relative to the city base)
    pub localities: &'static [(&'static str, f64)],
    /// Localities covered by the unstructured market corpus.
    pub corpus_localities: &'static [&'static str],
}

pub const CITIES: &[CityProfile] = &[
    CityProfile {
        name: "Hyderabad",
        base_price_per_sqft: 6500.0,
        rental_yield: 0.035,
        localities: &[
            ("Gachibowli", 1.30),
            ("Hitech City", 1.35),
            ("Madhapur", 1.28),
            ("Kondapur", 1.15),
            ("Kukatpally", 0.95),
            ("Miyapur", 0.90),
            ("Uppal", 0.85),
            ("LB Nagar", 0.82),
        ],
        corpus_localities: &[
            "Gachibowli",
            "Hitech City",
            "Madhapur",
            "Kondapur",
            "Kukatpally",
            "Miyapur",
            "Uppal",
        ],
    },
    CityProfile {
        name: "Bengaluru",
        base_price_per_sqft: 7200.0,
        rental_yield: 0.032,
        localities: &[
            ("Whitefield", 1.25),
            ("Electronic City", 1.10),
            ("Indiranagar", 1.40),
            ("Sarjapur Road", 1.22),
            ("Yelahanka", 1.05),
        ],
        corpus_localities: &[
            "Whitefield",
            "Electronic City",
            "Indiranagar",
            "Sarjapur Road",
            "Yelahanka",
        ],
    },
    CityProfile {
        name: "Pune",
        base_price_per_sqft: 7000.0,
        rental_yield: 0.030,
        localities: &[
            ("Hinjewadi", 1.20),
            ("Wakad", 1.05),
            ("Baner", 1.30),
            ("Kharadi", 1.25),
        ],
        corpus_localities: &["Hinjewadi", "Wakad", "Baner", "Kharadi"],
    },
];

pub const PROPERTY_TYPES: &[(&str, f64)] = &[("Apartment", 1.0), ("Villa", 1.45)];

pub const SIZE_BUCKETS: &[u32] = &[
    750, 900, 1000, 1200, 1350, 1500, 1800, 2000, 2200, 2500, 3000, 3500,
];

/// Conservative yield quoted in advisory reports, independent of city.
pub const ADVISORY_YIELD_PERCENT: f64 = 3.0;

pub const CRORE: f64 = 1e7;

pub fn supported_cities() -> impl Iterator<Item = &'static str> {
    CITIES.iter().map(|c| c.name)
}

pub fn city(name: &str) -> Option<&'static CityProfile> {
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Nearest bucket; ties go to the smaller size.
pub fn snap_size(size: u32) -> u32 {
    SIZE_BUCKETS
        .iter()
        .copied()
        .min_by_key(|bucket| bucket.abs_diff(size))
        .unwrap_or(size)
}
