// file: src/corpus/generator.rs
// description: seeded synthetic market documents per city and locality
// reference: https://docs.rs/rand

use crate::catalog::CITIES;
use crate::error::{AdvisorError, Result};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const YEARS: &[u32] = &[2023, 2024];

/// (document type, templates). `{city}`, `{locality}` and `{year}` are substituted.
const DOC_TEMPLATES: &[(&str, &[&str])] = &[
    (
        "market_update",
        &[
            "The real estate market in {locality}, {city} has shown steady growth in {year}. \
             Demand remains strong on the back of employment opportunities and infrastructure \
             expansion. Average prices rose moderately over the previous year.",
            "{locality} continues to be a preferred residential destination in {city}. \
             The {year} market shows stable buyer interest supported by connectivity and \
             social infrastructure.",
        ],
    ),
    (
        "rent_demand",
        &[
            "Rental demand in {locality}, {city} remains high in {year}, driven mainly by \
             working professionals. Homes close to metro stations and IT hubs command premium rents.",
            "In {year}, {locality} saw faster rental absorption as corporate hiring picked up \
             while new supply stayed limited.",
        ],
    ),
    (
        "supply_pipeline",
        &[
            "The supply pipeline in {locality}, {city} during {year} is dominated by mid-rise \
             residential developments. Most new projects focus on 2 and 3 BHK units.",
            "Developers in {locality} are phasing construction in {year} to keep inventory levels in check.",
        ],
    ),
    (
        "it_corridor_growth",
        &[
            "{locality} has benefited from the IT corridor expansion in {city} during {year}. \
             New office space and tech parks lifted residential demand.",
            "Growing IT employment hubs near {locality} kept housing demand steady through {year}.",
        ],
    ),
];

pub struct CorpusGenerator {
    rng: StdRng,
}

impl CorpusGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Writes one document per (locality, document type) under `<base>/<City>/`.
    pub fn generate(mut self, base_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for city in CITIES {
            let city_dir = base_dir.join(city.name);
            fs::create_dir_all(&city_dir).map_err(|e| AdvisorError::file(&city_dir, e))?;

            for locality in city.corpus_localities {
                for &(doc_type, templates) in DOC_TEMPLATES {
                    let year = *YEARS.choose(&mut self.rng).unwrap_or(&YEARS[0]);
                    let template = templates.choose(&mut self.rng).unwrap_or(&templates[0]);

                    let body = template
                        .replace("{city}", city.name)
                        .replace("{locality}", locality)
                        .replace("{year}", &year.to_string());

                    let content = format!(
                        "Title: {}\nCity: {}\nLocality: {}\nYear: {}\n\n{}",
                        title_case(doc_type),
                        city.name,
                        locality,
                        year,
                        body
                    );

                    let file_name = format!(
                        "{}_{}_{}.txt",
                        locality.to_lowercase().replace(' ', "_"),
                        doc_type,
                        year
                    );
                    let path = city_dir.join(file_name);
                    fs::write(&path, content).map_err(|e| AdvisorError::file(&path, e))?;
                    written.push(path);
                }
            }
        }

        info!(
            "Generated {} market documents under {}",
            written.len(),
            base_dir.display()
        );
        Ok(written)
    }
}

fn title_case(doc_type: &str) -> String {
    doc_type
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
