// file: src/advisory/prompt.rs
// description: templated advisory prompt from recommendations and retrieved documents
// reference: internal report template

use crate::catalog::{ADVISORY_YIELD_PERCENT, CRORE};
use crate::models::{AdvisoryInputs, Recommendation, RetrievedDocument};
use crate::utils::Validator;
use std::collections::BTreeSet;
use std::fmt::Write;

const EXCERPT_CHARS: usize = 300;

pub fn build_llm_prompt(
    recommendations: &[Recommendation],
    documents: &[RetrievedDocument],
    inputs: &AdvisoryInputs,
) -> String {
    let mut prompt = String::new();

    let _ = write!(
        prompt,
        "\n### Advisory Report for Real Estate Investment in {city}\n\n\
         **Client Profile:**\n\
         - **City:** {city}\n\
         - **Budget:** ₹{budget} Cr\n\
         - **Property Size Requirement:** {size} sqft\n\
         - **Purpose:** {intent}\n\
         - **Metro Connectivity Required:** {metro}\n\n---\n",
        city = inputs.city,
        budget = inputs.budget_cr,
        size = inputs.size_sqft,
        intent = inputs.intent,
        metro = inputs.metro_label(),
    );

    if recommendations.is_empty() {
        let _ = write!(
            prompt,
            "\n### 1. Budget Feasibility Summary\n\n\
             No property in {city} fits a budget of ₹{budget} Cr for {size} sqft \
             under the client's constraints.\n\
             Advise on the budget increase or size reduction needed, and on nearby \
             alternatives.\n\n---\n",
            city = inputs.city,
            budget = inputs.budget_cr,
            size = inputs.size_sqft,
        );
        push_market_context(&mut prompt, documents);
        return prompt;
    }

    let (min_total, max_total, avg_total) = price_stats(recommendations);
    let localities: BTreeSet<&str> = recommendations.iter().map(|r| r.locality.as_str()).collect();

    let _ = write!(
        prompt,
        "\n### 1. Budget Feasibility Summary\n\n\
         Based on current market price feasibility, the following properties fall within the specified budget.\n\
         All recommendations are limited to the listed localities and respect the client's constraints.\n\n\
         Available price range:\n\
         ₹{} Cr – ₹{} Cr\n\n---\n\n\
         ### 2. Best-Fit Localities\n",
        min_total, max_total
    );

    for locality in localities {
        let _ = write!(
            prompt,
            "\n**{}**\n\
             - Strong demand due to employment hubs\n\
             - Good metro and road connectivity\n\
             - Consistent buyer and tenant interest\n",
            locality
        );
    }

    prompt.push_str("\n---\n");
    push_market_context(&mut prompt, documents);

    let monthly_rent = (avg_total * CRORE * (ADVISORY_YIELD_PERCENT / 100.0) / 12.0) as u64;

    let _ = write!(
        prompt,
        "\n### 3. Trade-offs & Risks\n\
         - Budget-constrained options may involve older properties\n\
         - Premium amenities increase capital cost\n\
         - High-demand areas may see slower appreciation in the short term\n\n---\n\n\
         ### 4. Rental Yield Estimation\n\
         - **Estimated Monthly Rent:** ₹{rent}\n\
         - **Estimated Annual Yield:** {yield_pct:.1}%\n\n\
         This estimate reflects conservative residential rental trends in major Indian metro markets.\n\n---\n\n\
         ### 5. Final Recommendation\n\
         The specified budget is feasible for acquisition within the listed localities.\n\
         For {intent} purposes, prioritizing metro proximity and tenant demand is advised for stable returns.\n",
        rent = format_thousands(monthly_rent),
        yield_pct = ADVISORY_YIELD_PERCENT,
        intent = inputs.intent.to_lowercase(),
    );

    prompt
}

fn push_market_context(prompt: &mut String, documents: &[RetrievedDocument]) {
    prompt.push_str("\n### Market Context\n");

    if documents.is_empty() {
        prompt.push_str("No supporting market documents were retrieved.\n");
    } else {
        for doc in documents {
            let excerpt = doc.text.split_whitespace().collect::<Vec<_>>().join(" ");
            let _ = writeln!(
                prompt,
                "- [{}] {}",
                doc.source,
                Validator::truncate_text(&excerpt, EXCERPT_CHARS)
            );
        }
    }

    prompt.push_str("\n---\n");
}

/// (min, max, mean) of the predicted totals.
fn price_stats(recommendations: &[Recommendation]) -> (f64, f64, f64) {
    let totals = recommendations.iter().map(|r| r.predicted_total_cr);
    let min = totals.clone().fold(f64::INFINITY, f64::min);
    let max = totals.clone().fold(f64::NEG_INFINITY, f64::max);
    let avg = totals.sum::<f64>() / recommendations.len() as f64;
    (min, max, avg)
}

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
