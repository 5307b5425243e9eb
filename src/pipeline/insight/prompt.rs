use std::fmt::Write;

use crate::models::{DiseasePrediction, EnvironmentalInput};

/// Build the epidemiologist prompt for one analysis.
///
/// Embeds the location, all five metrics with units, and one
/// `- <name>: <probability>% risk` line per prediction in ranked order.
pub fn build_insight_prompt(
    location: &str,
    env: &EnvironmentalInput,
    predictions: &[DiseasePrediction],
) -> String {
    let mut prompt = String::with_capacity(768);

    let _ = writeln!(
        prompt,
        "Act as a senior epidemiologist. Analyze the following environmental data \
         and disease outbreak risks for {location}:"
    );
    prompt.push('\n');
    prompt.push_str("ENVIRONMENTAL DATA:\n");
    let _ = writeln!(prompt, "- AQI: {}", env.aqi);
    let _ = writeln!(prompt, "- Temperature: {}°C", env.temperature);
    let _ = writeln!(prompt, "- Humidity: {}%", env.humidity);
    let _ = writeln!(prompt, "- Rainfall: {}mm", env.rainfall);
    let _ = writeln!(prompt, "- Population Density: {}/sqkm", env.population_density);
    prompt.push('\n');
    prompt.push_str("PREDICTIONS:\n");
    for p in predictions {
        let _ = writeln!(prompt, "- {}: {}% risk", p.name, p.probability);
    }
    prompt.push('\n');
    prompt.push_str(
        "Provide a concise (3-4 sentences) professional insight explaining the correlation \
         between the environmental factors and the highest risks. \
         Highlight any critical actions needed.",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::scoring::RuleSet;

    fn mumbai_prompt() -> String {
        let env = EnvironmentalInput::default();
        let outcome = RuleSet::builtin().score(&env);
        build_insight_prompt("Mumbai", &env, &outcome.predictions)
    }

    #[test]
    fn prompt_names_location_and_role() {
        let prompt = mumbai_prompt();
        assert!(prompt.starts_with("Act as a senior epidemiologist."));
        assert!(prompt.contains("risks for Mumbai:"));
    }

    #[test]
    fn prompt_embeds_all_metrics_with_units() {
        let prompt = mumbai_prompt();
        assert!(prompt.contains("- AQI: 45\n"));
        assert!(prompt.contains("- Temperature: 28°C\n"));
        assert!(prompt.contains("- Humidity: 65%\n"));
        assert!(prompt.contains("- Rainfall: 120mm\n"));
        assert!(prompt.contains("- Population Density: 1200/sqkm\n"));
    }

    #[test]
    fn prompt_lists_predictions_in_rank_order() {
        let prompt = mumbai_prompt();
        let dengue = prompt.find("- Dengue: 72% risk").unwrap();
        let resp = prompt.find("- Respiratory Distress: 67% risk").unwrap();
        let typhoid = prompt.find("- Typhoid: 40% risk").unwrap();
        assert!(dengue < resp && resp < typhoid);
    }

    #[test]
    fn prompt_asks_for_short_insight() {
        assert!(mumbai_prompt().contains("concise (3-4 sentences)"));
    }

    #[test]
    fn fractional_metrics_keep_decimals() {
        let env = EnvironmentalInput {
            temperature: 31.5,
            ..Default::default()
        };
        let prompt = build_insight_prompt("Dhaka", &env, &[]);
        assert!(prompt.contains("- Temperature: 31.5°C"));
        assert!(prompt.contains("PREDICTIONS:\n\n"));
    }
}
