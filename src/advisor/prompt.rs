//! Diagnostic prompt template.

use crate::domain::FarmProfile;

const TASK: &str = "Task: Diagnose the problem specifically mentioning if the seeds are damaged \
or if there are other issues based on the context. Suggest a professional agricultural solution.";

/// Inject the farm context and the user's question into the diagnostic template.
pub fn build_prompt(profile: &FarmProfile, question: &str) -> String {
    format!(
        "Context:\n\
         - Location: Lat {lat}, Lon {lon}\n\
         - Soil PH: {ph}, Status: {soil}\n\
         - Seed Quality: {seed}\n\
         - Weather: {weather}\n\
         - Problems: Pests={pests}, Disease={disease}\n\
         User Question: {question}\n\
         \n\
         {TASK}\n",
        lat = profile.location.lat,
        lon = profile.location.lon,
        ph = profile.soil_ph,
        soil = profile.soil_condition,
        seed = profile.seed_quality,
        weather = profile.weather,
        pests = flag(profile.pest_observed),
        disease = flag(profile.disease_observed),
        question = question.trim(),
    )
}

/// Observation flags are written `True`/`False` in the prompt.
fn flag(observed: bool) -> &'static str {
    if observed { "True" } else { "False" }
}
