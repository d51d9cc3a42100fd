//! Editable rows of the dashboard's profile panel.
//!
//! Each row maps onto one `FarmProfile` attribute. Selectboxes cycle through
//! their domain (soil and seed use the active variant's vocabulary), sliders
//! step and clamp to the widget range, checkboxes toggle.

use crate::domain::{
    Choice, Equipment, FarmProfile, LABOR_RANGE, SOIL_PH_RANGE, Variant, YIELD_RECORD_RANGE, cycle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    LandType,
    Soil,
    SoilPh,
    Seed,
    Manure,
    Fertilizer,
    WaterSource,
    WaterLevel,
    Irrigation,
    Labor,
    Tractor,
    Seeder,
    PowerTiller,
    Weather,
    WeedControl,
    Pest,
    Disease,
    Monitoring,
    HarvestTools,
    Storage,
    Transport,
    YieldRecord,
    Latitude,
    Longitude,
}

impl Field {
    pub const ALL: &'static [Field] = &[
        Field::LandType,
        Field::Soil,
        Field::SoilPh,
        Field::Seed,
        Field::Manure,
        Field::Fertilizer,
        Field::WaterSource,
        Field::WaterLevel,
        Field::Irrigation,
        Field::Labor,
        Field::Tractor,
        Field::Seeder,
        Field::PowerTiller,
        Field::Weather,
        Field::WeedControl,
        Field::Pest,
        Field::Disease,
        Field::Monitoring,
        Field::HarvestTools,
        Field::Storage,
        Field::Transport,
        Field::YieldRecord,
        Field::Latitude,
        Field::Longitude,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::LandType => "Land type",
            Field::Soil => "Soil",
            Field::SoilPh => "Soil pH",
            Field::Seed => "Seed",
            Field::Manure => "Manure",
            Field::Fertilizer => "Fertilizer",
            Field::WaterSource => "Water source",
            Field::WaterLevel => "Water level",
            Field::Irrigation => "Irrigation",
            Field::Labor => "Labor",
            Field::Tractor => "Tractor",
            Field::Seeder => "Seeder",
            Field::PowerTiller => "Power tiller",
            Field::Weather => "Weather",
            Field::WeedControl => "Weed control",
            Field::Pest => "Pests seen",
            Field::Disease => "Disease seen",
            Field::Monitoring => "Monitoring",
            Field::HarvestTools => "Harvest tools",
            Field::Storage => "Storage",
            Field::Transport => "Transport",
            Field::YieldRecord => "Yield record",
            Field::Latitude => "Latitude",
            Field::Longitude => "Longitude",
        }
    }

    /// Current value, formatted for the panel.
    pub fn value(self, profile: &FarmProfile) -> String {
        match self {
            Field::LandType => profile.land_type.to_string(),
            Field::Soil => profile.soil_condition.to_string(),
            Field::SoilPh => format!("{:.1}", profile.soil_ph),
            Field::Seed => profile.seed_quality.to_string(),
            Field::Manure => profile.manure.to_string(),
            Field::Fertilizer => profile.fertilizer_plan.to_string(),
            Field::WaterSource => profile.water_source.to_string(),
            Field::WaterLevel => profile.water_level.to_string(),
            Field::Irrigation => profile.irrigation.to_string(),
            Field::Labor => profile.labor.to_string(),
            Field::Tractor => checkbox(profile.equipment.contains(&Equipment::Tractor)),
            Field::Seeder => checkbox(profile.equipment.contains(&Equipment::Seeder)),
            Field::PowerTiller => checkbox(profile.equipment.contains(&Equipment::PowerTiller)),
            Field::Weather => profile.weather.to_string(),
            Field::WeedControl => profile.weed_control.to_string(),
            Field::Pest => checkbox(profile.pest_observed),
            Field::Disease => checkbox(profile.disease_observed),
            Field::Monitoring => profile.monitoring.to_string(),
            Field::HarvestTools => profile.harvest_tools.to_string(),
            Field::Storage => profile.storage.to_string(),
            Field::Transport => profile.transport.to_string(),
            Field::YieldRecord => format!("{:.1} q/acre", profile.yield_record),
            Field::Latitude => format!("{:.4}", profile.location.lat),
            Field::Longitude => format!("{:.4}", profile.location.lon),
        }
    }

    /// Left/right: cycle a selectbox, step a slider, or flip a checkbox.
    pub fn adjust(self, profile: &mut FarmProfile, variant: Variant, delta: i32) {
        let step = f64::from(delta);
        match self {
            Field::LandType => profile.land_type = cycle_choice(profile.land_type, delta),
            Field::Soil => {
                profile.soil_condition = cycle(variant.soil_choices(), profile.soil_condition, delta)
            }
            Field::SoilPh => profile.soil_ph = step_value(profile.soil_ph, 0.1 * step, SOIL_PH_RANGE),
            Field::Seed => {
                profile.seed_quality = cycle(variant.seed_choices(), profile.seed_quality, delta)
            }
            Field::Manure => profile.manure = cycle_choice(profile.manure, delta),
            Field::Fertilizer => profile.fertilizer_plan = cycle_choice(profile.fertilizer_plan, delta),
            Field::WaterSource => profile.water_source = cycle_choice(profile.water_source, delta),
            Field::WaterLevel => profile.water_level = cycle_choice(profile.water_level, delta),
            Field::Irrigation => profile.irrigation = cycle_choice(profile.irrigation, delta),
            Field::Labor => {
                let next = i64::from(profile.labor) + i64::from(delta);
                let (min, max) = (i64::from(LABOR_RANGE.0), i64::from(LABOR_RANGE.1));
                profile.labor = next.clamp(min, max) as u32;
            }
            Field::Weather => profile.weather = cycle_choice(profile.weather, delta),
            Field::WeedControl => profile.weed_control = cycle_choice(profile.weed_control, delta),
            Field::Monitoring => profile.monitoring = cycle_choice(profile.monitoring, delta),
            Field::HarvestTools => profile.harvest_tools = cycle_choice(profile.harvest_tools, delta),
            Field::Storage => profile.storage = cycle_choice(profile.storage, delta),
            Field::Transport => profile.transport = cycle_choice(profile.transport, delta),
            Field::YieldRecord => {
                profile.yield_record = step_value(profile.yield_record, 0.5 * step, YIELD_RECORD_RANGE)
            }
            Field::Latitude => {
                profile.location.lat = step_value(profile.location.lat, 0.01 * step, (-90.0, 90.0))
            }
            Field::Longitude => {
                profile.location.lon = step_value(profile.location.lon, 0.01 * step, (-180.0, 180.0))
            }
            Field::Tractor | Field::Seeder | Field::PowerTiller | Field::Pest | Field::Disease => {
                self.toggle(profile);
            }
        }
    }

    /// Space: flip a checkbox. Returns false for non-checkbox rows.
    pub fn toggle(self, profile: &mut FarmProfile) -> bool {
        let equipment = match self {
            Field::Pest => {
                profile.pest_observed = !profile.pest_observed;
                return true;
            }
            Field::Disease => {
                profile.disease_observed = !profile.disease_observed;
                return true;
            }
            Field::Tractor => Equipment::Tractor,
            Field::Seeder => Equipment::Seeder,
            Field::PowerTiller => Equipment::PowerTiller,
            _ => return false,
        };
        if !profile.equipment.remove(&equipment) {
            profile.equipment.insert(equipment);
        }
        true
    }
}

fn checkbox(on: bool) -> String {
    if on { "[x]" } else { "[ ]" }.to_string()
}

fn cycle_choice<T: Choice>(current: T, delta: i32) -> T {
    if delta >= 0 { current.next() } else { current.prev() }
}

/// Step and clamp; rounding keeps repeated 0.1 steps from drifting.
fn step_value(current: f64, step: f64, (min, max): (f64, f64)) -> f64 {
    let next = ((current + step) * 100.0).round() / 100.0;
    next.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LandType, SeedQuality, SoilCondition};

    #[test]
    fn soil_cycles_within_variant_vocabulary() {
        let mut p = FarmProfile::default_for(Variant::Classic);
        assert_eq!(p.soil_condition, SoilCondition::Average);
        Field::Soil.adjust(&mut p, Variant::Classic, 1);
        assert_eq!(p.soil_condition, SoilCondition::Excellent);
        Field::Soil.adjust(&mut p, Variant::Classic, 1);
        assert_eq!(p.soil_condition, SoilCondition::Poor);

        Field::Seed.adjust(&mut p, Variant::Classic, -1);
        assert_eq!(p.seed_quality, SeedQuality::CertifiedElite);
    }

    #[test]
    fn sliders_clamp_to_widget_ranges() {
        let mut p = FarmProfile::default();
        p.labor = 100;
        Field::Labor.adjust(&mut p, Variant::Lifecycle, 1);
        assert_eq!(p.labor, 100);
        p.labor = 1;
        Field::Labor.adjust(&mut p, Variant::Lifecycle, -1);
        assert_eq!(p.labor, 1);

        p.soil_ph = 13.95;
        Field::SoilPh.adjust(&mut p, Variant::Lifecycle, 1);
        assert_eq!(p.soil_ph, 14.0);

        for _ in 0..3 {
            Field::YieldRecord.adjust(&mut p, Variant::Lifecycle, -1);
        }
        assert_eq!(p.yield_record, 10.5);
    }

    #[test]
    fn checkboxes_toggle_and_selectboxes_do_not() {
        let mut p = FarmProfile::default();
        assert!(Field::Seeder.toggle(&mut p));
        assert!(p.equipment.contains(&Equipment::Seeder));
        assert!(Field::Tractor.toggle(&mut p));
        assert!(!p.equipment.contains(&Equipment::Tractor));
        assert_eq!(Field::Tractor.value(&p), "[ ]");

        assert!(Field::Pest.toggle(&mut p));
        assert!(p.pest_observed);

        assert!(!Field::LandType.toggle(&mut p));
        assert_eq!(p.land_type, LandType::Flat);
    }

    #[test]
    fn left_right_on_a_checkbox_flips_it() {
        let mut p = FarmProfile::default();
        Field::Disease.adjust(&mut p, Variant::Lifecycle, 1);
        assert!(p.disease_observed);
        Field::Disease.adjust(&mut p, Variant::Lifecycle, -1);
        assert!(!p.disease_observed);

        Field::PowerTiller.adjust(&mut p, Variant::Lifecycle, 1);
        assert!(p.equipment.contains(&Equipment::PowerTiller));
    }
}
