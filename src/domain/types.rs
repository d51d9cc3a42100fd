//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built fresh from widget/flag values on every interaction
//! - saved to and reloaded from profile JSON files
//! - passed unchanged through the estimator, the advisor and the front-ends

use std::collections::BTreeSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A closed set of user-selectable values with a human-readable label.
///
/// Every selectbox of the dashboard maps onto one of these; `ALL` is the full
/// domain in display order.
pub trait Choice: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn next(self) -> Self {
        cycle(Self::ALL, self, 1)
    }

    fn prev(self) -> Self {
        cycle(Self::ALL, self, -1)
    }
}

/// Step through `domain` by `delta`, wrapping at both ends.
///
/// A value that is not part of `domain` snaps to its first element.
pub fn cycle<T: Copy + PartialEq>(domain: &[T], current: T, delta: i32) -> T {
    if domain.is_empty() {
        return current;
    }
    let len = domain.len() as i64;
    let idx = match domain.iter().position(|v| *v == current) {
        Some(i) => (i as i64 + i64::from(delta)).rem_euclid(len),
        None => 0,
    };
    domain[idx as usize]
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
        )]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum! {
    /// Which of the two consolidated dashboards is in effect.
    ///
    /// The variant fixes the base yield and the soil/seed vocabularies.
    Variant {
        /// Base 15.0 q/acre; soil Poor/Average/Excellent.
        Classic => "Classic",
        /// Base 0.0 q/acre; soil Healthy/Degraded/Saline.
        Lifecycle => "Lifecycle",
    }
}

choice_enum! {
    LandType {
        Flat => "Flat",
        Slope => "Slope",
        Terrace => "Terrace",
    }
}

choice_enum! {
    /// Soil condition across both variants' vocabularies.
    SoilCondition {
        Poor => "Poor",
        Average => "Average",
        Excellent => "Excellent",
        Healthy => "Healthy",
        Degraded => "Degraded",
        Saline => "Saline",
    }
}

choice_enum! {
    /// Seed quality across both variants' vocabularies.
    SeedQuality {
        CertifiedElite => "Certified Elite",
        Standard => "Standard",
        Premium => "Premium",
        Average => "Average",
        DamagedDiscolored => "Damaged/Discolored",
        Aged => "Aged",
    }
}

choice_enum! {
    ManureType {
        Compost => "Compost",
        Vermicompost => "Vermicompost",
        None => "None",
    }
}

choice_enum! {
    FertilizerPlan {
        StandardNpk => "Standard NPK",
        HighNitrogen => "High Nitrogen",
        MicroNutrientFocus => "Micro-nutrient Focus",
    }
}

choice_enum! {
    WaterSource {
        Borewell => "Borewell",
        River => "River",
        RainwaterHarvest => "Rainwater Harvest",
    }
}

choice_enum! {
    WaterLevel {
        Dry => "Dry",
        Low => "Low",
        Full => "Full",
    }
}

choice_enum! {
    IrrigationSystem {
        Drip => "Drip",
        Sprinkler => "Sprinkler",
        Surface => "Surface",
    }
}

choice_enum! {
    Equipment {
        Tractor => "Tractor",
        Seeder => "Seeder",
        PowerTiller => "Power Tiller",
    }
}

choice_enum! {
    Weather {
        Sunny => "Sunny",
        Cloudy => "Cloudy",
        HeavyRain => "Heavy Rain",
        DroughtLike => "Drought-like",
    }
}

choice_enum! {
    WeedControl {
        Manual => "Manual",
        Chemical => "Chemical",
        Mulching => "Mulching",
    }
}

choice_enum! {
    FieldMonitoring {
        DailyManual => "Daily Manual",
        DroneAssisted => "Drone Assisted",
        SensorBased => "Sensor Based",
    }
}

choice_enum! {
    HarvestTool {
        ManualSickle => "Manual Sickle",
        MechanicalHarvester => "Mechanical Harvester",
    }
}

choice_enum! {
    StorageFacility {
        ColdStorage => "Cold Storage",
        DrySilo => "Dry Silo",
        Warehouse => "Warehouse",
    }
}

choice_enum! {
    Transport {
        Truck => "Truck",
        FreightTrain => "Freight Train",
        LocalCart => "Local Cart",
    }
}

impl Variant {
    /// Starting value the additive adjustments are applied to (q/acre).
    pub fn base_yield(self) -> f64 {
        match self {
            Variant::Classic => 15.0,
            Variant::Lifecycle => 0.0,
        }
    }

    pub fn soil_choices(self) -> &'static [SoilCondition] {
        match self {
            Variant::Classic => &[SoilCondition::Poor, SoilCondition::Average, SoilCondition::Excellent],
            Variant::Lifecycle => &[SoilCondition::Healthy, SoilCondition::Degraded, SoilCondition::Saline],
        }
    }

    pub fn seed_choices(self) -> &'static [SeedQuality] {
        match self {
            Variant::Classic => &[
                SeedQuality::CertifiedElite,
                SeedQuality::Standard,
                SeedQuality::DamagedDiscolored,
            ],
            Variant::Lifecycle => &[
                SeedQuality::Premium,
                SeedQuality::Average,
                SeedQuality::DamagedDiscolored,
                SeedQuality::Aged,
            ],
        }
    }

    pub fn default_soil(self) -> SoilCondition {
        match self {
            Variant::Classic => SoilCondition::Average,
            Variant::Lifecycle => SoilCondition::Healthy,
        }
    }

    pub fn default_seed(self) -> SeedQuality {
        match self {
            Variant::Classic => SeedQuality::Standard,
            Variant::Lifecycle => SeedQuality::Premium,
        }
    }

    /// Dashboard title shown in headers and reports.
    pub fn title(self) -> &'static str {
        match self {
            Variant::Classic => "Farm Yield Dashboard",
            Variant::Lifecycle => "AgriLifecycle AI Pro",
        }
    }
}

/// Accepted `soil_ph` range (inclusive).
pub const SOIL_PH_RANGE: (f64, f64) = (0.0, 14.0);
/// Accepted `labor` range (inclusive).
pub const LABOR_RANGE: (u32, u32) = (1, 100);
/// Accepted yield record range in q/acre (inclusive).
pub const YIELD_RECORD_RANGE: (f64, f64) = (0.0, 100.0);

/// Site coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Default for Location {
    /// Chennai, the dashboard's default site.
    fn default() -> Self {
        Self {
            lat: 13.0827,
            lon: 80.2707,
        }
    }
}

/// A recorded yield for a past season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearYield {
    pub year: i32,
    /// Quintals per acre.
    pub value: f64,
}

/// Every farm/site attribute the dashboard collects.
///
/// Only `soil_condition`, `seed_quality` and `pest_observed` move the yield
/// estimate; `disease_observed` feeds the field status. The rest is
/// descriptive context for the advisor prompt and the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmProfile {
    // Site & soil
    pub land_type: LandType,
    pub soil_condition: SoilCondition,
    pub soil_ph: f64,

    // Inputs & seeds
    pub seed_quality: SeedQuality,
    pub manure: ManureType,
    pub fertilizer_plan: FertilizerPlan,

    // Operations & resources
    pub water_source: WaterSource,
    pub water_level: WaterLevel,
    pub irrigation: IrrigationSystem,
    pub labor: u32,
    pub equipment: BTreeSet<Equipment>,

    // Protection & weather
    pub weather: Weather,
    pub weed_control: WeedControl,
    pub pest_observed: bool,
    pub disease_observed: bool,
    pub monitoring: FieldMonitoring,

    // Post-harvest & records
    pub harvest_tools: HarvestTool,
    pub storage: StorageFacility,
    pub transport: Transport,
    /// Last recorded yield (q/acre).
    pub yield_record: f64,
    /// Optional longer record of past seasons for the trend chart.
    pub yield_history: Vec<YearYield>,

    pub location: Location,
}

impl Default for FarmProfile {
    fn default() -> Self {
        Self::default_for(Variant::Lifecycle)
    }
}

impl FarmProfile {
    /// Widget defaults for the given dashboard variant.
    pub fn default_for(variant: Variant) -> Self {
        Self {
            land_type: LandType::Flat,
            soil_condition: variant.default_soil(),
            soil_ph: 6.5,
            seed_quality: variant.default_seed(),
            manure: ManureType::Compost,
            fertilizer_plan: FertilizerPlan::StandardNpk,
            water_source: WaterSource::Borewell,
            water_level: WaterLevel::Dry,
            irrigation: IrrigationSystem::Drip,
            labor: 10,
            equipment: BTreeSet::from([Equipment::Tractor]),
            weather: Weather::Sunny,
            weed_control: WeedControl::Manual,
            pest_observed: false,
            disease_observed: false,
            monitoring: FieldMonitoring::DailyManual,
            harvest_tools: HarvestTool::ManualSickle,
            storage: StorageFacility::ColdStorage,
            transport: Transport::Truck,
            yield_record: 12.0,
            yield_history: Vec::new(),
            location: Location::default(),
        }
    }

    /// Snap soil and seed values that fall outside `variant`'s vocabulary to
    /// the variant defaults. Used when switching variants interactively.
    pub fn conform_to(&mut self, variant: Variant) {
        if !variant.soil_choices().contains(&self.soil_condition) {
            self.soil_condition = variant.default_soil();
        }
        if !variant.seed_choices().contains(&self.seed_quality) {
            self.seed_quality = variant.default_seed();
        }
    }

    /// Check every field against its widget domain.
    pub fn validate(&self, variant: Variant) -> Result<(), AppError> {
        if !variant.soil_choices().contains(&self.soil_condition) {
            return Err(AppError::input(format!(
                "Soil condition '{}' is not available in the {} dashboard (expected one of: {}).",
                self.soil_condition,
                variant.label(),
                join_labels(variant.soil_choices()),
            )));
        }
        if !variant.seed_choices().contains(&self.seed_quality) {
            return Err(AppError::input(format!(
                "Seed quality '{}' is not available in the {} dashboard (expected one of: {}).",
                self.seed_quality,
                variant.label(),
                join_labels(variant.seed_choices()),
            )));
        }

        check_range("soil pH", self.soil_ph, SOIL_PH_RANGE)?;
        check_range("yield record", self.yield_record, YIELD_RECORD_RANGE)?;
        for entry in &self.yield_history {
            check_range(
                &format!("yield history {}", entry.year),
                entry.value,
                YIELD_RECORD_RANGE,
            )?;
        }

        if !(LABOR_RANGE.0..=LABOR_RANGE.1).contains(&self.labor) {
            return Err(AppError::input(format!(
                "Labor personnel must be within {}..={} (got {}).",
                LABOR_RANGE.0, LABOR_RANGE.1, self.labor
            )));
        }

        check_range("latitude", self.location.lat, (-90.0, 90.0))?;
        check_range("longitude", self.location.lon, (-180.0, 180.0))?;

        Ok(())
    }

    /// Equipment labels joined for display (`-` when none selected).
    pub fn equipment_label(&self) -> String {
        if self.equipment.is_empty() {
            return "-".to_string();
        }
        self.equipment
            .iter()
            .map(|e| e.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn check_range(name: &str, value: f64, (min, max): (f64, f64)) -> Result<(), AppError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(AppError::input(format!(
            "{name} must be within {min}..={max} (got {value})."
        )))
    }
}

fn join_labels<T: Choice>(values: &[T]) -> String {
    values.iter().map(|v| v.label()).collect::<Vec<_>>().join(", ")
}
