//! Camp configuration.
//!
//! One immutable object holding the activity catalog, the weekly slot grid,
//! and every rule list the scheduler consults. It is built (or parsed) and
//! validated once, then passed by reference into the constraint evaluator
//! and each pipeline phase.
//!
//! [`CampConfig::default`] is the standard camp: 45 activities, a 14-slot
//! week, Reflection on Friday, and the usual beach, range, and staffing
//! rules.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::ConfigError;
use crate::models::{Activity, ActivityId, Day, SlotGrid, Troop, Zone};

/// Activity catalog with name lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Activity>", into = "Vec<Activity>")]
pub struct Catalog {
    activities: Vec<Activity>,
    index: HashMap<ActivityId, usize>,
}

impl Catalog {
    /// Builds a catalog. The first of any duplicate names wins the lookup;
    /// duplicates are reported by [`CampConfig::validate`].
    pub fn new(activities: Vec<Activity>) -> Self {
        let mut index = HashMap::new();
        for (i, act) in activities.iter().enumerate() {
            index.entry(act.name.clone()).or_insert(i);
        }
        Self { activities, index }
    }

    /// Looks up an activity by name.
    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.index.get(name).map(|&i| &self.activities[i])
    }

    /// All activities in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }

    /// Number of activities.
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

impl From<Vec<Activity>> for Catalog {
    fn from(activities: Vec<Activity>) -> Self {
        Self::new(activities)
    }
}

impl From<Catalog> for Vec<Activity> {
    fn from(catalog: Catalog) -> Self {
        catalog.activities
    }
}

/// At most `max_per_day` of these activities per troop per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyRule {
    pub activities: Vec<ActivityId>,
    pub max_per_day: u32,
}

/// Beach activities run in open slots only.
///
/// A closed slot is allowed on `open_days`, or when the relaxation level
/// permits it and the activity is the troop's preference at rank
/// `<= slot_two_max_rank`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeachRule {
    pub activities: Vec<ActivityId>,
    pub allowed_slots: Vec<u8>,
    #[serde(default)]
    pub open_days: Vec<Day>,
    pub slot_two_max_rank: usize,
}

/// A wet activity may not start directly after a Tower or Outdoor Skills
/// activity on the same day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WetDryRule {
    pub wet: Vec<ActivityId>,
    pub tower_ods: Vec<ActivityId>,
}

/// At most `max_per_troop` of these activities per troop per week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongActivityRule {
    pub activities: Vec<ActivityId>,
    pub max_per_troop: u32,
}

impl Default for LongActivityRule {
    fn default() -> Self {
        Self {
            activities: Vec::new(),
            max_per_troop: 1,
        }
    }
}

/// A named group of related activities whose day-spread is minimized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringZone {
    pub name: String,
    pub activities: Vec<ActivityId>,
}

/// An activity every troop must receive. `day = None` means the last day
/// of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandatoryActivity {
    pub activity: ActivityId,
    #[serde(default)]
    pub day: Option<Day>,
}

fn default_rank_bands() -> Vec<usize> {
    vec![5, 10, 15]
}

fn default_iteration_cap() -> usize {
    100
}

/// Complete scheduling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampConfig {
    /// Weekly slot layout.
    #[serde(default)]
    pub grid: SlotGrid,
    /// Activity definitions.
    pub catalog: Catalog,
    /// Per-slot troop capacity of each exclusive area (default 1).
    #[serde(default)]
    pub area_capacity: BTreeMap<String, u32>,
    /// Per-slot ceiling of activities run by each staff pool.
    #[serde(default)]
    pub staff_ceilings: BTreeMap<String, u32>,
    /// Accuracy (range) limit.
    pub accuracy: AccuracyRule,
    /// Beach slot rule.
    pub beach: BeachRule,
    /// Wet activities after Tower/ODS.
    #[serde(default)]
    pub wet_dry: WetDryRule,
    /// Long off-camp activities.
    #[serde(default)]
    pub long_activities: LongActivityRule,
    /// Pairs a troop may not do on the same day.
    #[serde(default)]
    pub same_day_conflicts: Vec<(ActivityId, ActivityId)>,
    /// Clustering zones, in optimization order.
    #[serde(default)]
    pub clustering_zones: Vec<ClusteringZone>,
    /// Low-priority fillers the clustering optimizer may move.
    #[serde(default)]
    pub swappable: Vec<ActivityId>,
    /// Gap-fill order. The first entry is used for forced placements.
    pub default_fill: Vec<ActivityId>,
    /// Activities every troop must receive.
    #[serde(default)]
    pub mandatory: Vec<MandatoryActivity>,
    /// Activities split sub-troops must do in the same slot.
    #[serde(default)]
    pub split_shared: Vec<ActivityId>,
    /// Upper bounds of the closed preference bands; ranks above the last
    /// bound form one open band.
    #[serde(default = "default_rank_bands")]
    pub rank_bands: Vec<usize>,
    /// Commissioner roster (commissioner → troops). A troop's own
    /// `commissioner` field takes precedence.
    #[serde(default)]
    pub commissioners: BTreeMap<String, Vec<String>>,
    /// Commissioner → activity → the only day that commissioner's troops
    /// may do it.
    #[serde(default)]
    pub commissioner_days: BTreeMap<String, BTreeMap<ActivityId, Day>>,
    /// Bound on clustering optimizer rounds.
    #[serde(default = "default_iteration_cap")]
    pub clustering_iteration_cap: usize,
}

impl CampConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CampConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks internal consistency. Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.total_slots() == 0 {
            return Err(ConfigError::EmptyGrid);
        }

        let mut seen = HashSet::new();
        for act in self.catalog.iter() {
            if !seen.insert(act.name.as_str()) {
                return Err(ConfigError::DuplicateActivity(act.name.to_string()));
            }
            if act.slots == 0 || act.large_troop.as_ref().is_some_and(|l| l.slots == 0) {
                return Err(ConfigError::ZeroDuration(act.name.to_string()));
            }
        }

        self.check_known("accuracy rule", &self.accuracy.activities)?;
        self.check_known("beach rule", &self.beach.activities)?;
        self.check_known("swappable list", &self.swappable)?;
        self.check_known("default-fill list", &self.default_fill)?;
        self.check_known("split-shared list", &self.split_shared)?;
        self.check_known("wet activities", &self.wet_dry.wet)?;
        self.check_known("tower/ODS activities", &self.wet_dry.tower_ods)?;
        self.check_known("long activities", &self.long_activities.activities)?;
        for days in self.commissioner_days.values() {
            self.check_known("commissioner days", days.keys())?;
            if let Some(&day) = days.values().find(|&&d| self.grid.slot_count(d) == 0) {
                return Err(ConfigError::DayOutsideGrid {
                    context: "commissioner days",
                    day,
                });
            }
        }
        for (a, b) in &self.same_day_conflicts {
            self.check_known("same-day conflicts", [a, b])?;
        }
        for zone in &self.clustering_zones {
            self.check_known("clustering zone", &zone.activities)?;
        }
        for m in &self.mandatory {
            self.check_known("mandatory list", [&m.activity])?;
            if let Some(day) = m.day {
                if self.grid.slot_count(day) == 0 {
                    return Err(ConfigError::DayOutsideGrid {
                        context: "mandatory activity",
                        day,
                    });
                }
            }
        }
        for &day in &self.beach.open_days {
            if self.grid.slot_count(day) == 0 {
                return Err(ConfigError::DayOutsideGrid {
                    context: "beach open days",
                    day,
                });
            }
        }
        let widest = self.grid.days().map(|d| self.grid.slot_count(d)).max().unwrap_or(0);
        if let Some(&slot) = self.beach.allowed_slots.iter().find(|&&s| s == 0 || s > widest) {
            return Err(ConfigError::SlotOutsideGrid(slot));
        }

        let first = self.default_fill.first().ok_or(ConfigError::EmptyDefaultFill)?;
        if self.catalog.get(first.as_str()).is_some_and(|a| a.slots != 1 || a.large_troop.is_some()) {
            return Err(ConfigError::MultiSlotForcedFill(first.to_string()));
        }

        if self.rank_bands.first() == Some(&0)
            || self.rank_bands.windows(2).any(|w| w[0] >= w[1])
        {
            return Err(ConfigError::InvalidRankBands);
        }

        Ok(())
    }

    fn check_known<'a>(
        &self,
        list: &'static str,
        names: impl IntoIterator<Item = &'a ActivityId>,
    ) -> Result<(), ConfigError> {
        for name in names {
            if self.catalog.get(name.as_str()).is_none() {
                return Err(ConfigError::UnknownActivity {
                    list,
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Looks up an activity by name.
    #[inline]
    pub fn activity(&self, name: &str) -> Option<&Activity> {
        self.catalog.get(name)
    }

    /// Whether the activity counts toward the accuracy limit.
    pub fn is_accuracy(&self, name: &str) -> bool {
        self.accuracy.activities.iter().any(|a| a == name)
    }

    /// Whether the beach slot rule applies to the activity.
    pub fn is_beach_restricted(&self, name: &str) -> bool {
        self.beach.activities.iter().any(|a| a == name)
    }

    /// Whether a beach activity may use `slot_number` on `day` without
    /// any relaxation.
    pub fn beach_slot_open(&self, day: Day, slot_number: u8) -> bool {
        self.beach.open_days.contains(&day) || self.beach.allowed_slots.contains(&slot_number)
    }

    /// Whether the activity is wet.
    pub fn is_wet(&self, name: &str) -> bool {
        self.wet_dry.wet.iter().any(|a| a == name)
    }

    /// Whether the activity is a Tower or Outdoor Skills activity.
    pub fn is_tower_ods(&self, name: &str) -> bool {
        self.wet_dry.tower_ods.iter().any(|a| a == name)
    }

    /// Whether the activity counts toward the long-activity limit.
    pub fn is_long(&self, name: &str) -> bool {
        self.long_activities.activities.iter().any(|a| a == name)
    }

    /// The day the troop's commissioner runs the activity, if assigned.
    pub fn commissioner_day(&self, troop: &Troop, activity: &str) -> Option<Day> {
        let commissioner = self.commissioner_of(troop)?;
        self.commissioner_days.get(commissioner)?.get(activity).copied()
    }

    /// Whether two activities may not share a day for one troop.
    pub fn conflicts_same_day(&self, a: &str, b: &str) -> bool {
        self.same_day_conflicts
            .iter()
            .any(|(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// Index of the clustering zone containing the activity.
    pub fn clustering_zone_of(&self, name: &str) -> Option<usize> {
        self.clustering_zones
            .iter()
            .position(|z| z.activities.iter().any(|a| a == name))
    }

    /// Whether the clustering optimizer may move this activity.
    pub fn is_swappable(&self, name: &str) -> bool {
        self.swappable.iter().any(|a| a == name)
    }

    /// Whether the activity is mandatory for every troop.
    pub fn is_mandatory(&self, name: &str) -> bool {
        self.mandatory.iter().any(|m| m.activity == name)
    }

    /// Mandatory activities with their resolved days.
    pub fn mandatory_days(&self) -> Vec<(&ActivityId, Day)> {
        self.mandatory
            .iter()
            .filter_map(|m| m.day.or_else(|| self.grid.last_day()).map(|d| (&m.activity, d)))
            .collect()
    }

    /// Whether split sub-troops must share a slot for this activity.
    pub fn is_split_shared(&self, name: &str) -> bool {
        self.split_shared.iter().any(|a| a == name)
    }

    /// Per-slot troop capacity of an exclusive area.
    pub fn area_capacity(&self, area: &str) -> u32 {
        self.area_capacity.get(area).copied().unwrap_or(1)
    }

    /// Per-slot ceiling for a staff pool, if any.
    pub fn staff_ceiling(&self, staff: &str) -> Option<u32> {
        self.staff_ceilings.get(staff).copied()
    }

    /// The troop's commissioner: its own field, else the roster.
    pub fn commissioner_of<'a>(&'a self, troop: &'a Troop) -> Option<&'a str> {
        if let Some(c) = &troop.commissioner {
            return Some(c.as_str());
        }
        self.commissioners
            .iter()
            .find(|(_, troops)| troops.iter().any(|t| troop.name == t.as_str()))
            .map(|(c, _)| c.as_str())
    }

    /// Preference bands as inclusive `(low, high)` rank ranges; the last
    /// band is open (`high = None`).
    pub fn preference_bands(&self) -> Vec<(usize, Option<usize>)> {
        let mut bands = Vec::with_capacity(self.rank_bands.len() + 1);
        let mut low = 1;
        for &high in &self.rank_bands {
            bands.push((low, Some(high)));
            low = high + 1;
        }
        bands.push((low, None));
        bands
    }
}

fn ids(names: &[&str]) -> Vec<ActivityId> {
    names.iter().map(|&n| ActivityId::from(n)).collect()
}

fn standard_catalog() -> Vec<Activity> {
    const BEACH_STAFF: &str = "Beach Staff";
    const NATURE: &str = "Nature Director";
    const HANDICRAFTS: &str = "Handicrafts Director";
    const ODS: &str = "Outdoor Skills Director";
    const COMMISSIONER: &str = "Commissioner";

    let beach_staffed = |name: &str| Activity::new(name, Zone::Beach).with_staff(BEACH_STAFF).exclusive();
    let handicraft = |name: &str| {
        Activity::new(name, Zone::Beach)
            .with_area("Handicrafts")
            .with_staff(HANDICRAFTS)
    };
    let outdoor_skill = |name: &str| {
        Activity::new(name, Zone::OutdoorSkills)
            .with_area("Outdoor Skills")
            .with_staff(ODS)
    };
    let nature = |name: &str| Activity::new(name, Zone::Beach).with_staff(NATURE);

    vec![
        // Beach, unstaffed
        Activity::new("9 Square", Zone::Beach),
        Activity::new("Gaga Ball", Zone::Beach),
        Activity::new("Fishing", Zone::Beach).exclusive(),
        Activity::new("Sauna", Zone::Beach).exclusive(),
        Activity::new("Shower House", Zone::Beach).exclusive().blocked_on(Day::Monday),
        Activity::new("Trading Post", Zone::Beach).exclusive(),
        // Beach, waterfront staff
        Activity::new("Aqua Trampoline", Zone::Beach)
            .with_staff(BEACH_STAFF)
            .with_max_troops(2)
            .with_share_size_limit(16),
        beach_staffed("Troop Canoe"),
        beach_staffed("Troop Kayak"),
        beach_staffed("Canoe Snorkel").with_slots(2),
        beach_staffed("Float for Floats").with_slots(2),
        beach_staffed("Greased Watermelon"),
        beach_staffed("Underwater Obstacle Course"),
        beach_staffed("Troop Swim"),
        Activity::new("Water Polo", Zone::Beach)
            .with_staff(BEACH_STAFF)
            .with_max_troops(2),
        beach_staffed("Nature Canoe"),
        beach_staffed("Sailing").with_slots(2),
        // Nature center
        nature("Dr. DNA").with_area("Nature Center"),
        nature("Loon Lore").with_area("Nature Center"),
        nature("Ecosystem in a Jar").exclusive(),
        nature("Nature Salad").exclusive(),
        nature("Nature Bingo").exclusive(),
        // Handicrafts
        handicraft("Hemp Craft"),
        handicraft("Monkey's Fist"),
        handicraft("Tie Dye"),
        handicraft("Woggle Neckerchief Slide"),
        // Ranges
        Activity::new("Archery", Zone::Beach).with_staff(COMMISSIONER).exclusive(),
        Activity::new("Troop Rifle", Zone::Beach).with_area("Rifle Range"),
        Activity::new("Troop Shotgun", Zone::Beach)
            .with_area("Rifle Range")
            .with_max_troop_size(15),
        // Tower and outdoor skills
        Activity::new("Climbing Tower", Zone::Tower)
            .exclusive()
            .with_large_troop_slots(16, 2),
        outdoor_skill("Chopped!"),
        outdoor_skill("GPS & Geocaching"),
        outdoor_skill("Knots and Lashings"),
        outdoor_skill("Orienteering"),
        outdoor_skill("Ultimate Survivor"),
        outdoor_skill("What's Cooking"),
        // Commissioner-led
        Activity::new("Delta", Zone::Delta).with_staff(COMMISSIONER).exclusive(),
        Activity::new("Super Troop", Zone::Beach).with_staff(COMMISSIONER).exclusive(),
        // Off-camp
        Activity::new("Back of the Moon", Zone::OffCamp).with_slots(3),
        Activity::new("Disc Golf", Zone::OffCamp).exclusive(),
        Activity::new("Itasca State Park", Zone::OffCamp).with_slots(3),
        Activity::new("Tamarac Wildlife Refuge", Zone::OffCamp).with_slots(3),
        Activity::new("History Center", Zone::OffCamp).exclusive(),
        // Campsite
        Activity::new("Campsite Free Time", Zone::Campsite).repeatable(),
        Activity::new("Reflection", Zone::Campsite).with_staff(COMMISSIONER),
    ]
}

impl Default for CampConfig {
    fn default() -> Self {
        Self {
            grid: SlotGrid::default(),
            catalog: Catalog::new(standard_catalog()),
            area_capacity: BTreeMap::new(),
            staff_ceilings: BTreeMap::from([("Beach Staff".to_string(), 4)]),
            accuracy: AccuracyRule {
                activities: ids(&["Troop Rifle", "Troop Shotgun", "Archery"]),
                max_per_day: 1,
            },
            beach: BeachRule {
                activities: ids(&[
                    "Water Polo",
                    "Greased Watermelon",
                    "Aqua Trampoline",
                    "Troop Swim",
                    "Underwater Obstacle Course",
                    "Troop Canoe",
                    "Troop Kayak",
                    "Nature Canoe",
                ]),
                allowed_slots: vec![1, 3],
                open_days: vec![Day::Thursday],
                slot_two_max_rank: 5,
            },
            wet_dry: WetDryRule {
                wet: ids(&[
                    "Aqua Trampoline",
                    "Water Polo",
                    "Greased Watermelon",
                    "Troop Swim",
                    "Underwater Obstacle Course",
                    "Troop Canoe",
                    "Troop Kayak",
                    "Canoe Snorkel",
                    "Nature Canoe",
                    "Float for Floats",
                    "Sailing",
                    "Sauna",
                ]),
                tower_ods: ids(&[
                    "Climbing Tower",
                    "Knots and Lashings",
                    "Orienteering",
                    "GPS & Geocaching",
                    "Ultimate Survivor",
                    "What's Cooking",
                    "Chopped!",
                ]),
            },
            long_activities: LongActivityRule {
                activities: ids(&["Tamarac Wildlife Refuge", "Itasca State Park", "Back of the Moon"]),
                max_per_troop: 1,
            },
            same_day_conflicts: [
                ("Trading Post", "Campsite Free Time"),
                ("Trading Post", "Shower House"),
                ("Aqua Trampoline", "Water Polo"),
                ("Aqua Trampoline", "Greased Watermelon"),
                ("Water Polo", "Greased Watermelon"),
                ("Troop Canoe", "Canoe Snorkel"),
                ("Troop Canoe", "Nature Canoe"),
                ("Troop Canoe", "Float for Floats"),
                ("Canoe Snorkel", "Nature Canoe"),
                ("Canoe Snorkel", "Float for Floats"),
                ("Nature Canoe", "Float for Floats"),
            ]
            .into_iter()
            .map(|(a, b)| (ActivityId::from(a), ActivityId::from(b)))
            .collect(),
            clustering_zones: vec![
                ClusteringZone {
                    name: "Tower & Outdoor Skills".into(),
                    activities: ids(&[
                        "Climbing Tower",
                        "Knots and Lashings",
                        "Orienteering",
                        "GPS & Geocaching",
                        "Ultimate Survivor",
                        "What's Cooking",
                        "Chopped!",
                    ]),
                },
                ClusteringZone {
                    name: "Handicrafts".into(),
                    activities: ids(&["Tie Dye", "Hemp Craft", "Woggle Neckerchief Slide", "Monkey's Fist"]),
                },
                ClusteringZone {
                    name: "Nature".into(),
                    activities: ids(&[
                        "Dr. DNA",
                        "Loon Lore",
                        "Ecosystem in a Jar",
                        "Nature Salad",
                        "Nature Bingo",
                    ]),
                },
            ],
            swappable: ids(&[
                "Campsite Free Time",
                "Gaga Ball",
                "9 Square",
                "Fishing",
                "Trading Post",
                "Sauna",
            ]),
            default_fill: ids(&[
                "Super Troop",
                "Aqua Trampoline",
                "Archery",
                "Water Polo",
                "Troop Rifle",
                "Gaga Ball",
                "9 Square",
                "Troop Swim",
                "Sailing",
                "Trading Post",
                "GPS & Geocaching",
                "Hemp Craft",
                "Dr. DNA",
                "Loon Lore",
                "Fishing",
                "Campsite Free Time",
            ]),
            mandatory: vec![MandatoryActivity {
                activity: "Reflection".into(),
                day: Some(Day::Friday),
            }],
            split_shared: ids(&["Reflection"]),
            rank_bands: default_rank_bands(),
            commissioners: BTreeMap::new(),
            commissioner_days: BTreeMap::new(),
            clustering_iteration_cap: default_iteration_cap(),
        }
    }
}
