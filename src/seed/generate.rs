//! Random records scattered around a center point.

use rand::seq::SliceRandom;
use rand::Rng;

use poi_locator::models::{Category, Coordinates, PoiDraft};

use crate::landmarks::random_rating;

/// Kilometers per degree of latitude
const KM_PER_DEGREE: f64 = 111.0;

const NAMES: &[(Category, &[&str])] = &[
    (
        Category::Restaurant,
        &[
            "Harbor Light Cafe",
            "Corner Table Diner",
            "Riverside Grill",
            "Copper Pot Kitchen",
            "Old Mill Bistro",
            "Market Street Eats",
            "Lantern House",
            "Green Fork",
        ],
    ),
    (
        Category::Hotel,
        &[
            "Parkview Inn",
            "Harbor Suites",
            "Station Lodge",
            "Riverside Hotel",
            "Gateway Inn",
            "Meridian House",
        ],
    ),
    (
        Category::Park,
        &[
            "Community Park",
            "Riverbank Commons",
            "Oak Hollow Preserve",
            "Memorial Gardens",
            "Millpond Green",
            "Hilltop Meadow",
        ],
    ),
    (
        Category::Shopping,
        &[
            "Town Center Mall",
            "Central Market",
            "Canal Street Plaza",
            "Westgate Shops",
            "Union Marketplace",
        ],
    ),
    (
        Category::Landmark,
        &[
            "City Hall",
            "Clock Tower",
            "Founders Monument",
            "Harbor Lighthouse",
            "Heritage Fountain",
            "Welcome Center",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "Majestic Theater",
            "Family Fun Center",
            "Starlight Cinema",
            "Lanes Bowling",
            "Civic Arena",
        ],
    ),
    (
        Category::Transport,
        &[
            "Central Station",
            "Transit Center",
            "Ferry Terminal",
            "Commuter Hub",
            "Airport Shuttle Stop",
        ],
    ),
    (
        Category::Museum,
        &[
            "History Museum",
            "Cultural Center",
            "Science Center",
            "Modern Art Gallery",
            "Maritime Museum",
        ],
    ),
];

const AREAS: &[&str] = &["Downtown", "Riverside", "Uptown", "Harbor District"];
const STREET_NUMBERS: &[&str] = &["123", "456", "789", "321", "654", "987"];
const STREET_NAMES: &[&str] = &["Main St", "Oak Ave", "Pine Rd", "Cedar Ln", "Maple Dr", "Elm St"];
const AREA_CODES: &[&str] = &["212", "646", "718", "917"];

/// Area that scattered records are placed in
#[derive(Debug, Clone, Copy)]
pub struct ScatterArea {
    pub center_lat: f64,
    pub center_lng: f64,
    pub radius_km: f64,
}

impl ScatterArea {
    /// Random lon/lat within roughly `radius_km` of the center
    pub fn point<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let distance = rng.gen_range(0.0..=self.radius_km.max(0.0));

        let lat_offset = distance / KM_PER_DEGREE * angle.cos();
        let lng_offset =
            distance / (KM_PER_DEGREE * self.center_lat.to_radians().cos()) * angle.sin();

        (self.center_lng + lng_offset, self.center_lat + lat_offset)
    }

    /// A fully populated random record
    pub fn draft<R: Rng>(&self, rng: &mut R) -> Result<PoiDraft, String> {
        let (lng, lat) = self.point(rng);
        let location = Coordinates::new(lng, lat)?;

        let (category, names) = NAMES.choose(rng).ok_or_else(|| "no names".to_string())?;
        let mut name = names.choose(rng).copied().unwrap_or("Unnamed").to_string();
        if rng.gen_bool(0.3) {
            name.push_str(&format!(" #{}", rng.gen_range(1..=5)));
        }

        let mut draft = PoiDraft::new(name, *category, location).with_rating(random_rating(rng));
        draft.description = format!(
            "A popular {} in the {} area.",
            category,
            pick(rng, AREAS)
        );
        draft.address = format!("{} {}", pick(rng, STREET_NUMBERS), pick(rng, STREET_NAMES));
        draft.phone = format!(
            "({}) {}-{}",
            pick(rng, AREA_CODES),
            rng.gen_range(100..=999),
            rng.gen_range(1000..=9999)
        );
        draft.website = website_for(&draft.name);
        Ok(draft)
    }
}

fn pick<R: Rng>(rng: &mut R, options: &[&'static str]) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

fn website_for(name: &str) -> String {
    let slug: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    format!("https://www.{}.com", slug)
}
