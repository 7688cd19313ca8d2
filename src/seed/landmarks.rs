//! Fixed New York City landmarks and random records inside the city.

use rand::seq::SliceRandom;
use rand::Rng;

use poi_locator::models::{Category, Coordinates, PoiDraft};

pub struct Landmark {
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub address: &'static str,
    pub longitude: f64,
    pub latitude: f64,
    pub rating: f64,
}

impl Landmark {
    pub fn draft(&self) -> Result<PoiDraft, String> {
        let location = Coordinates::new(self.longitude, self.latitude)?;
        let mut draft = PoiDraft::new(self.name, self.category, location).with_rating(self.rating);
        draft.description = self.description.to_string();
        draft.address = self.address.to_string();
        Ok(draft)
    }
}

pub const NYC_LANDMARKS: [Landmark; 10] = [
    Landmark {
        name: "Times Square",
        category: Category::Landmark,
        description: "Famous commercial intersection and tourist destination",
        address: "Manhattan, NY 10036",
        longitude: -74.0060,
        latitude: 40.7580,
        rating: 4.2,
    },
    Landmark {
        name: "Central Park",
        category: Category::Park,
        description: "Urban oasis with walking trails and recreational facilities",
        address: "Manhattan, NY 10024",
        longitude: -73.9654,
        latitude: 40.7829,
        rating: 4.8,
    },
    Landmark {
        name: "Statue of Liberty",
        category: Category::Landmark,
        description: "Iconic symbol of freedom and democracy",
        address: "Liberty Island, NY 10004",
        longitude: -74.0445,
        latitude: 40.6892,
        rating: 4.6,
    },
    Landmark {
        name: "Empire State Building",
        category: Category::Landmark,
        description: "Art Deco skyscraper and observation deck",
        address: "350 5th Ave, NY 10118",
        longitude: -73.9857,
        latitude: 40.7484,
        rating: 4.4,
    },
    Landmark {
        name: "Brooklyn Bridge",
        category: Category::Landmark,
        description: "Historic suspension bridge connecting Manhattan and Brooklyn",
        address: "Brooklyn Bridge, NY 10038",
        longitude: -73.9969,
        latitude: 40.7061,
        rating: 4.5,
    },
    Landmark {
        name: "Metropolitan Museum of Art",
        category: Category::Museum,
        description: "World-renowned art museum with extensive collections",
        address: "1000 5th Ave, NY 10028",
        longitude: -73.9632,
        latitude: 40.7794,
        rating: 4.7,
    },
    Landmark {
        name: "Broadway",
        category: Category::Entertainment,
        description: "Famous theater district and entertainment hub",
        address: "Manhattan, NY 10036",
        longitude: -73.9857,
        latitude: 40.7589,
        rating: 4.3,
    },
    Landmark {
        name: "High Line",
        category: Category::Park,
        description: "Elevated park built on former railway tracks",
        address: "Manhattan, NY 10011",
        longitude: -74.0060,
        latitude: 40.7484,
        rating: 4.6,
    },
    Landmark {
        name: "Wall Street",
        category: Category::Landmark,
        description: "Financial district and historic trading center",
        address: "Manhattan, NY 10005",
        longitude: -74.0109,
        latitude: 40.7064,
        rating: 4.1,
    },
    Landmark {
        name: "Rockefeller Center",
        category: Category::Entertainment,
        description: "Complex of commercial buildings and entertainment venues",
        address: "45 Rockefeller Plaza, NY 10111",
        longitude: -73.9787,
        latitude: 40.7587,
        rating: 4.4,
    },
];

/// Approximate city bounds: (min, max) latitude and longitude
pub const NYC_LAT: (f64, f64) = (40.4774, 40.9176);
pub const NYC_LNG: (f64, f64) = (-74.2591, -73.7004);

/// Rating in [3, 5] at one decimal
pub fn random_rating<R: Rng>(rng: &mut R) -> f64 {
    (rng.gen_range(3.0..=5.0_f64) * 10.0).round() / 10.0
}

/// The `n`th random record inside the city bounds
pub fn random_city_draft<R: Rng>(rng: &mut R, n: usize) -> Result<PoiDraft, String> {
    let latitude = rng.gen_range(NYC_LAT.0..=NYC_LAT.1);
    let longitude = rng.gen_range(NYC_LNG.0..=NYC_LNG.1);
    let category = *Category::all()
        .choose(rng)
        .ok_or_else(|| "no categories".to_string())?;

    let mut draft = PoiDraft::new(
        format!("Random {} {}", category.label(), n),
        category,
        Coordinates::new(longitude, latitude)?,
    )
    .with_rating(random_rating(rng));
    draft.description = format!("A randomly generated {} in NYC", category);
    draft.address = format!("Random Address {}, NYC", n);
    Ok(draft)
}
