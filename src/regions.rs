//! Static region and allergen reference data
//!
//! The DWD reports its pollen forecast for a fixed set of region/partregion
//! units. This table backs the CLI's `--list` surface only; the clients
//! always work from the keys actually present in the report.

use serde::Serialize;

/// All forecast regions with their partregions, as `(region_id, region_name,
/// [(partregion_id, partregion_name)])`
pub const REGIONS: &[(i64, &str, &[(i64, &str)])] = &[
    (
        10,
        "Schleswig-Holstein und Hamburg",
        &[
            (11, "Inseln und Marschen"),
            (12, "Geest, Schleswig-Holstein und Hamburg"),
        ],
    ),
    (20, "Mecklenburg-Vorpommern", &[(-1, "")]),
    (
        30,
        "Niedersachsen und Bremen",
        &[(31, "Westl. Niedersachsen/Bremen"), (32, "Östl. Niedersachsen")],
    ),
    (
        40,
        "Nordrhein-Westfalen",
        &[
            (41, "Rhein.-Westfäl. Tiefland"),
            (42, "Ostwestfalen"),
            (43, "Mittelgebirge NRW"),
        ],
    ),
    (50, "Brandenburg und Berlin", &[(-1, "")]),
    (
        60,
        "Sachsen-Anhalt",
        &[(61, "Tiefland Sachsen-Anhalt"), (62, "Harz")],
    ),
    (
        70,
        "Thüringen",
        &[(71, "Tiefland Thüringen"), (72, "Mittelgebirge Thüringen")],
    ),
    (
        80,
        "Sachsen",
        &[(81, "Tiefland Sachsen"), (82, "Mittelgebirge Sachsen")],
    ),
    (
        90,
        "Hessen",
        &[(91, "Nordhessen und hess. Mittelgebirge"), (92, "Rhein-Main")],
    ),
    (
        100,
        "Rheinland-Pfalz und Saarland",
        &[
            (101, "Rhein, Pfalz, Nahe und Mosel"),
            (102, "Mittelgebirgsbereich Rheinland-Pfalz"),
            (103, "Saarland"),
        ],
    ),
    (
        110,
        "Baden-Württemberg",
        &[
            (111, "Oberrhein und unteres Neckartal"),
            (112, "Hohenlohe/mittlerer Neckar/Oberschwaben"),
            (113, "Mittelgebirge Baden-Württemberg"),
        ],
    ),
    (
        120,
        "Bayern",
        &[
            (121, "Allgäu/Oberbayern/Bay. Wald"),
            (122, "Donauniederungen"),
            (123, "Bayern n. der Donau, o. Bayr. Wald, o. Mainfranken"),
            (124, "Mainfranken"),
        ],
    ),
];

/// The eight allergens the report covers, with botanical names and the
/// months of their German season
pub const ALLERGENS: &[(&str, &str, &[u32])] = &[
    ("Ambrosia", "Ambrosia artemisiifolia", &[7, 8, 9, 10]),
    ("Beifuss", "Artemisia vulgaris", &[7, 8, 9]),
    ("Birke", "Betula", &[3, 4, 5]),
    ("Erle", "Alnus", &[1, 2, 3, 4]),
    ("Esche", "Fraxinus excelsior", &[3, 4, 5]),
    ("Gräser", "Poaceae", &[5, 6, 7, 8, 9]),
    ("Hasel", "Corylus", &[1, 2, 3, 4]),
    ("Roggen", "Secale cereale", &[5, 6, 7]),
];

/// One row of the `--list` output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionListing {
    pub region_id: i64,
    pub partregion_id: i64,
    /// Region name, with the partregion appended when it has one
    pub name: String,
}

/// The full region catalog as display rows
#[must_use]
pub fn region_catalog() -> Vec<RegionListing> {
    let mut listings = Vec::new();
    for (region_id, region_name, partregions) in REGIONS {
        for (partregion_id, partregion_name) in *partregions {
            let name = if partregion_name.is_empty() {
                (*region_name).to_string()
            } else {
                format!("{region_name} - {partregion_name}")
            };
            listings.push(RegionListing {
                region_id: *region_id,
                partregion_id: *partregion_id,
                name,
            });
        }
    }
    listings
}

/// Botanical name of an allergen, if it is one of the reported eight
#[must_use]
pub fn botanical_name(allergen: &str) -> Option<&'static str> {
    ALLERGENS
        .iter()
        .find(|(name, _, _)| *name == allergen)
        .map(|(_, botanical, _)| *botanical)
}

/// Whether an allergen is in season in the given month (1-12)
#[must_use]
pub fn in_season(allergen: &str, month: u32) -> bool {
    ALLERGENS
        .iter()
        .find(|(name, _, _)| *name == allergen)
        .is_some_and(|(_, _, months)| months.contains(&month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_all_units() {
        let catalog = region_catalog();
        assert_eq!(catalog.len(), 27);

        let berlin = catalog
            .iter()
            .find(|l| l.region_id == 50)
            .expect("Berlin/Brandenburg entry");
        assert_eq!(berlin.partregion_id, -1);
        assert_eq!(berlin.name, "Brandenburg und Berlin");

        let frisia = catalog
            .iter()
            .find(|l| l.region_id == 10 && l.partregion_id == 11)
            .expect("Inseln und Marschen entry");
        assert_eq!(
            frisia.name,
            "Schleswig-Holstein und Hamburg - Inseln und Marschen"
        );
    }

    #[test]
    fn test_botanical_name() {
        assert_eq!(botanical_name("Birke"), Some("Betula"));
        assert_eq!(botanical_name("Eiche"), None);
    }

    #[test]
    fn test_in_season() {
        assert!(in_season("Birke", 4));
        assert!(!in_season("Birke", 8));
        assert!(!in_season("Eiche", 4));
    }
}
