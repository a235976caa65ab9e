use crate::selection::Filter;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// Embedded CSV data for the tracked salmonid species.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/species.csv");

/// Label used when the species filter is "all".
pub const ALL_SPECIES_LABEL: &str = "All Species";

/// Species id carried by the Chinook spawner estimates.
pub const CHINOOK: &str = "chinook";

/// A Pacific salmonid species offered in the species filter.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Species {
    pub id: String,
    pub slug: String,
    pub common_name: String,
    pub scientific_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesCatalog {
    species: Vec<Species>,
}

impl SpeciesCatalog {
    pub fn pacific_salmon() -> anyhow::Result<Self> {
        Ok(Self {
            species: Species::parse_species_csv(CSV_OBJECT)?,
        })
    }

    pub fn list(&self) -> &[Species] {
        &self.species
    }

    pub fn by_id(&self, id: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.id == id)
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.slug == slug)
    }

    /// Human label for a species filter. Unknown ids are shown verbatim.
    pub fn display_name(&self, filter: &Filter) -> String {
        match filter {
            Filter::All => ALL_SPECIES_LABEL.to_string(),
            Filter::Only(id) => self
                .by_id(id)
                .or_else(|| self.by_slug(id))
                .map(|s| s.common_name.clone())
                .unwrap_or_else(|| id.clone()),
        }
    }
}

impl Species {
    /// Parse a CSV string of species data.
    ///
    /// Expected CSV columns: id, slug, common_name, scientific_name
    pub fn parse_species_csv(csv_object: &str) -> anyhow::Result<Vec<Species>> {
        let mut species_list: Vec<Species> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row?;
            let field = |idx: usize, name: &str| -> anyhow::Result<String> {
                record
                    .get(idx)
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| anyhow::anyhow!("{} parse fail", name))
            };
            species_list.push(Species {
                id: field(0, "id")?,
                slug: field(1, "slug")?,
                common_name: field(2, "common_name")?,
                scientific_name: field(3, "scientific_name")?,
            });
        }
        Ok(species_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacific_salmon() {
        let catalog = SpeciesCatalog::pacific_salmon().unwrap();
        assert_eq!(catalog.list().len(), 6);
        let chinook = catalog.by_id(CHINOOK).unwrap();
        assert_eq!(chinook.scientific_name, "Oncorhynchus tshawytscha");
        assert_eq!(catalog.by_slug("steelhead").unwrap().common_name, "Steelhead");
    }

    #[test]
    fn test_display_name() {
        let catalog = SpeciesCatalog::pacific_salmon().unwrap();
        assert_eq!(catalog.display_name(&Filter::All), "All Species");
        assert_eq!(catalog.display_name(&Filter::only("coho")), "Coho");
        assert_eq!(catalog.display_name(&Filter::only("bull-trout")), "bull-trout");
    }

    #[test]
    fn test_parse_empty_csv() {
        let csv_data = "ID,SLUG,COMMON NAME,SCIENTIFIC NAME\n";
        assert!(Species::parse_species_csv(csv_data).unwrap().is_empty());
    }
}
