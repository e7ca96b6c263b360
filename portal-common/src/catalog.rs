//! Reference-data catalogs
//!
//! Loaded once at startup into immutable structures; the server shares
//! them read-only for the life of the process. Loading is resilient by
//! design: a missing or malformed reference file must never keep the
//! server from starting, so every failure degrades to an empty catalog
//! with a logged warning.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

/// Occupation column header in the consolidated services CSV
const OCCUPATION_COLUMN: &str = "OCCUPATION";

/// Service column header in the consolidated services CSV
const SERVICE_COLUMN: &str = "SERVICE";

/// Organization column header in the organizations CSV
const ORGANIZATION_COLUMN: &str = "organization";

/// Fallback activity types used only when the occupation list comes up empty
const DEFAULT_OCCUPATIONS: [&str; 2] = ["General Services", "Other"];

/// Occupation reference data: distinct occupations in first-seen order and
/// the occupation -> ordered distinct service list mapping
#[derive(Debug, Clone, Default)]
pub struct OccupationCatalog {
    occupations: Vec<String>,
    services: HashMap<String, Vec<String>>,
}

impl OccupationCatalog {
    /// Load the catalog from the consolidated services CSV.
    ///
    /// Every non-empty occupation cell enters the occupation list, even
    /// when its service cell is blank; the occupation -> services mapping
    /// requires both cells. Duplicates are dropped while preserving
    /// first-seen order. A file that cannot be read or parsed yields the
    /// fallback occupation list and an empty mapping.
    pub fn load(path: &Path) -> Self {
        let mut catalog = Self::default();

        match csv::Reader::from_path(path) {
            Ok(mut reader) => {
                let (occ_idx, svc_idx) = match reader.headers() {
                    Ok(headers) => (
                        headers.iter().position(|h| h == OCCUPATION_COLUMN),
                        headers.iter().position(|h| h == SERVICE_COLUMN),
                    ),
                    Err(e) => {
                        warn!("Unreadable header in {}: {}", path.display(), e);
                        (None, None)
                    }
                };

                for record in reader.records().flatten() {
                    let occupation = occ_idx
                        .and_then(|i| record.get(i))
                        .unwrap_or("")
                        .trim()
                        .to_string();
                    let service = svc_idx
                        .and_then(|i| record.get(i))
                        .unwrap_or("")
                        .trim()
                        .to_string();

                    if occupation.is_empty() {
                        continue;
                    }

                    if !catalog.occupations.contains(&occupation) {
                        catalog.occupations.push(occupation.clone());
                    }

                    // The mapping needs both cells; the list above does not
                    if service.is_empty() {
                        continue;
                    }
                    let services = catalog.services.entry(occupation).or_default();
                    if !services.contains(&service) {
                        services.push(service);
                    }
                }
            }
            Err(e) => {
                warn!("Occupation catalog unavailable ({}): {}", path.display(), e);
            }
        }

        if catalog.occupations.is_empty() {
            catalog.occupations = DEFAULT_OCCUPATIONS.iter().map(|s| s.to_string()).collect();
        }

        catalog
    }

    /// Distinct occupation names in first-seen order
    pub fn occupations(&self) -> &[String] {
        &self.occupations
    }

    /// Ordered distinct services for one occupation
    pub fn services_for(&self, occupation: &str) -> Option<&[String]> {
        self.services.get(occupation).map(|v| v.as_slice())
    }

    /// Full occupation -> services mapping (for the config endpoint)
    pub fn service_map(&self) -> &HashMap<String, Vec<String>> {
        &self.services
    }
}

/// Load the distinct organization names, sorted lexicographically.
///
/// A missing or malformed file yields an empty list; there is no fallback
/// default for organizations.
pub fn load_organizations(path: &Path) -> Vec<String> {
    let mut organizations: Vec<String> = Vec::new();

    match csv::Reader::from_path(path) {
        Ok(mut reader) => {
            let org_idx = reader
                .headers()
                .ok()
                .and_then(|headers| headers.iter().position(|h| h == ORGANIZATION_COLUMN));

            for record in reader.records().flatten() {
                let name = org_idx
                    .and_then(|i| record.get(i))
                    .unwrap_or("")
                    .trim()
                    .to_string();
                if !name.is_empty() && !organizations.contains(&name) {
                    organizations.push(name);
                }
            }
        }
        Err(e) => {
            warn!("Organization list unavailable ({}): {}", path.display(), e);
        }
    }

    organizations.sort();
    organizations
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn catalog_preserves_first_seen_order_and_dedupes() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "services.csv",
            "OCCUPATION,SERVICE\n\
             Carpenter,Fence repair\n\
             Mason,Sidewalk repair\n\
             Carpenter,Fence repair\n\
             Carpenter,Door fitting\n",
        );

        let catalog = OccupationCatalog::load(&path);
        assert_eq!(catalog.occupations(), ["Carpenter", "Mason"]);
        assert_eq!(
            catalog.services_for("Carpenter").unwrap(),
            ["Fence repair", "Door fitting"]
        );
        assert!(catalog.services_for("Plumber").is_none());
    }

    #[test]
    fn occupation_is_listed_even_when_its_service_cell_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "services.csv",
            "OCCUPATION,SERVICE\nCarpenter,\n,Fence repair\nMason,Paving\n",
        );

        let catalog = OccupationCatalog::load(&path);
        // A blank service cell keeps the occupation but contributes no mapping
        assert_eq!(catalog.occupations(), ["Carpenter", "Mason"]);
        assert!(catalog.services_for("Carpenter").is_none());
        assert_eq!(catalog.services_for("Mason").unwrap(), ["Paving"]);
        // A blank occupation cell contributes nothing at all
        assert!(!catalog.service_map().values().flatten().any(|s| s == "Fence repair"));
    }

    #[test]
    fn missing_catalog_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let catalog = OccupationCatalog::load(&dir.path().join("absent.csv"));
        assert_eq!(catalog.occupations(), DEFAULT_OCCUPATIONS);
        assert!(catalog.service_map().is_empty());
    }

    #[test]
    fn organizations_are_sorted_and_deduped() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "organizations.csv",
            "organization\nDept of Works\nDept of Parks\nDept of Works\n",
        );

        let organizations = load_organizations(&path);
        assert_eq!(organizations, ["Dept of Parks", "Dept of Works"]);
    }

    #[test]
    fn missing_organizations_file_yields_empty_list() {
        let dir = TempDir::new().unwrap();
        assert!(load_organizations(&dir.path().join("absent.csv")).is_empty());
    }
}
