//! NPC skin catalog.
//!
//! Room growth only needs one question answered: which skins exist for a
//! threat tier and faction category. [`NpcCatalog`] is that seam; the asset
//! pipeline behind it is someone else's problem. [`StaticCatalog`] is a plain
//! list of entries, built in or loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::faction::Faction;

/// Subgroup value that matches every entry.
pub const ANY_SUBGROUP: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NpcCriteria<'a> {
    pub threat: u8,
    pub macro_category: &'a str,
    pub subgroup: &'a str,
}

pub trait NpcCatalog {
    /// Skins matching `criteria`, in catalog order. Empty means no NPC is
    /// available and the spawn slot is skipped.
    fn npcs_by_criteria(&self, criteria: &NpcCriteria<'_>) -> Vec<String>;
}

impl<T: NpcCatalog + ?Sized> NpcCatalog for &T {
    fn npcs_by_criteria(&self, criteria: &NpcCriteria<'_>) -> Vec<String> {
        (**self).npcs_by_criteria(criteria)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcEntry {
    pub skin: String,
    pub threat: u8,
    pub macro_category: String,
    pub subgroup: String,
}

impl NpcEntry {
    fn matches(&self, criteria: &NpcCriteria<'_>) -> bool {
        self.threat == criteria.threat
            && self.macro_category == criteria.macro_category
            && (criteria.subgroup == ANY_SUBGROUP || self.subgroup == criteria.subgroup)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCatalog {
    pub entries: Vec<NpcEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<NpcEntry>) -> Self {
        Self { entries }
    }

    /// Stock roster: a trooper and a specialist per faction and tier, plus a
    /// tier-4 commander.
    pub fn builtin() -> Self {
        let mut entries = Vec::new();
        for faction in Faction::ALL {
            for threat in 1..=4u8 {
                for subgroup in ["trooper", "specialist"] {
                    entries.push(NpcEntry {
                        skin: format!("{}_{}_t{}", faction.slug(), subgroup, threat),
                        threat,
                        macro_category: faction.macro_category().to_string(),
                        subgroup: subgroup.to_string(),
                    });
                }
            }
            entries.push(NpcEntry {
                skin: format!("{}_commander", faction.slug()),
                threat: 4,
                macro_category: faction.macro_category().to_string(),
                subgroup: "commander".to_string(),
            });
        }
        Self::new(entries)
    }

    /// Load a catalog from a JSON array of entries.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let entries: Vec<NpcEntry> = serde_json::from_str(json)?;
        if let Some(bad) = entries.iter().find(|e| !(1..=4).contains(&e.threat)) {
            return Err(ConfigError::Invalid(format!(
                "NPC {} has threat {} outside 1..=4",
                bad.skin, bad.threat
            )));
        }
        Ok(Self::new(entries))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NpcCatalog for StaticCatalog {
    fn npcs_by_criteria(&self, criteria: &NpcCriteria<'_>) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.matches(criteria))
            .map(|e| e.skin.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_faction_and_tier() {
        let catalog = StaticCatalog::builtin();
        for faction in Faction::ALL {
            for threat in 1..=4 {
                let skins = catalog.npcs_by_criteria(&NpcCriteria {
                    threat,
                    macro_category: faction.macro_category(),
                    subgroup: ANY_SUBGROUP,
                });
                assert!(!skins.is_empty(), "{:?} tier {} has no skins", faction, threat);
            }
        }
    }

    #[test]
    fn test_subgroup_filter() {
        let catalog = StaticCatalog::builtin();
        let all = catalog.npcs_by_criteria(&NpcCriteria {
            threat: 4,
            macro_category: "raider",
            subgroup: ANY_SUBGROUP,
        });
        assert_eq!(
            all,
            vec!["corsair_trooper_t4", "corsair_specialist_t4", "corsair_commander"]
        );
        let commanders = catalog.npcs_by_criteria(&NpcCriteria {
            threat: 4,
            macro_category: "raider",
            subgroup: "commander",
        });
        assert_eq!(commanders, vec!["corsair_commander"]);
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let catalog = StaticCatalog::builtin();
        let skins = catalog.npcs_by_criteria(&NpcCriteria {
            threat: 1,
            macro_category: "wildlife",
            subgroup: ANY_SUBGROUP,
        });
        assert!(skins.is_empty());
    }

    #[test]
    fn test_json_roundtrip_and_threat_check() {
        let json = r#"[
            { "skin": "drone_a", "threat": 1, "macro_category": "machine", "subgroup": "drone" }
        ]"#;
        let catalog = StaticCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 1);

        let bad = r#"[
            { "skin": "titan", "threat": 9, "macro_category": "machine", "subgroup": "boss" }
        ]"#;
        assert!(matches!(
            StaticCatalog::from_json_str(bad),
            Err(ConfigError::Invalid(_))
        ));
    }
}
