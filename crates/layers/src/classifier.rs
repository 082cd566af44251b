use serde::{Deserialize, Serialize};

use crate::symbology::IconKey;

/// Category name that maps straight to an icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactRule {
    pub name: String,
    pub icon: IconKey,
}

/// Substring heuristic: any fragment contained in a token selects `icon`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentRule {
    pub any_of: Vec<String>,
    pub icon: IconKey,
}

/// Category classification tables.
///
/// Matching is case-sensitive. `exact` is priority ordered: when several
/// tokens match, the earliest rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub exact: Vec<ExactRule>,
    pub fragments: Vec<FragmentRule>,
    pub default_icon: IconKey,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let exact = [
            ("Arms control", "icon-arms-control"),
            ("Cultural Diplomacy (Defence)", "icon-cultural-diplomacy"),
            ("Cultural Diplomacy", "icon-cultural-diplomacy"),
            ("Defence Cooperation", "icon-defence-cooperation"),
            ("Defence Infrastructure", "icon-defence-infrastructure"),
            ("HADR \u{2013} Disaster Response", "icon-hadr"),
            ("HADR - Disaster Response", "icon-hadr"),
            ("HADR", "icon-hadr"),
            ("Disaster Response", "icon-hadr"),
            ("Maritime Security", "icon-maritime-security"),
            ("Military Exercises", "icon-military-exercises"),
            ("Military Medical Diplomacy", "icon-military-medical"),
            ("Medical Diplomacy", "icon-military-medical"),
            ("MIL-POL Engagement", "icon-milpol"),
            ("MIL - POL Engagement", "icon-milpol"),
            ("MIL POL Engagement", "icon-milpol"),
            ("Public Diplomacy", "icon-public-diplomacy"),
            ("Sports Diplomacy (Defence)", "icon-sports-diplomacy"),
            ("Sports Diplomacy", "icon-sports-diplomacy"),
            ("Training", "icon-training"),
            ("Visit Diplomacy (Defence)", "icon-visit-diplomacy"),
            ("Visit Diplomacy", "icon-visit-diplomacy"),
            ("Griffith", "icon-griffith"),
        ]
        .into_iter()
        .map(|(name, icon)| ExactRule {
            name: name.to_string(),
            icon: IconKey::new(icon),
        })
        .collect();

        let fragments: [(&[&str], &str); 14] = [
            (&["Arms"], "icon-arms-control"),
            (&["Cultural"], "icon-cultural-diplomacy"),
            (&["Defence Coop"], "icon-defence-cooperation"),
            (&["Infrastructure"], "icon-defence-infrastructure"),
            (&["HADR", "Disaster"], "icon-hadr"),
            (&["Maritime"], "icon-maritime-security"),
            (&["Exercise"], "icon-military-exercises"),
            (&["Medical"], "icon-military-medical"),
            (&["MIL-POL", "MIL POL", "MIL - POL"], "icon-milpol"),
            (&["Public"], "icon-public-diplomacy"),
            (&["Sports"], "icon-sports-diplomacy"),
            (&["Training"], "icon-training"),
            (&["Visit"], "icon-visit-diplomacy"),
            (&["Griffith"], "icon-griffith"),
        ];
        let fragments = fragments
            .into_iter()
            .map(|(any_of, icon)| FragmentRule {
                any_of: any_of.iter().map(|s| s.to_string()).collect(),
                icon: IconKey::new(icon),
            })
            .collect();

        Self {
            exact,
            fragments,
            default_icon: IconKey::default_icon(),
        }
    }
}

/// Total mapping from parsed category tokens to an icon.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Exact match over all tokens first, then fragment rules token by token,
    /// then the default icon.
    pub fn classify(&self, tokens: &[&str]) -> &IconKey {
        if let Some(rule) = self
            .config
            .exact
            .iter()
            .find(|rule| tokens.iter().any(|t| *t == rule.name))
        {
            return &rule.icon;
        }

        for token in tokens {
            if let Some(rule) = self
                .config
                .fragments
                .iter()
                .find(|rule| rule.any_of.iter().any(|f| token.contains(f.as_str())))
            {
                return &rule.icon;
            }
        }

        &self.config.default_icon
    }

    /// Every icon the tables can produce, default included, without repeats.
    pub fn icon_keys(&self) -> Vec<&IconKey> {
        let mut out: Vec<&IconKey> = Vec::new();
        let all = self
            .config
            .exact
            .iter()
            .map(|r| &r.icon)
            .chain(self.config.fragments.iter().map(|r| &r.icon))
            .chain(std::iter::once(&self.config.default_icon));
        for key in all {
            if !out.contains(&key) {
                out.push(key);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Classifier, ClassifierConfig};

    fn classify(tokens: &[&str]) -> String {
        Classifier::default().classify(tokens).as_str().to_string()
    }

    #[test]
    fn exact_list_order_wins_over_token_order() {
        assert_eq!(classify(&["Training", "Arms control"]), "icon-arms-control");
    }

    #[test]
    fn fragments_apply_per_token() {
        assert_eq!(classify(&["Naval Medical team"]), "icon-military-medical");
        assert_eq!(classify(&["Regional Disaster drill"]), "icon-hadr");
        assert_eq!(classify(&["Joint MIL - POL talks"]), "icon-milpol");
        assert_eq!(classify(&["Something", "Port Visit"]), "icon-visit-diplomacy");
    }

    #[test]
    fn an_exact_token_anywhere_beats_fragments() {
        assert_eq!(
            classify(&["Naval Medical team", "Training"]),
            "icon-training"
        );
        assert_eq!(
            classify(&["Regional Disaster drill", "Maritime Security"]),
            "icon-maritime-security"
        );
    }

    #[test]
    fn unmatched_and_empty_fall_back_to_default() {
        assert_eq!(classify(&[]), "default");
        assert_eq!(classify(&["training"]), "default");
    }

    #[test]
    fn icon_keys_cover_every_category_once() {
        let c = Classifier::default();
        let keys = c.icon_keys();
        assert_eq!(keys.len(), 15);
        assert!(keys.iter().any(|k| k.is_default()));
        let cfg: ClassifierConfig = serde_json::from_str("{}").expect("defaults");
        assert_eq!(cfg, ClassifierConfig::default());
    }
}
