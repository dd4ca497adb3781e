//! City Alias Matching
//!
//! Shops deliver within their own city only. Users type addresses freely, so a
//! shop registered in "Санкт-Петербург" has to accept "СПб, Невский 1" and
//! "Питер" too. Each city is a group of interchangeable names; an address
//! matches a shop when any name from the shop city's group appears in it as a
//! whole word sequence.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Built-in alias groups: canonical name first, then abbreviations, colloquial
/// and historical names.
const BUILTIN: &[&[&str]] = &[
    &["Москва", "Мск", "Moscow"],
    &[
        "Санкт-Петербург",
        "СПб",
        "С-Пб",
        "Питер",
        "Петербург",
        "Ленинград",
        "Saint Petersburg",
        "St Petersburg",
        "SPb",
    ],
    &["Екатеринбург", "Екб", "Свердловск", "Yekaterinburg", "Ekaterinburg"],
    &["Нижний Новгород", "Н Новгород", "Нижний", "Горький", "Nizhny Novgorod"],
    &["Новосибирск", "Нск", "Новосиб", "Novosibirsk"],
    &["Казань", "Kazan"],
    &["Самара", "Куйбышев", "Samara"],
    &["Ростов-на-Дону", "Ростов", "Rostov-on-Don"],
    &["Волгоград", "Сталинград", "Царицын", "Volgograd"],
    &["Краснодар", "Екатеринодар", "Krasnodar"],
    &["Челябинск", "Челяба", "Chelyabinsk"],
    &["Пермь", "Молотов", "Perm"],
    &["Тольятти", "Ставрополь-на-Волге", "Togliatti"],
    &["Калининград", "Кёнигсберг", "Kaliningrad"],
    &["Ульяновск", "Симбирск", "Ulyanovsk"],
    &["Киров", "Вятка", "Kirov"],
    &["Тверь", "Калинин", "Tver"],
    &["Владикавказ", "Орджоникидзе", "Vladikavkaz"],
    &["Уфа", "Ufa"],
    &["Омск", "Omsk"],
    &["Красноярск", "Krasnoyarsk"],
    &["Воронеж", "Voronezh"],
    &["Сочи", "Sochi"],
];

/// Errors raised while loading an alias table.
#[derive(Debug, Error)]
pub enum CityAliasError {
    /// The YAML document could not be parsed.
    #[error("invalid city alias table: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A city entry had an empty name.
    #[error("city alias table contains an empty city name")]
    EmptyName,
}

/// Lookup table from any known city name to its group of aliases.
#[derive(Debug, Clone)]
pub struct CityAliases {
    groups: Vec<Vec<String>>,
    index: FxHashMap<String, usize>,
}

impl Default for CityAliases {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CityAliases {
    /// Create an empty table. Every city only matches its own name.
    pub fn empty() -> Self {
        Self {
            groups: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// The built-in table of Russian cities.
    pub fn builtin() -> Self {
        let mut aliases = Self::empty();

        for group in BUILTIN {
            aliases.insert(group.iter().copied());
        }

        aliases
    }

    /// Load a table from YAML, mapping each canonical city to its aliases:
    ///
    /// ```yaml
    /// Санкт-Петербург: [СПб, Питер]
    /// Москва: [Мск]
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a map of names to name lists,
    /// or if a city name is blank.
    ///
    /// Cities are grouped in name order, so an alias listed under two cities
    /// belongs to the one that sorts first.
    pub fn from_yaml(yaml: &str) -> Result<Self, CityAliasError> {
        let table: BTreeMap<String, Vec<String>> = serde_norway::from_str(yaml)?;
        let mut aliases = Self::empty();

        for (city, names) in &table {
            if normalize(city).is_empty() {
                return Err(CityAliasError::EmptyName);
            }

            aliases.insert(std::iter::once(city.as_str()).chain(names.iter().map(String::as_str)));
        }

        Ok(aliases)
    }

    /// Add a group of interchangeable names. Names already known join the
    /// new group's lookup but keep their original group too.
    pub fn insert<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        let group: Vec<String> = names
            .into_iter()
            .map(normalize)
            .filter(|name| !name.is_empty())
            .collect();

        if group.is_empty() {
            return;
        }

        let id = self.groups.len();

        for name in &group {
            self.index.entry(name.clone()).or_insert(id);
        }

        self.groups.push(group);
    }

    /// Normalised names that count as `city`. Unknown cities only match
    /// themselves.
    pub fn aliases_for(&self, city: &str) -> Vec<String> {
        let city = normalize(city);

        match self.index.get(&city).and_then(|id| self.groups.get(*id)) {
            Some(group) => group.clone(),
            None if city.is_empty() => Vec::new(),
            None => vec![city],
        }
    }

    /// Whether `address` names `shop_city` or one of its aliases.
    ///
    /// A blank shop city cannot be checked and is treated as a match.
    pub fn matches(&self, address: &str, shop_city: &str) -> bool {
        let aliases = self.aliases_for(shop_city);

        if aliases.is_empty() {
            return true;
        }

        let haystack = format!(" {} ", normalize(address));

        aliases
            .iter()
            .any(|alias| haystack.contains(&format!(" {alias} ")))
    }

    /// Number of alias groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if the table has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Lowercase, fold `ё` into `е`, and reduce punctuation and hyphens to single
/// spaces so "г.Санкт-Петербург," and "санкт петербург" compare equal.
fn normalize(text: &str) -> String {
    let folded: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'ё' => 'е',
            c if c.is_alphanumeric() => c,
            _ => ' ',
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn address_in_another_city_does_not_match() {
        let aliases = CityAliases::builtin();

        assert!(!aliases.matches("Москва, ул. Ленина 1", "Екатеринбург"));
    }

    #[test]
    fn abbreviation_matches_canonical_city() {
        let aliases = CityAliases::builtin();

        assert!(aliases.matches("СПб, Невский проспект 28", "Санкт-Петербург"));
        assert!(aliases.matches("г.Санкт-Петербург, Лиговский 10", "Санкт-Петербург"));
        assert!(aliases.matches("Ленинград, ул. Марата 5", "СПб"));
    }

    #[test]
    fn historical_name_matches() {
        let aliases = CityAliases::builtin();

        assert!(aliases.matches("Свердловск, ул. Малышева 3", "Екатеринбург"));
    }

    #[test]
    fn yo_is_folded() {
        let aliases = CityAliases::builtin();

        assert!(aliases.matches("Кенигсберг, Ленинский 1", "Калининград"));
    }

    #[test]
    fn aliases_must_be_whole_words() {
        let aliases = CityAliases::builtin();

        // "Омск" is a substring of "Томск" but must not match it.
        assert!(!aliases.matches("Томск, пр. Ленина 1", "Омск"));
    }

    #[test]
    fn unknown_city_matches_itself() {
        let aliases = CityAliases::builtin();

        assert!(aliases.matches("Выкса, ул. Островского 2", "Выкса"));
        assert!(!aliases.matches("Муром, ул. Московская 2", "Выкса"));
    }

    #[test]
    fn blank_shop_city_is_not_checked() {
        assert!(CityAliases::builtin().matches("Anywhere", "  "));
    }

    #[test]
    fn yaml_table_replaces_builtin() -> TestResult {
        let aliases = CityAliases::from_yaml("Выкса: [Vyksa]\n")?;

        assert_eq!(aliases.len(), 1);
        assert!(aliases.matches("Vyksa, Lenina 1", "Выкса"));
        assert!(!aliases.matches("СПб, Невский 1", "Санкт-Петербург"));

        Ok(())
    }

    #[test]
    fn shared_yaml_alias_goes_to_the_first_city_by_name() -> TestResult {
        let aliases = CityAliases::from_yaml("Beta: [Shared]\nAlpha: [Shared]\n")?;

        assert_eq!(aliases.aliases_for("Shared"), ["alpha", "shared"]);
        assert!(aliases.matches("Alpha, Main St 1", "Shared"));
        assert!(!aliases.matches("Beta, Main St 1", "Shared"));

        Ok(())
    }

    #[test]
    fn yaml_rejects_blank_names() {
        assert!(matches!(
            CityAliases::from_yaml("\"  \": [x]\n"),
            Err(CityAliasError::EmptyName)
        ));
    }
}
