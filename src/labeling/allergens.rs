//! Allergen inference and declaration (RDC 26/2015)

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Allergens the declaration covers, in printed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allergen {
    Gluten,
    Trigo,
    Crustaceos,
    Ovos,
    Peixes,
    Amendoim,
    Soja,
    Leite,
    FrutosCasca,
    Sulfitos,
}

impl Allergen {
    pub const ALL: [Allergen; 10] = [
        Allergen::Gluten,
        Allergen::Trigo,
        Allergen::Crustaceos,
        Allergen::Ovos,
        Allergen::Peixes,
        Allergen::Amendoim,
        Allergen::Soja,
        Allergen::Leite,
        Allergen::FrutosCasca,
        Allergen::Sulfitos,
    ];

    /// Ingredient-name fragments that indicate this allergen
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Allergen::Gluten => &[
                "trigo",
                "centeio",
                "cevada",
                "aveia",
                "farinha de trigo",
                "farinha de centeio",
            ],
            Allergen::Trigo => &["trigo", "farinha de trigo"],
            Allergen::Crustaceos => &["camarão", "lagosta", "caranguejo", "siri"],
            Allergen::Ovos => &["ovo", "ovos", "clara", "gema", "albumina"],
            Allergen::Peixes => &["peixe", "atum", "sardinha", "bacalhau", "salmão"],
            Allergen::Amendoim => &["amendoim", "pasta de amendoim"],
            Allergen::Soja => &["soja", "lecitina de soja", "proteína de soja", "óleo de soja"],
            Allergen::Leite => &[
                "leite",
                "queijo",
                "iogurte",
                "manteiga",
                "creme de leite",
                "lactose",
                "mussarela",
                "parmesão",
            ],
            Allergen::FrutosCasca => &["castanha", "noz", "amêndoa", "avelã", "pistache", "macadâmia"],
            Allergen::Sulfitos => &["sulfito", "metabissulfito"],
        }
    }

    /// Uppercase name used in the declaration
    pub fn display_name(&self) -> &'static str {
        match self {
            Allergen::Gluten => "GLÚTEN",
            Allergen::Trigo => "TRIGO",
            Allergen::Crustaceos => "CRUSTÁCEOS",
            Allergen::Ovos => "OVOS",
            Allergen::Peixes => "PEIXES",
            Allergen::Amendoim => "AMENDOIM",
            Allergen::Soja => "SOJA",
            Allergen::Leite => "LEITE",
            Allergen::FrutosCasca => "FRUTOS DE CASCA RIJA",
            Allergen::Sulfitos => "SULFITOS",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Allergen::Gluten => "gluten",
            Allergen::Trigo => "trigo",
            Allergen::Crustaceos => "crustaceos",
            Allergen::Ovos => "ovos",
            Allergen::Peixes => "peixes",
            Allergen::Amendoim => "amendoim",
            Allergen::Soja => "soja",
            Allergen::Leite => "leite",
            Allergen::FrutosCasca => "frutos_casca",
            Allergen::Sulfitos => "sulfitos",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let key = normalize_name(s).replace([' ', '-'], "_");
        Allergen::ALL.into_iter().find(|a| {
            a.key() == key || normalize_name(a.display_name()).replace(' ', "_") == key
        })
    }
}

/// Lowercase, decompose (NFD) and drop combining marks
pub fn normalize_name(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Allergens whose keywords appear in any ingredient name.
/// Matching ignores case and accents. Output follows catalogue order.
pub fn infer_allergens<S: AsRef<str>>(ingredient_names: &[S]) -> Vec<Allergen> {
    let names: Vec<String> = ingredient_names
        .iter()
        .map(|n| normalize_name(n.as_ref()))
        .collect();

    Allergen::ALL
        .into_iter()
        .filter(|allergen| {
            allergen.keywords().iter().any(|keyword| {
                let keyword = normalize_name(keyword);
                names.iter().any(|name| name.contains(&keyword))
            })
        })
        .collect()
}

/// What the label declares: allergens present and possible cross-contamination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenDeclaration {
    #[serde(default)]
    pub contains: Vec<Allergen>,
    #[serde(default)]
    pub may_contain: Vec<Allergen>,
}

fn ordered(list: &[Allergen], exclude: &[Allergen]) -> Vec<Allergen> {
    Allergen::ALL
        .into_iter()
        .filter(|a| list.contains(a) && !exclude.contains(a))
        .collect()
}

impl AllergenDeclaration {
    /// Normalizes both lists to catalogue order without duplicates.
    /// Anything in `contains` is dropped from `may_contain`.
    pub fn new(contains: Vec<Allergen>, may_contain: Vec<Allergen>) -> Self {
        let contains = ordered(&contains, &[]);
        let may_contain = ordered(&may_contain, &contains);
        Self {
            contains,
            may_contain,
        }
    }

    /// Declaration inferred from ingredient names, with manual cross-contamination notes
    pub fn from_ingredients<S: AsRef<str>>(ingredient_names: &[S], may_contain: Vec<Allergen>) -> Self {
        Self::new(infer_allergens(ingredient_names), may_contain)
    }

    pub fn is_empty(&self) -> bool {
        self.contains.is_empty() && self.may_contain.is_empty()
    }

    /// "ALÉRGICOS: CONTÉM ..." and "ALÉRGICOS: PODE CONTER ..." lines
    pub fn statements(&self) -> Vec<String> {
        let join = |list: &[Allergen]| {
            list.iter()
                .map(|a| a.display_name())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut out = Vec::new();
        if !self.contains.is_empty() {
            out.push(format!("ALÉRGICOS: CONTÉM {}.", join(&self.contains)));
        }
        let may_contain = ordered(&self.may_contain, &self.contains);
        if !may_contain.is_empty() {
            out.push(format!("ALÉRGICOS: PODE CONTER {}.", join(&may_contain)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents() {
        assert_eq!(normalize_name("  Camarão "), "camarao");
        assert_eq!(normalize_name("AÇÚCAR"), "acucar");
    }

    #[test]
    fn test_infer_is_accent_and_case_insensitive() {
        let found = infer_allergens(&["CAMARAO cozido", "Salmao grelhado"]);
        assert_eq!(found, vec![Allergen::Crustaceos, Allergen::Peixes]);
    }

    #[test]
    fn test_infer_wheat_flour() {
        let found = infer_allergens(&["Farinha de trigo", "Leite integral", "Ovos"]);
        assert_eq!(
            found,
            vec![Allergen::Gluten, Allergen::Trigo, Allergen::Ovos, Allergen::Leite]
        );
    }

    #[test]
    fn test_infer_nothing() {
        let found = infer_allergens(&["Arroz branco", "Sal", "Água"]);
        assert!(found.is_empty());
        assert!(infer_allergens::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_statements() {
        let decl = AllergenDeclaration::new(
            vec![Allergen::Leite, Allergen::Trigo, Allergen::Leite],
            vec![Allergen::FrutosCasca, Allergen::Leite],
        );
        assert_eq!(decl.contains, vec![Allergen::Trigo, Allergen::Leite]);
        assert_eq!(decl.may_contain, vec![Allergen::FrutosCasca]);
        assert_eq!(
            decl.statements(),
            vec![
                "ALÉRGICOS: CONTÉM TRIGO, LEITE.".to_string(),
                "ALÉRGICOS: PODE CONTER FRUTOS DE CASCA RIJA.".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_declaration_has_no_statements() {
        let decl = AllergenDeclaration::default();
        assert!(decl.is_empty());
        assert!(decl.statements().is_empty());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Allergen::parse("frutos_casca"), Some(Allergen::FrutosCasca));
        assert_eq!(Allergen::parse("Crustáceos"), Some(Allergen::Crustaceos));
        assert_eq!(Allergen::parse("Frutos de casca rija"), Some(Allergen::FrutosCasca));
        assert_eq!(Allergen::parse("mostarda"), None);
    }
}
