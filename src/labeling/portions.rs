//! Reference portions by food category (IN 75/2020 annex)

use serde::Serialize;

use super::allergens::normalize_name;

/// Default portion and household measure for a food category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortionCategory {
    pub key: &'static str,
    pub name: &'static str,
    /// Portion in g (or ml for beverages)
    pub portion: f64,
    pub household_measure: &'static str,
}

const fn category(
    key: &'static str,
    name: &'static str,
    portion: f64,
    household_measure: &'static str,
) -> PortionCategory {
    PortionCategory {
        key,
        name,
        portion,
        household_measure,
    }
}

pub const PORTION_CATEGORIES: [PortionCategory; 20] = [
    category("paes", "Pães", 50.0, "1 fatia"),
    category("biscoitos", "Biscoitos", 30.0, "3 unidades"),
    category("cereais", "Cereais", 30.0, "2 colheres de sopa"),
    category("massas", "Massas", 80.0, "1 concha"),
    category("arroz", "Arroz", 160.0, "4 colheres de sopa"),
    category("feijao", "Feijão", 160.0, "1 concha"),
    category("carnes", "Carnes", 100.0, "1 bife médio"),
    category("leite", "Leite", 200.0, "1 copo"),
    category("iogurte", "Iogurte", 200.0, "1 pote"),
    category("queijos", "Queijos", 30.0, "2 fatias"),
    category("frutas", "Frutas", 100.0, "1 unidade"),
    category("vegetais", "Vegetais", 100.0, "3 colheres de sopa"),
    category("sucos", "Sucos", 200.0, "1 copo"),
    category("refrigerantes", "Refrigerantes", 200.0, "1 copo"),
    category("sobremesas", "Sobremesas", 60.0, "1 fatia pequena"),
    category("sorvetes", "Sorvetes", 60.0, "1 bola"),
    category("chocolate", "Chocolate", 25.0, "5 quadradinhos"),
    category("salgadinhos", "Salgadinhos", 30.0, "1 xícara"),
    category("molhos", "Molhos", 15.0, "1 colher de sopa"),
    category("oleos", "Óleos", 13.0, "1 colher de sopa"),
];

/// Look up a category by key or name, ignoring case and accents
pub fn find_portion_category(key: &str) -> Option<&'static PortionCategory> {
    let wanted = normalize_name(key);
    PORTION_CATEGORIES
        .iter()
        .find(|c| c.key == wanted || normalize_name(c.name) == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_key() {
        let paes = find_portion_category("paes").unwrap();
        assert_eq!(paes.portion, 50.0);
        assert_eq!(paes.household_measure, "1 fatia");
    }

    #[test]
    fn test_lookup_by_accented_name() {
        let feijao = find_portion_category("Feijão").unwrap();
        assert_eq!(feijao.key, "feijao");
        assert_eq!(find_portion_category("ÓLEOS").unwrap().portion, 13.0);
    }

    #[test]
    fn test_unknown_category() {
        assert!(find_portion_category("bebidas alcoolicas").is_none());
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, a) in PORTION_CATEGORIES.iter().enumerate() {
            for b in &PORTION_CATEGORIES[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }
}
