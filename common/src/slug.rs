//! Character slugs
//!
//! "Harry Potter" → "harry-potter", "Zoé Lefèvre" → "zoe-lefevre"

use crate::types::Personnage;
use unicode_normalization::UnicodeNormalization;

/// Build the URL slug of a character from its full name
pub fn personnage_slug(personnage: &Personnage) -> String {
    let full_name = format!(
        "{} {}",
        personnage.first_name,
        personnage.last_name.as_deref().unwrap_or("")
    );
    slugify(full_name.trim())
}

/// Slugify arbitrary text
///
/// Canonical decomposition first, then combining marks are dropped, so any
/// accented Latin letter folds to its base letter.
pub fn slugify(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.to_lowercase().nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match fold_letter(c) {
            Some(replacement) => folded.push_str(replacement),
            None if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' => folded.push(c),
            None if c.is_whitespace() => folded.push(' '),
            None => {}
        }
    }

    folded
        .split(|c: char| c == ' ' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Find the first character whose slug equals `slug`
pub fn find_by_slug<'a>(personnages: &'a [Personnage], slug: &str) -> Option<&'a Personnage> {
    personnages.iter().find(|p| personnage_slug(p) == slug)
}

// U+0300..=U+036F
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Letters with no canonical decomposition
fn fold_letter(c: char) -> Option<&'static str> {
    let folded = match c {
        'œ' => "oe",
        'æ' => "ae",
        'ß' => "ss",
        'ø' => "o",
        'ł' => "l",
        'đ' => "d",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personnage_slug() {
        let p = Personnage::new(1, "Harry").with_last_name("Potter");
        assert_eq!(personnage_slug(&p), "harry-potter");
    }

    #[test]
    fn test_slug_without_last_name() {
        assert_eq!(personnage_slug(&Personnage::new(1, "Hermione")), "hermione");
    }

    #[test]
    fn test_slug_folds_accents() {
        let p = Personnage::new(1, "Zoé").with_last_name("Lefèvre");
        assert_eq!(personnage_slug(&p), "zoe-lefevre");
        assert_eq!(slugify("Cœur de Lion"), "coeur-de-lion");
        assert_eq!(slugify("François"), "francois");
    }

    #[test]
    fn test_slug_folds_any_decomposable_letter() {
        let p = Personnage::new(1, "Karel").with_last_name("Čapek");
        assert_eq!(personnage_slug(&p), "karel-capek");
        assert_eq!(slugify("Antonín Dvořák"), "antonin-dvorak");
        assert_eq!(slugify("Ōtani Ñuñez"), "otani-nunez");
        assert_eq!(slugify("Łukasz Søren"), "lukasz-soren");
    }

    #[test]
    fn test_find_by_slug_with_decomposed_accents() {
        let personnages = vec![Personnage::new(7, "Antonín").with_last_name("Dvořák")];
        assert_eq!(find_by_slug(&personnages, "antonin-dvorak").map(|p| p.id), Some(7));
    }

    #[test]
    fn test_slug_cleans_separators() {
        assert_eq!(slugify("  Jean--Luc   Picard! "), "jean-luc-picard");
        assert_eq!(slugify("-Anne-Marie-"), "anne-marie");
        assert_eq!(slugify("R2 D2"), "r2-d2");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_find_by_slug() {
        let personnages = vec![
            Personnage::new(1, "Harry").with_last_name("Potter"),
            Personnage::new(2, "Zoé"),
        ];
        assert_eq!(find_by_slug(&personnages, "zoe").map(|p| p.id), Some(2));
        assert!(find_by_slug(&personnages, "ron").is_none());
    }
}
