use std::sync::LazyLock;

use regex::Regex;

use crate::domain::Naming;

static CAPITALISED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Lu}\p{Ll}*").expect("this must never fail"));

/// Rewrites the name of a projected property before it is encoded.
pub trait NameConvention {
    /// Returns the encoded form of `name`.
    fn apply(&self, name: &str) -> String;
}

impl<F: Fn(&str) -> String> NameConvention for F {
    fn apply(&self, name: &str) -> String {
        self(name)
    }
}

/// Leaves names untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct Verbatim;

impl NameConvention for Verbatim {
    fn apply(&self, name: &str) -> String {
        name.to_string()
    }
}

/// Lower-cases the first word of a name and joins the rest with dashes.
///
/// | name            | encoded           |
/// |-----------------|-------------------|
/// | `TwoWords`      | `two-Words`       |
/// | `ThreeWordsNow` | `three-Words-Now` |
/// | `SKU`           | `sku`             |
/// | `Lower`         | `lower`           |
///
/// Words start at each capital letter. Anything before the first capital
/// belongs to the first word.
///
/// This departs from a strict capital-word split, which drops every
/// character that is not part of a capitalised word. Here a lower-case lead
/// word is kept (`orderNumber` encodes as `order-Number`, not `ordernumber`)
/// and digits stay with their word (`Address2Line` encodes as `address2-Line`,
/// not `address-Line`), so no characters are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct CamelDash;

impl NameConvention for CamelDash {
    fn apply(&self, name: &str) -> String {
        if name.chars().all(char::is_uppercase) {
            return name.to_lowercase();
        }

        let words = split_words(name);
        if words.len() < 2 {
            return name.to_lowercase();
        }

        let mut encoded = words[0].to_lowercase();
        for word in &words[1..] {
            encoded.push('-');
            encoded.push_str(word);
        }
        encoded
    }
}

fn split_words(name: &str) -> Vec<&str> {
    let mut boundaries: Vec<usize> = CAPITALISED_WORD
        .find_iter(name)
        .map(|word| word.start())
        .filter(|&start| start > 0)
        .collect();
    boundaries.push(name.len());

    let mut start = 0;
    boundaries
        .into_iter()
        .map(|end| {
            let word = &name[start..end];
            start = end;
            word
        })
        .collect()
}

impl NameConvention for Naming {
    fn apply(&self, name: &str) -> String {
        match self {
            Self::CamelDash => CamelDash.apply(name),
            Self::Verbatim => Verbatim.apply(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("TwoWords", "two-Words"; "two words")]
    #[test_case("ThreeWordsNow", "three-Words-Now"; "three words")]
    #[test_case("SKU", "sku"; "acronym")]
    #[test_case("Lower", "lower"; "single capitalised word")]
    #[test_case("lower", "lower"; "single lowercase word")]
    #[test_case("orderNumber", "order-Number"; "leading lowercase word is kept")]
    #[test_case("Address2Line", "address2-Line"; "digits stay with their word")]
    #[test_case("", ""; "empty")]
    fn camel_dash(name: &str, expected: &str) {
        assert_eq!(CamelDash.apply(name), expected);
    }

    #[test]
    fn verbatim_is_identity() {
        assert_eq!(Verbatim.apply("ThreeWordsNow"), "ThreeWordsNow");
    }

    #[test]
    fn closures_are_conventions() {
        let upper = |name: &str| name.to_uppercase();
        assert_eq!(upper.apply("abc"), "ABC");
    }

    #[test]
    fn configured_naming_dispatches() {
        assert_eq!(Naming::CamelDash.apply("TwoWords"), "two-Words");
        assert_eq!(Naming::Verbatim.apply("TwoWords"), "TwoWords");
    }
}
