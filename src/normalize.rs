/// Title-case text for display: lower-case, split on single spaces, drop
/// empty tokens, capitalize the first character of each token, rejoin.
pub fn to_title_case(s: &str) -> String {
    s.to_lowercase()
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_each_word() {
        assert_eq!(to_title_case("  pIKA chu "), "Pika Chu");
        assert_eq!(to_title_case("bulbasaur"), "Bulbasaur");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(to_title_case(""), "");
        assert_eq!(to_title_case("   "), "");
    }

    #[test]
    fn hyphenated_names_keep_their_tail() {
        // Only spaces split tokens.
        assert_eq!(to_title_case("mr-mime"), "Mr-mime");
        assert_eq!(to_title_case("special-attack"), "Special-attack");
    }

    #[test]
    fn non_ascii_first_letter_is_uppercased() {
        assert_eq!(to_title_case("école pokémon"), "École Pokémon");
    }
}
