/// Canonicalize raw input for pattern matching.
///
/// Lowercases, then replaces every character outside `[0-9a-z ]` with a
/// single space, one for one. Tabs and newlines become spaces too; runs of
/// spaces are not collapsed, so patterns match across them with `\s+`.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .map(|c| {
            if c.is_ascii_digit() || c.is_ascii_lowercase() || c == ' ' {
                c
            } else {
                ' '
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Tooth 8, Pocket 4!"), "tooth 8  pocket 4 ");
    }

    #[test]
    fn keeps_existing_spacing() {
        assert_eq!(normalize("tooth  12   pd 3"), "tooth  12   pd 3");
    }

    #[test]
    fn control_whitespace_becomes_space() {
        assert_eq!(normalize("tooth\t5\nbleeding"), "tooth 5 bleeding");
    }

    #[test]
    fn non_ascii_letters_become_space() {
        assert_eq!(normalize("dent 3 saignement é"), "dent 3 saignement  ");
    }

    #[test]
    fn hyphenated_negation_splits() {
        assert_eq!(normalize("NO-BLEEDING"), "no bleeding");
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize(""), "");
    }
}
