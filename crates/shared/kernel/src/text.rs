//! Text normalization helpers shared by the form and admin surfaces.

/// Keeps only ASCII digits.
#[must_use]
pub fn strip_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Replaces every digit with `*`, preserving punctuation. Used to conceal
/// national IDs in listings until explicitly revealed.
#[must_use]
pub fn conceal_digits(input: &str) -> String {
    input.chars().map(|c| if c.is_ascii_digit() { '*' } else { c }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_digits_drops_mask_punctuation() {
        assert_eq!(strip_digits("529.982.247-25"), "52998224725");
        assert_eq!(strip_digits("(11) 98765-4321"), "11987654321");
        assert_eq!(strip_digits(""), "");
    }

    #[test]
    fn conceal_digits_keeps_shape() {
        assert_eq!(conceal_digits("529.982.247-25"), "***.***.***-**");
        assert_eq!(conceal_digits("no digits"), "no digits");
    }
}
