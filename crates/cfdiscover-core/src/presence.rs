//! Presence checks shared by the resolvers. Manifest fields arrive as
//! `Option<T>`; an explicitly empty string or zero counts as "not supplied"
//! wherever a default applies.

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

pub(crate) fn non_zero(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v != 0)
}

pub(crate) fn is_set(flag: Option<bool>) -> bool {
    flag.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_absent() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(Some("x")), Some("x"));
    }

    #[test]
    fn zero_is_absent() {
        assert_eq!(non_zero(None), None);
        assert_eq!(non_zero(Some(0)), None);
        assert_eq!(non_zero(Some(7)), Some(7));
    }

    #[test]
    fn unset_flag_is_false() {
        assert!(!is_set(None));
        assert!(!is_set(Some(false)));
        assert!(is_set(Some(true)));
    }
}
