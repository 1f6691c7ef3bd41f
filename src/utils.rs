/// Derives the stored object name from a user-supplied name.
/// Surrounding whitespace is dropped and the fixed photo extension appended.
pub fn derive_object_name(name: &str) -> String {
    format!("{}.jpg", name.trim())
}

/// A name must stay inside the destination container: no path separators
/// and no parent-directory components.
pub fn name_escapes_container(name: &str) -> bool {
    name.contains('/') || name.contains('\\') || name.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_jpg_extension() {
        assert_eq!(derive_object_name("vacation"), "vacation.jpg");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(derive_object_name("  trip  "), "trip.jpg");
    }

    #[test]
    fn path_components_are_flagged() {
        assert!(name_escapes_container("../../escape"));
        assert!(name_escapes_container("nested/name"));
        assert!(name_escapes_container("nested\\name"));
        assert!(name_escapes_container("dotted..name"));
        assert!(!name_escapes_container("vacation"));
        assert!(!name_escapes_container("trip.2026"));
    }
}
