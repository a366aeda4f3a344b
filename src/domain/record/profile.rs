//! General profile of the person being interviewed.
//!
//! Kept apart from the case so facts about the user survive across cases.

use crate::schema_entity;

schema_entity! {
    /// Facts about the user that are not specific to one case.
    pub struct UserProfile {
        description: "General information about the user, independent of any particular case",
        fields: {
            full_name: String => "The user's full name", ["Jane Smith"],
            preferred_name: String => "Name the user prefers to be addressed by", ["Jane"],
            preferred_language: String => "Language the user is most comfortable in", ["English", "Spanish"],
            location: String => "City or region the user lives in", ["Springfield, IL"],
            occupation: String => "The user's occupation", ["Nurse"],
            communication_notes: String => "Anything that helps communicate with the user", ["Hard of hearing, prefers text"],
        },
        sections: {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{declared_fields, missing_fields, FieldValue};

    #[test]
    fn profile_fields_are_flat() {
        let fields = declared_fields::<UserProfile>();
        assert_eq!(fields.len(), 6);
        assert!(fields.iter().all(|path| !path.as_str().contains('.')));
    }

    #[test]
    fn setting_a_field_removes_it_from_missing() {
        let mut profile = UserProfile::default();
        profile.preferred_name = FieldValue::set("Jane".to_string());
        assert_eq!(missing_fields(&profile).len(), 5);
    }
}
