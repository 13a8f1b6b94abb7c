use super::error::ValidationError;
use super::phone::is_valid_phone;
use std::fmt;
use uuid::Uuid;

/// What a person submits to open an account.
#[derive(Clone, Default)]
pub struct RegistrationForm {
    pub phone: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// Locale-formatted, e.g. `3/14/1990`. Stored as given.
    pub date_of_birth: String,
    /// Client-generated key; resubmitting with the same key returns the first result.
    pub request_id: Option<Uuid>,
}

impl RegistrationForm {
    /// Presence of every field, then the phone pattern.
    ///
    /// Fields are not trimmed: a single space counts as filled in.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            &self.email,
            &self.password,
            &self.phone,
            &self.first_name,
            &self.last_name,
            &self.date_of_birth,
        ];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(ValidationError::MissingFields);
        }
        if !is_valid_phone(&self.phone) {
            return Err(ValidationError::InvalidPhone);
        }
        Ok(())
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("phone", &self.phone)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("date_of_birth", &self.date_of_birth)
            .field("request_id", &self.request_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            phone: "+15551234567".into(),
            email: "ama@example.com".into(),
            password: "s3cret-pass".into(),
            first_name: "Ama".into(),
            last_name: "Mensah".into(),
            date_of_birth: "3/14/1990".into(),
            request_id: None,
        }
    }

    #[test]
    fn test_every_field_is_required() {
        assert!(form().validate().is_ok());
        let blanks: [fn(&mut RegistrationForm); 6] = [
            |f| f.phone.clear(),
            |f| f.email.clear(),
            |f| f.password.clear(),
            |f| f.first_name.clear(),
            |f| f.last_name.clear(),
            |f| f.date_of_birth.clear(),
        ];
        for blank in blanks {
            let mut f = form();
            blank(&mut f);
            assert_eq!(f.validate(), Err(ValidationError::MissingFields));
        }
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        let mut f = form();
        f.first_name = " ".into();
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_win_over_bad_phone() {
        let mut f = form();
        f.phone = "0241234567".into();
        assert_eq!(f.validate(), Err(ValidationError::InvalidPhone));
        f.email.clear();
        assert_eq!(f.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn test_debug_hides_password() {
        assert!(!format!("{:?}", form()).contains("s3cret-pass"));
    }
}
