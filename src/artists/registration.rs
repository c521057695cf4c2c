use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::CATEGORIES;
use crate::ArtistlyError;

pub const LANGUAGES: [&str; 12] = [
    "English",
    "Spanish",
    "French",
    "German",
    "Italian",
    "Portuguese",
    "Mandarin",
    "Japanese",
    "Korean",
    "Arabic",
    "Hindi",
    "Russian",
];

pub const FEE_RANGES: [&str; 7] = [
    "$200-400",
    "$400-600",
    "$600-800",
    "$800-1200",
    "$1200-1800",
    "$1800-2500",
    "$2500+",
];

const MIN_BIO_CHARS: usize = 50;
const FEE_RANGE_PATTERN: &str = r"^\$\d+(-\d+|\+)$";

/// Upper bound (exclusive) for ids handed out to new registrations
pub const MAX_ARTIST_ID: u64 = 1_000_000_000;

/// Onboarding form as filled in by an artist
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub bio: String,
    pub categories: Vec<String>,
    pub languages: Vec<String>,
    pub fee_range: String,
    pub location: String,

    /// `data:` URL of the uploaded picture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Validated registration, ready to be POSTed
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: u64,
    #[serde(flatten)]
    pub registration: Registration,
}

/// Every problem found in a form, in the order the form shows its fields
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl Registration {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors: Vec<String> = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Name is required".into());
        }
        if self.location.trim().is_empty() {
            errors.push("Location is required".into());
        }
        let bio = self.bio.trim();
        if bio.is_empty() {
            errors.push("Bio is required".into());
        } else if bio.chars().count() < MIN_BIO_CHARS {
            errors.push(format!("Bio must be at least {} characters", MIN_BIO_CHARS));
        }
        if self.categories.is_empty() {
            errors.push("Please select at least one category".into());
        }
        if self.languages.is_empty() {
            errors.push("Please select at least one language".into());
        }
        let fee_range = self.fee_range.trim();
        if fee_range.is_empty() {
            errors.push("Please select a fee range".into());
        } else {
            let regex = Regex::new(FEE_RANGE_PATTERN).expect("bogus regexp");
            if !regex.is_match(fee_range) {
                errors.push("Fee range must look like $400-600 or $2500+".into());
            }
        }

        for category in &self.categories {
            if !CATEGORIES.contains(&category.as_str()) {
                log::warn!("registering uncatalogued category `{}`", category);
            }
        }
        for language in &self.languages {
            if !LANGUAGES.contains(&language.as_str()) {
                log::warn!("registering uncatalogued language `{}`", language);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Validates the form and assigns it a random numeric id
    pub fn into_submission(self) -> Result<Submission, ValidationErrors> {
        self.validate()?;
        Ok(Submission {
            id: fastrand::u64(..MAX_ARTIST_ID),
            registration: self,
        })
    }

    pub fn toggle_category(&mut self, category: &str, checked: bool) {
        toggle(&mut self.categories, category, checked)
    }

    pub fn toggle_language(&mut self, language: &str, checked: bool) {
        toggle(&mut self.languages, language, checked)
    }
}

/// Adds or removes a checkbox value, keeping selection order
fn toggle(selected: &mut Vec<String>, value: &str, checked: bool) {
    if checked {
        if !selected.iter().any(|v| v == value) {
            selected.push(value.to_owned());
        }
    } else {
        selected.retain(|v| v != value);
    }
}

/// Reads an image file and renders it as a base64 `data:` URL
pub fn profile_image_data_url(path: &Path) -> Result<String, ArtistlyError> {
    let mime = match new_mime_guess::from_path(path).first() {
        Some(mime) if mime.type_().as_str() == "image" => mime,
        _ => {
            return Err(format!("{}: profile image must be an image file", path.display()).into())
        }
    };
    let bytes = std::fs::read(path)?;
    log::debug!("encoding {} ({} bytes, {})", path.display(), bytes.len(), mime);
    Ok(format!("data:{};base64,{}", mime, base64::encode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn complete_form() -> Registration {
        Registration {
            name: "Amy Lee".into(),
            bio: "Jazz vocalist with fifteen years of club, festival and wedding work.".into(),
            categories: vec!["Singer".into()],
            languages: vec!["English".into()],
            fee_range: "$800-1200".into(),
            location: "New York, NY".into(),
            profile_image: None,
        }
    }

    #[test]
    fn complete_form_is_valid() {
        assert_eq!(complete_form().validate(), Ok(()));
        for range in FEE_RANGES.iter() {
            let form = Registration {
                fee_range: range.to_string(),
                ..complete_form()
            };
            assert!(form.validate().is_ok(), "{} rejected", range);
        }
    }

    #[test]
    fn empty_form_reports_every_field_in_order() {
        let errors = Registration::default().validate().unwrap_err();
        assert_eq!(
            errors.messages(),
            [
                "Name is required",
                "Location is required",
                "Bio is required",
                "Please select at least one category",
                "Please select at least one language",
                "Please select a fee range",
            ]
        );
    }

    #[test]
    fn short_bio_and_odd_fee_range_are_rejected() {
        let form = Registration {
            bio: "Too short".into(),
            fee_range: "cheap".into(),
            ..complete_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.messages(),
            [
                "Bio must be at least 50 characters",
                "Fee range must look like $400-600 or $2500+",
            ]
        );
    }

    #[test]
    fn submission_gets_bounded_id_and_flat_json() {
        let submission = complete_form().into_submission().unwrap();
        assert!(submission.id < MAX_ARTIST_ID);

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["name"], "Amy Lee");
        assert_eq!(json["feeRange"], "$800-1200");
        assert!(json["id"].is_u64());
        assert!(json.get("profileImage").is_none());
    }

    #[test]
    fn toggles_keep_order_without_duplicates() {
        let mut form = Registration::default();
        form.toggle_language("French", true);
        form.toggle_language("Hindi", true);
        form.toggle_language("French", true);
        assert_eq!(form.languages, ["French", "Hindi"]);

        form.toggle_language("French", false);
        assert_eq!(form.languages, ["Hindi"]);
    }

    #[test]
    fn category_checkboxes_build_the_selection() {
        let mut form = Registration::default();
        for category in CATEGORIES.iter().take(3) {
            form.toggle_category(category, true);
        }
        form.toggle_category(CATEGORIES[1], false);
        assert_eq!(form.categories, [CATEGORIES[0], CATEGORIES[2]]);

        form.toggle_language(LANGUAGES[0], true);
        form.fee_range = FEE_RANGES[0].into();
        form.name = "Bo".into();
        form.location = "Miami".into();
        form.bio = "Resident house DJ at weekend clubs, warehouse parties and rooftops.".into();
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn uncatalogued_choices_are_still_valid() {
        let form = Registration {
            categories: vec!["Fire Breather".into()],
            languages: vec!["Klingon".into()],
            ..complete_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn image_becomes_data_url() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"png!").unwrap();

        let url = profile_image_data_url(file.path()).unwrap();
        assert_eq!(url, "data:image/png;base64,cG5nIQ==");
    }

    #[test]
    fn non_image_is_rejected() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(profile_image_data_url(file.path()).is_err());
    }
}
