//! Validation and filtering of meal form data
//!
//! [`validate_food_form`] checks every field of a [`FoodFormData`] in a single
//! pass and either returns the typed [`ValidFood`] or a [`ValidationErrors`]
//! map with one message per offending field. The [`filters`] module holds the
//! sanitization applied to validated data before it is sent.

pub mod filters;
pub mod validators;

use crate::core::food::{FoodFormData, MAX_RATING, MIN_RATING, PRICE_DECIMALS, ValidFood};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// The seven inputs of the meal form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    FoodName,
    FoodRating,
    FoodImage,
    FoodPrice,
    RestaurantName,
    RestaurantLogo,
    RestaurantStatus,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::FoodName,
        FormField::FoodRating,
        FormField::FoodImage,
        FormField::FoodPrice,
        FormField::RestaurantName,
        FormField::RestaurantLogo,
        FormField::RestaurantStatus,
    ];

    /// Name of the form input (`food_name`)
    pub fn name(&self) -> &'static str {
        match self {
            FormField::FoodName => "food_name",
            FormField::FoodRating => "food_rating",
            FormField::FoodImage => "food_image",
            FormField::FoodPrice => "food_price",
            FormField::RestaurantName => "restaurant_name",
            FormField::RestaurantLogo => "restaurant_logo",
            FormField::RestaurantStatus => "restaurant_status",
        }
    }

    /// Stable identifier of the error element (`food-name-error`)
    ///
    /// UI code uses it as the element id referenced by the input's
    /// `aria-describedby`.
    pub fn error_id(&self) -> &'static str {
        match self {
            FormField::FoodName => "food-name-error",
            FormField::FoodRating => "food-rating-error",
            FormField::FoodImage => "food-image-error",
            FormField::FoodPrice => "food-price-error",
            FormField::RestaurantName => "restaurant-name-error",
            FormField::RestaurantLogo => "restaurant-logo-error",
            FormField::RestaurantStatus => "restaurant-status-error",
        }
    }

    /// Human label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            FormField::FoodName => "Food Name",
            FormField::FoodRating => "Food Rating",
            FormField::FoodImage => "Food Image URL",
            FormField::FoodPrice => "Food Price",
            FormField::RestaurantName => "Restaurant Name",
            FormField::RestaurantLogo => "Restaurant Logo URL",
            FormField::RestaurantStatus => "Restaurant Status",
        }
    }

    /// Look up a field by input name or error id
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == value || f.error_id() == value)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field-addressable validation failures
///
/// Serializes as a JSON object keyed by [`FormField::error_id`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field, replacing any previous one
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fields with an error, in form order
    pub fn fields(&self) -> Vec<FormField> {
        self.errors.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Clear the error of a field once the user edits it
    pub fn clear(&mut self, field: FormField) {
        self.errors.remove(&field);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "Validation errors: {}", msgs.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, message) in &self.errors {
            map.serialize_entry(field.error_id(), message)?;
        }
        map.end()
    }
}

/// Validate a (possibly partial) meal form
///
/// Every rule runs, so the result lists all offending fields at once.
pub fn validate_food_form(form: &FoodFormData) -> Result<ValidFood, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = validators::sanitized_text(FormField::FoodName.label())(form.food_name.as_deref());
    let rating = validators::number_in_range(FormField::FoodRating.label(), MIN_RATING, MAX_RATING)(
        form.food_rating.as_ref(),
    );
    let image = validators::absolute_url(FormField::FoodImage.label())(form.food_image.as_deref());
    let price = validators::positive_amount(FormField::FoodPrice.label(), PRICE_DECIMALS)(
        form.food_price.as_ref(),
    );
    let restaurant_name = validators::sanitized_text(FormField::RestaurantName.label())(
        form.restaurant_name.as_deref(),
    );
    let restaurant_logo = validators::absolute_url(FormField::RestaurantLogo.label())(
        form.restaurant_logo.as_deref(),
    );
    let restaurant_status = validators::restaurant_status(FormField::RestaurantStatus.label())(
        form.restaurant_status.as_deref(),
    );

    macro_rules! take {
        ($field:expr, $result:expr) => {
            match $result {
                Ok(v) => Some(v),
                Err(msg) => {
                    errors.insert($field, msg);
                    None
                }
            }
        };
    }

    let name = take!(FormField::FoodName, name);
    let rating = take!(FormField::FoodRating, rating);
    let image = take!(FormField::FoodImage, image);
    let price = take!(FormField::FoodPrice, price);
    let restaurant_name = take!(FormField::RestaurantName, restaurant_name);
    let restaurant_logo = take!(FormField::RestaurantLogo, restaurant_logo);
    let restaurant_status = take!(FormField::RestaurantStatus, restaurant_status);

    match (
        name,
        rating,
        image,
        price,
        restaurant_name,
        restaurant_logo,
        restaurant_status,
    ) {
        (
            Some(name),
            Some(rating),
            Some(image),
            Some(price),
            Some(restaurant_name),
            Some(restaurant_logo),
            Some(restaurant_status),
        ) => Ok(ValidFood {
            name,
            rating,
            image,
            price,
            restaurant_name,
            restaurant_logo,
            restaurant_status,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::food::{FormNumber, RestaurantStatus};
    use serde_json::json;

    fn valid_form() -> FoodFormData {
        FoodFormData {
            food_name: Some("Pepperoni Pizza".to_string()),
            food_rating: Some(FormNumber::from(4.5)),
            food_image: Some("https://x/y.jpg".to_string()),
            food_price: Some(FormNumber::from(9.99)),
            restaurant_name: Some("R".to_string()),
            restaurant_logo: Some("https://x/z.jpg".to_string()),
            restaurant_status: Some("Open Now".to_string()),
        }
    }

    fn without(field: FormField) -> FoodFormData {
        let mut form = valid_form();
        match field {
            FormField::FoodName => form.food_name = None,
            FormField::FoodRating => form.food_rating = None,
            FormField::FoodImage => form.food_image = None,
            FormField::FoodPrice => form.food_price = None,
            FormField::RestaurantName => form.restaurant_name = None,
            FormField::RestaurantLogo => form.restaurant_logo = None,
            FormField::RestaurantStatus => form.restaurant_status = None,
        }
        form
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        let valid = validate_food_form(&valid_form()).unwrap();
        assert_eq!(valid.name, "Pepperoni Pizza");
        assert_eq!(valid.rating, 4.5);
        assert_eq!(valid.price, 9.99);
        assert_eq!(valid.restaurant_status, RestaurantStatus::OpenNow);
    }

    #[test]
    fn test_each_missing_field_yields_exactly_its_error() {
        for field in FormField::ALL {
            let errors = validate_food_form(&without(field)).unwrap_err();
            assert_eq!(errors.fields(), vec![field], "missing {}", field);
        }
    }

    #[test]
    fn test_empty_name_scenario() {
        let mut form = valid_form();
        form.food_name = Some(String::new());
        let errors = validate_food_form(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FormField::FoodName), Some("Food Name is required"));
    }

    #[test]
    fn test_all_errors_collected_in_one_pass() {
        let errors = validate_food_form(&FoodFormData::default()).unwrap_err();
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn test_blank_form_reports_everything_but_status() {
        let errors = validate_food_form(&FoodFormData::blank()).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(!errors.contains(FormField::RestaurantStatus));
    }

    #[test]
    fn test_out_of_range_rating_is_rejected() {
        let mut form = valid_form();
        form.food_rating = Some(FormNumber::from("7"));
        let errors = validate_food_form(&form).unwrap_err();
        assert_eq!(
            errors.get(FormField::FoodRating),
            Some("Food Rating must be between 1 and 5")
        );
    }

    #[test]
    fn test_invalid_urls() {
        let mut form = valid_form();
        form.food_image = Some("not a url".to_string());
        form.restaurant_logo = Some("/images/logo.png".to_string());
        let errors = validate_food_form(&form).unwrap_err();
        assert_eq!(
            errors.get(FormField::FoodImage),
            Some("Food Image URL must be a valid URL")
        );
        assert_eq!(
            errors.get(FormField::RestaurantLogo),
            Some("Restaurant Logo URL must be a valid URL")
        );
    }

    #[test]
    fn test_values_are_trimmed() {
        let mut form = valid_form();
        form.food_name = Some("  Pizza  ".to_string());
        let valid = validate_food_form(&form).unwrap();
        assert_eq!(valid.name, "Pizza");
    }

    #[test]
    fn test_names_are_checked_after_stripping_markup() {
        let mut form = valid_form();
        form.food_name = Some("<>".to_string());
        form.restaurant_name = Some("<<>>".to_string());
        let errors = validate_food_form(&form).unwrap_err();
        assert_eq!(errors.fields(), vec![FormField::FoodName, FormField::RestaurantName]);
        assert_eq!(errors.get(FormField::FoodName), Some("Food Name is required"));
    }

    #[test]
    fn test_price_is_checked_after_rounding() {
        let mut form = valid_form();
        form.food_price = Some(FormNumber::from("0.001"));
        let errors = validate_food_form(&form).unwrap_err();
        assert_eq!(
            errors.get(FormField::FoodPrice),
            Some("Food Price must be a positive number")
        );

        form.food_price = Some(FormNumber::from("12.346"));
        assert_eq!(validate_food_form(&form).unwrap().price, 12.35);
    }

    #[test]
    fn test_errors_serialize_by_error_id() {
        let mut form = valid_form();
        form.food_name = None;
        form.restaurant_status = Some("Maybe".to_string());
        let errors = validate_food_form(&form).unwrap_err();
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({
                "food-name-error": "Food Name is required",
                "restaurant-status-error": "Restaurant Status must be 'Open Now' or 'Closed'"
            })
        );
    }

    #[test]
    fn test_form_field_lookup() {
        assert_eq!(FormField::parse("food_price"), Some(FormField::FoodPrice));
        assert_eq!(FormField::parse("restaurant-logo-error"), Some(FormField::RestaurantLogo));
        assert_eq!(FormField::parse("unknown"), None);
    }

    #[test]
    fn test_clear_field_error() {
        let mut errors = validate_food_form(&without(FormField::FoodName)).unwrap_err();
        errors.clear(FormField::FoodName);
        assert!(errors.is_empty());
    }
}
