//! Gig submission form

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use freehub_common::{Error, Result};
use freehub_domain::{Gig, GigFields};

/// Raw form input for creating or editing a gig.
///
/// `price` stays text until validation so "abc" and "" are reported like any
/// other missing field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GigForm {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,

    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub desc: String,

    #[validate(custom(function = "positive_price", message = "Price must be a positive number"))]
    pub price: String,

    #[validate(custom(function = "not_blank", message = "Category is required"))]
    pub category: String,
}

/// Field order used when picking the message to show
const FIELD_ORDER: [&str; 4] = ["title", "desc", "price", "category"];

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn positive_price(value: &str) -> std::result::Result<(), ValidationError> {
    match value.trim().parse::<Decimal>() {
        Ok(price) if price > Decimal::ZERO => Ok(()),
        _ => Err(ValidationError::new("invalid_price")),
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    FIELD_ORDER
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .flat_map(|errors| errors.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Please fill all fields".to_string())
}

impl GigForm {
    pub fn new(
        title: impl Into<String>,
        desc: impl Into<String>,
        price: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            desc: desc.into(),
            price: price.into(),
            category: category.into(),
        }
    }

    /// Prefill from an existing gig (edit screen)
    pub fn from_gig(gig: &Gig) -> Self {
        Self::new(
            gig.title.clone(),
            gig.desc.clone(),
            gig.price.normalize().to_string(),
            gig.category.clone(),
        )
    }

    /// Validate and convert into submission fields
    pub fn into_fields(self) -> Result<GigFields> {
        self.validate()
            .map_err(|e| Error::Validation(first_message(&e)))?;

        let price = self
            .price
            .trim()
            .parse::<Decimal>()
            .map_err(|_| Error::Validation("Price must be a positive number".to_string()))?;

        GigFields::new(
            self.title.trim().to_string(),
            self.desc.trim().to_string(),
            price,
            self.category.trim().to_string(),
        )
    }
}
