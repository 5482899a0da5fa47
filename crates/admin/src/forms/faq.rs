//! Create/edit FAQ modal.

use async_trait::async_trait;

use backoffice_core::{FaqId, ProductId};

use super::{FormMode, FormSchema, FormSpec};
use crate::error::AppError;
use crate::models::{Faq, FaqPayload};
use crate::resources::AdminApi;
use crate::validation::{self, ValidationErrors};

/// FAQ modal fields. `product_id` is the product selected on the FAQ page
/// and is only needed when creating.
#[derive(Debug, Clone, Default)]
pub struct FaqForm {
    pub product_id: Option<ProductId>,
    pub question: String,
    pub answer: String,
}

impl FaqForm {
    /// Empty form for adding a FAQ to `product_id`.
    #[must_use]
    pub fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::default()
        }
    }
}

/// A validated FAQ and the product it is created under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqSubmission {
    pub product_id: Option<ProductId>,
    pub payload: FaqPayload,
}

impl FormSchema for FaqForm {
    type Output = FaqSubmission;
    const TOASTED_FIELDS: &'static [&'static str] = &["productId"];

    fn validate(&self, editing: bool) -> Result<FaqSubmission, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !editing && self.product_id.is_none() {
            errors.add("productId", "Select a product before adding a FAQ");
        }
        let question = validation::min_chars(
            &mut errors,
            "question",
            &self.question,
            5,
            "Question must be at least 5 characters",
        );
        let answer = validation::min_chars(
            &mut errors,
            "answer",
            &self.answer,
            10,
            "Answer must be at least 10 characters",
        );

        errors.into_result(FaqSubmission {
            product_id: self.product_id.clone(),
            payload: FaqPayload { question, answer },
        })
    }
}

#[async_trait]
impl FormSpec for FaqForm {
    type Entity = Faq;
    type Id = FaqId;
    const NOUN: &'static str = "FAQ";

    fn from_entity(faq: &Faq) -> Self {
        Self {
            product_id: Some(faq.product_id.clone()),
            question: faq.question.clone(),
            answer: faq.answer.clone(),
        }
    }

    async fn submit(
        api: &AdminApi,
        mode: &FormMode<FaqId>,
        submission: &FaqSubmission,
    ) -> Result<(), AppError> {
        match (mode, &submission.product_id) {
            (FormMode::Edit(id), _) => api.update_faq(id, &submission.payload).await?,
            (FormMode::Create, Some(product_id)) => {
                api.create_faq(product_id, &submission.payload).await?;
            }
            (FormMode::Create, None) => {
                let mut errors = ValidationErrors::new();
                errors.add("productId", "Select a product before adding a FAQ");
                return Err(errors.into());
            }
        }
        Ok(())
    }

    fn failure_message(_mode: &FormMode<FaqId>) -> String {
        "Failed to save FAQ".to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_product() {
        let form = FaqForm {
            product_id: None,
            question: "Is it machine washable?".to_string(),
            answer: "Yes, on a cold cycle.".to_string(),
        };
        let errors = form.validate(false).unwrap_err();
        assert_eq!(
            errors.get("productId"),
            Some("Select a product before adding a FAQ")
        );
        assert!(form.validate(true).is_ok());
    }

    #[test]
    fn test_length_rules() {
        let form = FaqForm {
            question: "Why?".to_string(),
            answer: "Because.".to_string(),
            ..FaqForm::for_product(ProductId::new("p1"))
        };
        let errors = form.validate(false).unwrap_err();
        assert_eq!(
            errors.get("question"),
            Some("Question must be at least 5 characters")
        );
        assert_eq!(
            errors.get("answer"),
            Some("Answer must be at least 10 characters")
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            FaqForm::success_message(&FormMode::Create),
            "FAQ created successfully"
        );
        assert_eq!(
            FaqForm::failure_message(&FormMode::Edit(FaqId::new("f1"))),
            "Failed to save FAQ"
        );
    }
}
