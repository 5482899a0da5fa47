//! Order status selector on the order detail page.

use async_trait::async_trait;

use backoffice_core::{OrderId, OrderStatus};

use super::{FormMode, FormSchema, FormSpec};
use crate::error::AppError;
use crate::models::Order;
use crate::resources::AdminApi;
use crate::validation::ValidationErrors;

/// Selected status, as its wire value.
#[derive(Debug, Clone)]
pub struct OrderStatusForm {
    pub status: String,
}

impl Default for OrderStatusForm {
    fn default() -> Self {
        Self {
            status: OrderStatus::Pending.as_str().to_owned(),
        }
    }
}

impl FormSchema for OrderStatusForm {
    type Output = OrderStatus;

    fn validate(&self, _editing: bool) -> Result<OrderStatus, ValidationErrors> {
        self.status.trim().parse::<OrderStatus>().map_err(|_| {
            let mut errors = ValidationErrors::new();
            errors.add("status", "Select a valid status");
            errors
        })
    }
}

#[async_trait]
impl FormSpec for OrderStatusForm {
    type Entity = Order;
    type Id = OrderId;
    const NOUN: &'static str = "order";

    fn from_entity(order: &Order) -> Self {
        Self {
            status: order.status.as_str().to_owned(),
        }
    }

    async fn submit(
        api: &AdminApi,
        mode: &FormMode<OrderId>,
        status: &OrderStatus,
    ) -> Result<(), AppError> {
        let FormMode::Edit(id) = mode else {
            let mut errors = ValidationErrors::new();
            errors.add("status", "Orders are placed by customers, not created here");
            return Err(errors.into());
        };
        api.update_order_status(id, *status).await?;
        Ok(())
    }

    fn success_message(_mode: &FormMode<OrderId>) -> String {
        "Order status updated".to_owned()
    }

    fn failure_message(_mode: &FormMode<OrderId>) -> String {
        "Failed to update status".to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_must_be_known() {
        let form = OrderStatusForm {
            status: "shipped".to_string(),
        };
        assert_eq!(form.validate(true).unwrap(), OrderStatus::Shipped);

        let form = OrderStatusForm {
            status: "lost".to_string(),
        };
        assert_eq!(
            form.validate(true).unwrap_err().get("status"),
            Some("Select a valid status")
        );
    }
}
