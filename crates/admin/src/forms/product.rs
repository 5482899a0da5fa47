//! Create/edit product page and the list's quick-edit modal.

use async_trait::async_trait;

use backoffice_core::ProductId;

use super::{FormMode, FormSchema, FormSpec};
use crate::error::AppError;
use crate::models::{Product, ProductPayload, ProductStockPayload};
use crate::resources::AdminApi;
use crate::validation::{self, ValidationErrors};

/// Product form fields. Numbers are kept as typed; `colors` and `sizes`
/// are comma-separated.
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub old_price: String,
    pub discount_percentage: String,
    pub category: String,
    pub dress_style: String,
    pub stock: String,
    pub in_stock: bool,
    pub colors: String,
    pub sizes: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            old_price: String::new(),
            discount_percentage: String::new(),
            category: String::new(),
            dress_style: String::new(),
            stock: String::new(),
            in_stock: true,
            colors: String::new(),
            sizes: String::new(),
        }
    }
}

impl FormSchema for ProductForm {
    type Output = ProductPayload;

    fn validate(&self, _editing: bool) -> Result<ProductPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = validation::min_chars(&mut errors, "name", &self.name, 1, "Product name is required");
        let description = validation::min_chars(
            &mut errors,
            "description",
            &self.description,
            10,
            "Description must be at least 10 characters",
        );
        let price = validation::non_negative_decimal(&mut errors, "price", "Price", &self.price);
        let old_price =
            validation::optional_non_negative_decimal(&mut errors, "oldPrice", "Old price", &self.old_price);
        let discount_percentage = validation::optional_non_negative_decimal(
            &mut errors,
            "discountPercentage",
            "Discount percentage",
            &self.discount_percentage,
        );
        let category =
            validation::min_chars(&mut errors, "category", &self.category, 1, "Category is required");
        let dress_style = validation::min_chars(
            &mut errors,
            "dressStyle",
            &self.dress_style,
            1,
            "Dress style is required",
        );
        let stock = validation::non_negative_integer(&mut errors, "stock", "Stock", &self.stock);

        match (price, stock) {
            (Some(price), Some(stock)) if errors.is_empty() => Ok(ProductPayload {
                name,
                description,
                price,
                old_price,
                discount_percentage,
                category,
                dress_style,
                stock,
                in_stock: self.in_stock,
                colors: validation::comma_list(&self.colors),
                sizes: validation::comma_list(&self.sizes),
            }),
            _ => Err(errors),
        }
    }
}

#[async_trait]
impl FormSpec for ProductForm {
    type Entity = Product;
    type Id = ProductId;
    const NOUN: &'static str = "product";

    fn from_entity(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            old_price: product
                .old_price
                .map(|old| old.to_string())
                .unwrap_or_default(),
            discount_percentage: product
                .discount_percentage
                .map(|pct| pct.to_string())
                .unwrap_or_default(),
            category: product.category.clone(),
            dress_style: product.dress_style.clone().unwrap_or_default(),
            stock: product.stock.to_string(),
            in_stock: product.in_stock.unwrap_or(product.stock > 0),
            colors: product.colors.join(", "),
            sizes: product.sizes.join(", "),
        }
    }

    async fn submit(
        api: &AdminApi,
        mode: &FormMode<ProductId>,
        payload: &ProductPayload,
    ) -> Result<(), AppError> {
        match mode {
            FormMode::Create => api.create_product(payload).await?,
            FormMode::Edit(id) => api.update_product(id, payload).await?,
        }
        Ok(())
    }
}

// =============================================================================
// Quick edit
// =============================================================================

/// Price and stock only, edited from the product list.
#[derive(Debug, Clone, Default)]
pub struct ProductStockForm {
    pub price: String,
    pub stock: String,
}

impl FormSchema for ProductStockForm {
    type Output = ProductStockPayload;

    fn validate(&self, _editing: bool) -> Result<ProductStockPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let price = validation::non_negative_decimal(&mut errors, "price", "Price", &self.price);
        let stock = validation::non_negative_integer(&mut errors, "stock", "Stock", &self.stock);
        match (price, stock) {
            (Some(price), Some(stock)) => Ok(ProductStockPayload { price, stock }),
            _ => Err(errors),
        }
    }
}

#[async_trait]
impl FormSpec for ProductStockForm {
    type Entity = Product;
    type Id = ProductId;
    const NOUN: &'static str = "product";

    fn from_entity(product: &Product) -> Self {
        Self {
            price: product.price.to_string(),
            stock: product.stock.to_string(),
        }
    }

    async fn submit(
        api: &AdminApi,
        mode: &FormMode<ProductId>,
        payload: &ProductStockPayload,
    ) -> Result<(), AppError> {
        let FormMode::Edit(id) = mode else {
            let mut errors = ValidationErrors::new();
            errors.add("price", "Quick edit needs an existing product");
            return Err(errors.into());
        };
        api.update_product_stock(id, payload).await?;
        Ok(())
    }
}
