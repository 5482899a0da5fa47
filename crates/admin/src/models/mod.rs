//! Domain models for the back office.
//!
//! Every entity accepts its identifier as either `_id` or `id` on the wire
//! and serializes it back as `id`.

pub mod analytics;
pub mod faq;
pub mod order;
pub mod product;
pub mod review;
pub mod session;
pub mod user;

pub use analytics::{BusinessMetrics, CategorySales, MonthlyRevenue};
pub use faq::{Faq, FaqPayload};
pub use order::{Order, OrderCustomer, OrderItem, OrderProduct, ShippingAddress};
pub use product::{LOW_STOCK_THRESHOLD, Product, ProductPayload, ProductStockPayload};
pub use review::{Rating, Review};
pub use session::{LoginRequest, LoginResponse, Session, SessionUser};
pub use user::{User, UserPayload};
