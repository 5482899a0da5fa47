//! Integration test support for the back-office admin client.
//!
//! [`StubBackend`] is an in-memory stand-in for the REST API. It implements
//! [`HttpTransport`], so an [`AppState`] built over it runs the real client,
//! cache, controllers and forms end to end without a network.
//!
//! The backend accepts one administrator ([`ADMIN_EMAIL`] /
//! [`ADMIN_PASSWORD`]) and issues [`ADMIN_TOKEN`]. Every other route
//! requires that token as a bearer; [`StubBackend::revoke_tokens`] makes it
//! answer `401` from then on.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p backoffice-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{Map, Value, json};

use backoffice_admin::api::{
    HttpMethod, HttpTransport, TransportError, TransportRequest, TransportResponse,
};
use backoffice_admin::config::{AdminConfig, ConfigError};
use backoffice_admin::forms::LoginForm;
use backoffice_admin::storage::SharedStore;
use backoffice_admin::{AppError, AppState};

/// API base the stub is mounted at.
pub const BASE_URL: &str = "http://stub.local/api";
/// Email of the seeded administrator.
pub const ADMIN_EMAIL: &str = "admin@example.com";
/// Password of the seeded administrator.
pub const ADMIN_PASSWORD: &str = "password";
/// Token issued on login.
pub const ADMIN_TOKEN: &str = "abc";

const CREATED_AT: &str = "2026-02-08T11:24:07Z";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// =============================================================================
// StubBackend
// =============================================================================

/// In-memory REST backend.
#[derive(Debug)]
pub struct StubBackend {
    data: Mutex<Data>,
    log: Mutex<Vec<TransportRequest>>,
}

#[derive(Debug)]
struct Data {
    users: Vec<Value>,
    products: Vec<Value>,
    orders: Vec<Value>,
    reviews: Vec<Value>,
    faqs: Vec<Value>,
    next_id: u64,
    accepted_token: Option<String>,
}

impl Data {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn collection(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        match name {
            "users" => Some(&mut self.users),
            "products" => Some(&mut self.products),
            "orders" => Some(&mut self.orders),
            "reviews" => Some(&mut self.reviews),
            "faqs" => Some(&mut self.faqs),
            _ => None,
        }
    }
}

impl StubBackend {
    /// Backend holding only the administrator account.
    #[must_use]
    pub fn new() -> Arc<Self> {
        let admin = json!({
            "_id": "admin",
            "firstName": "Admin",
            "lastName": "User",
            "email": ADMIN_EMAIL,
            "role": "admin",
            "isVerified": true,
            "createdAt": CREATED_AT,
        });
        Arc::new(Self {
            data: Mutex::new(Data {
                users: vec![admin],
                products: Vec::new(),
                orders: Vec::new(),
                reviews: Vec::new(),
                faqs: Vec::new(),
                next_id: 0,
                accepted_token: Some(ADMIN_TOKEN.to_owned()),
            }),
            log: Mutex::new(Vec::new()),
        })
    }

    fn data(&self) -> MutexGuard<'_, Data> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn log(&self) -> MutexGuard<'_, Vec<TransportRequest>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    /// Add a customer account and return its id.
    pub fn add_user(&self, first_name: &str, email: &str) -> String {
        let mut data = self.data();
        let id = data.next_id("u");
        data.users.push(json!({
            "_id": id,
            "firstName": first_name,
            "email": email,
            "role": "customer",
            "isVerified": false,
            "createdAt": CREATED_AT,
        }));
        id
    }

    /// Add a product and return its id.
    pub fn add_product(&self, name: &str, category: &str, price: f64) -> String {
        let mut data = self.data();
        let id = data.next_id("p");
        data.products.push(json!({
            "_id": id,
            "name": name,
            "description": format!("{name} from the seeded catalogue."),
            "category": category,
            "dressStyle": "Casual",
            "price": price,
            "stock": 20,
            "colors": ["black"],
            "sizes": ["M"],
            "images": [],
            "createdAt": CREATED_AT,
        }));
        id
    }

    /// Add a FAQ under `product_id` and return its id.
    pub fn add_faq(&self, product_id: &str, question: &str, answer: &str) -> String {
        let mut data = self.data();
        let id = data.next_id("f");
        data.faqs.push(json!({
            "_id": id,
            "productId": product_id,
            "question": question,
            "answer": answer,
            "createdAt": CREATED_AT,
        }));
        id
    }

    /// Add a pending order placed by `email` and return its id.
    pub fn add_order(&self, email: &str, total: f64) -> String {
        let mut data = self.data();
        let id = data.next_id("o");
        data.orders.push(json!({
            "_id": id,
            "user": email,
            "items": [],
            "subTotal": total,
            "shipping": 0,
            "tax": 0,
            "total": total,
            "status": "pending",
            "createdAt": CREATED_AT,
        }));
        id
    }

    /// Add a review of `product_id` and return its id.
    pub fn add_review(&self, product_id: &str, rating: u8, comment: &str) -> String {
        let mut data = self.data();
        let id = data.next_id("r");
        data.reviews.push(json!({
            "_id": id,
            "productId": product_id,
            "userName": "Shopper",
            "rating": rating,
            "comment": comment,
            "createdAt": CREATED_AT,
        }));
        id
    }

    /// Reject every token issued so far, as an expired session would.
    pub fn revoke_tokens(&self) {
        self.data().accepted_token = None;
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Every request received, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.log().clone()
    }

    /// Number of requests received.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.log().len()
    }

    /// Forget the request log.
    pub fn clear_log(&self) {
        self.log().clear();
    }

    /// Ids of the FAQs stored under `product_id`.
    #[must_use]
    pub fn faq_ids(&self, product_id: &str) -> Vec<String> {
        self.data()
            .faqs
            .iter()
            .filter(|faq| faq["productId"] == product_id)
            .filter_map(|faq| faq["_id"].as_str().map(str::to_owned))
            .collect()
    }

    /// Stored status of an order.
    #[must_use]
    pub fn order_status(&self, order_id: &str) -> Option<String> {
        self.data()
            .orders
            .iter()
            .find(|order| order["_id"] == order_id)
            .and_then(|order| order["status"].as_str().map(str::to_owned))
    }

    // =========================================================================
    // Routing
    // =========================================================================

    fn handle(&self, request: &TransportRequest) -> TransportResponse {
        let segments: Vec<String> = request
            .url
            .path_segments()
            .map(|segments| segments.map(str::to_owned).collect())
            .unwrap_or_default();
        let path: Vec<&str> = segments.iter().map(String::as_str).collect();
        let path = path.strip_prefix(&["api"][..]).unwrap_or(&path);
        let query: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
        let body = request.body.clone().unwrap_or(Value::Null);

        if path == ["auth", "login"] {
            return self.login(request.method, &body);
        }

        let mut data = self.data();
        let authorized = match (&request.bearer, &data.accepted_token) {
            (Some(bearer), Some(accepted)) => bearer.expose_secret() == accepted,
            _ => false,
        };
        if !authorized {
            return respond(401, json!({ "message": "Not authorized, token failed" }));
        }

        match (request.method, path) {
            (HttpMethod::Get, ["users"]) => {
                list(&data.users, "users", &query, &["firstName", "lastName", "email"], &["role"])
            }
            (HttpMethod::Get, ["products"]) => {
                list(&data.products, "products", &query, &["name"], &["category"])
            }
            (HttpMethod::Get, ["orders"]) => {
                list(&data.orders, "orders", &query, &["_id", "user"], &["status"])
            }
            (HttpMethod::Get, ["reviews"]) => {
                list(&data.reviews, "reviews", &query, &["comment"], &["productId"])
            }
            (HttpMethod::Get, ["faqs", product_id]) => {
                let faqs: Vec<Value> = data
                    .faqs
                    .iter()
                    .filter(|faq| faq["productId"] == *product_id)
                    .cloned()
                    .collect();
                list(&faqs, "faqs", &query, &[], &[])
            }
            (HttpMethod::Get, [collection @ ("users" | "products" | "orders"), id]) => {
                find(&mut data, collection, id)
            }
            (HttpMethod::Post, [collection @ ("users" | "products")]) => {
                create(&mut data, collection, body, None)
            }
            (HttpMethod::Post, ["faqs", product_id]) => {
                create(&mut data, "faqs", body, Some(*product_id))
            }
            (
                HttpMethod::Patch | HttpMethod::Put,
                [collection @ ("users" | "products" | "faqs"), id],
            ) => update(&mut data, collection, id, body),
            (HttpMethod::Patch, ["orders", id, "status"]) => update(&mut data, "orders", id, body),
            (
                HttpMethod::Delete,
                [collection @ ("users" | "products" | "reviews" | "faqs"), id],
            ) => remove(&mut data, collection, id),
            (HttpMethod::Get, ["analytics", "monthly-revenue"]) => {
                let months = query
                    .get("months")
                    .and_then(|m| m.parse::<usize>().ok())
                    .unwrap_or(12);
                let revenue: Vec<Value> = MONTHS
                    .iter()
                    .take(months)
                    .zip(0_u32..)
                    .map(|(month, i)| {
                        json!({ "month": month, "revenue": 1000.0 + 250.0 * f64::from(i), "orders": 10 + i })
                    })
                    .collect();
                respond(200, json!({ "revenue": revenue }))
            }
            (HttpMethod::Get, ["analytics", "sales-by-category"]) => respond(
                200,
                json!({ "categories": [
                    { "category": "T-shirts", "sales": 600.0, "percentage": 60.0 },
                    { "category": "Jeans", "sales": 400.0, "percentage": 40.0 }
                ] }),
            ),
            (HttpMethod::Get, ["analytics", "business-metrics"]) => {
                let metrics = json!({
                    "totalUsers": data.users.len(),
                    "totalProducts": data.products.len(),
                    "totalOrders": data.orders.len(),
                    "totalRevenue": data.orders.iter().filter_map(|o| o["total"].as_f64()).sum::<f64>(),
                    "userGrowth": 0.0,
                    "productGrowth": 0.0,
                    "orderGrowth": 0.0,
                    "revenueGrowth": 0.0,
                });
                respond(200, json!({ "metrics": metrics }))
            }
            _ => respond(404, json!({ "message": "Route not found" })),
        }
    }

    fn login(&self, method: HttpMethod, body: &Value) -> TransportResponse {
        if method != HttpMethod::Post {
            return respond(404, json!({ "message": "Route not found" }));
        }
        if body["email"] != ADMIN_EMAIL || body["password"] != ADMIN_PASSWORD {
            return respond(401, json!({ "message": "Invalid email or password" }));
        }
        let mut data = self.data();
        data.accepted_token = Some(ADMIN_TOKEN.to_owned());
        respond(
            200,
            json!({
                "user": {
                    "_id": "admin",
                    "email": ADMIN_EMAIL,
                    "firstName": "Admin",
                    "lastName": "User",
                    "role": "admin"
                },
                "token": ADMIN_TOKEN
            }),
        )
    }
}

#[async_trait]
impl HttpTransport for StubBackend {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let response = self.handle(&request);
        self.log().push(request);
        // Yield so spawned tasks interleave as they would over real I/O.
        tokio::task::yield_now().await;
        Ok(response)
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn respond(status: u16, body: Value) -> TransportResponse {
    TransportResponse::new(status, body)
}

fn field_text(item: &Value, field: &str) -> String {
    match &item[field] {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    match (a[field].as_f64(), b[field].as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => field_text(a, field).cmp(&field_text(b, field)),
    }
}

fn list(
    items: &[Value],
    key: &str,
    query: &HashMap<String, String>,
    search_fields: &[&str],
    filter_fields: &[&str],
) -> TransportResponse {
    let search = query
        .get("search")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();
    let mut matching: Vec<Value> = items
        .iter()
        .filter(|item| {
            search.is_empty()
                || search_fields
                    .iter()
                    .any(|field| field_text(item, field).to_lowercase().contains(&search))
        })
        .filter(|item| {
            filter_fields.iter().all(|field| {
                query
                    .get(*field)
                    .is_none_or(|wanted| field_text(item, field).eq_ignore_ascii_case(wanted))
            })
        })
        .cloned()
        .collect();

    if let Some(sort_by) = query.get("sortBy") {
        matching.sort_by(|a, b| compare_field(a, b, sort_by));
        if query.get("sortOrder").map(String::as_str) != Some("asc") {
            matching.reverse();
        }
    }

    let page = query
        .get("page")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    let limit = query
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(10)
        .max(1);
    let total = matching.len();
    let page_items: Vec<Value> = matching
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    let mut body = Map::new();
    body.insert(key.to_owned(), Value::Array(page_items));
    body.insert(
        "pagination".to_owned(),
        json!({ "page": page, "limit": limit, "total": total }),
    );
    respond(200, Value::Object(body))
}

fn find(data: &mut Data, collection: &str, id: &str) -> TransportResponse {
    data.collection(collection)
        .and_then(|items| items.iter().find(|item| item["_id"] == id).cloned())
        .map_or_else(
            || respond(404, json!({ "message": "Not found" })),
            |item| respond(200, item),
        )
}

fn create(data: &mut Data, collection: &str, body: Value, product_id: Option<&str>) -> TransportResponse {
    let Value::Object(mut fields) = body else {
        return respond(400, json!({ "message": "Expected a JSON object" }));
    };
    let id = data.next_id(collection.get(..1).unwrap_or("x"));
    fields.remove("password");
    fields.insert("_id".to_owned(), Value::String(id));
    fields.insert("createdAt".to_owned(), Value::String(CREATED_AT.to_owned()));
    if let Some(product_id) = product_id {
        fields.insert("productId".to_owned(), Value::String(product_id.to_owned()));
    }
    let item = Value::Object(fields);
    match data.collection(collection) {
        Some(items) => {
            items.push(item.clone());
            respond(201, item)
        }
        None => respond(404, json!({ "message": "Route not found" })),
    }
}

fn update(data: &mut Data, collection: &str, id: &str, body: Value) -> TransportResponse {
    let Value::Object(changes) = body else {
        return respond(400, json!({ "message": "Expected a JSON object" }));
    };
    let Some(item) = data
        .collection(collection)
        .and_then(|items| items.iter_mut().find(|item| item["_id"] == id))
    else {
        return respond(404, json!({ "message": "Not found" }));
    };
    if let Value::Object(fields) = &mut *item {
        for (key, value) in changes {
            if key != "password" {
                fields.insert(key, value);
            }
        }
    }
    respond(200, item.clone())
}

fn remove(data: &mut Data, collection: &str, id: &str) -> TransportResponse {
    let Some(items) = data.collection(collection) else {
        return respond(404, json!({ "message": "Route not found" }));
    };
    let before = items.len();
    items.retain(|item| item["_id"] != id);
    if items.len() == before {
        respond(404, json!({ "message": "Not found" }))
    } else {
        respond(200, json!({ "message": "Deleted" }))
    }
}

// =============================================================================
// App helpers
// =============================================================================

/// Configuration pointing at the stub.
///
/// # Errors
///
/// Returns `ConfigError` if [`BASE_URL`] does not parse.
pub fn config() -> Result<AdminConfig, ConfigError> {
    AdminConfig::for_api_url(BASE_URL)
}

/// Application state wired to `backend` and `storage`.
///
/// # Errors
///
/// Returns `ConfigError` if [`BASE_URL`] does not parse.
pub fn app(backend: &Arc<StubBackend>, storage: SharedStore) -> Result<AppState, ConfigError> {
    Ok(AppState::new(
        config()?,
        Arc::clone(backend) as Arc<dyn HttpTransport>,
        storage,
    ))
}

/// Log the administrator in.
///
/// # Errors
///
/// Returns `AppError` if the stub rejects the login.
pub async fn log_in(state: &AppState) -> Result<(), AppError> {
    state
        .login(&LoginForm {
            email: ADMIN_EMAIL.to_owned(),
            password: ADMIN_PASSWORD.to_owned(),
        })
        .await
        .map(|_| ())
}
