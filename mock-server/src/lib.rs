//! In-memory stand-in for the Gumroad v2 API.
//!
//! Speaks the same envelope as the real service: successes are
//! `200 {"success": true, <payload>}`, failures carry `"success": false`
//! and a `message`. Every route requires `access_token=ACCESS_TOKEN` in the
//! query string.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// The only token the mock accepts.
pub const ACCESS_TOKEN: &str = "mock-access-token";

pub const SEED_PRODUCT_ID: &str = "prod-1";
pub const SEED_SALE_ID: &str = "sale-1";
pub const SEED_SUBSCRIBER_ID: &str = "sub-1";
pub const SEED_LICENSE_KEY: &str = "LICENSE-KEY-1";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub currency: String,
    pub published: bool,
    pub custom_permalink: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VariantCategory {
    pub id: String,
    pub title: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub name: String,
    pub price_difference_cents: i64,
    pub max_purchase_count: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OfferCode {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_off: Option<i64>,
    pub max_purchase_count: Option<u64>,
    pub universal: bool,
    pub times_used: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomField {
    pub name: String,
    pub required: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub email: String,
    pub product_id: String,
    pub product_name: String,
    pub price: i64,
    pub refunded: bool,
    pub partially_refunded: bool,
    pub shipped: bool,
    pub tracking_url: Option<String>,
    pub license_key: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub user_email: String,
    pub purchase_ids: Vec<String>,
    pub recurrence: String,
    pub status: String,
}

#[derive(Clone, Debug)]
pub struct License {
    pub product_id: String,
    pub sale_id: String,
    pub email: String,
    pub uses: u64,
    pub enabled: bool,
}

#[derive(Clone, Debug)]
struct CategoryRecord {
    category: VariantCategory,
    variants: BTreeMap<String, Variant>,
}

#[derive(Clone, Debug)]
struct ProductRecord {
    product: Product,
    variant_categories: BTreeMap<String, CategoryRecord>,
    offer_codes: BTreeMap<String, OfferCode>,
    custom_fields: Vec<CustomField>,
}

impl ProductRecord {
    fn new(product: Product) -> Self {
        Self {
            product,
            variant_categories: BTreeMap::new(),
            offer_codes: BTreeMap::new(),
            custom_fields: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Store {
    products: BTreeMap<String, ProductRecord>,
    sales: BTreeMap<String, Sale>,
    subscribers: BTreeMap<String, Subscriber>,
    licenses: BTreeMap<String, License>,
}

pub type Db = Arc<RwLock<Store>>;

/// Failure reply: `{"success": false, "message": ...}` with `status`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(kind: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("The {kind} was not found."))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({"success": false, "message": self.message})),
        )
            .into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

/// Success reply with `payload`'s keys merged next to `"success": true`.
fn success(payload: Value) -> ApiResult {
    let mut body = json!({"success": true});
    if let (Some(body), Value::Object(fields)) = (body.as_object_mut(), payload) {
        body.extend(fields);
    }
    Ok(Json(body))
}

fn deleted(kind: &str) -> ApiResult {
    success(json!({"message": format!("The {kind} was deleted successfully.")}))
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Router over an empty store.
pub fn app() -> Router {
    router(Store::default())
}

/// Router over a store holding one product, sale, subscriber and license.
pub fn seeded_app() -> Router {
    router(seed())
}

fn seed() -> Store {
    let product = Product {
        id: SEED_PRODUCT_ID.to_string(),
        name: "Rust Handbook".to_string(),
        price: 2500,
        currency: "usd".to_string(),
        published: true,
        custom_permalink: Some("rust-handbook".to_string()),
        tags: vec!["rust".to_string()],
    };
    let sale = Sale {
        id: SEED_SALE_ID.to_string(),
        email: "buyer@example.com".to_string(),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        price: product.price,
        refunded: false,
        partially_refunded: false,
        shipped: false,
        tracking_url: None,
        license_key: Some(SEED_LICENSE_KEY.to_string()),
    };
    let subscriber = Subscriber {
        id: SEED_SUBSCRIBER_ID.to_string(),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        user_email: sale.email.clone(),
        purchase_ids: vec![sale.id.clone()],
        recurrence: "monthly".to_string(),
        status: "alive".to_string(),
    };
    let license = License {
        product_id: product.id.clone(),
        sale_id: sale.id.clone(),
        email: sale.email.clone(),
        uses: 0,
        enabled: true,
    };

    let mut store = Store::default();
    store
        .products
        .insert(product.id.clone(), ProductRecord::new(product));
    store.sales.insert(sale.id.clone(), sale);
    store.subscribers.insert(subscriber.id.clone(), subscriber);
    store.licenses.insert(SEED_LICENSE_KEY.to_string(), license);
    store
}

fn router(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/user", get(get_user))
        .route("/products", get(list_products))
        .route("/products/{product_id}", get(get_product).delete(delete_product))
        .route("/products/{product_id}/enable", put(enable_product))
        .route("/products/{product_id}/disable", put(disable_product))
        .route(
            "/products/{product_id}/variant_categories",
            get(list_variant_categories).post(create_variant_category),
        )
        .route(
            "/products/{product_id}/variant_categories/{category_id}",
            get(get_variant_category)
                .put(update_variant_category)
                .delete(delete_variant_category),
        )
        .route(
            "/products/{product_id}/variant_categories/{category_id}/variants",
            get(list_variants).post(create_variant),
        )
        .route(
            "/products/{product_id}/variant_categories/{category_id}/variants/{variant_id}",
            get(get_variant).put(update_variant).delete(delete_variant),
        )
        .route(
            "/products/{product_id}/offer_codes",
            get(list_offer_codes).post(create_offer_code),
        )
        .route(
            "/products/{product_id}/offer_codes/{offer_code_id}",
            get(get_offer_code)
                .put(update_offer_code)
                .delete(delete_offer_code),
        )
        .route(
            "/products/{product_id}/custom_fields",
            get(list_custom_fields).post(create_custom_field),
        )
        .route(
            "/products/{product_id}/custom_fields/{name}",
            put(update_custom_field).delete(delete_custom_field),
        )
        .route("/products/{product_id}/subscribers", get(list_subscribers))
        .route("/subscribers/{subscriber_id}", get(get_subscriber))
        .route("/sales", get(list_sales))
        .route("/sales/{sale_id}", get(get_sale))
        .route("/sales/{sale_id}/mark_as_shipped", put(mark_as_shipped))
        .route("/sales/{sale_id}/refund", put(refund_sale))
        .route("/licenses/verify", post(verify_license))
        .route("/licenses/enable", put(enable_license))
        .route("/licenses/disable", put(disable_license))
        .layer(middleware::from_fn(require_access_token))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, seeded_app()).await
}

async fn require_access_token(
    Query(query): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    match query.get("access_token").map(String::as_str) {
        Some(ACCESS_TOKEN) => next.run(request).await,
        other => {
            tracing::debug!(
                uri = %request.uri(),
                token_present = other.is_some(),
                "rejecting request"
            );
            unauthorized(other.is_some())
        }
    }
}

fn unauthorized(token_present: bool) -> Response {
    let message = if token_present {
        "The access token is invalid."
    } else {
        "The access token is missing."
    };
    ApiError::new(StatusCode::UNAUTHORIZED, message).into_response()
}

// ---------------------------------------------------------------------------
// User and products
// ---------------------------------------------------------------------------

async fn get_user() -> ApiResult {
    success(json!({
        "user": {
            "user_id": "user-1",
            "name": "Mock Seller",
            "email": "seller@example.com",
            "bio": "Sells mock things.",
            "url": "https://mock.gumroad.com"
        }
    }))
}

async fn list_products(State(db): State<Db>) -> ApiResult {
    let store = db.read().await;
    let products: Vec<&Product> = store.products.values().map(|r| &r.product).collect();
    success(json!({ "products": to_value(&products) }))
}

async fn get_product(State(db): State<Db>, Path(product_id): Path<String>) -> ApiResult {
    let store = db.read().await;
    let record = product_ref(&store, &product_id)?;
    success(json!({ "product": to_value(&record.product) }))
}

async fn delete_product(State(db): State<Db>, Path(product_id): Path<String>) -> ApiResult {
    let mut store = db.write().await;
    store
        .products
        .remove(&product_id)
        .ok_or_else(|| ApiError::not_found("product"))?;
    deleted("product")
}

async fn set_published(db: &Db, product_id: &str, published: bool) -> ApiResult {
    let mut store = db.write().await;
    let record = store
        .products
        .get_mut(product_id)
        .ok_or_else(|| ApiError::not_found("product"))?;
    record.product.published = published;
    success(json!({ "product": to_value(&record.product) }))
}

async fn enable_product(State(db): State<Db>, Path(product_id): Path<String>) -> ApiResult {
    set_published(&db, &product_id, true).await
}

async fn disable_product(State(db): State<Db>, Path(product_id): Path<String>) -> ApiResult {
    set_published(&db, &product_id, false).await
}

// ---------------------------------------------------------------------------
// Variant categories and variants
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct VariantCategoryInput {
    pub title: Option<String>,
}

#[derive(Deserialize)]
pub struct VariantInput {
    pub name: Option<String>,
    pub price_difference_cents: Option<i64>,
    pub max_purchase_count: Option<u64>,
}

async fn create_variant_category(
    State(db): State<Db>,
    Path(product_id): Path<String>,
    Json(input): Json<VariantCategoryInput>,
) -> ApiResult {
    let mut store = db.write().await;
    let record = store
        .products
        .get_mut(&product_id)
        .ok_or_else(|| ApiError::not_found("product"))?;
    let category = VariantCategory {
        id: new_id(),
        title: input.title.unwrap_or_default(),
    };
    record.variant_categories.insert(
        category.id.clone(),
        CategoryRecord {
            category: category.clone(),
            variants: BTreeMap::new(),
        },
    );
    success(json!({ "variant_category": to_value(&category) }))
}

async fn list_variant_categories(
    State(db): State<Db>,
    Path(product_id): Path<String>,
) -> ApiResult {
    let store = db.read().await;
    let record = product_ref(&store, &product_id)?;
    let categories: Vec<&VariantCategory> = record
        .variant_categories
        .values()
        .map(|c| &c.category)
        .collect();
    success(json!({ "variant_categories": to_value(&categories) }))
}

fn category_ref<'a>(
    store: &'a Store,
    product_id: &str,
    category_id: &str,
) -> Result<&'a CategoryRecord, ApiError> {
    product_ref(store, product_id)?
        .variant_categories
        .get(category_id)
        .ok_or_else(|| ApiError::not_found("variant_category"))
}

fn category_mut<'a>(
    store: &'a mut Store,
    product_id: &str,
    category_id: &str,
) -> Result<&'a mut CategoryRecord, ApiError> {
    store
        .products
        .get_mut(product_id)
        .ok_or_else(|| ApiError::not_found("product"))?
        .variant_categories
        .get_mut(category_id)
        .ok_or_else(|| ApiError::not_found("variant_category"))
}

async fn get_variant_category(
    State(db): State<Db>,
    Path((product_id, category_id)): Path<(String, String)>,
) -> ApiResult {
    let store = db.read().await;
    let record = category_ref(&store, &product_id, &category_id)?;
    success(json!({ "variant_category": to_value(&record.category) }))
}

async fn update_variant_category(
    State(db): State<Db>,
    Path((product_id, category_id)): Path<(String, String)>,
    Json(input): Json<VariantCategoryInput>,
) -> ApiResult {
    let mut store = db.write().await;
    let record = category_mut(&mut store, &product_id, &category_id)?;
    if let Some(title) = input.title {
        record.category.title = title;
    }
    success(json!({ "variant_category": to_value(&record.category) }))
}

async fn delete_variant_category(
    State(db): State<Db>,
    Path((product_id, category_id)): Path<(String, String)>,
) -> ApiResult {
    let mut store = db.write().await;
    store
        .products
        .get_mut(&product_id)
        .ok_or_else(|| ApiError::not_found("product"))?
        .variant_categories
        .remove(&category_id)
        .ok_or_else(|| ApiError::not_found("variant_category"))?;
    deleted("variant_category")
}

async fn create_variant(
    State(db): State<Db>,
    Path((product_id, category_id)): Path<(String, String)>,
    Json(input): Json<VariantInput>,
) -> ApiResult {
    let mut store = db.write().await;
    let record = category_mut(&mut store, &product_id, &category_id)?;
    let variant = Variant {
        id: new_id(),
        name: input.name.unwrap_or_default(),
        price_difference_cents: input.price_difference_cents.unwrap_or(0),
        max_purchase_count: input.max_purchase_count,
    };
    record.variants.insert(variant.id.clone(), variant.clone());
    success(json!({ "variant": to_value(&variant) }))
}

async fn list_variants(
    State(db): State<Db>,
    Path((product_id, category_id)): Path<(String, String)>,
) -> ApiResult {
    let store = db.read().await;
    let record = category_ref(&store, &product_id, &category_id)?;
    let variants: Vec<&Variant> = record.variants.values().collect();
    success(json!({ "variants": to_value(&variants) }))
}

async fn get_variant(
    State(db): State<Db>,
    Path((product_id, category_id, variant_id)): Path<(String, String, String)>,
) -> ApiResult {
    let store = db.read().await;
    let record = category_ref(&store, &product_id, &category_id)?;
    let variant = record
        .variants
        .get(&variant_id)
        .ok_or_else(|| ApiError::not_found("variant"))?;
    success(json!({ "variant": to_value(variant) }))
}

async fn update_variant(
    State(db): State<Db>,
    Path((product_id, category_id, variant_id)): Path<(String, String, String)>,
    Json(input): Json<VariantInput>,
) -> ApiResult {
    let mut store = db.write().await;
    let record = category_mut(&mut store, &product_id, &category_id)?;
    let variant = record
        .variants
        .get_mut(&variant_id)
        .ok_or_else(|| ApiError::not_found("variant"))?;
    if let Some(name) = input.name {
        variant.name = name;
    }
    if let Some(cents) = input.price_difference_cents {
        variant.price_difference_cents = cents;
    }
    if input.max_purchase_count.is_some() {
        variant.max_purchase_count = input.max_purchase_count;
    }
    success(json!({ "variant": to_value(variant) }))
}

async fn delete_variant(
    State(db): State<Db>,
    Path((product_id, category_id, variant_id)): Path<(String, String, String)>,
) -> ApiResult {
    let mut store = db.write().await;
    let record = category_mut(&mut store, &product_id, &category_id)?;
    record
        .variants
        .remove(&variant_id)
        .ok_or_else(|| ApiError::not_found("variant"))?;
    deleted("variant")
}

// ---------------------------------------------------------------------------
// Offer codes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct OfferCodeInput {
    pub name: Option<String>,
    pub amount_off: Option<i64>,
    pub offer_type: Option<String>,
    pub max_purchase_count: Option<u64>,
    pub universal: Option<bool>,
}

fn product_ref<'a>(store: &'a Store, product_id: &str) -> Result<&'a ProductRecord, ApiError> {
    store
        .products
        .get(product_id)
        .ok_or_else(|| ApiError::not_found("product"))
}

fn product_mut<'a>(
    store: &'a mut Store,
    product_id: &str,
) -> Result<&'a mut ProductRecord, ApiError> {
    store
        .products
        .get_mut(product_id)
        .ok_or_else(|| ApiError::not_found("product"))
}

async fn list_offer_codes(State(db): State<Db>, Path(product_id): Path<String>) -> ApiResult {
    let store = db.read().await;
    let record = product_ref(&store, &product_id)?;
    let codes: Vec<&OfferCode> = record.offer_codes.values().collect();
    success(json!({ "offer_codes": to_value(&codes) }))
}

async fn create_offer_code(
    State(db): State<Db>,
    Path(product_id): Path<String>,
    Json(input): Json<OfferCodeInput>,
) -> ApiResult {
    let mut store = db.write().await;
    let record = product_mut(&mut store, &product_id)?;
    let name = input
        .name
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "name is required"))?;
    let amount = input.amount_off.unwrap_or(0);
    let percent = input.offer_type.as_deref() == Some("percent");
    let code = OfferCode {
        id: new_id(),
        name,
        amount_cents: (!percent).then_some(amount),
        percent_off: percent.then_some(amount),
        max_purchase_count: input.max_purchase_count,
        universal: input.universal.unwrap_or(false),
        times_used: 0,
    };
    record.offer_codes.insert(code.id.clone(), code.clone());
    success(json!({ "offer_code": to_value(&code) }))
}

async fn get_offer_code(
    State(db): State<Db>,
    Path((product_id, offer_code_id)): Path<(String, String)>,
) -> ApiResult {
    let store = db.read().await;
    let record = product_ref(&store, &product_id)?;
    let code = record
        .offer_codes
        .get(&offer_code_id)
        .ok_or_else(|| ApiError::not_found("offer_code"))?;
    success(json!({ "offer_code": to_value(code) }))
}

async fn update_offer_code(
    State(db): State<Db>,
    Path((product_id, offer_code_id)): Path<(String, String)>,
    Json(input): Json<OfferCodeInput>,
) -> ApiResult {
    let mut store = db.write().await;
    let record = product_mut(&mut store, &product_id)?;
    let code = record
        .offer_codes
        .get_mut(&offer_code_id)
        .ok_or_else(|| ApiError::not_found("offer_code"))?;
    if let Some(name) = input.name {
        code.name = name;
    }
    if input.max_purchase_count.is_some() {
        code.max_purchase_count = input.max_purchase_count;
    }
    if let Some(universal) = input.universal {
        code.universal = universal;
    }
    if input.amount_off.is_some() || input.offer_type.is_some() {
        let percent = match input.offer_type.as_deref() {
            Some(offer_type) => offer_type == "percent",
            None => code.percent_off.is_some(),
        };
        let amount = input
            .amount_off
            .or(code.percent_off)
            .or(code.amount_cents)
            .unwrap_or(0);
        code.amount_cents = (!percent).then_some(amount);
        code.percent_off = percent.then_some(amount);
    }
    success(json!({ "offer_code": to_value(code) }))
}

async fn delete_offer_code(
    State(db): State<Db>,
    Path((product_id, offer_code_id)): Path<(String, String)>,
) -> ApiResult {
    let mut store = db.write().await;
    let record = product_mut(&mut store, &product_id)?;
    record
        .offer_codes
        .remove(&offer_code_id)
        .ok_or_else(|| ApiError::not_found("offer_code"))?;
    deleted("offer_code")
}

// ---------------------------------------------------------------------------
// Custom fields
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CustomFieldInput {
    pub name: Option<String>,
    pub required: Option<bool>,
}

async fn list_custom_fields(State(db): State<Db>, Path(product_id): Path<String>) -> ApiResult {
    let store = db.read().await;
    let record = product_ref(&store, &product_id)?;
    success(json!({ "custom_fields": to_value(&record.custom_fields) }))
}

async fn create_custom_field(
    State(db): State<Db>,
    Path(product_id): Path<String>,
    Json(input): Json<CustomFieldInput>,
) -> ApiResult {
    let mut store = db.write().await;
    let record = product_mut(&mut store, &product_id)?;
    let name = input
        .name
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "name is required"))?;
    if record.custom_fields.iter().any(|f| f.name == name) {
        return Err(ApiError::new(
            StatusCode::OK,
            "A custom field with that name already exists.",
        ));
    }
    let field = CustomField {
        name,
        required: input.required.unwrap_or(false),
    };
    record.custom_fields.push(field.clone());
    success(json!({ "custom_field": to_value(&field) }))
}

async fn update_custom_field(
    State(db): State<Db>,
    Path((product_id, name)): Path<(String, String)>,
    Json(input): Json<CustomFieldInput>,
) -> ApiResult {
    let mut store = db.write().await;
    let record = product_mut(&mut store, &product_id)?;
    let field = record
        .custom_fields
        .iter_mut()
        .find(|f| f.name == name)
        .ok_or_else(|| ApiError::not_found("custom_field"))?;
    if let Some(required) = input.required {
        field.required = required;
    }
    success(json!({ "custom_field": to_value(field) }))
}

async fn delete_custom_field(
    State(db): State<Db>,
    Path((product_id, name)): Path<(String, String)>,
) -> ApiResult {
    let mut store = db.write().await;
    let record = product_mut(&mut store, &product_id)?;
    let before = record.custom_fields.len();
    record.custom_fields.retain(|f| f.name != name);
    if record.custom_fields.len() == before {
        return Err(ApiError::not_found("custom_field"));
    }
    deleted("custom_field")
}

// ---------------------------------------------------------------------------
// Sales and subscribers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SalesFilter {
    pub email: Option<String>,
    pub product_id: Option<String>,
}

async fn list_sales(State(db): State<Db>, Query(filter): Query<SalesFilter>) -> ApiResult {
    let store = db.read().await;
    let sales: Vec<&Sale> = store
        .sales
        .values()
        .filter(|s| filter.email.as_ref().map_or(true, |e| *e == s.email))
        .filter(|s| filter.product_id.as_ref().map_or(true, |p| *p == s.product_id))
        .collect();
    success(json!({ "sales": to_value(&sales) }))
}

async fn get_sale(State(db): State<Db>, Path(sale_id): Path<String>) -> ApiResult {
    let store = db.read().await;
    let sale = store
        .sales
        .get(&sale_id)
        .ok_or_else(|| ApiError::not_found("sale"))?;
    success(json!({ "sale": to_value(sale) }))
}

#[derive(Deserialize)]
pub struct ShipmentQuery {
    pub tracking_url: Option<String>,
}

async fn mark_as_shipped(
    State(db): State<Db>,
    Path(sale_id): Path<String>,
    Query(query): Query<ShipmentQuery>,
) -> ApiResult {
    let mut store = db.write().await;
    let sale = store
        .sales
        .get_mut(&sale_id)
        .ok_or_else(|| ApiError::not_found("sale"))?;
    sale.shipped = true;
    sale.tracking_url = query.tracking_url;
    success(json!({ "sale": to_value(sale) }))
}

#[derive(Deserialize)]
pub struct RefundQuery {
    pub amount_cents: Option<i64>,
}

async fn refund_sale(
    State(db): State<Db>,
    Path(sale_id): Path<String>,
    Query(query): Query<RefundQuery>,
) -> ApiResult {
    let mut store = db.write().await;
    let sale = store
        .sales
        .get_mut(&sale_id)
        .ok_or_else(|| ApiError::not_found("sale"))?;
    if sale.refunded {
        return Err(ApiError::new(StatusCode::OK, "This sale has already been refunded."));
    }
    match query.amount_cents {
        Some(amount) if amount < sale.price => sale.partially_refunded = true,
        _ => sale.refunded = true,
    }
    success(json!({ "sale": to_value(sale) }))
}

#[derive(Deserialize)]
pub struct SubscriberFilter {
    pub email: Option<String>,
}

async fn list_subscribers(
    State(db): State<Db>,
    Path(product_id): Path<String>,
    Query(filter): Query<SubscriberFilter>,
) -> ApiResult {
    let store = db.read().await;
    if !store.products.contains_key(&product_id) {
        return Err(ApiError::not_found("product"));
    }
    let subscribers: Vec<&Subscriber> = store
        .subscribers
        .values()
        .filter(|s| s.product_id == product_id)
        .filter(|s| filter.email.as_ref().map_or(true, |e| *e == s.user_email))
        .collect();
    success(json!({ "subscribers": to_value(&subscribers) }))
}

async fn get_subscriber(State(db): State<Db>, Path(subscriber_id): Path<String>) -> ApiResult {
    let store = db.read().await;
    let subscriber = store
        .subscribers
        .get(&subscriber_id)
        .ok_or_else(|| ApiError::not_found("subscriber"))?;
    success(json!({ "subscriber": to_value(subscriber) }))
}

// ---------------------------------------------------------------------------
// Licenses
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct LicenseQuery {
    pub product_id: Option<String>,
    pub product_permalink: Option<String>,
    pub license_key: String,
    pub increment_uses_count: Option<bool>,
}

fn license_reply(store: &Store, key: &str, license: &License) -> ApiResult {
    let product_name = store
        .products
        .get(&license.product_id)
        .map(|r| r.product.name.clone());
    success(json!({
        "uses": license.uses,
        "purchase": {
            "sale_id": license.sale_id,
            "product_id": license.product_id,
            "product_name": product_name,
            "email": license.email,
            "license_key": key,
            "refunded": false,
            "chargebacked": false,
            "disabled": !license.enabled
        }
    }))
}

/// Resolve a license for the product named by id or permalink.
///
/// Unknown keys are reported on a 200 with `success: false`.
fn license_mut<'a>(
    store: &'a mut Store,
    query: &LicenseQuery,
) -> Result<&'a mut License, ApiError> {
    let product_id = match (&query.product_id, &query.product_permalink) {
        (Some(id), _) => Some(id.clone()),
        (None, Some(permalink)) => store
            .products
            .values()
            .find(|r| r.product.custom_permalink.as_deref() == Some(permalink.as_str()))
            .map(|r| r.product.id.clone()),
        (None, None) => None,
    };
    store
        .licenses
        .get_mut(&query.license_key)
        .filter(|l| product_id.as_deref() == Some(l.product_id.as_str()))
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::OK,
                "That license does not exist for the provided product.",
            )
        })
}

async fn verify_license(State(db): State<Db>, Query(query): Query<LicenseQuery>) -> ApiResult {
    let mut store = db.write().await;
    let license = license_mut(&mut store, &query)?;
    if !license.enabled {
        return Err(ApiError::new(StatusCode::OK, "This license key has been disabled."));
    }
    if query.increment_uses_count.unwrap_or(true) {
        license.uses += 1;
    }
    let license = license.clone();
    license_reply(&store, &query.license_key, &license)
}

async fn set_license_enabled(db: &Db, query: &LicenseQuery, enabled: bool) -> ApiResult {
    let mut store = db.write().await;
    let license = license_mut(&mut store, query)?;
    license.enabled = enabled;
    let license = license.clone();
    license_reply(&store, &query.license_key, &license)
}

async fn enable_license(State(db): State<Db>, Query(query): Query<LicenseQuery>) -> ApiResult {
    set_license_enabled(&db, &query, true).await
}

async fn disable_license(State(db): State<Db>, Query(query): Query<LicenseQuery>) -> ApiResult {
    set_license_enabled(&db, &query, false).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_merges_payload_next_to_flag() {
        let Json(body) = success(json!({"product": {"id": "p"}})).unwrap();
        assert_eq!(body, json!({"success": true, "product": {"id": "p"}}));
    }

    #[test]
    fn deleted_reply_carries_message() {
        let Json(body) = deleted("offer_code").unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "The offer_code was deleted successfully.");
    }

    #[test]
    fn seed_links_sale_license_and_subscriber() {
        let store = seed();
        let sale = &store.sales[SEED_SALE_ID];
        assert_eq!(sale.license_key.as_deref(), Some(SEED_LICENSE_KEY));
        assert_eq!(store.licenses[SEED_LICENSE_KEY].sale_id, SEED_SALE_ID);
        assert_eq!(store.subscribers[SEED_SUBSCRIBER_ID].product_id, SEED_PRODUCT_ID);
    }

    #[test]
    fn license_lookup_by_permalink() {
        let mut store = seed();
        let query = LicenseQuery {
            product_id: None,
            product_permalink: Some("rust-handbook".to_string()),
            license_key: SEED_LICENSE_KEY.to_string(),
            increment_uses_count: None,
        };
        assert!(license_mut(&mut store, &query).is_ok());
    }

    #[test]
    fn license_lookup_rejects_other_product() {
        let mut store = seed();
        let query = LicenseQuery {
            product_id: Some("other".to_string()),
            product_permalink: None,
            license_key: SEED_LICENSE_KEY.to_string(),
            increment_uses_count: None,
        };
        let err = license_mut(&mut store, &query).unwrap_err();
        assert_eq!(err.status, StatusCode::OK);
    }

    #[test]
    fn offer_code_input_accepts_partial_json() {
        let input: OfferCodeInput = serde_json::from_str(r#"{"name":"SPRING"}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("SPRING"));
        assert!(input.amount_off.is_none());
    }
}
