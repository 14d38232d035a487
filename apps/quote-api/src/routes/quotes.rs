//! # Quote Handlers
//!
//! Sizing, stateless re-pricing, and edits to stored quote sessions.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/quotes/{id}/swap { index, category, code }                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  QuoteCommand::SwapItem                                                 │
//! │       │                                                                 │
//! │       ▼  sessions.with_session_mut (lock held)                          │
//! │  engine.apply(quote, system, command)                                   │
//! │       │                                                                 │
//! │       ├── Applied   → savings re-estimated from the new total          │
//! │       └── Unchanged → session returned as it was                       │
//! │                                                                         │
//! │  200 { applied, sessionId, customer, system, quote, savings, ... }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A command that does not apply (unknown code, line out of range, category
//! mismatch) is not an error: the response says `applied: false`. Quantities
//! above `MAX_QUANTITY` are rejected with 400 before the session is touched.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use solar_core::validation::{
    coerce_quantity, validate_configuration, validate_customer_input, validate_quantity,
};
use solar_core::{
    estimate_savings, generate_quote, CustomerInput, EquipmentCategory, Quote, QuoteCommand,
    QuoteEngine, SystemConfiguration,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, StoredQuote};

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizeRequest {
    pub custom_config: SystemConfiguration,
}

#[derive(Debug, Serialize)]
pub struct CustomizeResponse {
    pub quote: Quote,
}

/// A quantity as typed into the quote form: a number or free text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Whole(i64),
    Fractional(f64),
    Text(String),
}

impl QuantityInput {
    /// Whole units, truncating fractions. Anything unusable becomes 1.
    pub fn resolve(&self) -> i64 {
        match self {
            QuantityInput::Whole(n) => *n,
            QuantityInput::Fractional(f) if f.is_finite() => f.trunc() as i64,
            QuantityInput::Fractional(_) => 1,
            QuantityInput::Text(text) => coerce_quantity(text),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub index: usize,
    pub quantity: QuantityInput,
}

#[derive(Debug, Deserialize)]
pub struct SwapRequest {
    pub index: usize,
    /// `Panel`, `Inverter`, `Battery` (case-insensitive; `pv` also accepted).
    pub category: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub applied: bool,
    #[serde(flatten)]
    pub session: StoredQuote,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/calculate-quote`: sizes, selects and prices a system, and
/// stores the result as a new session.
pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> ApiResult<Json<StoredQuote>> {
    let Json(input) = payload?;
    validate_customer_input(&input)?;

    let engine = QuoteEngine::new(state.catalog.snapshot());
    let result = engine.calculate_system(&input)?;
    let savings = estimate_savings(
        result.system.power_kw,
        result.customer.electricity_price,
        result.quote.total,
    );

    let session = StoredQuote::new(result, savings);
    state.sessions.insert(session.clone());
    info!(
        session = %session.id,
        power_kw = session.system.power_kw,
        total = %session.quote.total,
        "Quote calculated"
    );

    Ok(Json(session))
}

/// `POST /api/customize-quote`: prices a caller-supplied configuration
/// without touching any session.
pub async fn customize(
    payload: Result<Json<CustomizeRequest>, JsonRejection>,
) -> ApiResult<Json<CustomizeResponse>> {
    let Json(request) = payload?;
    validate_configuration(&request.custom_config)?;
    Ok(Json(CustomizeResponse {
        quote: generate_quote(&request.custom_config)?,
    }))
}

/// `GET /api/quotes/{id}`
pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StoredQuote>> {
    let id = parse_session_id(&id)?;
    state
        .sessions
        .get(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Quote", &id.to_string()))
}

/// `POST /api/quotes/{id}/quantity`
pub async fn edit_quantity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<QuantityRequest>, JsonRejection>,
) -> ApiResult<Json<MutationResponse>> {
    let Json(request) = payload?;
    let command = QuoteCommand::EditQuantity {
        index: request.index,
        quantity: request.quantity.resolve(),
    };
    run_command(&state, &id, command)
}

/// `POST /api/quotes/{id}/swap`
pub async fn swap_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SwapRequest>, JsonRejection>,
) -> ApiResult<Json<MutationResponse>> {
    let Json(request) = payload?;
    let category: EquipmentCategory = request.category.parse().map_err(ApiError::validation)?;
    let command = QuoteCommand::SwapItem {
        index: request.index,
        category,
        code: request.code,
    };
    run_command(&state, &id, command)
}

/// `POST /api/quotes/{id}/recalculate`
pub async fn recalculate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MutationResponse>> {
    run_command(&state, &id, QuoteCommand::Recalculate)
}

/// `POST /api/quotes/{id}/commands`: any [`QuoteCommand`] in its tagged form,
/// e.g. `{"type":"editQuantity","index":0,"quantity":12}`.
pub async fn apply_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<QuoteCommand>, JsonRejection>,
) -> ApiResult<Json<MutationResponse>> {
    let Json(command) = payload?;
    run_command(&state, &id, command)
}

// =============================================================================
// Helpers
// =============================================================================

pub(crate) fn parse_session_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Quote", raw))
}

fn run_command(state: &AppState, raw_id: &str, command: QuoteCommand) -> ApiResult<Json<MutationResponse>> {
    let id = parse_session_id(raw_id)?;
    if let QuoteCommand::EditQuantity { quantity, .. } = &command {
        validate_quantity("quantity", *quantity)?;
    }
    let engine = QuoteEngine::new(state.catalog.snapshot());

    let response = state
        .sessions
        .with_session_mut(&id, |session| -> ApiResult<MutationResponse> {
            let outcome = engine.apply(&mut session.quote, &mut session.system, &command)?;
            if outcome.is_applied() {
                session.savings = estimate_savings(
                    session.system.power_kw,
                    session.customer.electricity_price,
                    session.quote.total,
                );
            }
            Ok(MutationResponse {
                applied: outcome.is_applied(),
                session: session.clone(),
            })
        })
        .ok_or_else(|| ApiError::not_found("Quote", raw_id))??;

    debug!(session = %id, ?command, applied = response.applied, "Quote command");
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::routes::test_support;

    async fn calculated(state: &AppState) -> StoredQuote {
        let Json(session) = calculate(State(state.clone()), Ok(Json(test_support::household())))
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_calculate_stores_session() {
        let state = test_support::state();
        let session = calculated(&state).await;

        assert_eq!(session.system.power_kw, 4);
        assert_eq!(session.quote.items.len(), 10);
        assert_eq!(session.savings.monthly_production, 480.0);
        assert_eq!(session.savings.monthly_savings.dong(), 1_200_000);

        let Json(fetched) = get_quote(State(state.clone()), Path(session.id.to_string()))
            .await
            .unwrap();
        assert_eq!(fetched.quote, session.quote);

        let json = serde_json::to_value(&fetched).unwrap();
        assert!(json.get("sessionId").is_some());
        assert!(json["quote"].get("totalUSD").is_some());
    }

    #[tokio::test]
    async fn test_calculate_rejects_invalid_input() {
        let state = test_support::state();

        let mut input = test_support::household();
        input.customer_name = "  ".into();
        let err = calculate(State(state.clone()), Ok(Json(input))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut input = test_support::household();
        input.evening_usage = 70;
        let err = calculate(State(state.clone()), Ok(Json(input))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_calculate_on_empty_category_is_business_error() {
        let state = test_support::state();
        state
            .catalog
            .replace_from_bytes(br#"{"pvPanels":[{"code":"PV-1","name":"P","powerW":450,"price":1,"warranty":25}]}"#)
            .await
            .unwrap();

        let err = calculate(State(state.clone()), Ok(Json(test_support::household())))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        let _ = tokio::fs::remove_dir_all(&state.catalog.config().upload_dir).await;
    }

    #[tokio::test]
    async fn test_customize_prices_supplied_configuration() {
        let state = test_support::state();
        let session = calculated(&state).await;

        let mut config = session.system.clone();
        config.battery = None;
        let Json(response) = customize(Ok(Json(CustomizeRequest { custom_config: config })))
            .await
            .unwrap();

        assert_eq!(response.quote.items.len(), session.quote.items.len() - 1);
        assert!(response.quote.total < session.quote.total);
    }

    #[tokio::test]
    async fn test_quantity_accepts_text_and_clamps() {
        let state = test_support::state();
        let session = calculated(&state).await;
        let id = session.id.to_string();

        let request: QuantityRequest = serde_json::from_str(r#"{"index":0,"quantity":"12 panels"}"#).unwrap();
        let Json(response) = edit_quantity(State(state.clone()), Path(id.clone()), Ok(Json(request)))
            .await
            .unwrap();
        assert!(response.applied);
        assert_eq!(response.session.quote.items[0].quantity, 12);

        let request: QuantityRequest = serde_json::from_str(r#"{"index":0,"quantity":-3}"#).unwrap();
        let Json(response) = edit_quantity(State(state.clone()), Path(id.clone()), Ok(Json(request)))
            .await
            .unwrap();
        assert_eq!(response.session.quote.items[0].quantity, 1);

        let request: QuantityRequest = serde_json::from_str(r#"{"index":99,"quantity":2}"#).unwrap();
        let Json(response) = edit_quantity(State(state), Path(id), Ok(Json(request)))
            .await
            .unwrap();
        assert!(!response.applied);
    }

    #[tokio::test]
    async fn test_oversized_quantity_is_rejected_and_session_kept() {
        let state = test_support::state();
        let session = calculated(&state).await;
        let id = session.id.to_string();

        let request: QuantityRequest =
            serde_json::from_str(r#"{"index":0,"quantity":10000000000000}"#).unwrap();
        let err = edit_quantity(State(state.clone()), Path(id.clone()), Ok(Json(request)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let command = QuoteCommand::EditQuantity {
            index: 0,
            quantity: i64::MAX,
        };
        let err = apply_command(State(state.clone()), Path(id.clone()), Ok(Json(command)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let stored = state.sessions.get(&session.id).unwrap();
        assert_eq!(stored.quote, session.quote);

        // Still editable.
        let request: QuantityRequest = serde_json::from_str(r#"{"index":0,"quantity":3}"#).unwrap();
        let Json(response) = edit_quantity(State(state), Path(id), Ok(Json(request)))
            .await
            .unwrap();
        assert!(response.applied);
        assert_eq!(response.session.quote.items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_customize_rejects_unpriceable_configuration() {
        let state = test_support::state();
        let session = calculated(&state).await;

        let mut config = session.system.clone();
        if let Some(pv) = config.pv.as_mut() {
            pv.quantity = i64::MAX;
        }
        let err = customize(Ok(Json(CustomizeRequest { custom_config: config })))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_calculate_rejects_absurd_consumption() {
        let state = test_support::state();

        let mut input = test_support::household();
        input.monthly_consumption = Some(1e300);
        let err = calculate(State(state.clone()), Ok(Json(input))).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_swap_updates_totals_and_savings() {
        let state = test_support::state();
        let session = calculated(&state).await;

        let request = SwapRequest {
            index: 0,
            category: "panel".into(),
            code: "PV-540-1".into(),
        };
        let Json(response) = swap_item(State(state.clone()), Path(session.id.to_string()), Ok(Json(request)))
            .await
            .unwrap();

        assert!(response.applied);
        let quote = &response.session.quote;
        assert_eq!(quote.items[0].code, "PV-540-1");
        assert!(quote.total > session.quote.total);
        assert_ne!(response.session.savings, session.savings);

        let stored = state.sessions.get(&session.id).unwrap();
        assert_eq!(stored.quote, *quote);
    }

    #[tokio::test]
    async fn test_swap_to_unknown_code_reports_unchanged() {
        let state = test_support::state();
        let session = calculated(&state).await;

        let request = SwapRequest {
            index: 2,
            category: "Battery".into(),
            code: "BAT-404".into(),
        };
        let Json(response) = swap_item(State(state.clone()), Path(session.id.to_string()), Ok(Json(request)))
            .await
            .unwrap();

        assert!(!response.applied);
        assert_eq!(response.session.quote, session.quote);
    }

    #[tokio::test]
    async fn test_swap_rejects_unknown_category() {
        let state = test_support::state();
        let session = calculated(&state).await;

        let request = SwapRequest {
            index: 0,
            category: "roof".into(),
            code: "PV-540-1".into(),
        };
        let err = swap_item(State(state), Path(session.id.to_string()), Ok(Json(request)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_tagged_command_and_recalculate() {
        let state = test_support::state();
        let session = calculated(&state).await;
        let id = session.id.to_string();

        let command: QuoteCommand =
            serde_json::from_str(r#"{"type":"editQuantity","index":1,"quantity":2}"#).unwrap();
        let Json(response) = apply_command(State(state.clone()), Path(id.clone()), Ok(Json(command)))
            .await
            .unwrap();
        assert_eq!(response.session.quote.items[1].quantity, 2);

        let Json(response) = recalculate(State(state), Path(id)).await.unwrap();
        assert!(response.applied);
        let quote = &response.session.quote;
        assert!(quote.rounding_drift().abs() <= 1);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let state = test_support::state();

        let err = get_quote(State(state.clone()), Path(Uuid::new_v4().to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = recalculate(State(state), Path("not-a-uuid".into())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_quantity_input_resolution() {
        assert_eq!(QuantityInput::Whole(7).resolve(), 7);
        assert_eq!(QuantityInput::Fractional(2.9).resolve(), 2);
        assert_eq!(QuantityInput::Fractional(f64::NAN).resolve(), 1);
        assert_eq!(QuantityInput::Text("abc".into()).resolve(), 1);
    }
}
