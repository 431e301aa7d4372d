async fn post_scenario(
    State(state): State<AppState>,
    payload: Result<Json<ScenarioRequest>, JsonRejection>,
) -> Result<Json<ScenarioResult>, HttpApiError> {
    let Json(request) = payload.map_err(|rejection| {
        rejection_error(rejection, |message, details| {
            HttpApiError::invalid_scenario(message, details)
        })
    })?;

    let result = state
        .inner
        .lock()
        .await
        .run_scenario(request)
        .map_err(HttpApiError::bad_request)?;

    Ok(Json(result))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct RealtimeResponse {
    schema_version: String,
    applied: Vec<&'static str>,
    pollution_risk_level: f64,
}

async fn post_realtime(
    State(state): State<AppState>,
    payload: Result<Json<ExternalReading>, JsonRejection>,
) -> Result<Json<RealtimeResponse>, HttpApiError> {
    let Json(reading) = payload.map_err(|rejection| {
        rejection_error(rejection, |message, details| {
            HttpApiError::invalid_reading(message, details)
        })
    })?;

    let (outcome, tick) = {
        let mut api = state.inner.lock().await;
        let outcome = api.ingest(reading).map_err(HttpApiError::bad_request)?;
        (outcome, api.world().current_tick())
    };
    debug!(source = "push", "reading broadcast");
    broadcast_message(&state, StreamMessage::reading(tick, &reading, &outcome));

    Ok(Json(RealtimeResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        applied: outcome.applied,
        pollution_risk_level: outcome.pollution_risk_level,
    }))
}

/// Maps a body rejection onto the endpoint's own error code. A body that
/// could not be read at all is a server-side failure.
fn rejection_error(
    rejection: JsonRejection,
    client_error: fn(String, Option<String>) -> HttpApiError,
) -> HttpApiError {
    match rejection {
        JsonRejection::BytesRejection(err) => {
            HttpApiError::internal("failed to read request body", Some(err.body_text()))
        }
        other => client_error(
            "request body is not valid JSON for this endpoint".to_string(),
            Some(other.body_text()),
        ),
    }
}
