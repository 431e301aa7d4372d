async fn stream_ticks(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let initial_message = {
        let api = state.inner.lock().await;
        let dashboard = api.dashboard();
        StreamMessage::hello(api.world().current_tick(), dashboard)
    };

    ws.on_upgrade(move |socket| stream_socket(socket, state, initial_message))
}

async fn stream_socket(mut socket: WebSocket, state: AppState, initial_message: StreamMessage) {
    if send_stream_message(&mut socket, &initial_message)
        .await
        .is_err()
    {
        return;
    }

    let mut rx = state.stream_tx.subscribe();
    let mut last_tick = initial_message.tick;

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {
                        break;
                    }
                    _ => {}
                }
            }
            received = rx.recv() => {
                let Some(message) = outgoing_message(received, &mut last_tick) else {
                    break;
                };
                if send_stream_message(&mut socket, &message).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Maps one broadcast receive to the frame a subscriber gets; `None` ends
/// the stream. A lag warning carries the last tick this subscriber saw.
fn outgoing_message(
    received: Result<StreamMessage, broadcast::error::RecvError>,
    last_tick: &mut u64,
) -> Option<StreamMessage> {
    match received {
        Ok(message) => {
            *last_tick = (*last_tick).max(message.tick);
            Some(message)
        }
        Err(broadcast::error::RecvError::Lagged(skipped)) => {
            warn!(skipped, last_tick = *last_tick, "stream subscriber lagged");
            Some(StreamMessage::warning(
                *last_tick,
                format!("stream client lagged and skipped {skipped} message(s)"),
            ))
        }
        Err(broadcast::error::RecvError::Closed) => None,
    }
}

async fn send_stream_message(
    socket: &mut WebSocket,
    message: &StreamMessage,
) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(message).map_err(axum::Error::new)?;
    socket.send(Message::Text(payload.into())).await
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StreamMessage {
    schema_version: String,
    #[serde(rename = "type")]
    message_type: String,
    tick: u64,
    timestamp: String,
    data: Value,
}

impl StreamMessage {
    fn tick(report: &TickReport) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: "tick".to_string(),
            tick: report.tick,
            timestamp: report.timestamp.clone(),
            data: json!(report.dashboard),
        }
    }

    /// Sent once on connect so a client renders before the next tick.
    fn hello(tick: u64, dashboard: Stamped<DashboardView>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: "hello".to_string(),
            tick,
            timestamp: dashboard.timestamp,
            data: json!(dashboard.body),
        }
    }

    fn reading(tick: u64, reading: &ExternalReading, outcome: &city_core::OverrideOutcome) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: "reading".to_string(),
            tick,
            timestamp: contracts::iso_timestamp(),
            data: json!({
                "reading": reading,
                "applied": outcome.applied,
                "pollutionRiskLevel": outcome.pollution_risk_level,
            }),
        }
    }

    fn warning(tick: u64, warning: String) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: "warning".to_string(),
            tick,
            timestamp: contracts::iso_timestamp(),
            data: json!({ "message": warning }),
        }
    }
}
