#[derive(Clone)]
struct AppState {
    inner: std::sync::Arc<Mutex<CityApi>>,
    stream_tx: broadcast::Sender<StreamMessage>,
}

impl AppState {
    fn new(api: CityApi) -> Self {
        let (stream_tx, _) = broadcast::channel(STREAM_CAPACITY);
        Self {
            inner: std::sync::Arc::new(Mutex::new(api)),
            stream_tx,
        }
    }
}

fn broadcast_message(state: &AppState, message: StreamMessage) {
    // no subscribers is not an error
    let _ = state.stream_tx.send(message);
}

fn tick_period(config: &EngineConfig) -> Duration {
    Duration::from_millis(config.tick_interval_ms.max(1))
}

/// The tick timer: the only periodic writer of the world.
fn spawn_ticker(state: AppState, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick of a tokio interval completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            let report = state.inner.lock().await.tick();
            broadcast_message(&state, StreamMessage::tick(&report));
        }
    })
}

/// Polls the live feed, refreshing on start and then every interval.
fn spawn_feed(state: AppState, feed: OpenMeteoFeed) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(feed.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let reading = match feed.fetch().await {
                Ok(reading) => reading,
                Err(err) => {
                    warn!(error = %err, "live feed refresh skipped");
                    continue;
                }
            };

            let (outcome, tick) = {
                let mut api = state.inner.lock().await;
                let outcome = api.ingest(reading);
                (outcome, api.world().current_tick())
            };
            match outcome {
                Ok(outcome) => {
                    debug!(source = "open-meteo", "reading broadcast");
                    broadcast_message(&state, StreamMessage::reading(tick, &reading, &outcome));
                }
                Err(err) => warn!(error = %err.message, "live reading rejected"),
            }
        }
    })
}
