async fn get_traffic(State(state): State<AppState>) -> Json<Stamped<TrafficMetrics>> {
    Json(state.inner.lock().await.traffic())
}

async fn get_environment(State(state): State<AppState>) -> Json<Stamped<EnvironmentMetrics>> {
    Json(state.inner.lock().await.environment())
}

async fn get_health(State(state): State<AppState>) -> Json<Stamped<HealthMetrics>> {
    Json(state.inner.lock().await.health())
}

async fn get_agriculture(State(state): State<AppState>) -> Json<Stamped<AgricultureMetrics>> {
    Json(state.inner.lock().await.agriculture())
}

async fn get_dashboard(State(state): State<AppState>) -> Json<Stamped<DashboardView>> {
    Json(state.inner.lock().await.dashboard())
}

async fn get_state(State(state): State<AppState>) -> Json<Stamped<CityState>> {
    Json(state.inner.lock().await.snapshot())
}

async fn get_status(State(state): State<AppState>) -> Json<ApiStatus> {
    Json(state.inner.lock().await.status())
}
