use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use crate::date_utils::MonthSlot;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MonthsResponse {
    pub months: Vec<MonthSlot>,
    pub from_index: usize,
    pub to_index: usize,
}

/// Slider marks: every month of the calendar, full range selected.
pub async fn months(State(state): State<AppState>) -> Json<MonthsResponse> {
    Json(MonthsResponse {
        months: state.calendar.slots(),
        from_index: 0,
        to_index: state.calendar.last_index(),
    })
}
