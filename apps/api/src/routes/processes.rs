use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::workflow::ProcessRecord;

/// GET /api/processes/:id
///
/// Full snapshot of a process record, used by polling clients.
pub async fn handle_get_process(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProcessRecord>, AppError> {
    let record = state
        .store
        .get_process(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Process {id} not found")))?;
    Ok(Json(record))
}

/// GET /api/processes/:id/events
///
/// Server-sent events for one process: one `process` event per mutation.
/// Events dropped for a lagging subscriber are skipped, not replayed.
pub async fn handle_process_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if state.store.get_process(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Process {id} not found")));
    }

    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(move |msg| {
        let evt = msg.ok().filter(|evt| evt.process_id == id)?;
        let data = serde_json::to_string(&evt).ok()?;
        Some(Ok(Event::default().event("process").data(data)))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
