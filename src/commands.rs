use crate::render::{render_row, render_rows, RowDisplay};
use crate::types::QuestionRow;
use crate::AppMutex;

// ─── Tauri commands ────────────────────────────────────────────────────────────

/// Run a title search against Stack Overflow and return the rendered rows.
/// One invocation delivers one full result batch (or an error); app state is
/// only touched after the fetch succeeds.
#[tauri::command]
pub async fn search_questions(
    query: String,
    state: tauri::State<'_, AppMutex>,
    app: tauri::AppHandle,
) -> Result<Vec<RowDisplay>, String> {
    let query = query.trim().to_string();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    // Snapshot the client and visited set, then release the lock before the
    // network await.
    let (client, visited) = {
        let s = state.lock().await;
        (s.http.clone(), s.visited.clone())
    };

    let rows = crate::api::search(&client, &query, &visited)
        .await
        .map_err(|e| e.to_string())?;
    tracing::info!(count = rows.len(), query = %query, "search completed");

    let displays = render_rows(&rows);
    {
        let mut s = state.lock().await;
        s.results = rows.clone();
    }

    // Persist the batch so it can be restored on next launch. Best-effort:
    // a failed write must not fail the search.
    if let Err(e) = crate::store::save_batch(&crate::store::results_path(&app), &rows) {
        tracing::warn!("failed to persist result batch: {e}");
    }

    Ok(displays)
}

/// Open the detail page for the row at `index` in the OS browser, mark the
/// question visited, and return the re-rendered row (now normal-weight).
#[tauri::command]
pub async fn open_question(
    index: usize,
    state: tauri::State<'_, AppMutex>,
    app: tauri::AppHandle,
) -> Result<RowDisplay, String> {
    let row = {
        let s = state.lock().await;
        s.results.get(index).cloned().ok_or("row_out_of_range")?
    };
    if !row.link.starts_with("http://") && !row.link.starts_with("https://") {
        return Err("invalid_link".to_string());
    }
    open::that_detached(&row.link).map_err(|e| e.to_string())?;

    // Rows are immutable after construction: visiting replaces the row with
    // a rebuilt copy. Rows without a question id can never become visited.
    let updated = match row.question_id {
        Some(_) => row.visited(Some(true)),
        None => row,
    };

    let (rows_snapshot, visited_snapshot) = {
        let mut s = state.lock().await;
        if let Some(id) = updated.question_id {
            s.visited.insert(id);
        }
        if let Some(slot) = s.results.get_mut(index) {
            *slot = updated.clone();
        }
        (s.results.clone(), s.visited.clone())
    };

    if let Err(e) = crate::store::save_visited(&crate::store::visited_path(&app), &visited_snapshot)
    {
        tracing::warn!("failed to persist visited ids: {e}");
    }
    if let Err(e) = crate::store::save_batch(&crate::store::results_path(&app), &rows_snapshot) {
        tracing::warn!("failed to persist result batch: {e}");
    }

    Ok(render_row(&updated))
}

/// Decode the batch persisted by the previous session, re-apply the current
/// visited state, and return the rendered rows. Called by the frontend on
/// startup; an empty list means there is nothing to restore.
#[tauri::command]
pub async fn restore_last_search(
    state: tauri::State<'_, AppMutex>,
    app: tauri::AppHandle,
) -> Result<Vec<RowDisplay>, String> {
    let visited = crate::store::load_visited(&crate::store::visited_path(&app));

    // The persisted visited flags may be stale (another session may have
    // visited more rows since the batch was written), so re-derive them.
    let rows: Vec<QuestionRow> = crate::store::load_batch(&crate::store::results_path(&app))
        .into_iter()
        .map(|row| match row.question_id {
            Some(id) => {
                let seen = visited.contains(&id);
                row.visited(Some(seen))
            }
            None => row,
        })
        .collect();
    tracing::info!(count = rows.len(), "restored last result batch");

    let displays = render_rows(&rows);
    {
        let mut s = state.lock().await;
        s.visited = visited;
        s.results = rows;
    }
    Ok(displays)
}
