use askama::Template;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, Json};
use tracing::{debug, info};

use crate::date_utils::MonthSlot;
use crate::error::{AppError, AppResult, RenderHtml};
use crate::services::analytics::CategoryFilter;
use crate::services::pipeline::{build_dashboard, Dashboard, DashboardQuery, TableRow, Upload};
use crate::sort_utils::{SortableColumn, TableSort, TransactionColumn};
use crate::state::AppState;
use crate::VERSION;

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub version: &'static str,
    pub months: Vec<MonthSlot>,
    pub last_index: usize,
    pub retention_months: u32,
    pub max_upload_bytes: usize,
}

pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    debug!("Loading dashboard page");

    let template = DashboardTemplate {
        title: "Dashboard".into(),
        version: VERSION,
        months: state.calendar.slots(),
        last_index: state.calendar.last_index(),
        retention_months: state.config.retention_months,
        max_upload_bytes: state.config.max_upload_bytes,
    };

    template.render_html()
}

/// One clickable header of the transaction table.
pub struct ColumnHeader {
    pub key: &'static str,
    pub title: &'static str,
    pub indicator: &'static str,
    pub next_dir: &'static str,
}

#[derive(Template)]
#[template(path = "components/transaction_table.html")]
pub struct TransactionTableTemplate {
    pub file_name: String,
    pub headers: Vec<ColumnHeader>,
    pub rows: Vec<TableRow>,
}

fn column_headers(sort: &TableSort<TransactionColumn>) -> Vec<ColumnHeader> {
    TransactionColumn::all()
        .iter()
        .map(|col| ColumnHeader {
            key: col.as_str(),
            title: col.title(),
            indicator: sort.indicator(col),
            next_dir: sort.next_direction_for(col).as_str(),
        })
        .collect()
}

/// All chart datasets for the uploaded file and the current filters.
pub async fn data(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<Dashboard>> {
    let (upload, query) = read_form(multipart).await?;
    let dashboard = compute(state, upload, query).await?;
    Ok(Json(dashboard))
}

/// The transaction table alone, rendered for in-place replacement.
pub async fn table_partial(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Html<String>> {
    let (upload, query) = read_form(multipart).await?;
    let headers = column_headers(&query.sort);
    let dashboard = compute(state, upload, query).await?;

    let template = TransactionTableTemplate {
        file_name: dashboard.file_name,
        headers,
        rows: dashboard.table,
    };

    template.render_html()
}

async fn compute(state: AppState, upload: Upload, query: DashboardQuery) -> AppResult<Dashboard> {
    info!(
        file_name = %upload.file_name,
        size_bytes = upload.content.len(),
        "Computing dashboard"
    );

    let today = chrono::Local::now().date_naive();
    tokio::task::spawn_blocking(move || build_dashboard(&state, &upload, &query, today))
        .await
        .map_err(|e| AppError::Internal(format!("Dashboard task failed: {}", e)))?
}

fn parse_index(name: &str, value: &str) -> AppResult<Option<usize>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| AppError::Range(format!("{} must be a month index, got '{}'", name, value)))
}

/// Length-limit rejections keep their 413; anything else is a malformed body.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload too large: {}", e.body_text()))
    } else {
        AppError::Parse(e.body_text())
    }
}

/// Collect the upload and filter fields from the multipart body.
async fn read_form(mut multipart: Multipart) -> AppResult<(Upload, DashboardQuery)> {
    let mut upload: Option<Upload> = None;
    let mut selection: Vec<String> = Vec::new();
    let mut query = DashboardQuery::default();
    let mut sort_column: Option<String> = None;
    let mut sort_dir: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let file_name = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "upload.csv".to_string());
            let content = field
                .bytes()
                .await
                .map_err(multipart_error)?
                .to_vec();
            debug!(file_name = %file_name, size_bytes = content.len(), "Received export");
            upload = Some(Upload { file_name, content });
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;

        match name.as_str() {
            "categories" => selection.push(value),
            "from" => query.from_index = parse_index("from", &value)?,
            "to" => query.to_index = parse_index("to", &value)?,
            "category" => query.drill_down = Some(value).filter(|v| !v.is_empty()),
            "sort" => sort_column = Some(value),
            "dir" => sort_dir = Some(value),
            "search" => query.search = Some(value),
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("No file uploaded".into()))?;

    query.categories = CategoryFilter::from_selection(selection);
    query.sort = TableSort::parse(sort_column.as_deref(), sort_dir.as_deref());

    Ok((upload, query))
}
