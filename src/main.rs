//! Text Extractor Pro - document catalog and OCR upload server.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use text_extractor::article::Article;
use text_extractor::catalog::CatalogStore;
use text_extractor::extract::{mock_extracted_text, OcrSuccess};
use text_extractor::storage::MemStorage;
use text_extractor::validate::{self, MAX_FILE_SIZE};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    catalog: CatalogStore,
    /// Generic user CRUD storage; no route exercises it yet.
    #[allow(dead_code)]
    storage: MemStorage,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "text_extractor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Seed the catalog from the data directory
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let catalog = match CatalogStore::load_from_dir(std::path::Path::new(&data_dir)) {
        Ok(catalog) => {
            info!("Loaded {} catalog tables from {}", catalog.table_count(), data_dir);
            catalog
        }
        Err(e) => {
            warn!("No catalog data loaded from {}: {}. Serving an empty catalog", data_dir, e);
            CatalogStore::new()
        }
    };

    let state = AppState {
        catalog,
        storage: MemStorage::new(),
    };

    // Build router. The body limit leaves headroom above the 10MiB file
    // ceiling for multipart framing; the handler enforces the exact per-file
    // limit.
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/ocr", post(process_ocr))
        .route("/api/pdf-names", get(pdf_names))
        .route("/api/pdf-data/{name}", get(pdf_data))
        .route("/api/articles", get(articles))
        .layer(DefaultBodyLimit::max((MAX_FILE_SIZE + 1024 * 1024) as usize))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Run server
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn error_response(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
        }),
    )
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Process an uploaded document and return the extracted text.
///
/// Client-side validation is a convenience only; the extension, MIME type and
/// size rules all run again here before any processing happens.
async fn process_ocr(mut multipart: Multipart) -> Result<Json<OcrSuccess>, ApiError> {
    let mut file_name = String::new();
    let mut mime_type = String::new();
    let mut file_data = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Multipart error: {}", e);
        error_response(StatusCode::BAD_REQUEST, "No file uploaded")
    })? {
        if field.name() == Some("file") {
            file_name = field.file_name().unwrap_or("document").to_string();
            mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            file_data = field
                .bytes()
                .await
                .map_err(|e| {
                    error!("Failed to read upload: {}", e);
                    error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to process file for OCR extraction",
                    )
                })?
                .to_vec();
            break;
        }
    }

    if file_data.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "No file uploaded"));
    }

    if !validate::mime_allowed(&mime_type) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            validate::INVALID_TYPE_MESSAGE,
        ));
    }

    let file_size = file_data.len() as u64;
    let verdict = validate::validate(&file_name, file_size);
    if let Some(reason) = verdict.reason {
        return Err(error_response(StatusCode::BAD_REQUEST, &reason));
    }

    info!("Received file: {} ({} bytes, {})", file_name, file_size, mime_type);

    let text = mock_extracted_text(&file_name, file_size, &mime_type);
    Ok(Json(OcrSuccess {
        success: true,
        text,
        file_name,
        file_size,
        mime_type,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PdfNamesBody {
    pdf_names: Vec<String>,
}

/// List every document title known to the catalog.
async fn pdf_names(State(state): State<AppState>) -> Json<PdfNamesBody> {
    Json(PdfNamesBody {
        pdf_names: state.catalog.pdf_names(),
    })
}

/// Rows of the first catalog table mentioning the given document.
async fn pdf_data(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.catalog.pdf_data(&name) {
        Some((table, rows)) => Ok(Json(json!({ "table": table, "articles": rows }))),
        None => Err(error_response(StatusCode::NOT_FOUND, "PDF data not found")),
    }
}

#[derive(Serialize)]
struct ArticlesBody {
    articles: Vec<Article>,
}

/// All catalog rows, normalized into one article shape.
async fn articles(State(state): State<AppState>) -> Json<ArticlesBody> {
    Json(ArticlesBody {
        articles: state.catalog.all_articles(),
    })
}
