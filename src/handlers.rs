use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::airports::airport_name;
use crate::error::SourceError;
use crate::models::{AppState, ErrorResponse, LineResponse, MetarQuery, ReportResponse, StationCode};
use crate::obs_time::LOCAL_ZONE_NAME;
use crate::report::{decode, report_title, MetarReport};
use crate::services::tokenize_metar;
use crate::utils::{escape_html, format_stat_value};

// serves the home page with the search form
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../templates/index.html"))
}

// handles requests to fetch and display the decoded report for an airport
pub async fn fetch_metar_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MetarQuery>,
) -> Response {
    match load_report(&state, &params.icao).await {
        Ok((station, report)) => Html(format_results_page(&station, &report)).into_response(),
        Err(e) => {
            let html = include_str!("../templates/error.html")
                .replace("{{ERROR}}", &escape_html(&e.user_message()));
            (status_for(&e), Html(html)).into_response()
        }
    }
}

// returns the report as a METAR_<code>.txt attachment
pub async fn download_metar_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MetarQuery>,
) -> Response {
    match load_report(&state, &params.icao).await {
        Ok((station, report)) => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"METAR_{}.txt\"", station),
                ),
            ],
            report.to_plain_text(),
        )
            .into_response(),
        Err(e) => (status_for(&e), e.user_message()).into_response(),
    }
}

// returns the decoded report as json
pub async fn api_metar_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MetarQuery>,
) -> Response {
    match load_report(&state, &params.icao).await {
        Ok((station, report)) => Json(ReportResponse {
            airport: airport_name(&station),
            station: station.to_string(),
            lines: report
                .fields()
                .iter()
                .map(|f| LineResponse {
                    label: f.label,
                    text: f.text().to_string(),
                    available: f.is_available(),
                })
                .collect(),
        })
        .into_response(),
        Err(e) => (
            status_for(&e),
            Json(ErrorResponse {
                error: e.user_message(),
            }),
        )
            .into_response(),
    }
}

async fn load_report(
    state: &AppState,
    icao: &str,
) -> Result<(StationCode, MetarReport), SourceError> {
    let station = StationCode::parse(icao)?;
    let raw = state.source.fetch(&station).await.map_err(|e| {
        warn!(station = %station, error = %e, "could not fetch metar");
        e
    })?;

    let fields = tokenize_metar(&raw);
    let report = decode(&fields, &station);
    info!(station = %station, "decoded metar");
    Ok((station, report))
}

fn status_for(error: &SourceError) -> StatusCode {
    match error {
        SourceError::InvalidStationCode(_) => StatusCode::BAD_REQUEST,
        SourceError::UnknownStation(_) => StatusCode::NOT_FOUND,
        SourceError::Upstream(_) | SourceError::Request(_) => StatusCode::BAD_GATEWAY,
    }
}

// builds the html page that shows every decoded line
pub fn format_results_page(station: &StationCode, report: &MetarReport) -> String {
    let rows: String = report
        .fields()
        .iter()
        .map(|field| {
            let (class, value) = format_stat_value(field);
            format!(
                "        <div class=\"stat-row\">\n            \
                 <span class=\"stat-label\">{}:</span>\n            \
                 <span class=\"stat-value{}\">{}</span>\n        </div>\n",
                escape_html(field.label),
                class,
                value
            )
        })
        .collect();

    let title = report_title(station, airport_name(station));
    include_str!("../templates/report.html")
        .replace("{{TITLE}}", &escape_html(&title))
        .replace("{{ZONE}}", LOCAL_ZONE_NAME)
        .replace("{{STATION}}", station.as_str())
        .replace("{{ROWS}}", rows.trim_end())
        .replace("{{DECODED}}", &report.to_html())
}
