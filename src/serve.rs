//! HTTP server for interactive mode
//!
//! `protloc serve` → starts server, opens browser, renders the dashboard.
//! Selector changes fetch `/section/<id>` so only the affected chart is
//! rebuilt.

use crate::dashboard::{Dashboard, Page, Section, SectionId, Selection};
use crate::data::Dataset;
use crate::report::html;
use log::{debug, info, warn};
use serde::Serialize;
use std::io;
use tiny_http::{Header, Method, Request, Response, Server};

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self { ok: false, data: None, error: Some(error.into()) }
    }
}

/// A routed response, before it is written to the socket.
#[derive(Debug)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: String,
}

impl Reply {
    fn html(body: String) -> Self {
        Self { status: 200, content_type: "text/html; charset=utf-8", body }
    }

    fn json<T: Serialize>(status: u16, payload: &ApiResponse<T>) -> Self {
        let body = serde_json::to_string(payload).unwrap_or_else(|e| {
            format!(r#"{{"ok":false,"data":null,"error":"{}"}}"#, e)
        });
        Self { status, content_type: "application/json", body }
    }

    fn not_found() -> Self {
        Self { status: 404, content_type: "text/plain; charset=utf-8", body: "Not found".to_string() }
    }
}

/// Start server, open browser, serve the dashboard until the process exits.
pub fn start(dataset: &Dataset, port: u16, workers: usize, open_browser: bool) -> io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let workers = if workers == 0 {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
    } else {
        workers
    };

    let url = format!("http://localhost:{}", port);
    eprintln!("\n\x1b[1;32m🔬 Prot-loc-pred\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Proteins: {}\n", dataset.table().len());
    info!("listening on {} with {} workers", addr, workers);

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!("could not open browser: {}", e);
        }
    }

    let server = &server;
    std::thread::scope(|scope| {
        for worker in 0..workers {
            scope.spawn(move || {
                let dashboard = Dashboard::new(dataset);
                for request in server.incoming_requests() {
                    if let Err(e) = handle_request(&dashboard, request) {
                        warn!("worker {}: {}", worker, e);
                    }
                }
            });
        }
    });

    Ok(())
}

fn handle_request(dashboard: &Dashboard, request: Request) -> io::Result<()> {
    let reply = route(dashboard, request.method(), request.url());
    debug!("{} {} -> {}", request.method(), request.url(), reply.status);

    let header = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "invalid content type"))?;
    let response = Response::from_string(reply.body)
        .with_status_code(reply.status)
        .with_header(header);
    request.respond(response)
}

fn route(dashboard: &Dashboard, method: &Method, url: &str) -> Reply {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    if *method != Method::Get {
        return Reply::not_found();
    }

    let config = dashboard.dataset().config();
    let selection = || Selection::from_query(query, config);

    match path {
        "/" => render_html(|out| html::write(out, &dashboard.render_page(&selection()))),

        "/api/page" => {
            let page: Page = dashboard.render_page(&selection());
            Reply::json(200, &ApiResponse::success(page))
        }

        "/api/cleaning-stats" => {
            Reply::json(200, &ApiResponse::success(dashboard.dataset().cleaning_stats()))
        }

        _ => {
            if let Some(slug) = path.strip_prefix("/api/section/") {
                match slug.parse::<SectionId>() {
                    Ok(id) => {
                        let section: Section = dashboard.render_section(id, &selection());
                        Reply::json(200, &ApiResponse::success(section))
                    }
                    Err(e) => Reply::json(404, &ApiResponse::<()>::failure(e.to_string())),
                }
            } else if let Some(slug) = path.strip_prefix("/section/") {
                match slug.parse::<SectionId>() {
                    Ok(id) => render_html(|out| html::write_section(out, &dashboard.render_section(id, &selection()))),
                    Err(_) => Reply::not_found(),
                }
            } else {
                Reply::not_found()
            }
        }
    }
}

fn render_html<F>(write: F) -> Reply
where
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let mut out = Vec::new();
    match write(&mut out) {
        Ok(()) => Reply::html(String::from_utf8_lossy(&out).into_owned()),
        Err(e) => {
            warn!("render failed: {}", e);
            Reply {
                status: 500,
                content_type: "text/plain; charset=utf-8",
                body: "Render failed".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::{CleaningStats, ProteinTable, Stage};
    use std::path::Path;
    use std::sync::Arc;

    // ==========================================================================
    // ROUTING
    // ==========================================================================
    //
    // Routes are tested without a socket: `route` maps method + URL to the
    // reply that `handle_request` would send.
    // ==========================================================================

    fn dataset() -> Dataset {
        let table = ProteinTable::from_reader(
            "id\tMass\tlocations\tNucleus\tCytoplasm\tA_pct\n\
             P1\t12000\t1\tTrue\tFalse\t0.08\n\
             P2\t55000\t2\tTrue\tTrue\t0.07\n\
             P3\t31000\t1\tFalse\tTrue\t0.09\n"
                .as_bytes(),
            Path::new("t.tsv"),
        )
        .unwrap();
        let stats = CleaningStats {
            name: "Protein counts".to_string(),
            stages: vec![
                Stage { name: "raw".to_string(), count: 100_000 },
                Stage { name: "final".to_string(), count: 75_000 },
            ],
        };
        let config = Config {
            locations: vec!["Nucleus".to_string(), "Cytoplasm".to_string()],
            amino_acid_cols: vec!["A_pct".to_string()],
            metrics: vec!["Mass".to_string()],
            ..Config::default()
        };
        Dataset::from_parts(config, Arc::new(table), Arc::new(stats)).unwrap()
    }

    fn get(url: &str) -> Reply {
        let dataset = dataset();
        route(&Dashboard::new(&dataset), &Method::Get, url)
    }

    #[test]
    fn test_full_page() {
        let reply = get("/");
        assert_eq!(reply.status, 200);
        assert!(reply.content_type.starts_with("text/html"));
        assert!(reply.body.contains("<title>Prot-loc-pred</title>"));
    }

    #[test]
    fn test_section_fragment_uses_query() {
        let reply = get("/section/location-explorer?location=Cytoplasm");
        assert_eq!(reply.status, 200);
        assert!(reply.body.starts_with(r#"<section id="section-location-explorer""#));
        assert!(reply.body.contains("Cytoplasm vs all proteins distribution for Mass"));
        assert!(!reply.body.contains("<!DOCTYPE html>"));
    }

    #[test]
    fn test_unknown_section_is_404() {
        assert_eq!(get("/section/nope").status, 404);

        let reply = get("/api/section/nope");
        assert_eq!(reply.status, 404);
        let json: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(json["ok"], false);
        assert!(json["error"].as_str().unwrap().contains("nope"));
    }

    #[test]
    fn test_api_section_envelope() {
        let reply = get("/api/section/mass?mass_scale=Log");
        assert_eq!(reply.status, 200);
        let json: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["data"]["id"], "mass");
        assert_eq!(json["data"]["selectors"][0]["selected"], "Log");
        assert_eq!(json["data"]["content"]["value"]["scale"], "Log");
    }

    #[test]
    fn test_api_cleaning_stats_preserves_order() {
        let reply = get("/api/cleaning-stats");
        let json: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(json["data"]["stages"][0]["name"], "raw");
        assert_eq!(json["data"]["stages"][1]["count"], 75_000);
    }

    #[test]
    fn test_unknown_route_and_method() {
        assert_eq!(get("/favicon.ico").status, 404);
        assert_eq!(get("/favicon.ico").body, "Not found");

        let dataset = dataset();
        let reply = route(&Dashboard::new(&dataset), &Method::Post, "/");
        assert_eq!(reply.status, 404);
    }
}
