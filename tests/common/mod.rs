//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the router in memory with `oneshot` requests, and the
//! `export_*` helpers build bank exports dated relative to today so the rows
//! always fall inside the retention window.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Datelike, Months, NaiveDate};
use http_body_util::BodyExt;
use solde::config::Config;
use solde::handlers;
use solde::state::AppState;
use tower::ServiceExt;

pub const HEADER: &str =
    "Opération pointée;Date opération;Libellé opération;Catégorie;Sous-catégorie;Montant";

const BOUNDARY: &str = "solde-test-boundary";

pub struct TestClient {
    state: AppState,
}

impl TestClient {
    pub fn new() -> Self {
        let config = Config {
            account_holder: "JEAN DUPONT".into(),
            ..Config::default()
        };
        let state = AppState::new(config, today()).expect("Failed to build state");
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// POST a multipart body with an optional file part and text fields.
    pub async fn post_multipart(
        &self,
        uri: &str,
        file: Option<(&str, &str)>,
        fields: &[(&str, &str)],
    ) -> (StatusCode, String) {
        let body = multipart_body(file, fields);

        let response = self
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(
                        "Content-Type",
                        format!("multipart/form-data; boundary={}", BOUNDARY),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// POST to the JSON endpoint and parse the response.
    pub async fn dashboard_json(
        &self,
        csv: &str,
        fields: &[(&str, &str)],
    ) -> (StatusCode, Option<serde_json::Value>) {
        let (status, body) = self
            .post_multipart("/api/dashboard", Some(("export.csv", csv)), fields)
            .await;
        (status, serde_json::from_str(&body).ok())
    }
}

fn multipart_body(file: Option<(&str, &str)>, fields: &[(&str, &str)]) -> String {
    let mut body = String::new();

    if let Some((file_name, content)) = file {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        body.push_str(&format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        ));
        body.push_str("Content-Type: text/csv\r\n\r\n");
        body.push_str(content);
        body.push_str("\r\n");
    }

    for (name, value) in fields {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        body.push_str(&format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
            name
        ));
        body.push_str(value);
        body.push_str("\r\n");
    }

    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// `dd/mm/yyyy` for day 5 of the month `months_back` months ago.
pub fn date_months_ago(months_back: u32) -> String {
    let date = today()
        .checked_sub_months(Months::new(months_back))
        .unwrap();
    NaiveDate::from_ymd_opt(date.year(), date.month(), 5)
        .unwrap()
        .format("%d/%m/%Y")
        .to_string()
}

pub fn row(months_back: u32, label: &str, category: &str, subcategory: &str, amount: &str) -> String {
    format!(
        "0;{};{};{};{};{}",
        date_months_ago(months_back),
        label,
        category,
        subcategory,
        amount
    )
}

pub fn export(rows: &[String]) -> String {
    let mut content = String::from(HEADER);
    for r in rows {
        content.push_str("\r\n");
        content.push_str(r);
    }
    content.push_str("\r\n");
    content
}

/// Three months of the same subscription, one grocery run, a salary, a
/// savings transfer and an internal transfer.
pub fn sample_export() -> String {
    export(&[
        row(3, "PRLV NETFLIX", "Loisirs", "Abonnements", "-13,49"),
        row(2, "PRLV NETFLIX", "Loisirs", "Abonnements", "-13,49"),
        row(1, "PRLV NETFLIX", "Loisirs", "Abonnements", "-13,49"),
        row(1, "CB CARREFOUR", "Alimentation", "Supermarché", "-45,20"),
        row(1, "VIR SALAIRE", "Revenus", "Salaires", "2100,00"),
        row(1, "VIR DE M JEAN DUPONT", "Virements", "Virements reçus", "-200,00"),
        row(1, "VIR COMPTE JOINT", "Virements", "Virements internes", "-500,00"),
    ])
}
