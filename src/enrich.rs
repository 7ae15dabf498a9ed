//! Optional free-text enrichment of a library summary
//!
//! The enrichment call is best-effort: any failure is logged and replaced by
//! a placeholder, and the other statistics are never touched.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::EnrichError;
use crate::library::LibrarySummary;

/// Stored in the summary when enrichment was requested but failed
pub const ENRICHMENT_PLACEHOLDER: &str = "Sin respuesta IA debido a un error.";

/// Header written before the text in the enrichment file
pub const ENRICHMENT_HEADER: &str = "Análisis de IA:\n\n";

const GEMINI_API: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-2.5-flash";
const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Produces free text from a summary
pub trait Enricher {
    fn enrich(&self, summary: &LibrarySummary) -> Result<String, EnrichError>;
}

/// Fixed analytical prompt around the serialized summary
pub fn build_prompt(summary_json: &str) -> String {
    format!(
        "Eres un experto crítico musical y analista de datos.\n\
         Analiza el siguiente resumen estadístico de una biblioteca musical personal:\n\
         {}\n\
         Por favor dime:\n\
         1. ¿Qué dice el bitrate promedio sobre la calidad de audio que prefiere el usuario?\n\
         2. Basado en la duración promedio y el género, ¿es coherente? (Ej: canciones de punk suelen ser cortas, prog largas).\n\
         3. Calcula mentalmente la variedad: ¿Hay muchos artistas para la cantidad de canciones o escucha siempre a los mismos?\n\
         4. Dame una conclusión breve sobre el perfil de este oyente.\n",
        summary_json
    )
}

/// Result of the single enrichment attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    /// The service answered
    Text(String),
    /// The attempt failed; the placeholder goes into the summary
    Placeholder,
}

impl Enrichment {
    pub fn as_str(&self) -> &str {
        match self {
            Enrichment::Text(text) => text,
            Enrichment::Placeholder => ENRICHMENT_PLACEHOLDER,
        }
    }
}

/// Ask the enricher once and store the result on the summary
pub fn apply_enrichment(summary: &mut LibrarySummary, enricher: &dyn Enricher) -> Enrichment {
    let enrichment = match enricher.enrich(summary) {
        Ok(text) => Enrichment::Text(text),
        Err(e) => {
            log::warn!("Enrichment failed: {}", e);
            Enrichment::Placeholder
        }
    };
    summary.analisis_ia = Some(enrichment.as_str().to_string());
    enrichment
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Gemini `generateContent` client
pub struct GeminiEnricher {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiEnricher {
    pub fn new(api_key: impl Into<String>) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| EnrichError::Request(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: GEMINI_MODEL.to_string(),
        })
    }

    /// Read `GEMINI_API_KEY`, loading `.env` first if present
    pub fn from_env() -> Result<Self, EnrichError> {
        dotenvy::dotenv().ok();
        match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => Self::new(key),
            _ => Err(EnrichError::MissingCredentials),
        }
    }
}

impl Enricher for GeminiEnricher {
    fn enrich(&self, summary: &LibrarySummary) -> Result<String, EnrichError> {
        let summary_json =
            serde_json::to_string(summary).map_err(|e| EnrichError::Request(e.to_string()))?;
        let prompt = build_prompt(&summary_json);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let url = format!("{}/{}:generateContent", GEMINI_API, self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?
            .error_for_status()?;

        let data: GenerateResponse = response.json()?;
        data.into_text().ok_or(EnrichError::EmptyResponse)
    }
}

/// Enricher used when credentials are missing; always fails
#[derive(Debug, Default, Clone, Copy)]
pub struct MissingCredentials;

impl Enricher for MissingCredentials {
    fn enrich(&self, _summary: &LibrarySummary) -> Result<String, EnrichError> {
        Err(EnrichError::MissingCredentials)
    }
}
