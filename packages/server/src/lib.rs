#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for image recognition and classification.
//!
//! Exposes a greeting at `/`, hosted recognition of an image URL at
//! `/predict` and local classification of a base64 image at `/classify`.
//! Configuration is read once at startup into a [`ServerConfig`]; the
//! classifier artifact is loaded once and shared across workers.

mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use service_map_vision::classifier::{DEFAULT_MODEL_PATH, ImageClassifier, LinearClassifier};
use service_map_vision::eyepop::{EyePopClient, RecognitionConfig, Recognizer};

/// Startup configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub bind_addr: String,
    /// Listen port.
    pub port: u16,
    /// Recognition API credentials.
    pub recognition: RecognitionConfig,
    /// Classifier artifact path.
    pub classifier_model_path: PathBuf,
}

impl ServerConfig {
    /// Builds the configuration from environment variables.
    ///
    /// `BIND_ADDR` defaults to `127.0.0.1`, `PORT` to `8000` and
    /// `CLASSIFIER_MODEL_PATH` to `models/homeless_classifier.json`.
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);
        let classifier_model_path = std::env::var("CLASSIFIER_MODEL_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH), PathBuf::from);

        Self {
            bind_addr,
            port,
            recognition: RecognitionConfig::from_env(),
            classifier_model_path,
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Hosted recognition backend.
    pub recognizer: Arc<dyn Recognizer>,
    /// Local classifier, if its artifact loaded.
    pub classifier: Option<Arc<dyn ImageClassifier>>,
}

impl AppState {
    /// Creates the production backends for `config`.
    ///
    /// A classifier artifact that fails to load is logged and leaves
    /// `/classify` unavailable; the server still starts.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let classifier = match LinearClassifier::from_path(&config.classifier_model_path) {
            Ok(classifier) => Some(Arc::new(classifier) as Arc<dyn ImageClassifier>),
            Err(e) => {
                log::warn!(
                    "Failed to load classifier from {}: {e}",
                    config.classifier_model_path.display()
                );
                None
            }
        };

        Self {
            recognizer: Arc::new(EyePopClient::new(config.recognition.clone())),
            classifier,
        }
    }
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::root))
        .route("/predict", web::post().to(handlers::predict))
        .route("/classify", web::post().to(handlers::classify));
}

/// Starts the HTTP server and runs until shutdown.
///
/// # Errors
///
/// Returns an I/O error if the listen address cannot be bound.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState::from_config(&config));

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use image::DynamicImage;
    use service_map_vision::VisionError;

    struct StubRecognizer {
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Recognizer for StubRecognizer {
        async fn predict_url(&self, url: &str) -> Result<serde_json::Value, VisionError> {
            if self.fail {
                Err(VisionError::Provider {
                    message: "HTTP 401 Unauthorized: bad key".to_string(),
                })
            } else {
                Ok(serde_json::json!({ "source": url, "objects": [{ "classLabel": "person" }] }))
            }
        }
    }

    struct StubClassifier {
        labels: Vec<String>,
    }

    impl ImageClassifier for StubClassifier {
        fn labels(&self) -> &[String] {
            &self.labels
        }

        fn predict(&self, _image: &DynamicImage) -> Vec<f32> {
            vec![0.75, 0.25]
        }
    }

    fn state(fail: bool, with_classifier: bool) -> web::Data<AppState> {
        let classifier = with_classifier.then(|| {
            Arc::new(StubClassifier {
                labels: vec!["homeless".to_string(), "not_homeless".to_string()],
            }) as Arc<dyn ImageClassifier>
        });
        web::Data::new(AppState {
            recognizer: Arc::new(StubRecognizer { fail }),
            classifier,
        })
    }

    fn png_base64() -> String {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        STANDARD.encode(buf)
    }

    #[actix_web::test]
    async fn root_returns_greeting() {
        let app = test::init_service(
            App::new()
                .app_data(state(false, true))
                .configure(configure),
        )
        .await;
        let body: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request())
                .await;
        assert_eq!(body, serde_json::json!({ "message": "Hello World" }));
    }

    #[actix_web::test]
    async fn predict_wraps_result() {
        let app = test::init_service(
            App::new()
                .app_data(state(false, true))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(serde_json::json!({ "img_url": "https://example.org/a.jpg" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"]["source"], "https://example.org/a.jpg");
        assert_eq!(body["result"]["objects"][0]["classLabel"], "person");
    }

    #[actix_web::test]
    async fn predict_failure_is_500_with_detail() {
        let app = test::init_service(
            App::new()
                .app_data(state(true, true))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(serde_json::json!({ "img_url": "https://example.org/a.jpg" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["detail"].as_str().unwrap().contains("401"));
    }

    #[actix_web::test]
    async fn classify_returns_probability_per_label() {
        let app = test::init_service(
            App::new()
                .app_data(state(false, true))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/classify")
            .set_json(serde_json::json!({ "image": png_base64() }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let map = body.as_object().unwrap();
        assert_eq!(map.len(), 2);
        let sum: f64 = map.values().map(|v| v.as_f64().unwrap()).sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((body["homeless"].as_f64().unwrap() - 0.75).abs() < 1e-6);
    }

    #[actix_web::test]
    async fn classify_bad_image_is_500() {
        let app = test::init_service(
            App::new()
                .app_data(state(false, true))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/classify")
            .set_json(serde_json::json!({ "image": "%%%" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn classify_without_model_is_500() {
        let app = test::init_service(
            App::new()
                .app_data(state(false, false))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/classify")
            .set_json(serde_json::json!({ "image": png_base64() }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = test::read_body(resp).await;
        assert_eq!(body, "Image classifier is not loaded");
    }

    #[actix_web::test]
    async fn missing_model_leaves_classifier_unloaded() {
        let config = ServerConfig {
            bind_addr: "127.0.0.1".to_string(),
            port: 0,
            recognition: RecognitionConfig {
                pop_id: None,
                secret_key: None,
                api_url: "http://127.0.0.1:9".to_string(),
            },
            classifier_model_path: PathBuf::from("/nonexistent/model.json"),
        };
        assert!(AppState::from_config(&config).classifier.is_none());
    }
}
