//! HTTP handler functions for the services API.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, error, web};
use service_map_server_models::{
    ClassifyRequest, ErrorDetail, HelloResponse, PredictRequest, PredictResponse,
};
use service_map_vision::classifier::classify_base64;

use crate::AppState;

/// `GET /`
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(HelloResponse {
        message: "Hello World".to_string(),
    })
}

/// `POST /predict`
///
/// Runs hosted recognition on an image URL. Any failure is returned as a
/// 500 with a `detail` message.
pub async fn predict(
    state: web::Data<AppState>,
    body: web::Json<PredictRequest>,
) -> HttpResponse {
    match state.recognizer.predict_url(&body.img_url).await {
        Ok(result) => HttpResponse::Ok().json(PredictResponse { result }),
        Err(e) => {
            log::error!("Prediction failed for {}: {e}", body.img_url);
            HttpResponse::InternalServerError().json(ErrorDetail {
                detail: e.to_string(),
            })
        }
    }
}

/// `POST /classify`
///
/// Classifies a base64-encoded image and returns a label to probability
/// map. Errors use the default 500 response.
pub async fn classify(
    state: web::Data<AppState>,
    body: web::Json<ClassifyRequest>,
) -> actix_web::Result<web::Json<BTreeMap<String, f32>>> {
    let Some(classifier) = state.classifier.clone() else {
        return Err(error::ErrorInternalServerError(
            "Image classifier is not loaded",
        ));
    };

    let ClassifyRequest { image } = body.into_inner();
    let probabilities = web::block(move || classify_base64(classifier.as_ref(), &image))
        .await
        .map_err(error::ErrorInternalServerError)?
        .map_err(|e| {
            log::error!("Classification failed: {e}");
            error::ErrorInternalServerError(e)
        })?;

    Ok(web::Json(probabilities))
}
