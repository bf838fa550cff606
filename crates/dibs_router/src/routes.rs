//! Gateway-facing routes.

use actix_web::{web, HttpRequest, HttpResponse, Scope};
use dibs_gateway::{gateway::transformers::fields, types::RequestParameters};

use crate::AppState;

pub fn dibs(state: AppState) -> Scope {
    web::scope("/api/dibs")
        .app_data(web::Data::new(state))
        .service(web::resource("/callback").route(web::post().to(register_payment)))
}

/// Callback the gateway posts after the hosted flow completes.
///
/// Query-string and form fields are merged into one parameter bag before
/// processing. Every unresolved order, payment, or signature answers with a
/// plain not-found so nothing internal leaks to the caller.
async fn register_payment(
    state: web::Data<AppState>,
    request: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let query = RequestParameters::from_urlencoded(request.query_string().as_bytes());
    let form = RequestParameters::from_urlencoded(&body);
    let parameters = match (query, form) {
        (Ok(mut query), Ok(form)) => {
            query.append(form);
            query
        }
        _ => return HttpResponse::NotFound().finish(),
    };

    let Some(order_id) = parameters
        .get(fields::ORDER_INTERNAL_ID)
        .map(str::to_string)
    else {
        return HttpResponse::NotFound().finish();
    };

    match state
        .gateway
        .handle_callback(state.orders.as_ref(), &order_id, &parameters)
        .await
    {
        Ok(outcome) if outcome.is_success => {
            if let Err(error) = state.orders.save(&outcome.order).await {
                tracing::error!(?error, %order_id, "failed to persist order after callback");
                return HttpResponse::InternalServerError().finish();
            }
            HttpResponse::Ok().finish()
        }
        Ok(_) => HttpResponse::NotFound().finish(),
        Err(error) => {
            tracing::warn!(?error, %order_id, "callback processing failed");
            HttpResponse::NotFound().finish()
        }
    }
}
