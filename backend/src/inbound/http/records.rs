//! Record API handlers shared by every clinic record kind.
//!
//! ```text
//! POST   /api/v1/pets            {"name":"Firulais","species":"perro",...}
//! GET    /api/v1/activities
//! GET    /api/v1/consultations/7
//! PUT    /api/v1/vaccination-records/3 {"recordType":"adulto"}
//! DELETE /api/v1/vaccinations/2
//! ```
//!
//! Handlers are generic over [`RecordRoute`]; each kind only names its path
//! and how a request body becomes a draft.

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{
    Activity, ApiResult, Consultation, ManagedResource, NewPet, Pet, Principal, Treatment,
    Vaccination, VaccinationRecord,
};

use super::session::SessionContext;
use super::state::HttpState;

/// HTTP binding for a record kind.
pub trait RecordRoute: ManagedResource {
    /// Scope path relative to the API root.
    const PATH: &'static str;

    /// Request body accepted by `POST`.
    type Payload: DeserializeOwned + 'static;

    fn into_draft(payload: Self::Payload, principal: &Principal) -> Self::Draft;
}

/// Pet creation body. The owner is always the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetPayload {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub birth_date: DateTime<Utc>,
    pub color: String,
}

impl RecordRoute for Pet {
    const PATH: &'static str = "/pets";
    type Payload = PetPayload;

    fn into_draft(payload: PetPayload, principal: &Principal) -> NewPet {
        NewPet {
            name: payload.name,
            species: payload.species,
            breed: payload.breed,
            birth_date: payload.birth_date,
            color: payload.color,
            owner_id: principal.id,
        }
    }
}

macro_rules! draft_routes {
    ($($resource:ty => $path:literal;)*) => {
        $(
            impl RecordRoute for $resource {
                const PATH: &'static str = $path;
                type Payload = <$resource as crate::domain::Resource>::Draft;

                fn into_draft(payload: Self::Payload, _principal: &Principal) -> Self::Draft {
                    payload
                }
            }
        )*
    };
}

draft_routes! {
    Activity => "/activities";
    Consultation => "/consultations";
    Treatment => "/treatments";
    VaccinationRecord => "/vaccination-records";
    Vaccination => "/vaccinations";
}

pub async fn create_record<R: RecordRoute>(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<R::Payload>,
) -> ApiResult<HttpResponse> {
    let principal = state.principal(&session).await?;
    let draft = R::into_draft(payload.into_inner(), &principal);
    let envelope = state.records.create::<R>(draft, &principal).await?;
    Ok(HttpResponse::Created().json(envelope))
}

pub async fn list_records<R: RecordRoute>(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let principal = state.principal(&session).await?;
    let envelope = state.records.read_all::<R>(&principal).await?;
    Ok(HttpResponse::Ok().json(envelope))
}

pub async fn get_record<R: RecordRoute>(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let principal = state.principal(&session).await?;
    let id = R::Id::from(path.into_inner());
    let envelope = state.records.read_one::<R>(id, &principal).await?;
    Ok(HttpResponse::Ok().json(envelope))
}

pub async fn update_record<R>(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    patch: web::Json<R::Patch>,
) -> ApiResult<HttpResponse>
where
    R: RecordRoute,
    R::Patch: DeserializeOwned,
{
    let principal = state.principal(&session).await?;
    let id = R::Id::from(path.into_inner());
    let envelope = state
        .records
        .update::<R>(id, patch.into_inner(), &principal)
        .await?;
    Ok(HttpResponse::Ok().json(envelope))
}

pub async fn delete_record<R: RecordRoute>(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let principal = state.principal(&session).await?;
    let id = R::Id::from(path.into_inner());
    let envelope = state.records.delete::<R>(id, &principal).await?;
    Ok(HttpResponse::Ok().json(envelope))
}

/// Collection and item routes for one record kind.
pub fn record_scope<R>() -> actix_web::Scope
where
    R: RecordRoute,
    R::Patch: DeserializeOwned,
{
    web::scope(R::PATH)
        .route("", web::post().to(create_record::<R>))
        .route("", web::get().to(list_records::<R>))
        .route("/{id}", web::get().to(get_record::<R>))
        .route("/{id}", web::put().to(update_record::<R>))
        .route("/{id}", web::delete().to(delete_record::<R>))
}

/// Register the routes of every record kind.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(record_scope::<Pet>())
        .service(record_scope::<Activity>())
        .service(record_scope::<Consultation>())
        .service(record_scope::<Treatment>())
        .service(record_scope::<VaccinationRecord>())
        .service(record_scope::<Vaccination>());
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
