// Unit tests for error mapping - pure domain logic without HTTP dependencies
use actix_web::ResponseError;

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_422() {
    let de = DomainError::validation(ValidationKind::InvalidDuo, "Invalid duo");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 422);
    assert_eq!(app.detail(), "Invalid duo");
}

#[test]
fn maps_turn_and_phase_kinds_to_specific_codes() {
    let app: AppError = DomainError::validation(ValidationKind::OutOfTurn, "Not your turn").into();
    assert_eq!(app.code(), ErrorCode::OutOfTurn);

    let app: AppError =
        DomainError::validation(ValidationKind::PhaseMismatch, "Cannot draw now").into();
    assert_eq!(app.code().as_str(), "PHASE_MISMATCH");
}

#[test]
fn maps_conflicts() {
    let full = DomainError::conflict(ConflictKind::RoomFull, "Room is full");
    let app: AppError = full.into();
    assert_eq!(app.code().as_str(), "ROOM_FULL");
    assert_eq!(app.status().as_u16(), 409);

    let other = DomainError::conflict(ConflictKind::AlreadyInRoom, "Already in a room");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::not_found(NotFoundKind::Room, "Room not found").into();
    assert_eq!(app.code().as_str(), "ROOM_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);
}

#[test]
fn maps_infra() {
    let app: AppError = DomainError::infra(InfraErrorKind::Timeout, "timeout").into();
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);
}

#[test]
fn unauthorized_response_carries_bearer_challenge() {
    let resp = AppError::unauthorized_invalid_jwt().error_response();
    assert_eq!(resp.status().as_u16(), 401);
    let challenge = resp
        .headers()
        .get("WWW-Authenticate")
        .and_then(|v| v.to_str().ok());
    assert_eq!(challenge, Some("Bearer"));
}
