use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::{violates_constraint, ApiError};
use crate::middleware::{require_role, Role};
use crate::store::{seats, showtimes};

/// Temporal midpoint of the showtime window. Reservations close here,
/// not at the nominal start: walking in up to halfway through is fine.
pub fn reservation_cutoff(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> DateTime<Utc> {
    starts_at + (ends_at - starts_at) / 2
}

fn check_cutoff(
    now: DateTime<Utc>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<(), ApiError> {
    if now < reservation_cutoff(starts_at, ends_at) {
        Ok(())
    } else {
        Err(ApiError::Conflict(
            "screening already substantially underway".to_string(),
        ))
    }
}

fn check_seat_in_range(seat_number: i32, total_seats: i32) -> Result<(), ApiError> {
    if (1..=total_seats).contains(&seat_number) {
        Ok(())
    } else {
        Err(ApiError::Conflict("seat out of range".to_string()))
    }
}

fn seat_occupied(e: sqlx::Error, seat_number: i32) -> ApiError {
    if violates_constraint(&e, "seats_showtime_seat_unique") {
        ApiError::Conflict(format!("seat {seat_number} is already occupied"))
    } else {
        e.into()
    }
}

pub async fn reserve_seat(
    pool: &PgPool,
    actor: Role,
    user_id: i64,
    showtime_id: i64,
    seat_number: i32,
) -> Result<i64, ApiError> {
    require_role(actor, Role::User)?;

    let mut tx = pool.begin().await?;

    // Row lock keeps this occupancy write serialized with concurrent
    // showtime edits that rebuild the counter from a seat count.
    let showtime = showtimes::get_for_update(&mut *tx, showtime_id)
        .await?
        .ok_or_else(|| ApiError::Conflict("showtime does not exist".to_string()))?;

    check_cutoff(Utc::now(), showtime.starts_at, showtime.ends_at)?;
    check_seat_in_range(seat_number, showtime.total_seats)?;

    // The unique constraint on (showtime_id, seat_number) decides the
    // race: losing it reads the same as finding the seat occupied.
    let seat_id = seats::insert_seat(&mut *tx, showtime_id, seat_number)
        .await
        .map_err(|e| seat_occupied(e, seat_number))?;

    let reservation_id = seats::insert_reservation(&mut *tx, user_id, showtime_id, seat_id).await?;

    // Counter moves in the same transaction as the occupancy insert
    if !showtimes::adjust_available_seats(&mut *tx, showtime_id, -1).await? {
        return Err(ApiError::Conflict(
            "no seats available for this showtime".to_string(),
        ));
    }

    tx.commit().await?;

    tracing::info!(reservation_id, showtime_id, seat_number, user_id, "seat reserved");
    Ok(reservation_id)
}

pub async fn cancel_reservation(
    pool: &PgPool,
    actor: Role,
    user_id: i64,
    reservation_id: i64,
) -> Result<(), ApiError> {
    require_role(actor, Role::User)?;

    let mut tx = pool.begin().await?;

    // Not-found and not-yours report the same conflict on purpose
    let reservation = seats::delete_reservation_owned(&mut *tx, reservation_id, user_id)
        .await?
        .ok_or_else(|| ApiError::Conflict("reservation not found".to_string()))?;

    seats::delete_seat(&mut *tx, reservation.seat_id).await?;

    if !showtimes::adjust_available_seats(&mut *tx, reservation.showtime_id, 1).await? {
        // Counter and ledger disagree; refuse to commit the mismatch
        return Err(ApiError::Server(anyhow::anyhow!(
            "available_seats out of sync for showtime {}",
            reservation.showtime_id
        )));
    }

    tx.commit().await?;

    tracing::info!(reservation_id, user_id, "reservation cancelled");
    Ok(())
}

pub async fn reassign_seat(
    pool: &PgPool,
    actor: Role,
    user_id: i64,
    reservation_id: i64,
    new_seat_number: i32,
) -> Result<(), ApiError> {
    require_role(actor, Role::User)?;

    let mut tx = pool.begin().await?;

    let reservation = seats::get_reservation_owned(&mut *tx, reservation_id, user_id)
        .await?
        .ok_or_else(|| ApiError::Conflict("reservation not found".to_string()))?;

    // Same showtime row lock as reserve/edit: a seat cannot move to a
    // number an in-flight room shrink is about to rule out.
    let showtime = showtimes::get_for_update(&mut *tx, reservation.showtime_id)
        .await?
        .ok_or_else(|| ApiError::Conflict("showtime does not exist".to_string()))?;

    check_seat_in_range(new_seat_number, showtime.total_seats)?;

    // Seat count stays the same; available_seats is untouched
    let moved = seats::move_seat(&mut *tx, reservation.seat_id, new_seat_number)
        .await
        .map_err(|e| seat_occupied(e, new_seat_number))?;
    if !moved {
        return Err(ApiError::Conflict("reservation not found".to_string()));
    }

    tx.commit().await?;

    tracing::info!(reservation_id, new_seat_number, user_id, "seat reassigned");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn cutoff_is_the_window_midpoint() {
        // One-hour window: midpoint 1800s in
        assert_eq!(reservation_cutoff(ts(0), ts(3600)), ts(1800));
        // Turnaround counts toward the window, so toward the cutoff too
        assert_eq!(reservation_cutoff(ts(1000), ts(1000 + 5400)), ts(1000 + 2700));
    }

    #[test]
    fn reservations_close_at_the_midpoint() {
        let (start, end) = (ts(0), ts(3600));
        assert!(check_cutoff(ts(1799), start, end).is_ok());
        // now == cutoff is already too late
        assert!(check_cutoff(ts(1800), start, end).is_err());
        assert!(check_cutoff(ts(1801), start, end).is_err());
    }

    #[test]
    fn reservations_are_allowed_before_the_start() {
        assert!(check_cutoff(ts(0), ts(1000), ts(2000)).is_ok());
    }

    #[test]
    fn seat_number_must_fit_the_room() {
        assert!(check_seat_in_range(1, 100).is_ok());
        assert!(check_seat_in_range(100, 100).is_ok());
        assert!(check_seat_in_range(0, 100).is_err());
        assert!(check_seat_in_range(-3, 100).is_err());
        // Capacity-100 room, seat 150
        let err = check_seat_in_range(150, 100).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(msg) if msg == "seat out of range"));
    }

    #[test]
    fn every_authenticated_role_passes_the_reservation_gate() {
        // Entry-point capability check: plain users reserve for
        // themselves, admins act as a superset.
        assert!(require_role(Role::User, Role::User).is_ok());
        assert!(require_role(Role::Admin, Role::User).is_ok());
    }

    #[test]
    fn foreign_sql_errors_stay_server_errors() {
        let err = seat_occupied(sqlx::Error::RowNotFound, 5);
        assert!(matches!(err, ApiError::Server(_)));
    }
}
