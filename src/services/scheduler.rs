use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use crate::error::{violates_constraint, ApiError};
use crate::middleware::{require_role, Role};
use crate::services::overlap::{classify, OverlapKind};
use crate::store::showtimes::ShowtimeWindow;
use crate::store::{movies, rooms, seats, showtimes};

/// Fixed cleaning/changeover buffer appended after the movie runtime.
pub const TURNAROUND_SECONDS: i64 = 1800;

/// End of a showtime starting at `starts_at` for a movie of the given
/// runtime. Clients never supply the end themselves.
pub fn showtime_end(starts_at: DateTime<Utc>, runtime_seconds: i64) -> DateTime<Utc> {
    starts_at + Duration::seconds(runtime_seconds + TURNAROUND_SECONDS)
}

fn check_start_in_future(starts_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), ApiError> {
    if starts_at > now {
        Ok(())
    } else {
        Err(ApiError::Conflict(
            "cannot schedule a showtime in the past".to_string(),
        ))
    }
}

fn conflict_message(kind: OverlapKind, existing_id: i64) -> String {
    match kind {
        OverlapKind::Start => format!("showtime would start during showtime {existing_id}"),
        OverlapKind::End => format!("showtime would end during showtime {existing_id}"),
        OverlapKind::Full => format!("showtime would fully cover showtime {existing_id}"),
    }
}

// First conflicting showtime in the room, skipping the one being
// edited (self-overlap is not a conflict).
fn find_conflict(
    windows: &[ShowtimeWindow],
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    exclude_id: Option<i64>,
) -> Option<(i64, OverlapKind)> {
    windows
        .iter()
        .filter(|w| Some(w.id) != exclude_id)
        .find_map(|w| classify(starts_at, ends_at, w.starts_at, w.ends_at).map(|k| (w.id, k)))
}

// Capacity policy on edit: reject rooms smaller than the seats already
// sold, and rooms that would strand an occupied seat number beyond the
// new capacity. Otherwise rebuild the counter from the occupancy
// count; when the room is unchanged this preserves the existing
// counter exactly.
fn reconciled_counters(
    capacity: i32,
    occupied: i32,
    highest_seat: i32,
) -> Result<(i32, i32), ApiError> {
    if occupied > capacity || highest_seat > capacity {
        return Err(ApiError::Conflict(
            "room too small for existing reservations".to_string(),
        ));
    }
    Ok((capacity, capacity - occupied))
}

// The exclusion constraint is the backstop for races the room lock
// does not cover; losing it reads the same as a detected overlap.
fn map_overlap_violation(e: sqlx::Error) -> ApiError {
    if violates_constraint(&e, "showtimes_room_no_overlap") {
        ApiError::Conflict("showtime overlaps an existing showtime in this room".to_string())
    } else {
        e.into()
    }
}

pub async fn create_showtime(
    pool: &PgPool,
    actor: Role,
    movie_id: i64,
    room_id: i64,
    starts_at: DateTime<Utc>,
) -> Result<i64, ApiError> {
    require_role(actor, Role::Admin)?;
    check_start_in_future(starts_at, Utc::now())?;

    let runtime = movies::runtime(pool, movie_id)
        .await?
        .ok_or_else(|| ApiError::Conflict("movie does not exist".to_string()))?;

    let mut tx = pool.begin().await?;

    // Row lock serializes concurrent scheduling for this room; a
    // failed operation rolls back when the transaction drops.
    let capacity = rooms::capacity_for_update(&mut *tx, room_id)
        .await?
        .ok_or_else(|| ApiError::BadParam("room does not exist".to_string()))?;

    let ends_at = showtime_end(starts_at, runtime as i64);

    let windows = showtimes::windows_in_room(&mut *tx, room_id).await?;
    if let Some((existing_id, kind)) = find_conflict(&windows, starts_at, ends_at, None) {
        return Err(ApiError::Conflict(conflict_message(kind, existing_id)));
    }

    let id = showtimes::insert(&mut *tx, movie_id, room_id, starts_at, ends_at, capacity)
        .await
        .map_err(map_overlap_violation)?;

    tx.commit().await?;

    tracing::info!(showtime_id = id, movie_id, room_id, "showtime created");
    Ok(id)
}

pub async fn edit_showtime(
    pool: &PgPool,
    actor: Role,
    id: i64,
    movie_id: i64,
    room_id: i64,
    starts_at: DateTime<Utc>,
) -> Result<(), ApiError> {
    require_role(actor, Role::Admin)?;
    check_start_in_future(starts_at, Utc::now())?;

    let runtime = movies::runtime(pool, movie_id)
        .await?
        .ok_or_else(|| ApiError::Conflict("movie does not exist".to_string()))?;

    let mut tx = pool.begin().await?;

    let capacity = rooms::capacity_for_update(&mut *tx, room_id)
        .await?
        .ok_or_else(|| ApiError::BadParam("room does not exist".to_string()))?;

    // Showtime row lock: reservation writers take the same lock, so
    // the occupancy we rebuild the counter from cannot change under us.
    showtimes::get_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::Conflict("showtime does not exist".to_string()))?;

    let ends_at = showtime_end(starts_at, runtime as i64);

    let windows = showtimes::windows_in_room(&mut *tx, room_id).await?;
    if let Some((existing_id, kind)) = find_conflict(&windows, starts_at, ends_at, Some(id)) {
        return Err(ApiError::Conflict(conflict_message(kind, existing_id)));
    }

    let (occupied, highest_seat) = seats::occupancy(&mut *tx, id).await?;
    let (total_seats, available_seats) =
        reconciled_counters(capacity, occupied as i32, highest_seat)?;

    let updated = showtimes::update(
        &mut *tx,
        id,
        movie_id,
        room_id,
        starts_at,
        ends_at,
        total_seats,
        available_seats,
    )
    .await
    .map_err(map_overlap_violation)?;

    if !updated {
        return Err(ApiError::Conflict("showtime does not exist".to_string()));
    }

    tx.commit().await?;

    tracing::info!(showtime_id = id, movie_id, room_id, "showtime updated");
    Ok(())
}

pub async fn delete_showtime(pool: &PgPool, actor: Role, id: i64) -> Result<(), ApiError> {
    require_role(actor, Role::Admin)?;

    // Seats and reservations go with it via the cascade constraints
    let deleted = showtimes::delete(pool, id).await?;
    if !deleted {
        return Err(ApiError::Conflict("showtime does not exist".to_string()));
    }

    tracing::info!(showtime_id = id, "showtime deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn window(id: i64, start: i64, end: i64) -> ShowtimeWindow {
        ShowtimeWindow {
            id,
            starts_at: ts(start),
            ends_at: ts(end),
        }
    }

    #[test]
    fn end_is_runtime_plus_turnaround() {
        // 3600s movie: ends 3600 + 1800 after the start
        assert_eq!(showtime_end(ts(7200), 3600), ts(7200 + 3600 + 1800));
    }

    #[test]
    fn start_must_be_strictly_in_the_future() {
        assert!(check_start_in_future(ts(1001), ts(1000)).is_ok());
        assert!(check_start_in_future(ts(1000), ts(1000)).is_err());
        assert!(check_start_in_future(ts(999), ts(1000)).is_err());
    }

    #[test]
    fn first_conflict_names_the_existing_showtime() {
        // Mirrors the capacity-100 scenario: second showtime shifted
        // 1000s into the first one starts during it.
        let first_start = 7200;
        let first_end = first_start + 3600 + 1800;
        let windows = vec![window(7, first_start, first_end)];

        let cand_start = ts(first_start + 1000);
        let cand_end = showtime_end(cand_start, 3600);
        let (id, kind) = find_conflict(&windows, cand_start, cand_end, None).unwrap();
        assert_eq!(id, 7);
        assert_eq!(kind, OverlapKind::Start);
        assert_eq!(
            conflict_message(kind, id),
            "showtime would start during showtime 7"
        );
    }

    #[test]
    fn edited_showtime_is_excluded_from_the_comparison() {
        let windows = vec![window(7, 100, 200), window(8, 300, 400)];
        // Same slot as showtime 7, but we are editing 7 itself
        assert_eq!(find_conflict(&windows, ts(100), ts(200), Some(7)), None);
        // Still conflicts with the other showtime
        assert_eq!(
            find_conflict(&windows, ts(350), ts(450), Some(7)),
            Some((8, OverlapKind::Start))
        );
    }

    #[test]
    fn back_to_back_slot_is_schedulable() {
        let windows = vec![window(7, 100, 200)];
        assert_eq!(find_conflict(&windows, ts(200), ts(300), None), None);
    }

    #[test]
    fn capacity_reconciliation_rejects_overfull_rooms() {
        assert_eq!(reconciled_counters(100, 30, 30).unwrap(), (100, 70));
        assert_eq!(reconciled_counters(100, 100, 100).unwrap(), (100, 0));
        assert!(reconciled_counters(20, 30, 30).is_err());
        // Empty showtime: any positive capacity is fine
        assert_eq!(reconciled_counters(50, 0, 0).unwrap(), (50, 50));
    }

    #[test]
    fn capacity_reconciliation_rejects_stranded_seat_numbers() {
        // Shrinking 100 -> 50 with only seat 90 occupied: the count
        // fits but the seat number would fall outside the room.
        let err = reconciled_counters(50, 1, 90).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        // Seat exactly at the new capacity is still legal
        assert_eq!(reconciled_counters(50, 1, 50).unwrap(), (50, 49));
    }

    #[test]
    fn scheduling_requires_admin() {
        let err = require_role(Role::User, Role::Admin).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
