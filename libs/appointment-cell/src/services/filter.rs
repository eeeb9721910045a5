use chrono::{DateTime, Utc};

use crate::models::Appointment;

/// Derive the "next N pending" preview from a full appointment list.
///
/// Keeps records that are pending (or status-less) and scheduled at or
/// after `reference`, ordered soonest-first. Records whose date/time
/// fails to parse are excluded. The sort is stable, so equal instants
/// keep their input order.
pub fn upcoming_appointments(
    appointments: &[Appointment],
    reference: DateTime<Utc>,
    limit: usize,
) -> Vec<Appointment> {
    let mut upcoming: Vec<(DateTime<Utc>, Appointment)> = appointments
        .iter()
        .filter(|a| a.is_pending())
        .filter_map(|a| a.scheduled_instant().map(|instant| (instant, a.clone())))
        .filter(|(instant, _)| *instant >= reference)
        .collect();

    upcoming.sort_by_key(|(instant, _)| *instant);

    upcoming
        .into_iter()
        .take(limit)
        .map(|(_, appointment)| appointment)
        .collect()
}
